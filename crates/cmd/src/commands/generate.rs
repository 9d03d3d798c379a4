use anyhow::Result;

use hatchery::{GenerationRequest, Hatchery};

use crate::common::{emit_line, format_file_size};

/// Generate a dataset in-process and report the catalog entry.
pub fn generate_command(
    service: &Hatchery,
    request: &GenerationRequest,
    output: &mut Option<&mut String>,
) -> Result<()> {
    emit_line(
        output,
        &format!("Generating {} rows x {} cols...", request.rows, request.cols),
    );

    let entry = service.generate(request)?;

    emit_line(
        output,
        &format!(
            "✅ Created {} ({}) in {}",
            entry.name,
            format_file_size(entry.size_bytes),
            service.config().storage_root.display()
        ),
    );
    Ok(())
}
