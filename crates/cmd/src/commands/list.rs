use anyhow::Result;

use hatchery::Hatchery;

use crate::common::{emit_line, format_file_size, format_timestamp};

/// List datasets in the storage root, newest first.
pub fn list_command(service: &Hatchery, output: &mut Option<&mut String>) -> Result<()> {
    let entries = service.list()?;

    if entries.is_empty() {
        emit_line(
            output,
            &format!("No datasets in {}", service.config().storage_root.display()),
        );
        return Ok(());
    }

    for entry in &entries {
        emit_line(
            output,
            &format!(
                "📄 {:>9} {} {}",
                format_file_size(entry.size_bytes),
                format_timestamp(entry.modified),
                entry.name
            ),
        );
    }
    emit_line(output, &format!("{} dataset(s)", entries.len()));
    Ok(())
}
