use anyhow::Result;

use hatchery::{GenerationRequest, Hatchery};

use crate::common::{emit_line, format_file_size};

/// Generate a dataset in a one-shot container and report the confirmed
/// catalog entry. Container output is relayed to the user on both paths:
/// here on success, inside the error on failure.
pub async fn run_command(
    service: &Hatchery,
    request: &GenerationRequest,
    output: &mut Option<&mut String>,
) -> Result<()> {
    let config = service.config();
    emit_line(
        output,
        &format!(
            "Dispatching generation to image '{}' (volume '{}')...",
            config.image, config.volume
        ),
    );

    let run = service.generate_isolated(request).await?;

    let logs = run.logs.trim();
    if !logs.is_empty() {
        emit_line(output, logs);
    }
    emit_line(
        output,
        &format!(
            "✅ Confirmed {} ({})",
            run.entry.name,
            format_file_size(run.entry.size_bytes)
        ),
    );
    Ok(())
}
