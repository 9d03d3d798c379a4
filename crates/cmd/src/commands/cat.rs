use anyhow::Result;
use arrow::record_batch::RecordBatch;

use hatchery::Hatchery;

use crate::common::emit_line;

/// Print the first rows of a dataset as an ASCII table.
pub fn cat_command(
    service: &Hatchery,
    name: &str,
    limit: usize,
    output: &mut Option<&mut String>,
) -> Result<()> {
    let batch = service.load(name)?;
    let total_rows = batch.num_rows();
    let shown = total_rows.min(limit);

    let formatted = format_batch(&batch.slice(0, shown))?;
    emit_line(output, formatted.trim_end());
    emit_line(output, &format!("Showing {} of {} rows", shown, total_rows));
    Ok(())
}

/// Format a RecordBatch as a pretty-printed string.
///
/// Presentation helper specific to the cat command. Includes column types
/// in the headers and shows NULL values clearly.
fn format_batch(batch: &RecordBatch) -> Result<String> {
    use arrow::util::pretty::pretty_format_batches_with_options;
    use arrow_cast::display::FormatOptions;

    let options = FormatOptions::default()
        .with_display_error(true)
        .with_types_info(true)
        .with_null("NULL");

    let formatted = pretty_format_batches_with_options(std::slice::from_ref(batch), &options)
        .map_err(|e| anyhow::anyhow!("Failed to format results: {}", e))?
        .to_string();

    Ok(formatted)
}
