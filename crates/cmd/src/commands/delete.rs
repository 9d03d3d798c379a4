use anyhow::Result;

use hatchery::Hatchery;

use crate::common::emit_line;

/// Remove a dataset from the storage root.
pub fn delete_command(
    service: &Hatchery,
    name: &str,
    output: &mut Option<&mut String>,
) -> Result<()> {
    let qualified = service.delete(name)?;
    emit_line(output, &format!("Deleted {}", qualified));
    Ok(())
}
