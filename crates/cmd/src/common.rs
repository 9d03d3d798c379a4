use chrono::Utc;

/// Print a line for the user, or capture it when a test hands us a buffer.
#[allow(clippy::print_stdout)]
pub fn emit_line(output: &mut Option<&mut String>, line: &str) {
    match output {
        Some(buffer) => {
            buffer.push_str(line);
            buffer.push('\n');
        }
        None => println!("{}", line),
    }
}

/// Helper function to format file sizes
pub fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{}B", size)
    }
}

/// Render a microsecond unix timestamp for listings.
pub fn format_timestamp(timestamp_us: i64) -> String {
    let dt = chrono::DateTime::from_timestamp(
        timestamp_us / 1_000_000,
        ((timestamp_us % 1_000_000) * 1000) as u32,
    )
    .unwrap_or_else(Utc::now);
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
