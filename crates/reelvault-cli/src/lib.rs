use reelvault_core::models::UploadProgress;

/// Render progress as `[#####.....]  50.0% (512 KiB / 1.0 MiB)`.
pub fn progress_line(progress: &UploadProgress, width: usize) -> String {
    let filled = ((progress.ratio() * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {:5.1}% ({} / {})",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress.percent(),
        format_bytes(progress.bytes_sent),
        format_bytes(progress.bytes_total),
    )
}

/// Human-readable byte count using binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
