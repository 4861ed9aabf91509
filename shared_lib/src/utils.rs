pub fn duration_to_ms_string(duration: std::time::Duration) -> String {
    let milliseconds = duration.as_secs_f64() * 1000.0;
    format!("{milliseconds:.2}ms")
}

/// Renders an error and its sources, outermost first, one per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(&format!("\n    caused by: {cause}"));
        source = cause.source();
    }
    rendered
}
