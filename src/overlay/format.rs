//! Clock formatting for elapsed/total labels

/// Format seconds as `MM:SS`, or `H:MM:SS` from one hour up
///
/// Missing, NaN and infinite inputs render as `00:00`.
pub fn format_clock(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() => s.max(0.0) as u64,
        _ => return "00:00".to_string(),
    };

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
