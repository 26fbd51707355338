use std::time::Duration;

/// Format an elapsed time as `mm:ss`, or `hh:mm:ss` from one hour on.
///
/// Sub-second remainders are truncated.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// [`format_duration`] for millisecond counts reported by the server.
#[must_use]
pub fn format_millis(millis: u64) -> String {
    format_duration(Duration::from_millis(millis))
}
