//! Text parsing for ipmitool responses.
//! Converts `ipmitool sdr type temperature` output into integer readings and
//! classifies raw command responses.

use super::CommandOutput;

/// Substring ipmitool prints when the BMC refuses a raw command.
pub const ERROR_MARKER: &str = "Error";

/// Single source of truth for "did the controller accept this command".
/// A clean exit is required and neither stream may carry the error marker.
pub fn response_indicates_success(output: &CommandOutput) -> bool {
    output.exit_ok && !output.stdout.contains(ERROR_MARKER) && !output.stderr.contains(ERROR_MARKER)
}

/// Extract the reading column for one sensor from SDR output.
/// Input:  "Inlet Temp       | 04h | ok  |  7.1 | 23 degrees C\n..."
/// Picks the first line containing `sensor_id`, takes the 5th `|` field and then the
/// 2nd space-separated field of it, exactly like `cut -d"|" -f5 | cut -d" " -f2`.
pub fn extract_sensor_field(sdr: &str, sensor_id: &str) -> Option<String> {
    let line = sdr.lines().find(|line| line.contains(sensor_id))?;
    let column = line.split('|').nth(4)?;
    let field = column.split(' ').nth(1)?;
    Some(field.trim().to_string())
}

/// Parse the trailing whitespace-separated token of a reading as an integer.
pub fn parse_reading(text: &str) -> Option<i32> {
    text.split_whitespace().last()?.parse().ok()
}
