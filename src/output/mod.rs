pub mod calendar;
pub mod engine;
pub mod printf;

use chrono::Local;
use std::io::Write;

use crate::errors::FormatError;
use crate::models::AverageData;

pub use calendar::CalendarRenderer;
pub use engine::render;

/// Write one averaged record and flush the writer
///
/// # Arguments
/// * `out` - destination, normally stdout
/// * `format` - user format string
/// * `utc` - render calendar directives in UTC instead of local time
/// * `average` - averaged sensor data and its timestamp
///
/// # Returns
/// Number of bytes written
pub fn write_record<W: Write + ?Sized>(
    out: &mut W,
    format: &str,
    utc: bool,
    average: &AverageData,
) -> Result<usize, FormatError> {
    let written = if utc {
        render(out, format, &average.time, average.sample)?
    } else {
        render(out, format, &average.time.with_timezone(&Local), average.sample)?
    };
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_write_record_utc() {
        let average = AverageData {
            sample: Sample::new(22.5, 48.0),
            samples: 3,
            time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let mut out = Vec::new();
        let written = write_record(&mut out, "%H:%M:%S %.1vC %.1vF", true, &average).unwrap();
        assert_eq!(out, b"03:04:05 22.5 72.5");
        assert_eq!(written, out.len());
    }
}
