//! Utility functions for interval averaging and timestamp formatting
use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{AverageData, Sample};

/// Format a timestamp for human-readable logging
///
/// Converts a DateTime to DD.MM.YYYY - HH:MM:SS format
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y - %H:%M:%S").to_string()
}

/// Convert a chrono::TimeDelta to whole seconds, clamping negative spans to zero
///
/// The wall clock may step backwards (NTP); such an interval counts as empty.
pub fn duration_to_seconds(duration: TimeDelta) -> u64 {
    u64::try_from(duration.num_seconds()).unwrap_or(0)
}

/// Accumulates samples over a wall-clock interval
///
/// An interval only ends once it holds at least one sample; while empty its
/// start slides along with the clock so no stale or empty record is produced.
#[derive(Debug, Clone)]
pub struct Averager {
    interval_secs: u64,
    started: DateTime<Utc>,
    temperature_sum: f32,
    humidity_sum: f32,
    samples: usize,
}

impl Averager {
    pub fn new(interval_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            interval_secs,
            started: now,
            temperature_sum: 0.0,
            humidity_sum: 0.0,
            samples: 0,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.temperature_sum += sample.temperature;
        self.humidity_sum += sample.humidity;
        self.samples += 1;
    }

    /// Number of samples collected in the current interval
    #[cfg(test)]
    fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Check the interval deadline
    ///
    /// # Arguments
    /// * `now` - current wall-clock time
    ///
    /// # Returns
    /// The averaged data if the interval elapsed and held samples. The
    /// accumulators are reset and the next interval starts at `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<AverageData> {
        if self.is_empty() {
            self.started = now;
            return None;
        }
        if duration_to_seconds(now - self.started) < self.interval_secs {
            return None;
        }

        let count = self.samples as f32;
        let average = AverageData {
            sample: Sample::new(self.temperature_sum / count, self.humidity_sum / count),
            samples: self.samples,
            time: now,
        };

        self.temperature_sum = 0.0;
        self.humidity_sum = 0.0;
        self.samples = 0;
        self.started = now;
        Some(average)
    }
}
