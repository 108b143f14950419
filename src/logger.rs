//! Byte stream to averaged records
use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::models::AverageData;
use crate::serial::{Assembler, Event};
use crate::utils::Averager;

/// Counters for everything the sensor link delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub samples: u64,
    pub checksum_errors: u64,
    pub remote_errors: u64,
}

/// Combines the measurement assembler with interval averaging
pub struct SensorLogger {
    assembler: Assembler,
    averager: Averager,
    stats: LinkStats,
}

impl SensorLogger {
    pub fn new(interval_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            assembler: Assembler::new(),
            averager: Averager::new(interval_secs, now),
            stats: LinkStats::default(),
        }
    }

    /// Feed raw bytes received from the sensor
    ///
    /// Remote errors and checksum failures are reported as warnings and
    /// otherwise ignored.
    pub fn ingest(&mut self, bytes: &[u8]) {
        let averager = &mut self.averager;
        let stats = &mut self.stats;
        self.assembler.extend(bytes, |event| match event {
            Event::Sample(sample) => {
                debug!(
                    "Received sample: temp={:.2}°C, humidity={:.2}%",
                    sample.temperature, sample.humidity
                );
                stats.samples += 1;
                averager.push(sample);
            }
            Event::ChecksumMismatch {
                temperature,
                humidity,
                checksum,
            } => {
                stats.checksum_errors += 1;
                warn!(
                    "Checksum of the remote data failed: {} + {} != {}",
                    temperature, humidity, checksum
                );
            }
            Event::Remote(code) => {
                stats.remote_errors += 1;
                warn!("The remote device returned error code {}", code);
            }
        });
    }

    /// Return the interval average once the interval elapsed, see [`Averager::poll`]
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<AverageData> {
        self.averager.poll(now)
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }
}
