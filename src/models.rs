use chrono::{DateTime, Utc};

/// Validated sensor reading (checksum already verified)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Temperature in degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
}

impl Sample {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    pub fn fahrenheit(&self) -> f32 {
        self.temperature * 1.8 + 32.0
    }
}

#[derive(Debug, Clone)]
pub struct AverageData {
    pub sample: Sample,
    pub samples: usize,
    pub time: DateTime<Utc>,
}
