//! Reassembles sensor measurements from the raw serial byte stream
//!
//! The sensor sends one line per reading:
//! - `<temperature>,<humidity>,<checksum>\r\n` where checksum = temperature + humidity
//! - `Err:<code>\r\n` if the sensor could not be read
//!
//! The exact separator is not enforced; any single byte that ends a number
//! moves on to the next field.
use log::trace;

use crate::models::Sample;
use crate::parser::{ErrorCodeParser, ErrorCodeState, FloatParser, FloatState, StreamParser};

/// Maximum allowed deviation between the transmitted checksum and temperature + humidity
pub const CHECKSUM_TOLERANCE: f32 = 0.001;

/// Something the assembler observed in the byte stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A complete line with a valid checksum
    Sample(Sample),
    /// A complete line whose checksum does not match
    ChecksumMismatch {
        temperature: f32,
        humidity: f32,
        checksum: f32,
    },
    /// The remote device reported an error code
    Remote(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Temperature,
    Humidity,
    Checksum,
}

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    float: FloatParser,
    error: ErrorCodeParser,
    field: Field,
    temperature: f32,
    humidity: f32,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single byte from the serial link
    ///
    /// # Arguments
    /// * `byte` - next input byte
    /// * `emit` - receives every event completed by this byte
    pub fn push<F>(&mut self, byte: u8, mut emit: F)
    where
        F: FnMut(Event),
    {
        self.error.step(byte);
        match self.error.state() {
            ErrorCodeState::Stop => {
                emit(Event::Remote(self.error.result()));
                self.error.reset();
            }
            ErrorCodeState::ErrorToken | ErrorCodeState::ErrorOverflow => self.error.reset(),
            _ => {}
        }

        self.float.step(byte);
        match self.float.state() {
            FloatState::Stop => {
                let value = self.float.result();
                self.accept(value, &mut emit);
                self.float.reset();
                self.error.reset();
            }
            FloatState::ErrorToken | FloatState::ErrorOverflow => {
                self.float.reset();
                self.field = Field::Temperature;
            }
            _ => {}
        }

        if byte == b'\r' || byte == b'\n' {
            self.reset();
        }
    }

    /// Process a chunk of bytes, see [`Assembler::push`]
    pub fn extend<F>(&mut self, bytes: &[u8], mut emit: F)
    where
        F: FnMut(Event),
    {
        for &byte in bytes {
            self.push(byte, &mut emit);
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.float.reset();
        self.error.reset();
        self.field = Field::Temperature;
    }

    fn accept<F>(&mut self, value: f32, emit: &mut F)
    where
        F: FnMut(Event),
    {
        match self.field {
            Field::Temperature => {
                self.temperature = value;
                self.field = Field::Humidity;
            }
            Field::Humidity => {
                self.humidity = value;
                self.field = Field::Checksum;
            }
            Field::Checksum => {
                self.field = Field::Temperature;
                if (self.temperature + self.humidity - value).abs() > CHECKSUM_TOLERANCE {
                    emit(Event::ChecksumMismatch {
                        temperature: self.temperature,
                        humidity: self.humidity,
                        checksum: value,
                    });
                } else {
                    trace!(
                        "Assembled sample: temp={}, humidity={}",
                        self.temperature,
                        self.humidity
                    );
                    emit(Event::Sample(Sample::new(self.temperature, self.humidity)));
                }
            }
        }
    }
}
