use chrono::Utc;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::io;

use crate::errors::LoggerError;
use crate::models::Sample;
use crate::output::render;

/// Record format used when none is configured
pub const DEFAULT_FORMAT: &str = r"%Y-%m-%d %H:%M:%S\t%.1vC\t%.1vH\n";

/// Default averaging interval in seconds
pub const DEFAULT_INTERVAL: u64 = 10;

const FORMAT_HELP: &str = "\
Format codes:
  All calendar codes of strftime, e.g. %Y, %m, %d, %H, %M, %S
  %vC  temperature in degrees Celsius
  %vF  temperature in degrees Fahrenheit
  %vH  relative humidity in percent
  %Z prints the numeric UTC offset (e.g. +02:00) for local time and UTC with -u.
  The flags, width and precision of printf's %f apply to %v codes, e.g. %6.2vC.
  Escape sequences \\\\ \\a \\b \\e \\f \\n \\r \\t are recognized.";

/// Temperature/humidity logger for serial sensor adapters
#[derive(Debug, Clone, Parser)]
#[command(name = "thlog", version, about, after_help = FORMAT_HELP, arg_required_else_help = true)]
pub struct LoggerConfig {
    /// Output format string
    #[arg(short, long, env = "THLOG_FORMAT", default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Averaging interval in seconds
    #[arg(
        short,
        long,
        env = "THLOG_INTERVAL",
        default_value_t = DEFAULT_INTERVAL,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Display time in UTC instead of local time
    #[arg(short, long, env = "THLOG_UTC")]
    pub utc: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Display the license of this program
    #[arg(long)]
    pub license: bool,

    /// Serial device of the sensor adapter, e.g. /dev/ttyUSB0 or COM3
    #[arg(env = "THLOG_DEVICE", required_unless_present = "license")]
    pub device: Option<String>,
}

impl LoggerConfig {
    /// Load configuration from the command line, the environment and `.env`
    pub fn new() -> Self {
        // Load environment variables before clap reads its env fallbacks
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Check the settings that clap cannot check on its own
    ///
    /// The format string is rendered once into a sink so that syntax errors
    /// show up before the device is opened.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.device.is_none() {
            return Err(LoggerError::Config("Missing device".into()));
        }
        render(&mut io::sink(), &self.format, &Utc::now(), Sample::default())?;
        Ok(())
    }
}
