//! Temperature/humidity logger for serial sensor adapters
//!
//! The sensor adapter prints `<temperature>,<humidity>,<checksum>` lines (or
//! `Err:<code>`) at 9600 baud. [`serial::Assembler`] turns that byte stream
//! into samples, [`utils::Averager`] averages them per interval and
//! [`output::render`] writes each average through a strftime-like format
//! string with the extra codes `%vC`, `%vF` and `%vH`.
pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod output;
pub mod parser;
pub mod serial;
pub mod utils;
