//! Serial link to the sensor adapter
use log::{debug, warn};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::thread;
use std::time::Duration;

use crate::errors::LoggerError;

// Sensor adapter link parameters (9600 baud, 8N1, no flow control)
pub const BAUD_RATE: u32 = 9600;
/// Read timeout; bounds how long a termination request can go unnoticed
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Time the adapter needs after the port was opened (it resets on connect)
const CONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Open the sensor adapter and discard anything it sent while booting
///
/// # Arguments
/// * `device` - serial device path, e.g. `/dev/ttyUSB0` or `COM3`
///
/// # Returns
/// The opened port, ready for reading
pub fn open_port(device: &str) -> Result<Box<dyn SerialPort>, LoggerError> {
    let port = serialport::new(device, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|source| LoggerError::Connect {
            device: device.to_string(),
            source,
        })?;

    debug!("Opened {} at {} baud, waiting for the device", device, BAUD_RATE);
    thread::sleep(CONNECT_DELAY);

    if let Err(e) = port.clear(ClearBuffer::Input) {
        warn!("Failed to clear input buffer of {}: {}", device, e);
    }

    Ok(port)
}

/// Read whatever arrived within one timeout period
///
/// A timeout or an interrupted read is reported as zero bytes so the caller
/// gets a chance to check for termination requests.
pub fn read_chunk<R: Read + ?Sized>(port: &mut R, buf: &mut [u8]) -> Result<usize, LoggerError> {
    match port.read(buf) {
        Ok(count) => Ok(count),
        Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => Ok(0),
        Err(e) => Err(LoggerError::Read(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct TimingOut;

    impl Read for TimingOut {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::TimedOut, "timed out"))
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged"))
        }
    }

    #[test]
    fn test_timeout_reads_nothing() {
        let mut buf = [0u8; 8];
        assert_eq!(read_chunk(&mut TimingOut, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_error_is_fatal() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            read_chunk(&mut Broken, &mut buf),
            Err(LoggerError::Read(_))
        ));
    }

    #[test]
    fn test_reads_available_bytes() {
        let mut source: &[u8] = b"1.0,2.0,3.0\n";
        let mut buf = [0u8; 4];
        assert_eq!(read_chunk(&mut source, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"1.0,");
    }
}
