use std::fmt;
use std::io;

use thiserror::Error;

/// Format string with the position of the offending byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatExcerpt {
    pub format: String,
    pub position: usize,
}

impl FormatExcerpt {
    pub fn new(format: &[u8], position: usize) -> Self {
        Self {
            format: String::from_utf8_lossy(format).into_owned(),
            position,
        }
    }
}

impl fmt::Display for FormatExcerpt {
    /// Renders `<up to and including the byte><<<HERE<<<<rest>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.format.as_bytes();
        let split = (self.position + 1).min(bytes.len());
        write!(
            f,
            "{}<<<HERE<<<{}",
            String::from_utf8_lossy(&bytes[..split]),
            String::from_utf8_lossy(&bytes[split..])
        )
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Format code syntax error.\n{0}")]
    Syntax(FormatExcerpt),
    #[error("Format code width/precision modifier is too large.\n{0}")]
    Overflow(FormatExcerpt),
    #[error("Format code length error.\n{0}")]
    Length(FormatExcerpt),
    #[error("Format code error reported by underlying API.\n{0}")]
    Api(FormatExcerpt),
    #[error("Failed to write formatted sensor data: {0}")]
    Write(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to connect to remote device via {device}: {source}")]
    Connect {
        device: String,
        #[source]
        source: serialport::Error,
    },
    #[error("Failed to read data from remote device: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_marks_position() {
        let excerpt = FormatExcerpt::new(b"%Y %q rest", 4);
        assert_eq!(excerpt.to_string(), "%Y %q<<<HERE<<< rest");
    }

    #[test]
    fn test_excerpt_at_end() {
        let excerpt = FormatExcerpt::new(b"%v", 7);
        assert_eq!(excerpt.to_string(), "%v<<<HERE<<<");
    }

    #[test]
    fn test_error_message() {
        let error = FormatError::Syntax(FormatExcerpt::new(b"%vX", 2));
        assert_eq!(
            error.to_string(),
            "Format code syntax error.\n%vX<<<HERE<<<"
        );
    }
}
