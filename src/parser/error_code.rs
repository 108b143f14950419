//! Passive recognizer for remote error reports of the form `Err:<digits>`
use super::{push_digit_u32, Step, StreamParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCodeState {
    #[default]
    Start,
    Stop,
    ErrorToken,
    ErrorOverflow,
    E,
    Er,
    Err,
    IntegerStart,
    Integer,
}

/// Case sensitive `Err:` matcher followed by optional blanks and an unsigned
/// decimal code. The code is complete on the first non-digit after a digit.
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeParser {
    state: ErrorCodeState,
    result: u32,
}

impl ErrorCodeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ErrorCodeState {
        self.state
    }

    /// Reported error code, `u32::MAX` after an overflow
    pub fn result(&self) -> u32 {
        self.result
    }

    fn expect(&mut self, byte: u8, wanted: u8, next: ErrorCodeState) -> Step {
        if byte == wanted {
            self.state = next;
            Step::Continue
        } else {
            self.state = ErrorCodeState::ErrorToken;
            Step::Terminated
        }
    }
}

impl StreamParser for ErrorCodeParser {
    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            ErrorCodeState::Stop | ErrorCodeState::ErrorToken | ErrorCodeState::ErrorOverflow => {
                Step::Terminated
            }
            ErrorCodeState::Start => self.expect(byte, b'E', ErrorCodeState::E),
            ErrorCodeState::E => self.expect(byte, b'r', ErrorCodeState::Er),
            ErrorCodeState::Er => self.expect(byte, b'r', ErrorCodeState::Err),
            ErrorCodeState::Err => self.expect(byte, b':', ErrorCodeState::IntegerStart),
            ErrorCodeState::IntegerStart => match byte {
                b'0'..=b'9' => {
                    self.result = u32::from(byte - b'0');
                    self.state = ErrorCodeState::Integer;
                    Step::Continue
                }
                b' ' | b'\t' => Step::Continue,
                _ => {
                    self.state = ErrorCodeState::ErrorToken;
                    Step::Terminated
                }
            },
            ErrorCodeState::Integer => match byte {
                b'0'..=b'9' => match push_digit_u32(self.result, byte) {
                    Some(value) => {
                        self.result = value;
                        Step::Continue
                    }
                    None => {
                        self.result = u32::MAX;
                        self.state = ErrorCodeState::ErrorOverflow;
                        Step::Terminated
                    }
                },
                _ => {
                    self.state = ErrorCodeState::Stop;
                    Step::Terminated
                }
            },
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_code() {
        let mut parser = ErrorCodeParser::new();
        let (step, consumed) = parser.feed(b"Err:42\n");
        assert_eq!(step, Step::Terminated);
        assert_eq!(consumed, 7);
        assert_eq!(parser.state(), ErrorCodeState::Stop);
        assert_eq!(parser.result(), 42);
    }

    #[test]
    fn test_blanks_before_code() {
        let mut parser = ErrorCodeParser::new();
        parser.feed(b"Err: \t 3,");
        assert_eq!(parser.state(), ErrorCodeState::Stop);
        assert_eq!(parser.result(), 3);
    }

    #[test]
    fn test_lowercase_rejected_on_first_byte() {
        let mut parser = ErrorCodeParser::new();
        let (step, consumed) = parser.feed(b"err:1");
        assert_eq!(step, Step::Terminated);
        assert_eq!(consumed, 1);
        assert_eq!(parser.state(), ErrorCodeState::ErrorToken);
    }

    #[test]
    fn test_divergence_in_keyword() {
        let mut parser = ErrorCodeParser::new();
        let (_, consumed) = parser.feed(b"Ert:1");
        assert_eq!(consumed, 3);
        assert_eq!(parser.state(), ErrorCodeState::ErrorToken);
    }

    #[test]
    fn test_missing_digits() {
        let mut parser = ErrorCodeParser::new();
        parser.feed(b"Err:x");
        assert_eq!(parser.state(), ErrorCodeState::ErrorToken);
    }

    #[test]
    fn test_overflow_saturates() {
        let mut parser = ErrorCodeParser::new();
        parser.feed(b"Err:4294967296\n");
        assert_eq!(parser.state(), ErrorCodeState::ErrorOverflow);
        assert_eq!(parser.result(), u32::MAX);
    }

    #[test]
    fn test_terminated_parser_is_sticky() {
        let mut parser = ErrorCodeParser::new();
        parser.feed(b"Err:7 ");
        assert_eq!(parser.step(b'8'), Step::Terminated);
        assert_eq!(parser.result(), 7);
        parser.reset();
        assert_eq!(parser.state(), ErrorCodeState::Start);
        assert_eq!(parser.result(), 0);
    }
}
