//! Passive decimal float recognizer
//!
//! Accepts `['-'] digit* ['.' digit*]`. The byte that ends the number is not
//! part of the value; the caller decides what it means (usually a separator).
use super::{push_digit_u64, Step, StreamParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatState {
    #[default]
    Start,
    Stop,
    ErrorToken,
    ErrorOverflow,
    Integral,
    Fraction,
    /// Fraction digits beyond the accumulator range, consumed without effect
    Remaining,
}

#[derive(Debug, Clone)]
pub struct FloatParser {
    state: FloatState,
    negative: bool,
    integral: u64,
    fraction: u64,
    digits: u32,
    result: f32,
}

impl Default for FloatParser {
    fn default() -> Self {
        Self {
            state: FloatState::Start,
            negative: false,
            integral: 0,
            fraction: 0,
            digits: 0,
            result: f32::NAN,
        }
    }
}

impl FloatParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FloatState {
        self.state
    }

    /// Parsed value; NaN until the parser reached `FloatState::Stop`.
    pub fn result(&self) -> f32 {
        self.result
    }

    /// Number of fraction digits that made it into the accumulator
    #[cfg(test)]
    fn digits(&self) -> u32 {
        self.digits
    }

    fn integral_digit(&mut self, byte: u8) -> Step {
        match push_digit_u64(self.integral, byte) {
            Some(value) => {
                self.integral = value;
                Step::Continue
            }
            None => {
                self.state = FloatState::ErrorOverflow;
                Step::Terminated
            }
        }
    }

    fn finish(&mut self) -> Step {
        let magnitude =
            self.integral as f64 + self.fraction as f64 / 10f64.powf(f64::from(self.digits));
        let sign = if self.negative { -1.0 } else { 1.0 };
        self.result = (sign * magnitude) as f32;
        self.state = FloatState::Stop;
        Step::Terminated
    }
}

impl StreamParser for FloatParser {
    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            FloatState::Stop | FloatState::ErrorToken | FloatState::ErrorOverflow => {
                Step::Terminated
            }
            FloatState::Start => match byte {
                b'-' => {
                    self.negative = true;
                    self.state = FloatState::Integral;
                    Step::Continue
                }
                b'0'..=b'9' => {
                    self.state = FloatState::Integral;
                    self.integral_digit(byte)
                }
                b'.' => {
                    self.state = FloatState::Fraction;
                    Step::Continue
                }
                _ => {
                    self.state = FloatState::ErrorToken;
                    Step::Terminated
                }
            },
            FloatState::Integral => match byte {
                b'0'..=b'9' => self.integral_digit(byte),
                b'.' => {
                    self.state = FloatState::Fraction;
                    Step::Continue
                }
                _ => self.finish(),
            },
            FloatState::Fraction => match byte {
                b'0'..=b'9' => {
                    match push_digit_u64(self.fraction, byte) {
                        Some(value) => {
                            self.fraction = value;
                            self.digits += 1;
                        }
                        // precision is bounded by the accumulator width
                        None => self.state = FloatState::Remaining,
                    }
                    Step::Continue
                }
                _ => self.finish(),
            },
            FloatState::Remaining => match byte {
                b'0'..=b'9' => Step::Continue,
                _ => self.finish(),
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
    use proptest::prelude::*;

    fn parse(input: &[u8]) -> FloatParser {
        let mut parser = FloatParser::new();
        parser.feed(input);
        parser
    }

    #[test]
    fn test_parse_simple_value() {
        let parser = parse(b"23.4,");
        assert_eq!(parser.state(), FloatState::Stop);
        assert!((parser.result() - 23.4).abs() < 1e-5);
    }

    #[test]
    fn test_parse_negative_value() {
        let parser = parse(b"-12.25\n");
        assert_eq!(parser.state(), FloatState::Stop);
        assert_eq!(parser.result(), -12.25);
    }

    #[test]
    fn test_leading_dot() {
        let parser = parse(b".5x");
        assert_eq!(parser.state(), FloatState::Stop);
        assert_eq!(parser.result(), 0.5);
    }

    #[test]
    fn test_lone_minus_is_zero() {
        let parser = parse(b"-x");
        assert_eq!(parser.state(), FloatState::Stop);
        assert_eq!(parser.result(), 0.0);
    }

    #[test]
    fn test_trailing_dot() {
        let parser = parse(b"17.,");
        assert_eq!(parser.state(), FloatState::Stop);
        assert_eq!(parser.result(), 17.0);
        assert_eq!(parser.digits(), 0);
    }

    #[test]
    fn test_empty_input_is_token_error() {
        let parser = parse(b",");
        assert_eq!(parser.state(), FloatState::ErrorToken);
        assert!(parser.result().is_nan());
    }

    #[test]
    fn test_plus_sign_rejected() {
        let parser = parse(b"+1.0,");
        assert_eq!(parser.state(), FloatState::ErrorToken);
    }

    #[test]
    fn test_integral_overflow() {
        let mut parser = FloatParser::new();
        let (step, consumed) = parser.feed(b"99999999999999999999x");
        assert_eq!(step, Step::Terminated);
        assert_eq!(consumed, 20);
        assert_eq!(parser.state(), FloatState::ErrorOverflow);
    }

    #[test]
    fn test_fraction_overflow_is_absorbed() {
        let parser = parse(b"1.12345678901234567890123456789,");
        assert_eq!(parser.state(), FloatState::Stop);
        assert!(parser.digits() < 30);
        assert!((parser.result() - 1.123_456_8).abs() < 1e-6);
    }

    #[test]
    fn test_terminated_parser_is_sticky() {
        let mut parser = parse(b"4,");
        assert_eq!(parser.step(b'5'), Step::Terminated);
        assert_eq!(parser.state(), FloatState::Stop);
        assert_eq!(parser.result(), 4.0);

        parser.reset();
        assert_eq!(parser.state(), FloatState::Start);
        assert!(parser.result().is_nan());
    }

    #[test]
    fn test_resumes_across_chunks() {
        let mut parser = FloatParser::new();
        assert_eq!(parser.feed(b"-3").0, Step::Continue);
        assert_eq!(parser.feed(b".7").0, Step::Continue);
        assert_eq!(parser.feed(b"5;").0, Step::Terminated);
        assert_eq!(parser.result(), -3.75);
    }

    proptest! {
        #[test]
        fn prop_parses_decimal_literals(
            text in "-?([0-9]{1,9}(\\.[0-9]{0,6})?|\\.[0-9]{1,6})",
            terminator in prop::sample::select(vec![b',', b'\n', b'\r', b' ', b'x', b';']),
        ) {
            let mut input = text.clone().into_bytes();
            input.push(terminator);
            let parser = parse(&input);
            prop_assert_eq!(parser.state(), FloatState::Stop);

            let mut normalized = text.replace("-.", "-0.");
            if normalized.starts_with('.') {
                normalized.insert(0, '0');
            }
            if normalized.ends_with('.') {
                normalized.push('0');
            }
            let expected: f64 = normalized.parse().unwrap();
            let actual = f64::from(parser.result());
            prop_assert!((actual - expected).abs() <= 1e-6 * expected.abs());
        }
    }
}
