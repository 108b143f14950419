//! Recognizer for a single output format directive
//!
//! ```text
//! %[flags][width][.precision]type[subtype]
//! ```
//!
//! `type` is either one of the calendar conversions understood by strftime,
//! `%`, or `v` which must be followed by the sensor subtype `C`, `F` or `H`.
use super::{push_digit_u32, Step, StreamParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectiveState {
    #[default]
    Start,
    Stop,
    ErrorToken,
    ErrorOverflow,
    Flag,
    Width,
    PrecisionStart,
    Precision,
    Type,
    Subtype,
}

/// printf style flag set accumulated while parsing a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    pub const LEFT_ALIGN: Flags = Flags(0x01);
    pub const SIGN: Flags = Flags(0x02);
    pub const ZERO: Flags = Flags(0x04);
    pub const BLANK: Flags = Flags(0x08);
    pub const HASHTAG: Flags = Flags(0x10);

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    fn from_byte(byte: u8) -> Option<Flags> {
        match byte {
            b'-' => Some(Flags::LEFT_ALIGN),
            b'+' => Some(Flags::SIGN),
            b'0' => Some(Flags::ZERO),
            b' ' => Some(Flags::BLANK),
            b'#' => Some(Flags::HASHTAG),
            _ => None,
        }
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// Conversions that complete a directive on their own
const CALENDAR_TYPES: &[u8] = b"%aAbBcCdDeEFgGhHIjklmMnOpPrRsStTuUVwWxXyYzZ";

/// Conversion byte introducing a sensor value directive
pub const VALUE_TYPE: u8 = b'v';

#[derive(Debug, Clone, Default)]
pub struct DirectiveParser {
    state: DirectiveState,
    flags: Flags,
    width: u32,
    precision: u32,
    has_precision: bool,
    conversion: Option<u8>,
    subtype: Option<u8>,
}

impl DirectiveParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DirectiveState {
        self.state
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Minimum field width, zero when none was given
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// True if the directive contained a `.`, even without digits after it
    pub fn has_precision(&self) -> bool {
        self.has_precision
    }

    /// The type byte; on a token error this is the offending byte.
    pub fn conversion(&self) -> Option<u8> {
        self.conversion
    }

    pub fn subtype(&self) -> Option<u8> {
        self.subtype
    }

    fn error(&mut self, state: DirectiveState) -> Step {
        self.state = state;
        Step::Terminated
    }

    fn on_type(&mut self, byte: u8) -> Step {
        self.state = DirectiveState::Type;
        self.conversion = Some(byte);
        if byte == VALUE_TYPE {
            self.state = DirectiveState::Subtype;
            Step::Continue
        } else if CALENDAR_TYPES.contains(&byte) {
            self.state = DirectiveState::Stop;
            Step::Terminated
        } else {
            self.error(DirectiveState::ErrorToken)
        }
    }
}

impl StreamParser for DirectiveParser {
    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            DirectiveState::Stop | DirectiveState::ErrorToken | DirectiveState::ErrorOverflow => {
                Step::Terminated
            }
            DirectiveState::Start => {
                if byte == b'%' {
                    *self = Self::default();
                    self.state = DirectiveState::Flag;
                    Step::Continue
                } else {
                    self.error(DirectiveState::ErrorToken)
                }
            }
            DirectiveState::Flag => {
                if let Some(flag) = Flags::from_byte(byte) {
                    self.flags.insert(flag);
                    Step::Continue
                } else if byte == b'.' {
                    self.state = DirectiveState::PrecisionStart;
                    self.has_precision = true;
                    Step::Continue
                } else if matches!(byte, b'1'..=b'9') {
                    self.state = DirectiveState::Width;
                    self.width = u32::from(byte - b'0');
                    Step::Continue
                } else {
                    self.on_type(byte)
                }
            }
            DirectiveState::Width => match byte {
                b'0'..=b'9' => match push_digit_u32(self.width, byte) {
                    Some(width) => {
                        self.width = width;
                        Step::Continue
                    }
                    None => {
                        self.width = u32::MAX;
                        self.error(DirectiveState::ErrorOverflow)
                    }
                },
                b'.' => {
                    self.state = DirectiveState::PrecisionStart;
                    self.has_precision = true;
                    Step::Continue
                }
                _ => self.on_type(byte),
            },
            DirectiveState::PrecisionStart => match byte {
                b'0'..=b'9' => {
                    self.state = DirectiveState::Precision;
                    self.precision = u32::from(byte - b'0');
                    Step::Continue
                }
                _ => self.on_type(byte),
            },
            DirectiveState::Precision => match byte {
                b'0'..=b'9' => match push_digit_u32(self.precision, byte) {
                    Some(precision) => {
                        self.precision = precision;
                        Step::Continue
                    }
                    None => {
                        self.precision = u32::MAX;
                        self.error(DirectiveState::ErrorOverflow)
                    }
                },
                _ => self.on_type(byte),
            },
            DirectiveState::Type => self.on_type(byte),
            DirectiveState::Subtype => {
                self.subtype = Some(byte);
                match byte {
                    b'C' | b'F' | b'H' => {
                        self.state = DirectiveState::Stop;
                        Step::Terminated
                    }
                    _ => self.error(DirectiveState::ErrorToken),
                }
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &[u8]) -> DirectiveParser {
        let mut parser = DirectiveParser::new();
        parser.feed(input);
        parser
    }

    #[test]
    fn test_parse_value_directive() {
        let parser = parse(b"%-10.2vC");
        assert_eq!(parser.state(), DirectiveState::Stop);
        assert_eq!(parser.flags(), Flags::LEFT_ALIGN);
        assert_eq!(parser.width(), 10);
        assert_eq!(parser.precision(), 2);
        assert!(parser.has_precision());
        assert_eq!(parser.conversion(), Some(b'v'));
        assert_eq!(parser.subtype(), Some(b'C'));
    }

    #[test]
    fn test_parse_flags_accumulate() {
        let parser = parse(b"%+0 #-vH");
        assert_eq!(parser.state(), DirectiveState::Stop);
        let flags = parser.flags();
        assert!(flags.contains(Flags::LEFT_ALIGN | Flags::SIGN | Flags::ZERO));
        assert!(flags.contains(Flags::BLANK | Flags::HASHTAG));
        assert_eq!(parser.width(), 0);
        assert!(!parser.has_precision());
    }

    #[test]
    fn test_zero_after_width_is_digit() {
        let parser = parse(b"%010vF");
        assert_eq!(parser.flags(), Flags::ZERO);
        assert_eq!(parser.width(), 10);
    }

    #[test]
    fn test_dot_without_digits() {
        let parser = parse(b"%.vC");
        assert_eq!(parser.state(), DirectiveState::Stop);
        assert!(parser.has_precision());
        assert_eq!(parser.precision(), 0);
    }

    #[test]
    fn test_calendar_type_stops() {
        let mut parser = DirectiveParser::new();
        let (step, consumed) = parser.feed(b"%Y-%m");
        assert_eq!(step, Step::Terminated);
        assert_eq!(consumed, 2);
        assert_eq!(parser.state(), DirectiveState::Stop);
        assert_eq!(parser.conversion(), Some(b'Y'));
        assert_eq!(parser.subtype(), None);
    }

    #[test]
    fn test_percent_type() {
        let parser = parse(b"%%");
        assert_eq!(parser.state(), DirectiveState::Stop);
        assert_eq!(parser.conversion(), Some(b'%'));
    }

    #[test]
    fn test_unknown_type() {
        let parser = parse(b"%q");
        assert_eq!(parser.state(), DirectiveState::ErrorToken);
        assert_eq!(parser.conversion(), Some(b'q'));
    }

    #[test]
    fn test_invalid_subtype() {
        let parser = parse(b"%vX");
        assert_eq!(parser.state(), DirectiveState::ErrorToken);
        assert_eq!(parser.subtype(), Some(b'X'));
    }

    #[test]
    fn test_must_start_with_percent() {
        let parser = parse(b"Y");
        assert_eq!(parser.state(), DirectiveState::ErrorToken);
    }

    #[test]
    fn test_width_overflow() {
        let parser = parse(b"%99999999999vC");
        assert_eq!(parser.state(), DirectiveState::ErrorOverflow);
        assert_eq!(parser.width(), u32::MAX);
    }

    #[test]
    fn test_precision_overflow() {
        let parser = parse(b"%.4294967296vC");
        assert_eq!(parser.state(), DirectiveState::ErrorOverflow);
        assert_eq!(parser.precision(), u32::MAX);
    }

    #[test]
    fn test_terminated_parser_is_sticky() {
        let mut parser = parse(b"%-5.1vC");
        assert_eq!(parser.step(b'%'), Step::Terminated);
        assert_eq!(parser.step(b'7'), Step::Terminated);
        assert_eq!(parser.state(), DirectiveState::Stop);
        assert_eq!(parser.flags(), Flags::LEFT_ALIGN);
        assert_eq!(parser.width(), 5);
        assert_eq!(parser.precision(), 1);
        assert_eq!(parser.subtype(), Some(b'C'));

        let mut parser = parse(b"%q");
        assert_eq!(parser.feed(b"%vC"), (Step::Terminated, 1));
        assert_eq!(parser.state(), DirectiveState::ErrorToken);
        assert_eq!(parser.conversion(), Some(b'q'));
        assert_eq!(parser.subtype(), None);
    }

    #[test]
    fn test_reset_clears_fields() {
        let mut parser = parse(b"%5.1vH");
        parser.reset();
        assert_eq!(parser.state(), DirectiveState::Start);
        assert_eq!(parser.width(), 0);
        assert_eq!(parser.conversion(), None);
    }
}
