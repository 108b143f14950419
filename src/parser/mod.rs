//! Incremental byte-stream recognizers
//!
//! Every parser here consumes one byte per call and never buffers input, so it
//! can be resumed across arbitrary read boundaries. A parser that reached a
//! terminal state keeps it until it is reset by its owner.
pub mod directive;
pub mod error_code;
pub mod float;

pub use directive::{DirectiveParser, DirectiveState, Flags};
pub use error_code::{ErrorCodeParser, ErrorCodeState};
pub use float::{FloatParser, FloatState};

/// Outcome of feeding a single byte to a parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The byte was accepted and the parser expects more input
    Continue,
    /// The parser entered a terminal state (stop or one of the error states)
    Terminated,
}

/// Common contract of the byte-stream recognizers
pub trait StreamParser {
    /// Process one byte of input.
    ///
    /// Calling this on a terminated parser returns `Step::Terminated` and
    /// leaves the parser untouched.
    fn step(&mut self, byte: u8) -> Step;

    /// Return the parser to its initial state, clearing every accumulator.
    fn reset(&mut self);

    /// Feed bytes until the parser terminates or the input runs out.
    ///
    /// # Returns
    /// The last step outcome and the number of bytes handed to the parser,
    /// including the terminating byte.
    fn feed(&mut self, bytes: &[u8]) -> (Step, usize) {
        for (index, &byte) in bytes.iter().enumerate() {
            if self.step(byte) == Step::Terminated {
                return (Step::Terminated, index + 1);
            }
        }
        (Step::Continue, bytes.len())
    }
}

/// Accumulate one decimal digit into `value`, returning `None` on overflow.
pub(crate) fn push_digit_u32(value: u32, byte: u8) -> Option<u32> {
    value
        .checked_mul(10)
        .and_then(|v| v.checked_add(u32::from(byte - b'0')))
}

/// 64 bit variant of [`push_digit_u32`] used by the float accumulators.
pub(crate) fn push_digit_u64(value: u64, byte: u8) -> Option<u64> {
    value
        .checked_mul(10)
        .and_then(|v| v.checked_add(u64::from(byte - b'0')))
}
