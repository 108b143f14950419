//! printf `%f` rendering for sensor values
//!
//! Digits come from Rust's float formatting; sign, padding and alignment
//! follow the C rules for the flags a value directive may carry.
use std::io::{self, Write};

use crate::parser::{DirectiveParser, Flags};

/// Precision used when the directive has no `.`
pub const DEFAULT_PRECISION: u32 = 6;

/// Largest width or precision C's printf can honour
pub const MAX_FIELD: u32 = i32::MAX as u32;

/// Field specification of a `%f` conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatSpec {
    pub flags: Flags,
    pub width: u32,
    pub precision: Option<u32>,
}

impl From<&DirectiveParser> for FloatSpec {
    fn from(directive: &DirectiveParser) -> Self {
        Self {
            flags: directive.flags(),
            width: directive.width(),
            precision: directive.has_precision().then(|| directive.precision()),
        }
    }
}

impl FloatSpec {
    /// True if the field fits into what printf accepts
    pub fn is_representable(&self) -> bool {
        self.width <= MAX_FIELD && self.precision.map_or(true, |p| p <= MAX_FIELD)
    }
}

/// Fraction digits after which the decimal expansion of any `f64` is all zeros
const EXACT_DIGITS: usize = 1100;

const PAD_CHUNK: usize = 4096;

/// Write `value` like `printf("%<flags><width>.<precision>f", value)`.
///
/// The value is widened to `f64` first, which is what C's variadic argument
/// promotion does for a `float`. Padding and surplus zero digits are streamed
/// to `out`, so a huge width or precision never gets buffered.
///
/// # Returns
/// Number of bytes written
pub fn write_fixed<W: Write + ?Sized>(
    out: &mut W,
    value: f32,
    spec: &FloatSpec,
) -> io::Result<usize> {
    let value = f64::from(value);
    let flags = spec.flags;
    let precision = spec.precision.unwrap_or(DEFAULT_PRECISION) as usize;

    let (body, trailing_zeros, finite) = if value.is_nan() {
        ("nan".to_string(), 0, false)
    } else if value.is_infinite() {
        ("inf".to_string(), 0, false)
    } else {
        let exact = precision.min(EXACT_DIGITS);
        let mut digits = format!("{:.*}", exact, value.abs());
        if precision == 0 && flags.contains(Flags::HASHTAG) {
            digits.push('.');
        }
        (digits, precision - exact, true)
    };

    let sign = if value.is_sign_negative() {
        Some(b'-')
    } else if flags.contains(Flags::SIGN) {
        Some(b'+')
    } else if flags.contains(Flags::BLANK) {
        Some(b' ')
    } else {
        None
    };

    let content_len = usize::from(sign.is_some()) + body.len() + trailing_zeros;
    let pad_total = (spec.width as usize).saturating_sub(content_len);
    let left = flags.contains(Flags::LEFT_ALIGN);
    let zero = finite && !left && flags.contains(Flags::ZERO);

    if !left && !zero {
        pad(out, b' ', pad_total)?;
    }
    if let Some(s) = sign {
        out.write_all(&[s])?;
    }
    if zero {
        pad(out, b'0', pad_total)?;
    }
    out.write_all(body.as_bytes())?;
    pad(out, b'0', trailing_zeros)?;
    if left {
        pad(out, b' ', pad_total)?;
    }
    Ok(content_len + pad_total)
}

fn pad<W: Write + ?Sized>(out: &mut W, fill: u8, mut count: usize) -> io::Result<()> {
    let chunk = [fill; PAD_CHUNK];
    while count > 0 {
        let n = count.min(PAD_CHUNK);
        out.write_all(&chunk[..n])?;
        count -= n;
    }
    Ok(())
}
