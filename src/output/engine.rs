//! Output format engine
//!
//! Walks a format string once and writes literal runs, backslash escapes,
//! calendar directives and sensor value directives (`%vC`, `%vF`, `%vH`) to
//! the output as it goes.
use log::trace;
use std::io::Write;

use super::calendar::CalendarRenderer;
use super::printf::{write_fixed, FloatSpec};
use crate::errors::{FormatError, FormatExcerpt};
use crate::models::Sample;
use crate::parser::directive::VALUE_TYPE;
use crate::parser::{DirectiveParser, DirectiveState, Step, StreamParser};

/// Upper bound for a single directive and for the text a calendar directive
/// may expand to
pub const SCRATCH_CAPACITY: usize = 64;

/// Decode the byte following a backslash
fn unescape(byte: u8) -> u8 {
    match byte {
        b'a' => 0x07,
        b'b' => 0x08,
        b'e' => 0x1B,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        other => other,
    }
}

struct Engine<'a, W: ?Sized, C: ?Sized> {
    out: &'a mut W,
    format: &'a [u8],
    calendar: &'a C,
    sample: Sample,
    written: usize,
}

impl<W, C> Engine<'_, W, C>
where
    W: Write + ?Sized,
    C: CalendarRenderer + ?Sized,
{
    fn emit(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        if !bytes.is_empty() {
            self.out.write_all(bytes)?;
            self.written += bytes.len();
        }
        Ok(())
    }

    fn excerpt(&self, position: usize) -> FormatExcerpt {
        FormatExcerpt::new(self.format, position)
    }

    fn run(mut self) -> Result<usize, FormatError> {
        let format = self.format;
        let mut directive = DirectiveParser::new();
        let mut start = 0;
        let mut last = 0u8;
        let mut escape = false;

        for (position, &byte) in format.iter().enumerate() {
            trace!(
                "CHAR:{} '{}', STATE:{:?}, ESC:{}",
                byte,
                byte.escape_ascii(),
                directive.state(),
                escape
            );

            if escape {
                escape = false;
                last = byte;
                self.emit(&[unescape(byte)])?;
                start = position + 1;
                continue;
            }

            if directive.state() == DirectiveState::Start {
                match byte {
                    b'%' => {
                        self.emit(&format[start..position])?;
                        start = position;
                    }
                    b'\\' => {
                        self.emit(&format[start..position])?;
                        start = position;
                        escape = true;
                        continue;
                    }
                    _ => {
                        last = byte;
                        continue;
                    }
                }
            }

            if directive.step(byte) == Step::Terminated {
                match directive.state() {
                    DirectiveState::Stop => {
                        self.dispatch(&directive, start, position, last)?;
                        start = position + 1;
                        directive.reset();
                    }
                    DirectiveState::ErrorOverflow => {
                        return Err(FormatError::Overflow(self.excerpt(position)));
                    }
                    _ => return Err(FormatError::Syntax(self.excerpt(position))),
                }
            }
            last = byte;
        }

        // an unfinished directive or a trailing backslash is copied verbatim
        self.emit(&format[start..])?;
        Ok(self.written)
    }

    /// Handle a completed directive spanning `format[start..=end]`
    fn dispatch(
        &mut self,
        directive: &DirectiveParser,
        start: usize,
        end: usize,
        last: u8,
    ) -> Result<(), FormatError> {
        let format = self.format;
        let text = &format[start..=end];

        match directive.conversion() {
            Some(VALUE_TYPE) => {
                // rendered as `%<flags><width>.<precision>f` plus a terminator
                if text.len() > SCRATCH_CAPACITY {
                    return Err(FormatError::Length(self.excerpt(end)));
                }
                let value = match directive.subtype() {
                    Some(b'C') => self.sample.temperature,
                    Some(b'F') => self.sample.fahrenheit(),
                    Some(b'H') => self.sample.humidity,
                    _ => return Err(FormatError::Syntax(self.excerpt(end))),
                };
                let spec = FloatSpec::from(directive);
                if !spec.is_representable() {
                    return Err(FormatError::Overflow(self.excerpt(end)));
                }
                self.written += write_fixed(&mut *self.out, value, &spec)?;
                Ok(())
            }
            Some(b'%') if last == b'%' => self.emit(b"%"),
            Some(_) if last == b'%' || last == b'#' => {
                if text.len() >= SCRATCH_CAPACITY {
                    return Err(FormatError::Length(self.excerpt(end)));
                }
                let rendered = std::str::from_utf8(text)
                    .ok()
                    .and_then(|text| self.calendar.render(text))
                    .filter(|r| !r.is_empty() && r.len() < SCRATCH_CAPACITY)
                    .ok_or_else(|| FormatError::Api(self.excerpt(end)))?;
                self.emit(rendered.as_bytes())
            }
            _ => Err(FormatError::Syntax(self.excerpt(end))),
        }
    }
}

/// Render one output record
///
/// # Arguments
/// * `out` - destination of the rendered bytes
/// * `format` - user format string
/// * `calendar` - renderer for calendar directives, usually the record timestamp
/// * `sample` - sensor values for `%vC`, `%vF` and `%vH`
///
/// # Returns
/// Number of bytes written, or the first error encountered. Output produced
/// before an error has already been written.
pub fn render<W, C>(
    out: &mut W,
    format: &str,
    calendar: &C,
    sample: Sample,
) -> Result<usize, FormatError>
where
    W: Write + ?Sized,
    C: CalendarRenderer + ?Sized,
{
    Engine {
        out,
        format: format.as_bytes(),
        calendar,
        sample,
        written: 0,
    }
    .run()
}
