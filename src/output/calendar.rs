//! strftime style rendering of the record timestamp
use chrono::{DateTime, TimeZone};
use std::fmt::{self, Write};

/// Renders calendar directives such as `%Y` or `%#b` for one fixed point in time
pub trait CalendarRenderer {
    /// Render a single directive
    ///
    /// # Returns
    /// The rendered text, or None if the directive is not supported
    fn render(&self, directive: &str) -> Option<String>;
}

/// Conversions chrono renders as plain numbers; only these take a padding modifier
const NUMERIC_TYPES: &[u8] = b"CdegGHIjklmMsSuUVwWyY";

/// Translate `%[flags]type` into the chrono equivalent
///
/// `-` and `0` become chrono's padding modifiers on numeric conversions. `+`
/// and blank have no calendar meaning and are dropped, as is `#` which is
/// applied to the rendered text instead.
fn chrono_directive(directive: &str) -> Option<(String, bool)> {
    let bytes = directive.as_bytes();
    let (&conversion, flags) = bytes.get(1..)?.split_last()?;
    let numeric = NUMERIC_TYPES.contains(&conversion);

    let mut translated = String::from("%");
    if numeric && flags.contains(&b'-') {
        translated.push('-');
    } else if numeric && flags.contains(&b'0') {
        translated.push('0');
    }
    translated.push(char::from(conversion));
    Some((translated, flags.contains(&b'#')))
}

impl<Tz> CalendarRenderer for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn render(&self, directive: &str) -> Option<String> {
        let (directive, swap_case) = chrono_directive(directive)?;

        let mut rendered = String::new();
        write!(rendered, "{}", self.format(&directive)).ok()?;

        if swap_case {
            // glibc: '#' upper-cases names and lower-cases %p and %Z
            match directive.as_bytes().last() {
                Some(b'a' | b'A' | b'b' | b'B' | b'h') => rendered = rendered.to_uppercase(),
                Some(b'p' | b'Z') => rendered = rendered.to_lowercase(),
                _ => {}
            }
        }
        Some(rendered)
    }
}
