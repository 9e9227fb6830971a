//! Backslash escape decoding.
//!
//! The escape table:
//!
//! | sequence          | decodes to                         |
//! |-------------------|------------------------------------|
//! | `\a \b \f \n \r \t \v` | the matching control char     |
//! | `\N`, `\NN`, `\NNN`    | octal code point, `N` in `0-7` |
//! | `\xH`, `\xHH`          | hex code point                 |
//! | `\uH` .. `\uHHHH`      | hex code point                 |
//! | `\UH` .. `\UHHHHHHHH`  | hex code point                 |
//! | `\c` (anything else)   | `c` itself                     |
//!
//! Malformed sequences never fail: `\x` with no hex digit decodes to `x`,
//! and digit runs that are not a Unicode scalar value decode to U+FFFD.

use crate::SourceStream;

/// Decode the escape whose first char after the backslash is `c`,
/// consuming any digits that belong to it from `stream`.
pub(crate) fn decode_escape(c: char, stream: &mut SourceStream) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0C',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0B',
        '0'..='7' => {
            let first = c.to_digit(8).unwrap_or(0);
            let rest = read_digits(stream, 8, 2);
            let code = match rest {
                Some((value, count)) => first * 8u32.pow(count) + value,
                None => first,
            };
            to_char(code)
        }
        'x' => read_code_point(stream, 2).unwrap_or(c),
        'u' => read_code_point(stream, 4).unwrap_or(c),
        'U' => read_code_point(stream, 8).unwrap_or(c),
        _ => c,
    }
}

/// Read up to `max_digits` hex digits as a code point.
/// `None` when no digit follows.
fn read_code_point(stream: &mut SourceStream, max_digits: u32) -> Option<char> {
    read_digits(stream, 16, max_digits).map(|(value, _)| to_char(value))
}

/// Read up to `max_digits` digits in `radix`.
/// Returns the accumulated value and the number of digits read.
fn read_digits(stream: &mut SourceStream, radix: u32, max_digits: u32) -> Option<(u32, u32)> {
    let mut value: u32 = 0;
    let mut count = 0;
    while count < max_digits {
        let Some(digit) = stream.current().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        stream.advance();
        value = value.wrapping_mul(radix).wrapping_add(digit);
        count += 1;
    }
    (count > 0).then_some((value, count))
}

#[inline]
fn to_char(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}
