//! Python literal evaluation and `str()` rendering.

use std::fmt;

/// A literal value as Python holds it after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Str(String),
    Bytes(Vec<u8>),
    /// Decimal digits, normalized (no prefix, no underscores, no sign)
    Int(String),
    Float(f64),
    /// Imaginary literal; holds the imaginary part
    Complex(f64),
    Bool(bool),
    None,
    Ellipsis,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Str(s) => f.write_str(s),
            Constant::Bytes(bytes) => f.write_str(&bytes_repr(bytes)),
            Constant::Int(digits) => f.write_str(digits),
            Constant::Float(value) => f.write_str(&float_repr(*value, true)),
            Constant::Complex(imag) => write!(f, "{}j", float_repr(*imag, false)),
            Constant::Bool(true) => f.write_str("True"),
            Constant::Bool(false) => f.write_str("False"),
            Constant::None => f.write_str("None"),
            Constant::Ellipsis => f.write_str("Ellipsis"),
        }
    }
}

/// Result of evaluating one string literal
#[derive(Debug, Clone, PartialEq)]
pub enum StringValue {
    Str(String),
    Bytes(Vec<u8>),
    /// f-string; has no constant value
    Formatted,
}

/// Evaluate an integer literal (`0x1F`, `1_000`, `0o17`, `0`) to decimal digits.
///
/// Returns the message of the Python syntax error for literals Python 3
/// rejects, such as `10L` or `017`.
pub fn parse_int(text: &str) -> Result<String, String> {
    if text.ends_with(['l', 'L']) {
        return Err("invalid decimal literal".to_string());
    }
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        if lower.len() > 1 && lower.starts_with('0') && lower.bytes().any(|b| b != b'0') {
            return Err(
                "leading zeros in decimal integer literals are not permitted".to_string(),
            );
        }
        (10, lower.as_str())
    };

    if digits.is_empty() {
        return Err(format!("invalid integer literal '{text}'"));
    }
    to_decimal(digits, radix).ok_or_else(|| format!("invalid integer literal '{text}'"))
}

/// Arbitrary-precision radix conversion into decimal digits.
fn to_decimal(digits: &str, radix: u32) -> Option<String> {
    const LIMB: u64 = 1_000_000_000;
    // little-endian base-1e9 limbs
    let mut limbs: Vec<u64> = vec![0];

    for ch in digits.chars() {
        let mut carry = u64::from(ch.to_digit(radix)?);
        for limb in limbs.iter_mut() {
            let value = *limb * u64::from(radix) + carry;
            *limb = value % LIMB;
            carry = value / LIMB;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }

    let mut out = String::new();
    let mut iter = limbs.iter().rev();
    if let Some(top) = iter.next() {
        out.push_str(&top.to_string());
    }
    for limb in iter {
        out.push_str(&format!("{limb:09}"));
    }
    Some(out)
}

/// Evaluate a float literal (`1.5`, `1e10`, `.5`, `1_0.0`).
pub fn parse_float(text: &str) -> Result<f64, String> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| format!("invalid float literal '{text}'"))
}

/// Evaluate a numeric literal of any kind, including imaginary ones.
pub fn parse_number(text: &str) -> Result<Constant, String> {
    if let Some(imag) = text.strip_suffix(['j', 'J']) {
        return parse_float(imag).map(Constant::Complex);
    }
    let lower = text.to_ascii_lowercase();
    let is_float = !lower.starts_with("0x")
        && (lower.contains('.') || lower.contains('e'));
    if is_float {
        parse_float(text).map(Constant::Float)
    } else {
        parse_int(text).map(Constant::Int)
    }
}

/// Python `repr` of a float; `add_dot_zero` appends `.0` to integral values.
fn float_repr(value: f64, add_dot_zero: bool) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let mut fixed = format!("{value}");
        if add_dot_zero && !fixed.contains('.') {
            fixed.push_str(".0");
        }
        fixed
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Python `repr` of a bytes value: `b'...'` with escapes.
fn bytes_repr(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::from("b");
    out.push(char::from(quote));
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            b if !(0x20..0x7f).contains(&b) => out.push_str(&format!("\\x{b:02x}")),
            b => out.push(char::from(b)),
        }
    }
    out.push(char::from(quote));
    out
}

/// Evaluate one string literal, prefix and quotes included.
pub fn parse_string(text: &str) -> Result<StringValue, String> {
    let quote_at = text
        .find(['\'', '"'])
        .ok_or_else(|| format!("invalid string literal {text}"))?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    let quoted = &text[quote_at..];

    let delimiter = if quoted.starts_with("'''") || quoted.starts_with("\"\"\"") {
        3
    } else {
        1
    };
    if quoted.len() < delimiter * 2 {
        return Err(format!("unterminated string literal {text}"));
    }
    let body = &quoted[delimiter..quoted.len() - delimiter];

    if prefix.contains('f') {
        return Ok(StringValue::Formatted);
    }
    let raw = prefix.contains('r');

    if prefix.contains('b') {
        if !body.is_ascii() {
            return Err("bytes can only contain ASCII literal characters".to_string());
        }
        let decoded = if raw {
            body.to_string()
        } else {
            unescape(body, true)?
        };
        // every char is below 0x100 here
        let bytes = decoded.chars().map(|c| c as u32 as u8).collect();
        Ok(StringValue::Bytes(bytes))
    } else if raw {
        Ok(StringValue::Str(body.to_string()))
    } else {
        unescape(body, false).map(StringValue::Str)
    }
}

/// Decode backslash escapes. Unknown escapes are kept verbatim.
///
/// In bytes mode each char of the result stands for one byte; `\u`, `\U`
/// and `\N` are not escapes there.
fn unescape(body: &str, bytes: bool) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if bytes {
                    code &= 0xff;
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' => out.push(hex_escape(&mut chars, 2, "x")?),
            'u' if !bytes => out.push(hex_escape(&mut chars, 4, "u")?),
            'U' if !bytes => out.push(hex_escape(&mut chars, 8, "U")?),
            other => {
                // includes \N{...}, which needs the Unicode name table
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    width: usize,
    letter: &str,
) -> Result<char, String> {
    let mut code = 0u32;
    for _ in 0..width {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| format!("truncated \\{letter}{} escape", "X".repeat(width)))?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or_else(|| format!("illegal Unicode character in \\{letter} escape"))
}
