//! Format-spec mini language: `[[fill]align][sign][#][0][width][,|_][.precision][type]`.

use crate::error::TemplateError;
use crate::types::{float_repr, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sign {
    #[default]
    Minus,
    Plus,
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    sign: Option<Sign>,
    alternate: bool,
    zero: bool,
    width: Option<usize>,
    grouping: Option<char>,
    precision: Option<usize>,
    ty: Option<char>,
}

fn take_number(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    chars[start..*pos].iter().collect::<String>().parse().ok()
}

impl FormatSpec {
    pub(crate) fn parse(spec: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidSpec(spec.to_owned());
        let chars: Vec<char> = spec.chars().collect();
        let mut pos = 0;

        let mut fill = None;
        let mut align = None;
        if let Some(a) = chars.get(1).copied().and_then(Align::from_char) {
            fill = Some(chars[0]);
            align = Some(a);
            pos = 2;
        } else if let Some(a) = chars.first().copied().and_then(Align::from_char) {
            align = Some(a);
            pos = 1;
        }

        let sign = match chars.get(pos) {
            Some('+') => Some(Sign::Plus),
            Some('-') => Some(Sign::Minus),
            Some(' ') => Some(Sign::Space),
            _ => None,
        };
        if sign.is_some() {
            pos += 1;
        }

        let alternate = chars.get(pos) == Some(&'#');
        if alternate {
            pos += 1;
        }

        let zero = chars.get(pos) == Some(&'0');
        if zero {
            pos += 1;
        }

        let width = take_number(&chars, &mut pos);

        let grouping = match chars.get(pos) {
            Some(&c @ (',' | '_')) => {
                pos += 1;
                Some(c)
            },
            _ => None,
        };

        let mut precision = None;
        if chars.get(pos) == Some(&'.') {
            pos += 1;
            precision = Some(take_number(&chars, &mut pos).ok_or_else(invalid)?);
        }

        let ty = chars.get(pos).copied();
        if ty.is_some() {
            pos += 1;
        }
        if pos != chars.len() {
            return Err(invalid());
        }

        Ok(Self { fill, align, sign, alternate, zero, width, grouping, precision, ty })
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Renders `value` according to this spec.
    pub(crate) fn apply(&self, value: &Value) -> Result<String, TemplateError> {
        match value {
            Value::Shared(cell) => self.apply(&cell.get()),
            Value::Str(s) => self.apply_str(s),
            Value::Int(i) => self.apply_int(*i, "int"),
            Value::Bool(b) if self.ty.is_some() => self.apply_int(i64::from(*b), "bool"),
            Value::Float(f) => self.apply_float(*f, "float"),
            other if self.is_empty() => Ok(other.to_string()),
            Value::Bool(_) => self.apply_str(&value.to_string()),
            other => Err(TemplateError::Unsupported {
                reason: "Non-empty format string",
                kind: other.kind(),
            }),
        }
    }

    fn apply_str(&self, s: &str) -> Result<String, TemplateError> {
        const KIND: &str = "str";
        match self.ty {
            None | Some('s') => {},
            Some(code) => return Err(TemplateError::UnknownCode { code, kind: KIND }),
        }
        if self.sign.is_some() {
            return Err(TemplateError::Unsupported { reason: "Sign not allowed", kind: KIND });
        }
        if self.alternate {
            return Err(TemplateError::Unsupported {
                reason: "Alternate form (#) not allowed",
                kind: KIND,
            });
        }
        if self.grouping.is_some() {
            return Err(TemplateError::Unsupported {
                reason: "Cannot specify grouping",
                kind: KIND,
            });
        }
        if self.align == Some(Align::AfterSign) {
            return Err(TemplateError::Unsupported {
                reason: "'=' alignment not allowed",
                kind: KIND,
            });
        }
        let body: String = match self.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.to_owned(),
        };
        Ok(self.pad("", "", &body, Align::Left))
    }

    fn apply_int(&self, n: i64, kind: &'static str) -> Result<String, TemplateError> {
        if matches!(self.ty, Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%')) {
            return self.apply_float(n as f64, kind);
        }
        if self.precision.is_some() {
            return Err(TemplateError::Unsupported {
                reason: "Precision not allowed",
                kind,
            });
        }
        let magnitude = n.unsigned_abs();
        let (prefix, digits, group_size) = match self.ty {
            None | Some('d') | Some('n') => ("", magnitude.to_string(), 3),
            Some('b') => ("0b", format!("{magnitude:b}"), 4),
            Some('o') => ("0o", format!("{magnitude:o}"), 4),
            Some('x') => ("0x", format!("{magnitude:x}"), 4),
            Some('X') => ("0X", format!("{magnitude:X}"), 4),
            Some('c') => {
                if self.sign.is_some() || self.alternate {
                    return Err(TemplateError::Unsupported {
                        reason: "Sign or alternate form not allowed with 'c'",
                        kind,
                    });
                }
                let c = u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| TemplateError::InvalidSpec(format!("{n} out of char range")))?;
                return Ok(self.pad("", "", &c.to_string(), Align::Right));
            },
            Some(code) => return Err(TemplateError::UnknownCode { code, kind }),
        };
        let prefix = if self.alternate { prefix } else { "" };
        let digits = match self.grouping {
            Some(sep) => group_digits(&digits, sep, group_size),
            None => digits,
        };
        let sign = self.sign_str(n < 0);
        Ok(self.pad(sign, prefix, &digits, Align::Right))
    }

    fn apply_float(&self, x: f64, kind: &'static str) -> Result<String, TemplateError> {
        let negative = x.is_sign_negative();
        let magnitude = x.abs();
        let (mut body, suffix) = match self.ty {
            None => match self.precision {
                Some(p) => (general(magnitude, p, self.alternate, true), ""),
                None => (float_repr(magnitude), ""),
            },
            Some('f') | Some('F') => (fixed(magnitude, self.precision.unwrap_or(6)), ""),
            Some('e') | Some('E') => (scientific(magnitude, self.precision.unwrap_or(6)), ""),
            Some('g') | Some('G') | Some('n') => {
                (general(magnitude, self.precision.unwrap_or(6), self.alternate, false), "")
            },
            Some('%') => (fixed(magnitude * 100.0, self.precision.unwrap_or(6)), "%"),
            Some(code) => return Err(TemplateError::UnknownCode { code, kind }),
        };
        if matches!(self.ty, Some('F') | Some('E') | Some('G')) {
            body = body.to_uppercase();
        }
        if self.alternate && !body.contains('.') && magnitude.is_finite() {
            // alternate form keeps the decimal point
            match body.find(['e', 'E']) {
                Some(at) => body.insert(at, '.'),
                None => body.push('.'),
            }
        }
        if let Some(sep) = self.grouping {
            let int_end = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
            let grouped = group_digits(&body[..int_end], sep, 3);
            body = format!("{grouped}{}", &body[int_end..]);
        }
        body.push_str(suffix);
        let sign = self.sign_str(negative && !x.is_nan());
        Ok(self.pad(sign, "", &body, Align::Right))
    }

    fn sign_str(&self, negative: bool) -> &'static str {
        match (negative, self.sign.unwrap_or_default()) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        }
    }

    fn pad(&self, sign: &str, prefix: &str, body: &str, default_align: Align) -> String {
        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let align = self.align.unwrap_or(if self.zero && default_align == Align::Right {
            Align::AfterSign
        } else {
            default_align
        });
        let len = sign.chars().count() + prefix.chars().count() + body.chars().count();
        let missing = self.width.unwrap_or(0).saturating_sub(len);
        let filler = |n: usize| fill.to_string().repeat(n);
        match align {
            Align::Left => format!("{sign}{prefix}{body}{}", filler(missing)),
            Align::Right => format!("{}{sign}{prefix}{body}", filler(missing)),
            Align::Center => {
                let left = missing / 2;
                format!("{}{sign}{prefix}{body}{}", filler(left), filler(missing - left))
            },
            Align::AfterSign => format!("{sign}{prefix}{}{body}", filler(missing)),
        }
    }
}

fn group_digits(digits: &str, sep: char, size: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

fn non_finite(x: f64) -> Option<String> {
    if x.is_nan() {
        Some("nan".to_owned())
    } else if x.is_infinite() {
        Some("inf".to_owned())
    } else {
        None
    }
}

fn fixed(x: f64, precision: usize) -> String {
    non_finite(x).unwrap_or_else(|| format!("{x:.precision$}"))
}

fn scientific(x: f64, precision: usize) -> String {
    if let Some(s) = non_finite(x) {
        return s;
    }
    let raw = format!("{x:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            format!("{mantissa}e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.unsigned_abs())
        },
        None => raw,
    }
}

/// General format: fixed or scientific depending on the decimal exponent.
///
/// `repr_like` is the no-type-with-precision flavour which always keeps at
/// least one digit after the point in fixed notation.
fn general(x: f64, precision: usize, keep_zeros: bool, repr_like: bool) -> String {
    if let Some(s) = non_finite(x) {
        return s;
    }
    let p = precision.max(1);
    let exp = if x == 0.0 {
        0
    } else {
        let sci = format!("{x:.prec$e}", prec = p - 1);
        sci.split_once('e').and_then(|(_, e)| e.parse::<i32>().ok()).unwrap_or(0)
    };
    let mut out = if -4 <= exp && exp < p as i32 {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        format!("{x:.decimals$}")
    } else {
        scientific(x, p - 1)
    };
    if !keep_zeros {
        let (mantissa, tail) = match out.find('e') {
            Some(at) => (out[..at].to_owned(), out[at..].to_owned()),
            None => (out.clone(), String::new()),
        };
        let mut mantissa = if mantissa.contains('.') {
            mantissa.trim_end_matches('0').trim_end_matches('.').to_owned()
        } else {
            mantissa
        };
        if repr_like && tail.is_empty() && !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        out = format!("{mantissa}{tail}");
    }
    out
}
