//! Tokenizer for brace-style message templates.

use crate::error::TemplateError;

/// Top-level name a replacement field refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldRef {
    /// Bare `{}` positional placeholder.
    Auto,
    /// Explicit positional placeholder such as `{0}`.
    Index(usize),
    /// Named placeholder such as `{name}` or `{name.attr}`.
    Name(String),
}

impl FieldRef {
    /// Returns `true` for placeholders that refer to a named field.
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    /// The key this reference occupies in a field set: `""` for `{}`,
    /// the decimal digits for `{n}`, the name otherwise.
    pub fn key(&self) -> String {
        match self {
            Self::Auto => String::new(),
            Self::Index(i) => i.to_string(),
            Self::Name(name) => name.clone(),
        }
    }

    fn classify(first: &str) -> Self {
        if first.is_empty() {
            Self::Auto
        } else if first.bytes().all(|b| b.is_ascii_digit()) {
            first.parse().map(Self::Index).unwrap_or_else(|_| Self::Name(first.to_owned()))
        } else {
            Self::Name(first.to_owned())
        }
    }
}

/// Attribute or item access following the top-level field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Accessor {
    Attr(String),
    Item(String),
}

impl Accessor {
    pub(crate) fn key(&self) -> &str {
        match self {
            Self::Attr(k) | Self::Item(k) => k,
        }
    }
}

/// A single `{…}` replacement field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder<'a> {
    pub expr: &'a str,
    pub conversion: Option<char>,
    pub spec: &'a str,
}

impl Placeholder<'_> {
    pub(crate) fn field(&self) -> FieldRef {
        FieldRef::classify(split_first(self.expr))
    }

    /// Parses the accessor chain after the top-level name.
    pub(crate) fn accessors(&self) -> Result<Vec<Accessor>, TemplateError> {
        let first = split_first(self.expr);
        let mut rest = &self.expr[first.len()..];
        let mut out = Vec::new();
        while let Some(c) = rest.chars().next() {
            match c {
                '.' => {
                    let body = &rest[1..];
                    let end = body.find(['.', '[']).unwrap_or(body.len());
                    if end == 0 {
                        return Err(TemplateError::EmptyAttribute);
                    }
                    out.push(Accessor::Attr(body[..end].to_owned()));
                    rest = &body[end..];
                },
                '[' => {
                    let body = &rest[1..];
                    let end = body.find(']').ok_or(TemplateError::UnclosedIndex)?;
                    out.push(Accessor::Item(body[..end].to_owned()));
                    rest = &body[end + 1..];
                },
                _ => return Err(TemplateError::InvalidSpec(self.expr.to_owned())),
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Field(Placeholder<'a>),
}

fn split_first(expr: &str) -> &str {
    let end = expr.find(['.', '[']).unwrap_or(expr.len());
    &expr[..end]
}

/// Iterator over literal text and replacement fields of a template.
pub(crate) struct Segments<'a> {
    src: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0, failed: false }
    }

    fn literal(&mut self) -> Result<Segment<'a>, TemplateError> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut i = start;
        while i < bytes.len() {
            match bytes[i] {
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    // emit up to and including one brace, skip the other
                    self.pos = i + 2;
                    return Ok(Segment::Literal(&self.src[start..=i]));
                },
                b'}' if bytes.get(i + 1) == Some(&b'}') => {
                    self.pos = i + 2;
                    return Ok(Segment::Literal(&self.src[start..=i]));
                },
                b'}' => return Err(TemplateError::UnmatchedClose),
                b'{' => break,
                _ => i += 1,
            }
        }
        self.pos = i;
        Ok(Segment::Literal(&self.src[start..i]))
    }

    fn field(&mut self) -> Result<Segment<'a>, TemplateError> {
        let bytes = self.src.as_bytes();
        // skip the opening brace
        let start = self.pos + 1;
        let mut i = start;
        let mut brackets = false;
        while i < bytes.len() {
            match bytes[i] {
                b'[' => brackets = true,
                b']' => brackets = false,
                b'!' | b':' | b'}' if !brackets => break,
                b'{' if !brackets => return Err(TemplateError::UnmatchedOpen),
                _ => {},
            }
            i += 1;
        }
        if i >= bytes.len() {
            return Err(TemplateError::Unterminated);
        }
        let expr = &self.src[start..i];

        let mut conversion = None;
        if bytes[i] == b'!' {
            let c = self.src[i + 1..].chars().next().ok_or(TemplateError::Unterminated)?;
            if !matches!(c, 'r' | 's' | 'a') {
                return Err(TemplateError::InvalidConversion(c));
            }
            conversion = Some(c);
            i += 2;
            match bytes.get(i) {
                Some(b':') | Some(b'}') => {},
                Some(_) => return Err(TemplateError::InvalidSpec(self.src[start..].to_owned())),
                None => return Err(TemplateError::Unterminated),
            }
        }

        let mut spec = "";
        if bytes[i] == b':' {
            let spec_start = i + 1;
            let mut depth = 0usize;
            i = spec_start;
            loop {
                match bytes.get(i) {
                    None => return Err(TemplateError::Unterminated),
                    Some(b'{') => depth += 1,
                    Some(b'}') if depth == 0 => break,
                    Some(b'}') => depth -= 1,
                    Some(_) => {},
                }
                i += 1;
            }
            spec = &self.src[spec_start..i];
        }

        // bytes[i] is the closing brace
        self.pos = i + 1;
        Ok(Segment::Field(Placeholder { expr, conversion, spec }))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.src.len() {
            return None;
        }
        let bytes = self.src.as_bytes();
        let item = if bytes[self.pos] == b'{' && bytes.get(self.pos + 1) != Some(&b'{') {
            self.field()
        } else {
            self.literal()
        };
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Extracts the top-level field references of a template, in order.
///
/// Nested access (`{user.name}`, `{items[0]}`) yields the top-level name,
/// `{}` yields [`FieldRef::Auto`] and `{0}` yields [`FieldRef::Index`].
/// Duplicates are preserved. Extraction is lenient: malformed syntax ends
/// the scan and only surfaces as an error when the template is formatted.
///
/// # Examples
///
/// ```
/// use error_mold::template::{iter_fields, FieldRef};
///
/// let fields = iter_fields("{owner:f!a}: {!a} count={count} for {0:f}");
/// assert_eq!(
///     fields,
///     vec![
///         FieldRef::Name("owner".into()),
///         FieldRef::Auto,
///         FieldRef::Name("count".into()),
///         FieldRef::Index(0),
///     ]
/// );
/// ```
pub fn iter_fields(template: &str) -> Vec<FieldRef> {
    Segments::new(template)
        .map_while(Result::ok)
        .filter_map(|segment| match segment {
            Segment::Field(placeholder) => Some(placeholder.field()),
            Segment::Literal(_) => None,
        })
        .collect()
}
