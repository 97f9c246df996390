//! Message templates: field extraction and rendering.
//!
//! Templates use brace placeholders: `{name}`, nested access such as
//! `{user.name}` or `{items[0]}`, conversions (`!s`, `!r`, `!a`) and a
//! format spec after `:` (`{age:>5}`, `{ratio:.2%}`, `{mask:#b}`).
//!
//! # Examples
//!
//! ```
//! use error_mold::{fields, template};
//!
//! let msg = template::format_template(
//!     "The {name} is {age} years old",
//!     &fields! { name: "John", age: 42 },
//! )
//! .unwrap();
//! assert_eq!(msg, "The John is 42 years old");
//! ```

mod parse;
mod spec;

pub use parse::{iter_fields, FieldRef};

use crate::error::TemplateError;
use crate::types::{Fields, Value};
use parse::{Placeholder, Segment, Segments};
use spec::FormatSpec;

/// Nesting depth allowed for replacement fields inside format specs.
const MAX_RECURSION: usize = 2;

/// Renders `template` against `fields`.
///
/// Positional placeholders are rejected because structured errors are
/// built from keyword fields only.
pub fn format_template(template: &str, fields: &Fields) -> Result<String, TemplateError> {
    render(template, fields, MAX_RECURSION)
}

fn render(template: &str, fields: &Fields, depth: usize) -> Result<String, TemplateError> {
    if depth == 0 {
        return Err(TemplateError::RecursionLimit);
    }
    let mut out = String::with_capacity(template.len());
    for segment in Segments::new(template) {
        match segment? {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(placeholder) => {
                out.push_str(&render_field(&placeholder, fields, depth)?);
            },
        }
    }
    Ok(out)
}

fn render_field(
    placeholder: &Placeholder<'_>,
    fields: &Fields,
    depth: usize,
) -> Result<String, TemplateError> {
    let value = resolve(placeholder, fields)?;
    let value = match placeholder.conversion {
        None => value,
        Some('s') => Value::Str(value.to_string()),
        Some('r') => Value::Str(format!("{value:?}")),
        Some('a') => Value::Str(ascii_escape(&format!("{value:?}"))),
        Some(other) => return Err(TemplateError::InvalidConversion(other)),
    };
    let spec = if placeholder.spec.contains('{') {
        render(placeholder.spec, fields, depth - 1)?
    } else {
        placeholder.spec.to_owned()
    };
    FormatSpec::parse(&spec)?.apply(&value)
}

fn resolve(placeholder: &Placeholder<'_>, fields: &Fields) -> Result<Value, TemplateError> {
    let name = match placeholder.field() {
        FieldRef::Name(name) => name,
        FieldRef::Auto | FieldRef::Index(_) => return Err(TemplateError::PositionalField),
    };
    let mut value =
        fields.get(&name).cloned().ok_or_else(|| TemplateError::MissingKey(name.clone()))?;
    for accessor in placeholder.accessors()? {
        value = value.lookup(accessor.key()).ok_or_else(|| TemplateError::MissingAccessor {
            field: placeholder.expr.to_owned(),
            accessor: accessor.key().to_owned(),
        })?;
    }
    Ok(value)
}

fn ascii_escape(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_string() } else { c.escape_unicode().to_string() })
        .collect()
}
