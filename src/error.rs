//! Programmer-facing errors raised by the toolkit itself.
//!
//! These are distinct from the structured errors a codebase *models* with
//! [`ErrorClass`](crate::ErrorClass): they signal misuse of the toolkit
//! (missing constructor fields, malformed templates, unsupported reraise
//! actions) and are never subject to remapping.
//!
//! Every error exposes a [`UsageKind`] so callers can tell "wrong arguments"
//! apart from "bad value" failures without matching on variants.

use core::fmt;

use thiserror::Error;

/// Coarse classification of a toolkit error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    /// Arguments did not fit the declared shape (missing, undeclared, misplaced).
    Type,
    /// Arguments had the right shape but an unusable value.
    Value,
}

/// Sorted list of field names rendered as `'a', 'b'`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldNames(Vec<String>);

impl FieldNames {
    /// Collects and sorts names so messages are deterministic.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

impl fmt::Display for FieldNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{name}'")?;
        }
        Ok(())
    }
}

/// Failure while rendering a message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Single '}}' encountered in format string")]
    UnmatchedClose,
    #[error("Single '{{' encountered in format string")]
    UnmatchedOpen,
    #[error("expected '}}' before end of string")]
    Unterminated,
    #[error("Unknown conversion specifier {0}")]
    InvalidConversion(char),
    #[error("Format string contains positional fields")]
    PositionalField,
    #[error("Empty attribute in format string")]
    EmptyAttribute,
    #[error("Missing ']' in format string")]
    UnclosedIndex,
    #[error("missing template key '{0}'")]
    MissingKey(String),
    #[error("'{field}' has no attribute or key '{accessor}'")]
    MissingAccessor { field: String, accessor: String },
    #[error("Invalid format specifier '{0}'")]
    InvalidSpec(String),
    #[error("Unknown format code '{code}' for {kind} value")]
    UnknownCode { code: char, kind: &'static str },
    #[error("{reason} in format specifier for {kind} value")]
    Unsupported { reason: &'static str, kind: &'static str },
    #[error("Max string recursion exceeded")]
    RecursionLimit,
}

/// Failure while building a structured error instance from keyword fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Missing arguments: {0}")]
    MissingFields(FieldNames),
    #[error("Undeclared arguments: {0}")]
    UndeclaredFields(FieldNames),
    #[error("Constants in arguments: {0}")]
    ConstsInKwargs(FieldNames),
    #[error("Failed to format template with provided kwargs: {kwargs}")]
    Template {
        kwargs: String,
        #[source]
        source: TemplateError,
    },
}

impl ConstructionError {
    pub fn kind(&self) -> UsageKind {
        match self {
            Self::Template { .. } => UsageKind::Value,
            _ => UsageKind::Type,
        }
    }
}

/// Failure while declaring an error class, its rules or a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Field names can't be digits: {0}")]
    DigitFieldName(String),
    #[error("Field names can't be empty")]
    EmptyFieldName,
    #[error("Unannotated fields: {0}")]
    UnannotatedFields(FieldNames),
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),
    #[error("Fatal can't be indirectly inherited: {0}")]
    IndirectFatal(String),
    #[error("namespace '{namespace}' has no attribute '{name}'")]
    UnknownClass { namespace: String, name: String },
    #[error("namespace '{namespace}' already defines '{name}'")]
    DuplicateClass { namespace: String, name: String },
    #[error("'{name}' belongs to namespace '{found}', not '{namespace}'")]
    ForeignNamespace { namespace: String, name: String, found: String },
}

impl DefinitionError {
    pub fn kind(&self) -> UsageKind {
        match self {
            Self::IndirectFatal(_)
            | Self::DuplicateClass { .. }
            | Self::ForeignNamespace { .. } => UsageKind::Type,
            _ => UsageKind::Value,
        }
    }
}

/// Either toolkit failure, as surfaced by remapping and reviving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl UsageError {
    pub fn kind(&self) -> UsageKind {
        match self {
            Self::Definition(e) => e.kind(),
            Self::Construction(e) => e.kind(),
        }
    }
}
