//! Validation of reraise rules into their executable form.

use core::fmt;

use crate::error::{DefinitionError, UsageError};
use crate::reraise::rules::{Action, MatchSet, RemapFn, RemapResult, Reraising};
use crate::schema::ErrorClass;
use crate::types::{Fields, Raised};

#[derive(Clone, Debug, Default)]
pub(crate) enum CompiledRules {
    #[default]
    Never,
    Greedy,
    Rules(Vec<CompiledRule>),
}

impl CompiledRules {
    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) matches: MatchSet,
    pub(crate) action: CompiledAction,
}

#[derive(Clone)]
pub(crate) enum CompiledAction {
    Skip,
    SelfClass,
    Replace(ErrorClass),
    Method(String),
    Invoke(RemapFn),
}

impl fmt::Debug for CompiledAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("Skip"),
            Self::SelfClass => f.write_str("SelfClass"),
            Self::Replace(class) => write!(f, "Replace({})", class.qualname()),
            Self::Method(name) => write!(f, "Method({name})"),
            Self::Invoke(_) => f.write_str("Invoke(..)"),
        }
    }
}

impl CompiledAction {
    pub(crate) fn apply(&self, class: &ErrorClass, exc: &Raised, kwargs: &Fields) -> RemapResult {
        match self {
            Self::Skip => Ok(None),
            Self::SelfClass => Ok(Some(class.create(kwargs.clone())?)),
            Self::Replace(target) => Ok(Some(target.create(kwargs.clone())?)),
            Self::Method(name) => match class.method(name) {
                Some(method) => method(class, exc, kwargs),
                None => Err(UsageError::from(DefinitionError::UnsupportedAction(name.clone()))),
            },
            Self::Invoke(f) => f(class, exc, kwargs),
        }
    }
}

/// Validates `reraising` for the class named `class_name`.
///
/// An empty rule list compiles to [`CompiledRules::Never`]. A method action
/// naming the class itself means the class; any other method name must be
/// resolvable through `has_method`.
pub(crate) fn compile(
    class_name: &str,
    reraising: &Reraising,
    has_method: impl Fn(&str) -> bool,
) -> Result<CompiledRules, DefinitionError> {
    let rules = match reraising {
        Reraising::Never => return Ok(CompiledRules::Never),
        Reraising::Greedy => return Ok(CompiledRules::Greedy),
        Reraising::Rules(rules) if rules.is_empty() => return Ok(CompiledRules::Never),
        Reraising::Rules(rules) => rules,
    };

    let compiled = rules
        .iter()
        .map(|rule| {
            let action = match &rule.action {
                Action::Skip => CompiledAction::Skip,
                Action::SelfClass => CompiledAction::SelfClass,
                Action::Replace(class) => CompiledAction::Replace(class.clone()),
                Action::Method(name) if name == class_name => CompiledAction::SelfClass,
                Action::Method(name) if has_method(name) => {
                    CompiledAction::Method(name.to_string())
                },
                Action::Method(name) => {
                    return Err(DefinitionError::UnsupportedAction(name.to_string()))
                },
                Action::Invoke(f) => CompiledAction::Invoke(f.clone()),
            };
            Ok(CompiledRule { matches: rule.matches.clone(), action })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompiledRules::Rules(compiled))
}
