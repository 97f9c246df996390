use core::fmt;
use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::UsageError;
use crate::reraise::Chain;
use crate::schema::ErrorClass;
use crate::types::{Fields, Raised, StructuredError};

/// Outcome of a remap: a replacement, nothing, or a toolkit failure.
pub type RemapResult = Result<Option<StructuredError>, UsageError>;

/// Custom remap callable: `(handling class, original, remap kwargs)`.
pub type RemapFn = Arc<dyn Fn(&ErrorClass, &Raised, &Fields) -> RemapResult + Send + Sync>;

/// Type test applied to a foreign error.
pub type ForeignCheck = fn(&(dyn Error + Send + Sync + 'static)) -> bool;

fn is_foreign<E: Error + 'static>(error: &(dyn Error + Send + Sync + 'static)) -> bool {
    error.is::<E>()
}

/// Selects errors a rule applies to.
#[derive(Clone)]
pub enum Matcher {
    /// Every error.
    Any,
    /// Structured errors of the class or any subclass.
    Class(ErrorClass),
    /// Foreign errors of one concrete type.
    Foreign { name: &'static str, check: ForeignCheck },
}

impl Matcher {
    #[inline]
    pub fn class(class: &ErrorClass) -> Self {
        Self::Class(class.clone())
    }

    pub fn foreign<E: Error + 'static>() -> Self {
        Self::Foreign { name: core::any::type_name::<E>(), check: is_foreign::<E> }
    }

    pub fn matches(&self, exc: &Raised) -> bool {
        match (self, exc) {
            (Self::Any, _) => true,
            (Self::Class(class), _) => exc.is_instance_of(class),
            (Self::Foreign { check, .. }, Raised::Foreign(e)) => check(e.get_ref()),
            (Self::Foreign { .. }, Raised::Structured(_)) => false,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Class(class) => write!(f, "Class({})", class.qualname()),
            Self::Foreign { name, .. } => write!(f, "Foreign({name})"),
        }
    }
}

impl From<ErrorClass> for Matcher {
    #[inline]
    fn from(class: ErrorClass) -> Self {
        Self::Class(class)
    }
}

impl From<&ErrorClass> for Matcher {
    #[inline]
    fn from(class: &ErrorClass) -> Self {
        Self::Class(class.clone())
    }
}

/// One or more matchers; matches when any of them does.
#[derive(Clone, Debug, Default)]
pub struct MatchSet(SmallVec<[Matcher; 2]>);

impl MatchSet {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn any() -> Self {
        Self::from(Matcher::Any)
    }

    #[must_use]
    pub fn or(mut self, matcher: impl Into<Matcher>) -> Self {
        self.0.push(matcher.into());
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, exc: &Raised) -> bool {
        self.0.iter().any(|m| m.matches(exc))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matcher> {
        self.0.iter()
    }
}

impl From<Matcher> for MatchSet {
    fn from(matcher: Matcher) -> Self {
        let mut set = SmallVec::new();
        set.push(matcher);
        Self(set)
    }
}

impl From<ErrorClass> for MatchSet {
    fn from(class: ErrorClass) -> Self {
        Matcher::from(class).into()
    }
}

impl From<&ErrorClass> for MatchSet {
    fn from(class: &ErrorClass) -> Self {
        Matcher::from(class).into()
    }
}

impl From<Vec<Matcher>> for MatchSet {
    fn from(matchers: Vec<Matcher>) -> Self {
        Self(SmallVec::from_vec(matchers))
    }
}

impl<const N: usize> From<[Matcher; N]> for MatchSet {
    fn from(matchers: [Matcher; N]) -> Self {
        matchers.into_iter().collect()
    }
}

impl FromIterator<Matcher> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Matcher>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What to do with a matched error.
#[derive(Clone)]
pub enum Action {
    /// Leave the error untouched; stops rule evaluation.
    Skip,
    /// Replace with an instance of the handling class.
    SelfClass,
    /// Replace with an instance of another class.
    Replace(ErrorClass),
    /// Delegate to a remap method registered on the handling class.
    Method(Cow<'static, str>),
    /// Delegate to a callable.
    Invoke(RemapFn),
}

impl Action {
    pub fn method(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Method(name.into())
    }

    pub fn invoke<F>(f: F) -> Self
    where
        F: Fn(&ErrorClass, &Raised, &Fields) -> RemapResult + Send + Sync + 'static,
    {
        Self::Invoke(Arc::new(f))
    }
}

impl fmt::Debug for Action {
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

impl From<ErrorClass> for Action {
    fn from(class: ErrorClass) -> Self {
        Self::Replace(class)
    }
}

impl From<&ErrorClass> for Action {
    fn from(class: &ErrorClass) -> Self {
        Self::Replace(class.clone())
    }
}

impl From<Chain> for Action {
    fn from(chain: Chain) -> Self {
        Self::Invoke(Arc::new(move |_, exc, kwargs| chain.remap(exc, kwargs)))
    }
}

/// A `(matches, action)` pair.
#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) matches: MatchSet,
    pub(crate) action: Action,
}

impl Rule {
    pub fn new(matches: impl Into<MatchSet>, action: impl Into<Action>) -> Self {
        Self { matches: matches.into(), action: action.into() }
    }

    #[inline]
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    #[inline]
    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// Rule leaving matching errors as they are.
pub fn skip(matches: impl Into<MatchSet>) -> Rule {
    Rule::new(matches, Action::Skip)
}

/// Starts a rule remapping matching errors, by default to the handling class.
///
/// # Examples
///
/// ```
/// use error_mold::reraise::{catch, Matcher, Reraising};
///
/// let rules: Reraising = catch(Matcher::foreign::<std::num::ParseIntError>()).into();
/// assert!(matches!(rules, Reraising::Rules(ref r) if r.len() == 1));
/// ```
pub fn catch(matches: impl Into<MatchSet>) -> Catch {
    Catch { matches: matches.into(), exclude: None, action: Action::SelfClass }
}

/// Builder returned by [`catch`]; expands into one or two rules.
#[derive(Clone, Debug)]
#[must_use]
pub struct Catch {
    matches: MatchSet,
    exclude: Option<MatchSet>,
    action: Action,
}

impl Catch {
    /// Errors matching `exclude` are skipped before `matches` is tried.
    pub fn exclude(mut self, exclude: impl Into<MatchSet>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    pub fn to(mut self, action: impl Into<Action>) -> Self {
        self.action = action.into();
        self
    }
}

impl IntoIterator for Catch {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        let mut rules = Vec::with_capacity(2);
        if let Some(exclude) = self.exclude {
            rules.push(skip(exclude));
        }
        rules.push(Rule { matches: self.matches, action: self.action });
        rules.into_iter()
    }
}

/// Reraise policy of a class or of a single remap call.
#[derive(Clone, Debug, Default)]
pub enum Reraising {
    /// Never remap.
    #[default]
    Never,
    /// Remap everything to the handling class.
    Greedy,
    /// First matching rule decides.
    Rules(Vec<Rule>),
}

impl Reraising {
    /// Appends rules, turning `Never` into a rule list.
    ///
    /// `Greedy` swallows everything, so it is left unchanged.
    pub fn then(self, rules: impl IntoIterator<Item = Rule>) -> Self {
        match self {
            Self::Never => Self::Rules(rules.into_iter().collect()),
            Self::Greedy => Self::Greedy,
            Self::Rules(mut list) => {
                list.extend(rules);
                Self::Rules(list)
            },
        }
    }
}

impl From<bool> for Reraising {
    fn from(greedy: bool) -> Self {
        if greedy {
            Self::Greedy
        } else {
            Self::Never
        }
    }
}

impl From<Rule> for Reraising {
    fn from(rule: Rule) -> Self {
        Self::Rules(vec![rule])
    }
}

impl From<Vec<Rule>> for Reraising {
    fn from(rules: Vec<Rule>) -> Self {
        Self::Rules(rules)
    }
}

impl From<Catch> for Reraising {
    fn from(catch: Catch) -> Self {
        catch.into_iter().collect()
    }
}

impl FromIterator<Rule> for Reraising {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::Rules(iter.into_iter().collect())
    }
}
