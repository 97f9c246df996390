use crate::error::UsageError;
use crate::reraise::compile::{compile, CompiledRules};
use crate::reraise::rules::{RemapResult, Reraising};
use crate::schema::ErrorClass;
use crate::types::{Fields, ForeignError, Raised};

/// Per-call overrides for remapping.
///
/// Without `reraising` the class's own compiled rules apply; `remap_kwargs`
/// are handed to whatever class builds the replacement.
#[derive(Clone, Debug, Default)]
pub struct RemapOptions {
    reraising: Option<Reraising>,
    remap_kwargs: Fields,
}

impl RemapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reraising(mut self, reraising: impl Into<Reraising>) -> Self {
        self.reraising = Some(reraising.into());
        self
    }

    #[must_use]
    pub fn remap_kwargs(mut self, kwargs: Fields) -> Self {
        self.remap_kwargs = kwargs;
        self
    }

    #[inline]
    pub fn kwargs(&self) -> &Fields {
        &self.remap_kwargs
    }
}

impl ErrorClass {
    /// Remaps `exc` with the class's own rules and no extra kwargs.
    #[inline]
    pub fn remap(&self, exc: &Raised) -> RemapResult {
        self.remap_with(exc, &RemapOptions::default())
    }

    /// Decides whether `exc` becomes an instance of some structured class.
    ///
    /// Returns `Ok(None)` when the error should propagate unchanged: it is
    /// already an instance of this class, the rules are empty, its class is
    /// fatal, no rule matches, or the first matching rule skips it.
    pub fn remap_with(&self, exc: &Raised, options: &RemapOptions) -> RemapResult {
        let adhoc;
        let rules = match &options.reraising {
            None => self.rules(),
            Some(reraising) => {
                adhoc = compile(self.name(), reraising, |name| self.method(name).is_some())?;
                &adhoc
            },
        };

        if exc.is_instance_of(self) || !rules.is_active() || exc.is_fatal() {
            #[cfg(feature = "tracing")]
            tracing::trace!(class = %self.name(), error = %exc.type_name(), "remap bypassed");
            return Ok(None);
        }

        let remapped = match rules {
            CompiledRules::Never => None,
            CompiledRules::Greedy => Some(self.create(options.remap_kwargs.clone())?),
            CompiledRules::Rules(rules) => match rules.iter().find(|r| r.matches.matches(exc)) {
                Some(rule) => rule.action.apply(self, exc, &options.remap_kwargs)?,
                None => None,
            },
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            class = %self.name(),
            error = %exc.type_name(),
            remapped = ?remapped.as_ref().map(|e| e.class().name().to_owned()),
            "remap evaluated"
        );
        Ok(remapped)
    }

    /// Like [`remap_with`](Self::remap_with), but always yields an error:
    /// the replacement (caused by `exc`) or `exc` itself.
    pub fn remap_or_original(
        &self,
        exc: Raised,
        options: &RemapOptions,
    ) -> Result<Raised, UsageError> {
        Ok(match self.remap_with(&exc, options)? {
            Some(replacement) => Raised::Structured(replacement.with_cause(exc)),
            None => exc,
        })
    }

    /// Runs `body`, remapping any error it returns.
    ///
    /// A replacement carries the original error as its cause. If building
    /// the replacement fails, the toolkit error is returned with the
    /// original attached as context.
    ///
    /// # Examples
    ///
    /// ```
    /// use error_mold::reraise::{catch, Matcher};
    /// use error_mold::ErrorClass;
    ///
    /// let class = ErrorClass::builder("BadNumber")
    ///     .template("not a number")
    ///     .reraising(catch(Matcher::foreign::<std::num::ParseIntError>()))
    ///     .build()
    ///     .unwrap();
    ///
    /// let err = class.reraise(|| "x".parse::<i32>()).unwrap_err();
    /// assert!(err.is_instance_of(&class));
    /// assert_eq!(err.as_structured().unwrap().cause().unwrap().type_name(), "ParseIntError");
    /// ```
    #[inline]
    pub fn reraise<T, E, F>(&self, body: F) -> Result<T, Raised>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Raised>,
    {
        self.reraise_with(&RemapOptions::default(), body)
    }

    pub fn reraise_with<T, E, F>(&self, options: &RemapOptions, body: F) -> Result<T, Raised>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Raised>,
    {
        body().map_err(|e| self.escalate(e.into(), options))
    }

    /// Wraps `func` so every call runs inside [`reraise_with`](Self::reraise_with).
    pub fn rewrap<A, T, E, F>(
        &self,
        options: RemapOptions,
        func: F,
    ) -> impl Fn(A) -> Result<T, Raised>
    where
        F: Fn(A) -> Result<T, E>,
        E: Into<Raised>,
    {
        let class = self.clone();
        move |args| class.reraise_with(&options, || func(args))
    }

    pub(crate) fn escalate(&self, original: Raised, options: &RemapOptions) -> Raised {
        match self.remap_with(&original, options) {
            Ok(None) => original,
            Ok(Some(replacement)) => Raised::Structured(replacement.with_cause(original)),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    class = %self.name(),
                    error = %err,
                    original = %original,
                    "failed to remap error"
                );
                Raised::Foreign(ForeignError::new(err).with_context(original))
            },
        }
    }
}
