use crate::error::DefinitionError;
use crate::reraise::engine::RemapOptions;
use crate::reraise::rules::RemapResult;
use crate::schema::{ErrorClass, Registry};
use crate::types::{Fields, Raised};

/// Tries several classes' remap in order; the first replacement wins.
///
/// Usable as a rule action through `Action::from(chain)`.
///
/// # Examples
///
/// ```
/// use error_mold::reraise::{Chain, Matcher};
/// use error_mold::{ErrorClass, Raised};
///
/// let quiet = ErrorClass::builder("Quiet").template("quiet").build().unwrap();
/// let greedy =
///     ErrorClass::builder("Greedy").template("greedy").reraising(true).build().unwrap();
///
/// let chain = Chain::new([quiet, greedy.clone()]);
/// let io = Raised::foreign(std::io::Error::other("boom"));
/// let remapped = chain.remap(&io, &Default::default()).unwrap().unwrap();
/// assert_eq!(remapped.class(), &greedy);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Chain {
    classes: Vec<ErrorClass>,
}

impl Chain {
    pub fn new(classes: impl IntoIterator<Item = ErrorClass>) -> Self {
        Self { classes: classes.into_iter().collect() }
    }

    /// Every registered descendant of `root`, depth first.
    ///
    /// Siblings are visited last-defined first; `root` itself is excluded.
    pub fn from_subtree(registry: &Registry, root: &ErrorClass) -> Self {
        let mut workload = registry.subclasses(root);
        let mut discovered = Vec::new();
        while let Some(class) = workload.pop() {
            workload.extend(registry.subclasses(&class));
            discovered.push(class);
        }
        Self { classes: discovered }
    }

    /// Resolves classes by name in `registry`.
    pub fn from_names<I, S>(registry: &Registry, names: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes = names
            .into_iter()
            .map(|name| registry.resolve(name.as_ref()).cloned())
            .collect::<Result<_, _>>()?;
        Ok(Self { classes })
    }

    #[inline]
    pub fn classes(&self) -> &[ErrorClass] {
        &self.classes
    }

    pub fn remap(&self, exc: &Raised, remap_kwargs: &Fields) -> RemapResult {
        let options = RemapOptions::new().remap_kwargs(remap_kwargs.clone());
        for class in &self.classes {
            if let Some(remapped) = class.remap_with(exc, &options)? {
                return Ok(Some(remapped));
            }
        }
        Ok(None)
    }
}
