use bitflags::bitflags;

bitflags! {
    /// Per-class switches selecting which field checks are enforced.
    ///
    /// Construction-time checks run in declaration order and stop at the
    /// first failure; the last two run once, when the class is built.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Toggles: u8 {
        /// Every registered field must be supplied, defaulted or constant.
        const FORBID_MISSING_FIELDS = 1 << 0;
        /// Every supplied field must be registered or a declared constant.
        const FORBID_UNDECLARED_FIELDS = 1 << 1;
        /// Declared constants may not be supplied per instance.
        const FORBID_KWARG_CONSTS = 1 << 2;
        /// Template placeholders must be named (no `{}` / `{0}`).
        const FORBID_NON_NAMED_FIELDS = 1 << 3;
        /// Template placeholders must be declared as fields or constants.
        const FORBID_UNANNOTATED_FIELDS = 1 << 4;

        const DEFAULT = Self::FORBID_MISSING_FIELDS.bits()
            | Self::FORBID_UNDECLARED_FIELDS.bits()
            | Self::FORBID_KWARG_CONSTS.bits()
            | Self::FORBID_NON_NAMED_FIELDS.bits()
            | Self::FORBID_UNANNOTATED_FIELDS.bits();
    }
}

impl Toggles {
    /// No checks at all.
    pub const NONE: Self = Self::empty();
}

impl Default for Toggles {
    fn default() -> Self {
        Self::DEFAULT
    }
}
