use crate::errors::PsalmResult;

/// Free-text reflection capability. Blocking; bounded by the implementation's timeout.
pub trait IReflectionGenerator: Send + Sync {
    /// Produce guidance for `passage` shaped by `intent`.
    fn generate(&self, passage: &str, intent: &str) -> PsalmResult<String>;

    fn model_name(&self) -> &str;
}
