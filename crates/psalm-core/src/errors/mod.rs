mod capability_error;
mod index_error;
mod input_error;
mod psalm_error;
mod stage_error;

pub use capability_error::{Capability, CapabilityError, CapabilityFailure};
pub use index_error::IndexError;
pub use input_error::InputError;
pub use psalm_error::{ErrorCategory, PsalmError, PsalmResult};
pub use stage_error::StageError;
