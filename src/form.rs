//! The reservation form: editable state, field updates and validation.

mod draft;
pub use draft::{BookingDraft, Change, ChangeError, Field, PetField};

mod model;
pub use model::{FormModel, PetListError, SubmitError};

pub mod validation;
pub use validation::{ErrorKind, FieldError, FieldPath, ValidationResult};
