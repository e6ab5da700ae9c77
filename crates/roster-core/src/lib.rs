pub mod error;
pub mod form;
pub mod image;
pub mod models;
pub mod router;
pub mod store;
pub mod validation;

pub use error::{FormError, ImageError, StoreError};
pub use form::{Commit, FormController, FormMode, FormPhase};
pub use models::*;
pub use router::{Navigation, Route, Router};
pub use store::RecordStore;
pub use validation::FieldErrors;
