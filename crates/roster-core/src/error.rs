use std::path::PathBuf;

use uuid::Uuid;

use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record {0} already exists")]
    DuplicateIdentifier(Uuid),

    #[error("Record {0} not found")]
    NotFound(Uuid),

    #[error("Record failed validation: {0}")]
    Invalid(FieldErrors),
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Record {0} not found")]
    RecordNotFound(Uuid),

    #[error("Image is still loading")]
    ImagePending,

    #[error("Form has errors: {0}")]
    Invalid(FieldErrors),

    #[error("Form is closed")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),
}
