mod draft;
mod user;

pub use draft::*;
pub use user::*;
