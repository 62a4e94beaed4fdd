pub mod error;
pub mod registration;
pub mod user;

pub use error::*;
pub use registration::*;
pub use user::*;
