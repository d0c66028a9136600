pub mod hasher;
pub mod errors;

pub use hasher::PasswordHasher;
pub use errors::PasswordError;
