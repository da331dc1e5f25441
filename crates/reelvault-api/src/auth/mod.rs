//! Password hashing for registered accounts.

pub mod password;

pub use password::hash_password;
#[cfg(test)]
pub(crate) use password::verify_password;
