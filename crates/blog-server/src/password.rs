//! Password handling
//!
//! Every stored credential passes through a [`PasswordScheme`]. Only
//! [`Plaintext`] ships today: values are stored verbatim and compared with
//! plain string equality. A hashing scheme can replace it by implementing the
//! trait; account code does not look at stored passwords directly.

pub trait PasswordScheme: Send + Sync {
    /// Value to persist for a newly supplied password
    fn hash(&self, password: &str) -> String;

    /// Whether `candidate` matches the persisted value
    fn verify(&self, candidate: &str, stored: &str) -> bool;
}

/// Stores passwords as given. Not a secure scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PasswordScheme for Plaintext {
    fn hash(&self, password: &str) -> String {
        password.to_string()
    }

    fn verify(&self, candidate: &str, stored: &str) -> bool {
        candidate == stored
    }
}
