//! Query credential check
//!
//! Influx clients pass credentials as the `u` and `p` parameters. Both must
//! equal the configured values; an empty configured pair therefore admits
//! requests that omit them.

/// Expected user name and password
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a supplied user name and password
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
