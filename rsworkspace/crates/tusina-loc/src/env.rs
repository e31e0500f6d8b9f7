//! Environment variable access behind a trait, so configuration can be
//! resolved from a test double instead of the process environment.

use std::env::VarError;

/// Read access to environment variables.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, VarError>;

    /// All `(suffix, value)` pairs whose key starts with `prefix`.
    fn vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)>;
}

/// Zero-sized type — delegates to `std::env`.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }

    fn vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        std::env::vars()
            .filter_map(|(k, v)| k.strip_prefix(prefix).map(|s| (s.to_string(), v)))
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryEnv;

#[cfg(any(test, feature = "test-support"))]
mod in_memory {
    use std::collections::BTreeMap;
    use std::env::VarError;
    use std::sync::Mutex;

    use super::ReadEnv;

    /// Won't touch the global process environment.
    ///
    /// `Mutex`-backed so it can be shared with multi-threaded tokio tests.
    #[derive(Default)]
    pub struct InMemoryEnv {
        vars: Mutex<BTreeMap<String, String>>,
    }

    impl InMemoryEnv {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
            self.vars
                .lock()
                .unwrap()
                .insert(key.into(), value.into());
        }

        pub fn remove(&self, key: &str) {
            self.vars.lock().unwrap().remove(key);
        }
    }

    impl ReadEnv for InMemoryEnv {
        fn var(&self, key: &str) -> Result<String, VarError> {
            self.vars
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or(VarError::NotPresent)
        }

        fn vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
            self.vars
                .lock()
                .unwrap()
                .iter()
                .filter_map(|(k, v)| k.strip_prefix(prefix).map(|s| (s.to_string(), v.clone())))
                .collect()
        }
    }
}
