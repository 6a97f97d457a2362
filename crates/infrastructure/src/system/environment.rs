use knife_dns_application::ports::EnvironmentStore;
use knife_dns_domain::EnvSnapshot;
use std::env;

/// The real process environment.
///
/// Variables whose name or value is not valid UTF-8 are invisible to
/// snapshots and left untouched by `replace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentStore for ProcessEnvironment {
    fn snapshot(&self) -> EnvSnapshot {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        env::set_var(key, value);
    }

    fn replace(&self, snapshot: &EnvSnapshot) {
        let current = self.snapshot();

        for key in current.keys() {
            if !snapshot.contains_key(key) {
                env::remove_var(key);
            }
        }

        for (key, value) in snapshot {
            if current.get(key) != Some(value) {
                env::set_var(key, value);
            }
        }
    }
}
