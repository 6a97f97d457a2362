use knife_dns_domain::EnvSnapshot;

/// Read/write access to the environment credential files are loaded under.
pub trait EnvironmentStore: Send + Sync {
    fn snapshot(&self) -> EnvSnapshot;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    /// Make the environment equal to `snapshot`: extra variables are removed,
    /// changed ones restored.
    fn replace(&self, snapshot: &EnvSnapshot);
}
