use std::fmt;
use std::str::FromStr;

use crate::DomainError;

const MAX_LABEL_LEN: usize = 63;

/// A DNS name as an ordered sequence of labels, most specific first.
///
/// `test_role.test.chef` is `["test_role", "test", "chef"]`. Labels keep the
/// case they were received with; comparisons ignore ASCII case.
#[derive(Debug, Clone, Default)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    /// Parse a dotted name. One trailing dot (the root label) is accepted;
    /// `"."` and `""` parse to the root name with no labels.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut labels = Vec::new();
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "empty label in '{}'",
                    name
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} bytes",
                    label, MAX_LABEL_LEN
                )));
            }
            labels.push(label.to_string());
        }

        Ok(Self { labels })
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// `self` with `other` appended as the less specific part.
    pub fn join(&self, other: &DomainName) -> DomainName {
        let mut labels = self.labels.clone();
        labels.extend(other.labels.iter().cloned());
        DomainName { labels }
    }

    /// Label-wise suffix test: `a.b.c` ends with `b.c` and with `a.b.c`.
    pub fn ends_with(&self, suffix: &DomainName) -> bool {
        if suffix.len() > self.len() {
            return false;
        }
        let offset = self.len() - suffix.len();
        self.labels[offset..]
            .iter()
            .zip(&suffix.labels)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// True when `self` is exactly one label below `suffix`.
    pub fn is_child_of(&self, suffix: &DomainName) -> bool {
        self.len() == suffix.len() + 1 && self.ends_with(suffix)
    }

    /// Dotted form with the trailing root label.
    pub fn to_fqdn(&self) -> String {
        format!("{}.", self)
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.ends_with(other)
    }
}

impl Eq for DomainName {}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join("."))
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
