/// Role and zero-based ordinal parsed from the first label of a query name.
///
/// `web-3` selects the third `web` node (index 2). A suffix of `-0`, a
/// non-numeric suffix, or a bare label selects index 0 of the whole label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleQuery {
    pub role: String,
    pub index: usize,
}

impl RoleQuery {
    pub fn new(role: impl Into<String>, index: usize) -> Self {
        Self {
            role: role.into(),
            index,
        }
    }

    pub fn parse(label: &str) -> Self {
        if let Some((role, ordinal)) = label.rsplit_once('-') {
            let numeric = !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit());
            if !role.is_empty() && numeric {
                if let Ok(ordinal) = ordinal.parse::<usize>() {
                    if ordinal >= 1 {
                        return Self::new(role, ordinal - 1);
                    }
                }
            }
        }

        Self::new(label, 0)
    }

    /// Inventory search expression for this role, optionally narrowed by an
    /// extra filter fragment.
    pub fn search_expression(&self, extra: Option<&str>) -> String {
        match extra.map(str::trim).filter(|e| !e.is_empty()) {
            Some(extra) => format!("({}) AND role:{}", extra, self.role),
            None => format!("role:{}", self.role),
        }
    }
}
