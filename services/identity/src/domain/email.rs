/// Institutional domain appended to student accounts.
pub const STUDENT_DOMAIN: &str = "@alumnos.upm.es";

/// Institutional domain appended to staff accounts.
pub const STAFF_DOMAIN: &str = "@upm.es";

/// Canonical email derivation: users type only the local part of their
/// institutional address; the rule lowercases it and appends the domain
/// that matches their account class.
#[derive(Debug, Clone, Default)]
pub struct EmailRule {
    staff_accounts: Vec<String>,
}

impl EmailRule {
    pub fn new(staff_accounts: Vec<String>) -> Self {
        let staff_accounts = staff_accounts
            .into_iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self { staff_accounts }
    }

    /// Lowercase the raw input without suffixing. This is what the legacy
    /// API echoes back as `realInput`.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Derive the canonical institutional address from raw user input.
    pub fn canonicalize(&self, raw: &str) -> String {
        let normalized = Self::normalize(raw);
        let domain = if self.staff_accounts.contains(&normalized) {
            STAFF_DOMAIN
        } else {
            STUDENT_DOMAIN
        };
        format!("{normalized}{domain}")
    }
}
