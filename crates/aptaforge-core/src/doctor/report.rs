use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// Result of one installation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckOutcome {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            detail: detail.into(),
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl DoctorReport {
    /// True only when every single check passed.
    pub fn passed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(CheckOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            let mark = if outcome.passed() { '✓' } else { '✗' };
            writeln!(f, "{} {}: {}", mark, outcome.name, outcome.detail)?;
        }
        if self.passed() {
            write!(f, "All {} checks passed.", self.outcomes.len())
        } else {
            let failed: Vec<&str> = self.failures().map(|o| o.name.as_str()).collect();
            write!(
                f,
                "{} of {} checks failed: {}",
                failed.len(),
                self.outcomes.len(),
                failed.join(", ")
            )
        }
    }
}
