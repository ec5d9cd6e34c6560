//! Verification result tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultCode {
    /// Rule passed.
    Ok,
    /// Rule failed; the proof must be rejected.
    Fail,
    /// Rule passed with a diagnostic worth surfacing.
    Warning,
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::Warning => "WARNING",
        })
    }
}

/// Result of a rule, with the results of its children in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the rule that produced this result.
    pub rule: String,
    /// Human-readable summary.
    pub message: String,
    /// Outcome.
    pub code: ResultCode,
    /// Failure detail, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Child results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VerificationResult>,
}

impl VerificationResult {
    fn leaf(rule: impl Into<String>, code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            code,
            error: None,
            children: Vec::new(),
        }
    }

    /// Passing result.
    pub fn ok(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::leaf(rule, ResultCode::Ok, message)
    }

    /// Failing result.
    pub fn fail(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::leaf(rule, ResultCode::Fail, message)
    }

    /// Warning result.
    pub fn warning(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::leaf(rule, ResultCode::Warning, message)
    }

    /// Attach failure detail.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach child results.
    #[must_use]
    pub fn with_children(mut self, children: Vec<VerificationResult>) -> Self {
        self.children = children;
        self
    }

    /// Whether the proof is accepted at this node (OK or WARNING).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code != ResultCode::Fail
    }

    /// Find a result by rule name, depth first.
    #[must_use]
    pub fn find(&self, rule: &str) -> Option<&VerificationResult> {
        if self.rule == rule {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(rule))
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}[{}] {}: {}", "", self.code, self.rule, self.message, indent = depth * 2)?;
        if let Some(error) = &self.error {
            write!(f, " ({error})")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
