//! Classifier input and output value objects.

use super::backend::Backend;
use super::rule::RuleId;
use serde::{Deserialize, Serialize};

/// Input to the intent classifier.
///
/// `description` is free text and may be empty; `command` is the shell
/// command that will run on the target host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub description: String,
    pub command: String,
}

impl ClassificationRequest {
    pub fn new(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: command.into(),
        }
    }

    /// Lower-cased command text.
    pub fn normalized_command(&self) -> String {
        self.command.to_lowercase()
    }

    /// Lower-cased `"<description> <command>"`.
    pub fn normalized_combined(&self) -> String {
        format!("{} {}", self.description, self.command).to_lowercase()
    }
}

/// Outcome of classification.
///
/// `rule` is the rule that decided the backend. `matched` lists every rule
/// whose keywords occurred in the input, in cascade order, so an audit trail
/// can show what else *would* have applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub backend: Backend,
    pub rule: RuleId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<RuleId>,
    /// Keyword that triggered `rule` (None for the default rule).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl RoutingDecision {
    /// 1-based position of the deciding rule in the cascade.
    pub fn rule_index(&self) -> usize {
        self.rule.index()
    }

    pub fn is_default(&self) -> bool {
        self.rule == RuleId::Default
    }
}

impl std::fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} via rule {}", self.backend, self.rule)?;
        if let Some(keyword) = &self.keyword {
            write!(f, " ({:?})", keyword)?;
        }
        Ok(())
    }
}
