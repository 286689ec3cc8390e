//! Routing rules: one entry of the classification cascade.

use super::backend::Backend;
use serde::{Deserialize, Serialize};

/// Identifier of a routing rule, in cascade order.
///
/// The numeric [`index`](Self::index) is the rule's position in the cascade
/// (1-based) and is what audit records and tests refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    FileMutation,
    PrivilegeEscalation,
    NetworkReconfiguration,
    IdempotentOperation,
    ConfigChangeKeyword,
    StatusQueryKeyword,
    /// No rule matched.
    Default,
}

impl RuleId {
    pub fn index(&self) -> usize {
        match self {
            RuleId::FileMutation => 1,
            RuleId::PrivilegeEscalation => 2,
            RuleId::NetworkReconfiguration => 3,
            RuleId::IdempotentOperation => 4,
            RuleId::ConfigChangeKeyword => 5,
            RuleId::StatusQueryKeyword => 6,
            RuleId::Default => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::FileMutation => "file_mutation",
            RuleId::PrivilegeEscalation => "privilege_escalation",
            RuleId::NetworkReconfiguration => "network_reconfiguration",
            RuleId::IdempotentOperation => "idempotent_operation",
            RuleId::ConfigChangeKeyword => "config_change_keyword",
            RuleId::StatusQueryKeyword => "status_query_keyword",
            RuleId::Default => "default",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.index(), self.as_str())
    }
}

/// Which text a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// The shell command alone.
    Command,
    /// Description and command joined by a single space.
    Combined,
}

/// A single rule: if any keyword occurs in the target text, route to `backend`.
///
/// Rules are plain static data; the cascade order lives in the slice that
/// holds them, not in the rules themselves.
#[derive(Debug, Clone, Copy)]
pub struct RoutingRule {
    pub id: RuleId,
    pub target: MatchTarget,
    pub keywords: &'static [&'static str],
    pub backend: Backend,
}

impl RoutingRule {
    pub const fn new(
        id: RuleId,
        target: MatchTarget,
        keywords: &'static [&'static str],
        backend: Backend,
    ) -> Self {
        Self {
            id,
            target,
            keywords,
            backend,
        }
    }

    /// Return the first keyword of this rule found in the input.
    ///
    /// Both arguments must already be lower-cased.
    pub fn find_keyword(&self, command: &str, combined: &str) -> Option<&'static str> {
        let haystack = match self.target {
            MatchTarget::Command => command,
            MatchTarget::Combined => combined,
        };
        self.keywords
            .iter()
            .copied()
            .find(|keyword| haystack.contains(keyword))
    }

    pub fn matches(&self, command: &str, combined: &str) -> bool {
        self.find_keyword(command, combined).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: RoutingRule = RoutingRule::new(
        RuleId::StatusQueryKeyword,
        MatchTarget::Command,
        &["uptime", "df"],
        Backend::DirectExec,
    );

    #[test]
    fn test_rule_indices_follow_cascade_order() {
        let ids = [
            RuleId::FileMutation,
            RuleId::PrivilegeEscalation,
            RuleId::NetworkReconfiguration,
            RuleId::IdempotentOperation,
            RuleId::ConfigChangeKeyword,
            RuleId::StatusQueryKeyword,
            RuleId::Default,
        ];
        for (position, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), position + 1);
        }
    }

    #[test]
    fn test_find_keyword_respects_target() {
        assert_eq!(SAMPLE.find_keyword("uptime", "uptime"), Some("uptime"));
        // Command-targeted rule ignores the description part
        assert_eq!(SAMPLE.find_keyword("echo hi", "check df echo hi"), None);
    }

    #[test]
    fn test_rule_id_display() {
        assert_eq!(RuleId::FileMutation.to_string(), "#1 file_mutation");
        assert_eq!(RuleId::Default.to_string(), "#7 default");
    }
}
