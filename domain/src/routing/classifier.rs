//! Intent classifier: the ordered rule cascade.

use super::backend::Backend;
use super::decision::{ClassificationRequest, RoutingDecision};
use super::keywords;
use super::rule::{MatchTarget, RoutingRule, RuleId};

/// The routing cascade, in evaluation order.
///
/// Reordering this table changes classification outcomes for inputs that
/// match more than one list.
pub const DEFAULT_RULES: &[RoutingRule] = &[
    RoutingRule::new(
        RuleId::FileMutation,
        MatchTarget::Command,
        keywords::FILE_MUTATION,
        Backend::ConfigManagement,
    ),
    RoutingRule::new(
        RuleId::PrivilegeEscalation,
        MatchTarget::Command,
        keywords::PRIVILEGE_ESCALATION,
        Backend::ConfigManagement,
    ),
    RoutingRule::new(
        RuleId::NetworkReconfiguration,
        MatchTarget::Command,
        keywords::NETWORK_RECONFIGURATION,
        Backend::ConfigManagement,
    ),
    RoutingRule::new(
        RuleId::IdempotentOperation,
        MatchTarget::Command,
        keywords::IDEMPOTENT_OPERATION,
        Backend::ConfigManagement,
    ),
    RoutingRule::new(
        RuleId::ConfigChangeKeyword,
        MatchTarget::Combined,
        keywords::CONFIG_CHANGE,
        Backend::ConfigManagement,
    ),
    RoutingRule::new(
        RuleId::StatusQueryKeyword,
        MatchTarget::Combined,
        keywords::STATUS_QUERY,
        Backend::DirectExec,
    ),
];

/// Deterministic classifier mapping (description, command) to a [`Backend`].
///
/// Evaluates every rule in one pass, records all matches, and lets the first
/// match decide. When nothing matches the decision falls back to
/// [`Backend::DirectExec`], the lower-privilege backend.
///
/// # Example
///
/// ```
/// use opsroute_domain::routing::{Backend, ClassificationRequest, IntentClassifier, RuleId};
///
/// let classifier = IntentClassifier::new();
/// let decision = classifier.classify(&ClassificationRequest::new(
///     "Restart nginx service",
///     "sudo systemctl restart nginx",
/// ));
/// assert_eq!(decision.backend, Backend::ConfigManagement);
/// assert_eq!(decision.rule, RuleId::PrivilegeEscalation);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    rules: &'static [RoutingRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES,
        }
    }

    /// Build a classifier over a custom rule table (evaluated in slice order).
    pub fn with_rules(rules: &'static [RoutingRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [RoutingRule] {
        self.rules
    }

    pub fn classify(&self, request: &ClassificationRequest) -> RoutingDecision {
        let command = request.normalized_command();
        let combined = request.normalized_combined();

        let mut fired: Option<(&RoutingRule, &'static str)> = None;
        let mut matched = Vec::new();

        for rule in self.rules {
            if let Some(keyword) = rule.find_keyword(&command, &combined) {
                matched.push(rule.id);
                if fired.is_none() {
                    fired = Some((rule, keyword));
                }
            }
        }

        match fired {
            Some((rule, keyword)) => RoutingDecision {
                backend: rule.backend,
                rule: rule.id,
                matched,
                keyword: Some(keyword.to_string()),
            },
            None => RoutingDecision {
                backend: Backend::DirectExec,
                rule: RuleId::Default,
                matched,
                keyword: None,
            },
        }
    }

    /// Convenience wrapper around [`classify`](Self::classify).
    pub fn classify_parts(&self, description: &str, command: &str) -> RoutingDecision {
        self.classify(&ClassificationRequest::new(description, command))
    }
}
