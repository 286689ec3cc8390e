//! Routing domain module
//!
//! Decides which execution backend should carry out a remote operation.
//! The decision is made by [`IntentClassifier`], a deterministic cascade of
//! keyword rules over a free-text description and a shell command.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ ClassificationRequest│───▶│ IntentClassifier │───▶│ RoutingDecision  │
//! │ (description, cmd)   │    │ (ordered rules)  │    │ (backend, rule)  │
//! └──────────────────────┘    └──────────────────┘    └──────────────────┘
//! ```
//!
//! # Rule Cascade
//!
//! Rules are evaluated in a fixed order and the **first match wins**.
//! Keyword lists overlap (`mount` is both a privilege marker and
//! a configuration-change verb); precedence is the only disambiguation.
//!
//! | # | Rule | Matches against | Backend |
//! |---|------|-----------------|---------|
//! | 1 | File mutation | command | ConfigManagement |
//! | 2 | Privilege escalation | command | ConfigManagement |
//! | 3 | Network reconfiguration | command | ConfigManagement |
//! | 4 | Idempotent operation | command | ConfigManagement |
//! | 5 | Configuration-change keyword | description + command | ConfigManagement |
//! | 6 | Status-query keyword | description + command | DirectExec |
//! | 7 | Default | - | DirectExec |
//!
//! The classifier is pure and total: it never fails, and the same input
//! always yields the same decision.

pub mod backend;
pub mod classifier;
pub mod decision;
pub mod keywords;
pub mod rule;

pub use backend::Backend;
pub use classifier::IntentClassifier;
pub use decision::{ClassificationRequest, RoutingDecision};
pub use rule::{MatchTarget, RoutingRule, RuleId};
