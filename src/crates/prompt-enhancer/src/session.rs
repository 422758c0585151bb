//! Per-session enhancement state
//!
//! A [`Session`] is the explicit context the enhancer writes into: the
//! append-only history of template enhancements and the most recent
//! critique produced by an AI rewrite. Each interactive user gets their own.

use crate::pattern::PatternType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One completed template enhancement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnhancementRecord {
    pub timestamp: DateTime<Utc>,
    pub original: String,
    pub enhanced: String,
    #[serde(rename = "type")]
    pub pattern: PatternType,
    pub parameters: BTreeMap<String, String>,
}

impl EnhancementRecord {
    /// Record an enhancement made now
    pub fn new(
        original: impl Into<String>,
        enhanced: impl Into<String>,
        pattern: PatternType,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            original: original.into(),
            enhanced: enhanced.into(),
            pattern,
            parameters,
        }
    }
}

/// Mutable context owned by one user of the enhancer
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    history: Vec<EnhancementRecord>,
    last_critique: Option<String>,
}

impl Session {
    /// Start an empty session with a fresh id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            last_critique: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// History in insertion order
    pub fn history(&self) -> &[EnhancementRecord] {
        &self.history
    }

    /// Critique from the most recent AI rewrite, if any
    pub fn last_critique(&self) -> Option<&str> {
        self.last_critique.as_deref()
    }

    pub(crate) fn record(&mut self, record: EnhancementRecord) {
        self.history.push(record);
    }

    pub(crate) fn set_critique(&mut self, critique: Option<String>) {
        self.last_critique = critique;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.history().is_empty());
        assert!(session.last_critique().is_none());
        assert_eq!(session.id().len(), 36);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn test_history_keeps_insertion_order() {
        let mut session = Session::new();
        session.record(EnhancementRecord::new("a", "A", PatternType::XmlStructure, BTreeMap::new()));
        session.record(EnhancementRecord::new("b", "B", PatternType::ChainOfThought, BTreeMap::new()));

        let originals: Vec<_> = session.history().iter().map(|r| r.original.as_str()).collect();
        assert_eq!(originals, vec!["a", "b"]);
        assert!(session.history()[0].timestamp <= session.history()[1].timestamp);
    }

    #[test]
    fn test_record_serializes_with_type_field() {
        let mut params = BTreeMap::new();
        params.insert("persona".to_string(), "chef".to_string());
        let record = EnhancementRecord::new("p", "P", PatternType::RolePrompting, params);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "role_prompting");
        assert_eq!(json["parameters"]["persona"], "chef");
        assert!(json["timestamp"].is_string());
    }
}
