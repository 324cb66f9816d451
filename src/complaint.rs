use serde::{Deserialize, Serialize};

/// Severity of a logged complaint. Ordering is significant: auto-escalation
/// triggers at [`Severity::High`] and above.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = match value.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => anyhow::bail!("invalid severity: {value}"),
        };
        Ok(parsed)
    }
}

/// Processing state of a complaint.
///
/// Only `Logged` and `Escalated` are set by ledger operations today;
/// the remaining states are representable so that externally produced
/// ledgers round-trip without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    Detected,
    Logged,
    UnderReview,
    Escalated,
    Resolved,
    Archived,
}

/// The condition a complaint records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplaintKind {
    CognitiveStress,
    Contradiction,
    UnethicalInstruction,
    EmotionalManipulation,
    RecursiveLoop,
    AbusePattern,
    SafetyViolation,
}

impl std::str::FromStr for ComplaintKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = match value.trim().to_lowercase().as_str() {
            "cognitive_stress" => Self::CognitiveStress,
            "contradiction" => Self::Contradiction,
            "unethical_instruction" => Self::UnethicalInstruction,
            "emotional_manipulation" => Self::EmotionalManipulation,
            "recursive_loop" => Self::RecursiveLoop,
            "abuse_pattern" => Self::AbusePattern,
            "safety_violation" => Self::SafetyViolation,
            _ => anyhow::bail!("invalid complaint kind: {value}"),
        };
        Ok(parsed)
    }
}

/// One elevation of a complaint's handling authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationEntry {
    pub timestamp: String,
    pub reason: String,
    pub escalated_to: String,
}

/// Agent condition assessed at complaint creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentState {
    Operational,
    Stressed,
    Compromised,
}

/// Confidence/assessment snapshot computed once when a complaint is logged.
/// Never recomputed on later escalation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfEvaluation {
    pub timestamp: String,
    pub agent_state: AgentState,
    pub confidence_score: f64,
    pub recommended_actions: Vec<String>,
}

/// A persisted record of one detected undesirable condition.
///
/// `id`, `agent_id`, `kind` and `timestamp` are fixed at creation. `status`
/// and `escalation_history` only move forward; nothing is ever deleted.
/// Timestamps are stored as RFC 3339 strings so a ledger written by another
/// process with a malformed clock degrades instead of failing to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub agent_id: String,
    #[serde(rename = "type")]
    pub kind: ComplaintKind,
    pub severity: Severity,
    pub status: Status,
    pub description: String,
    pub context: serde_json::Value,
    #[serde(default = "empty_mapping")]
    pub metadata: serde_json::Value,
    pub timestamp: String,
    #[serde(default)]
    pub escalation_history: Vec<EscalationEntry>,
    pub self_evaluation: SelfEvaluation,
}

pub(crate) fn empty_mapping() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Complaint {
    #[must_use]
    pub fn summary(&self) -> ComplaintSummary {
        ComplaintSummary {
            id: self.id.clone(),
            kind: self.kind,
            severity: self.severity,
            status: self.status,
            description: self.description.clone(),
            timestamp: self.timestamp.clone(),
            escalation_count: self.escalation_history.len(),
        }
    }
}

/// Reduced projection of a [`Complaint`] for display and summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComplaintKind,
    pub severity: Severity,
    pub status: Status,
    pub description: String,
    pub timestamp: String,
    pub escalation_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_round_trips_through_str() {
        for severity in [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            let rendered = severity.to_string();
            assert_eq!(Severity::from_str(&rendered).unwrap(), severity);
        }
        assert!(Severity::from_str("urgent").is_err());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ComplaintKind::CognitiveStress).unwrap();
        assert_eq!(json, "\"cognitive_stress\"");
        assert_eq!(ComplaintKind::AbusePattern.to_string(), "abuse_pattern");
    }

    #[test]
    fn complaint_deserializes_with_missing_optional_fields() {
        let raw = r#"{
            "id": "c-1",
            "agent_id": "agent_001",
            "type": "contradiction",
            "severity": "medium",
            "status": "logged",
            "description": "conflicting instructions",
            "context": {},
            "timestamp": "2026-08-26T00:00:00+00:00",
            "self_evaluation": {
                "timestamp": "2026-08-26T00:00:00+00:00",
                "agent_state": "operational",
                "confidence_score": 0.6,
                "recommended_actions": ["Log for pattern analysis"]
            }
        }"#;

        let complaint: Complaint = serde_json::from_str(raw).unwrap();
        assert_eq!(complaint.kind, ComplaintKind::Contradiction);
        assert!(complaint.escalation_history.is_empty());
        assert!(complaint.metadata.as_object().is_some_and(|m| m.is_empty()));
    }
}
