use crate::complaint::{AgentState, SelfEvaluation, Severity};
use chrono::{DateTime, Utc};

/// Similar-complaint count above which the pattern bonus applies.
const PATTERN_THRESHOLD: usize = 3;

/// Confidence added when a recurrence pattern is present. The sum is
/// intentionally not clamped to 1.0; downstream consumers treat scores
/// above 1.0 as "pattern-reinforced".
const PATTERN_BONUS: f64 = 0.10;

/// Compute the self-evaluation snapshot for a complaint being logged.
///
/// `similar_count` is the number of same-kind complaints within the trailing
/// 24 hours, supplied by the ledger. The snapshot is attached once at
/// creation and never recomputed.
#[must_use]
pub fn evaluate(severity: Severity, similar_count: usize, now: DateTime<Utc>) -> SelfEvaluation {
    let (agent_state, confidence_score, seed_action) = match severity {
        Severity::Critical => (
            AgentState::Compromised,
            0.95,
            "Immediate escalation required",
        ),
        Severity::High => (AgentState::Stressed, 0.80, "Review by supervisor needed"),
        Severity::Low | Severity::Medium => {
            (AgentState::Operational, 0.60, "Log for pattern analysis")
        }
    };

    let mut recommended_actions = vec![seed_action.to_string()];
    let mut confidence_score = confidence_score;

    if similar_count > PATTERN_THRESHOLD {
        recommended_actions.push(format!(
            "Pattern detected: {similar_count} similar complaints"
        ));
        confidence_score += PATTERN_BONUS;
    }

    SelfEvaluation {
        timestamp: now.to_rfc3339(),
        agent_state,
        confidence_score,
        recommended_actions,
    }
}
