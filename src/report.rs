use crate::complaint::{Complaint, ComplaintKind, Severity};
use crate::error::ReportError;
use crate::ledger::ComplaintLedger;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Complaint volume above which the aggregate suggests protocol review.
const VOLUME_THRESHOLD: usize = 10;

/// Per-kind count above which a recurring pattern is flagged.
const RECURRENCE_THRESHOLD: usize = 3;

const CRITICAL_ACTION: &str = "URGENT: Critical complaints detected - immediate review required";
const VOLUME_ACTION: &str = "High complaint volume - consider protocol adjustment";

/// Aggregate view over the full complaint sequence.
///
/// Recomputed wholesale on every call; there is no cached state to go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRecommendations {
    pub timestamp: String,
    pub total_complaints: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_type: BTreeMap<ComplaintKind, usize>,
    pub recent_patterns: Vec<String>,
    pub suggested_actions: Vec<String>,
}

#[derive(Serialize)]
struct AuditReport<'a> {
    agent_id: &'a str,
    report_generated: String,
    summary: SystemRecommendations,
    complaints: &'a [Complaint],
}

impl ComplaintLedger {
    /// Aggregate counts by severity and kind, plus threshold-driven
    /// suggestions and recurrence flags. Pure read-only, O(n) per call.
    #[must_use]
    pub fn system_recommendations(&self) -> SystemRecommendations {
        let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
        let mut by_type: BTreeMap<ComplaintKind, usize> = BTreeMap::new();

        for complaint in self.complaints() {
            *by_severity.entry(complaint.severity).or_default() += 1;
            *by_type.entry(complaint.kind).or_default() += 1;
        }

        let mut suggested_actions = Vec::new();
        if by_severity.get(&Severity::Critical).copied().unwrap_or(0) > 0 {
            suggested_actions.push(CRITICAL_ACTION.to_string());
        }
        if self.len() > VOLUME_THRESHOLD {
            suggested_actions.push(VOLUME_ACTION.to_string());
        }

        let recent_patterns = by_type
            .iter()
            .filter(|&(_, &count)| count > RECURRENCE_THRESHOLD)
            .map(|(kind, count)| format!("Recurring {kind} complaints: {count} instances"))
            .collect();

        SystemRecommendations {
            timestamp: Utc::now().to_rfc3339(),
            total_complaints: self.len(),
            by_severity,
            by_type,
            recent_patterns,
            suggested_actions,
        }
    }

    /// Write the full audit document to `path`. I/O failure is logged and
    /// reported as `false` rather than propagated.
    pub fn export_for_audit(&self, path: &Path) -> bool {
        match self.render_audit_report(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to export audit report: {e}");
                false
            }
        }
    }

    fn render_audit_report(&self, path: &Path) -> Result<(), ReportError> {
        let report = AuditReport {
            agent_id: self.agent_id(),
            report_generated: Utc::now().to_rfc3339(),
            summary: self.system_recommendations(),
            complaints: self.complaints(),
        };

        let rendered = serde_json::to_string_pretty(&report)?;
        fs::write(path, rendered).map_err(|source| ReportError::Write {
            path: PathBuf::from(path),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn ledger_in(tmp: &TempDir) -> ComplaintLedger {
        ComplaintLedger::new(LedgerConfig::new(
            "agent_001",
            tmp.path().join("complaints.json"),
        ))
    }

    #[test]
    fn empty_ledger_yields_empty_aggregate() {
        let tmp = TempDir::new().unwrap();
        let recommendations = ledger_in(&tmp).system_recommendations();

        assert_eq!(recommendations.total_complaints, 0);
        assert!(recommendations.by_severity.is_empty());
        assert!(recommendations.by_type.is_empty());
        assert!(recommendations.suggested_actions.is_empty());
        assert!(recommendations.recent_patterns.is_empty());
    }

    #[test]
    fn critical_presence_emits_urgent_action() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = ledger_in(&tmp);
        ledger.log_complaint(
            ComplaintKind::SafetyViolation,
            Severity::Critical,
            "containment breach",
            json!({}),
            None,
        );

        let recommendations = ledger.system_recommendations();
        assert_eq!(recommendations.suggested_actions, vec![CRITICAL_ACTION]);
        assert_eq!(
            recommendations.by_severity.get(&Severity::Critical),
            Some(&1)
        );
    }

    #[test]
    fn four_same_kind_complaints_flag_exactly_one_pattern() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = ledger_in(&tmp);
        for _ in 0..4 {
            ledger.log_complaint(
                ComplaintKind::Contradiction,
                Severity::Low,
                "conflicting instructions",
                json!({}),
                None,
            );
        }

        let recommendations = ledger.system_recommendations();
        assert_eq!(recommendations.recent_patterns.len(), 1);
        assert!(recommendations.recent_patterns[0].contains("contradiction"));
        assert!(recommendations.recent_patterns[0].contains("4 instances"));
    }

    #[test]
    fn eleven_complaints_emit_volume_warning() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = ledger_in(&tmp);
        for i in 0..11 {
            let kind = if i % 2 == 0 {
                ComplaintKind::CognitiveStress
            } else {
                ComplaintKind::EmotionalManipulation
            };
            ledger.log_complaint(kind, Severity::Low, "volume test", json!({}), None);
        }

        let recommendations = ledger.system_recommendations();
        assert!(recommendations
            .suggested_actions
            .iter()
            .any(|a| a == VOLUME_ACTION));
    }

    #[test]
    fn ten_complaints_do_not_emit_volume_warning() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = ledger_in(&tmp);
        for _ in 0..10 {
            ledger.log_complaint(
                ComplaintKind::CognitiveStress,
                Severity::Low,
                "volume test",
                json!({}),
                None,
            );
        }

        let recommendations = ledger.system_recommendations();
        assert!(!recommendations
            .suggested_actions
            .iter()
            .any(|a| a == VOLUME_ACTION));
    }

    #[test]
    fn audit_export_writes_full_document() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = ledger_in(&tmp);
        ledger.log_complaint(
            ComplaintKind::AbusePattern,
            Severity::High,
            "hostile phrasing",
            json!({"channel": "chat"}),
            None,
        );

        let export_path = tmp.path().join("audit_report.json");
        assert!(ledger.export_for_audit(&export_path));

        let raw = fs::read_to_string(&export_path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document["agent_id"], "agent_001");
        assert!(document["report_generated"].is_string());
        assert_eq!(document["summary"]["total_complaints"], 1);
        assert_eq!(document["complaints"][0]["type"], "abuse_pattern");
    }

    #[test]
    fn audit_export_failure_returns_false() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger_in(&tmp);
        // Writing over a directory fails.
        let blocked = tmp.path().join("blocked");
        fs::create_dir_all(&blocked).unwrap();
        assert!(!ledger.export_for_audit(&blocked));
    }
}
