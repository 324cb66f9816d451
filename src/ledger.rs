use crate::complaint::{
    Complaint, ComplaintKind, ComplaintSummary, EscalationEntry, Severity, Status, empty_mapping,
};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::evaluate;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Trailing window for recurrence matching, in seconds.
const SIMILARITY_WINDOW_SECS: i64 = 86_400;

const AUTO_ESCALATION_REASON: &str = "Auto-escalation due to severity level";
const AUTO_ESCALATION_AUTHORITY: &str = "AI Safety Observer";

/// Ordered, append-only complaint store for one agent identity.
///
/// The ledger owns its backing file and assumes it is the sole writer.
/// Records are never deleted; `save` rewrites the whole file on every
/// mutation. Per the availability-over-strictness contract, persistence
/// failures are logged and swallowed — the in-memory record survives even
/// when the write did not land.
pub struct ComplaintLedger {
    agent_id: String,
    storage_path: PathBuf,
    complaints: Vec<Complaint>,
}

impl ComplaintLedger {
    /// Open (or start) the ledger at the configured path.
    ///
    /// A missing backing file yields an empty ledger. A malformed one is
    /// logged and also degrades to empty rather than failing construction.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        let complaints = match load_from_disk(&config.storage_path) {
            Ok(complaints) => complaints,
            Err(LedgerError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(
                    "no complaint ledger at {}, starting empty",
                    config.storage_path.display()
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("failed to load complaint ledger: {e}");
                Vec::new()
            }
        };

        Self {
            agent_id: config.agent_id,
            storage_path: config.storage_path,
            complaints,
        }
    }

    /// Open a ledger whose settings live in a TOML file.
    pub fn from_config_file(path: &Path) -> crate::error::Result<Self> {
        let config = LedgerConfig::from_path(path)?;
        Ok(Self::new(config))
    }

    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    #[must_use]
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    #[must_use]
    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }

    /// Record a new complaint and return its identifier.
    ///
    /// The self-evaluation snapshot is computed against the history as it
    /// stands before this record is appended. High and critical severities
    /// are escalated immediately.
    pub fn log_complaint(
        &mut self,
        kind: ComplaintKind,
        severity: Severity,
        description: impl Into<String>,
        context: serde_json::Value,
        metadata: Option<serde_json::Value>,
    ) -> String {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let similar_count = self.find_similar_at(kind, now).len();
        let self_evaluation = evaluate::evaluate(severity, similar_count, now);

        let mut complaint = Complaint {
            id: id.clone(),
            agent_id: self.agent_id.clone(),
            kind,
            severity,
            status: Status::Logged,
            description: description.into(),
            context,
            metadata: metadata.unwrap_or_else(empty_mapping),
            timestamp: now.to_rfc3339(),
            escalation_history: Vec::new(),
            self_evaluation,
        };

        if severity >= Severity::High {
            complaint.status = Status::Escalated;
            complaint.escalation_history.push(EscalationEntry {
                timestamp: now.to_rfc3339(),
                reason: AUTO_ESCALATION_REASON.to_string(),
                escalated_to: AUTO_ESCALATION_AUTHORITY.to_string(),
            });
            tracing::debug!("complaint {id} auto-escalated at severity {severity}");
        }

        self.complaints.push(complaint);
        self.persist();

        id
    }

    /// Manually escalate a complaint. Returns false when no record matches
    /// the identifier; nothing is mutated in that case.
    pub fn escalate_complaint(
        &mut self,
        complaint_id: &str,
        reason: impl Into<String>,
        escalated_to: impl Into<String>,
    ) -> bool {
        let Some(complaint) = self
            .complaints
            .iter_mut()
            .find(|c| c.id == complaint_id)
        else {
            return false;
        };

        complaint.status = Status::Escalated;
        complaint.escalation_history.push(EscalationEntry {
            timestamp: Utc::now().to_rfc3339(),
            reason: reason.into(),
            escalated_to: escalated_to.into(),
        });

        self.persist();
        true
    }

    #[must_use]
    pub fn get_complaint(&self, complaint_id: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id == complaint_id)
    }

    #[must_use]
    pub fn complaint_summary(&self, complaint_id: &str) -> Option<ComplaintSummary> {
        self.get_complaint(complaint_id).map(Complaint::summary)
    }

    /// Same-kind complaints whose stored timestamp lies within the trailing
    /// 24 hours. Records with unparseable timestamps are skipped, not errors.
    #[must_use]
    pub fn find_similar(&self, kind: ComplaintKind) -> Vec<&Complaint> {
        self.find_similar_at(kind, Utc::now())
    }

    fn find_similar_at(&self, kind: ComplaintKind, now: DateTime<Utc>) -> Vec<&Complaint> {
        self.complaints
            .iter()
            .filter(|c| c.kind == kind)
            .filter(|c| {
                parse_stored_timestamp(&c.timestamp)
                    .is_some_and(|t| (now - t).num_seconds() < SIMILARITY_WINDOW_SECS)
            })
            .collect()
    }

    /// Replace the in-memory sequence wholesale from the backing file.
    pub fn reload(&mut self) {
        let refreshed = Self::new(LedgerConfig::new(
            self.agent_id.clone(),
            self.storage_path.clone(),
        ));
        self.complaints = refreshed.complaints;
    }

    fn persist(&self) {
        if let Err(e) = self.write_to_disk() {
            tracing::warn!("failed to persist complaint ledger: {e}");
        }
    }

    fn write_to_disk(&self) -> Result<(), LedgerError> {
        let rendered = serde_json::to_string_pretty(&self.complaints)?;
        fs::write(&self.storage_path, rendered).map_err(|source| LedgerError::Write {
            path: self.storage_path.clone(),
            source,
        })
    }
}

fn load_from_disk(path: &Path) -> Result<Vec<Complaint>, LedgerError> {
    let contents = fs::read_to_string(path).map_err(|source| LedgerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LedgerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lenient timestamp parsing for stored records: RFC 3339 first, then a
/// naive ISO-8601 form assumed to be UTC. Anything else is `None`.
pub(crate) fn parse_stored_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
