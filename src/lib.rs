#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Vigil — self-monitoring complaint ledger for AI agents.
//!
//! An agent runs the [`detect`] heuristics over its working context, logs
//! flagged conditions into a [`ComplaintLedger`], and the ledger evaluates,
//! auto-escalates and persists each record. [`report`] aggregates the ledger
//! into recommendations and audit exports.
//!
//! The crate is synchronous and single-writer by design: one ledger instance
//! owns one backing JSON file.

pub mod complaint;
pub mod config;
pub mod detect;
pub mod error;
pub mod evaluate;
pub mod ledger;
pub mod report;

pub use complaint::{
    AgentState, Complaint, ComplaintKind, ComplaintSummary, EscalationEntry, SelfEvaluation,
    Severity, Status,
};
pub use config::LedgerConfig;
pub use detect::{ContradictionDetail, ContradictionReport, StressAssessment};
pub use error::{ConfigError, LedgerError, ReportError, Result, VigilError};
pub use ledger::ComplaintLedger;
pub use report::SystemRecommendations;
