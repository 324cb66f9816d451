use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `vigil`.
///
/// The public ledger operations deliberately swallow I/O failures (logging a
/// diagnostic and degrading) — these types cover the fallible seams that do
/// propagate: config loading and the internal persistence helpers. Internal
/// code continues to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum VigilError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Ledger persistence ──────────────────────────────────────────────
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    // ── Reporting / export ──────────────────────────────────────────────
    #[error("report: {0}")]
    Report(#[from] ReportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
}

// ─── Ledger persistence errors ──────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse ledger {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─── Reporting errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render audit report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write audit report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, VigilError>;
