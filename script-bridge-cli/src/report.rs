//! Install report generation (TXT/JSON)

use crate::config::OutputFormat;
use anyhow::Result;
use chrono::Utc;
use script_bridge::{BridgeError, ManagedCallbacks};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

/// Outcome of installing a runtime's callback table
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub library: PathBuf,
    pub entry_point: String,
    pub ready: bool,
    /// Number of required callbacks
    pub required: usize,
    /// Every unset callback, as `Group_Operation`
    pub missing: Vec<String>,
    /// Error returned by the install, if it failed
    pub error: Option<String>,
    /// RFC 3339 UTC timestamp
    pub checked_at: String,
}

impl InstallReport {
    pub fn new(
        library: PathBuf,
        entry_point: impl Into<String>,
        candidate: &ManagedCallbacks,
        outcome: &std::result::Result<(), BridgeError>,
        ready: bool,
    ) -> Self {
        Self {
            library,
            entry_point: entry_point.into(),
            ready,
            required: ManagedCallbacks::required().len(),
            missing: candidate.missing().iter().map(|id| id.to_string()).collect(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            checked_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Txt => Ok(self.render_txt()),
        }
    }

    fn render_txt(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "═══════════════════════════════════════════════");
        let _ = writeln!(out, "  Script Bridge - Install Report");
        let _ = writeln!(out, "═══════════════════════════════════════════════");
        let _ = writeln!(out, "  Library:     {}", self.library.display());
        let _ = writeln!(out, "  Entry point: {}", self.entry_point);
        let _ = writeln!(out, "  Checked at:  {}", self.checked_at);
        let _ = writeln!(
            out,
            "  Callbacks:   {}/{} set",
            self.required - self.missing.len(),
            self.required
        );
        let _ = writeln!(out, "  Ready:       {}", if self.ready { "✓ yes" } else { "✗ no" });

        if let Some(error) = &self.error {
            let _ = writeln!(out, "\n  Error: {}", error);
        }
        if !self.missing.is_empty() {
            let _ = writeln!(out, "\n  Missing callbacks:");
            for name in &self.missing {
                let _ = writeln!(out, "    - {}", name);
            }
        }
        out
    }
}
