//! Runs a catalog of toggles and reports per-entry outcomes.

use crate::context::Context;
use crate::error::HardenError;
use crate::item::Hardening;
use crate::mode::Mode;
use serde::Serialize;
use tracing::{info, info_span, warn};

/// Which catalog entries a run touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    /// Entries marked harden-by-default.
    Defaults,
    /// Entries by name, matched case-insensitively.
    Named(Vec<String>),
}

/// Current state of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub name: String,
    pub long_name: String,
    pub description: String,
    pub harden_by_default: bool,
    pub hardened: bool,
}

/// Result of one entry within a run.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub result: Result<(), HardenError>,
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every outcome of a run, in the order the entries were processed.
#[derive(Debug)]
pub struct Report {
    mode: Mode,
    outcomes: Vec<Outcome>,
}

impl Report {
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Serializable view with errors rendered as text.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let entries: Vec<OutcomeView> = self
            .outcomes
            .iter()
            .map(|o| OutcomeView {
                name: o.name.clone(),
                ok: o.is_success(),
                error: o.result.as_ref().err().map(ToString::to_string),
            })
            .collect();
        let failed = entries.iter().filter(|e| !e.ok).count();
        ReportSummary { mode: self.mode, succeeded: entries.len() - failed, failed, entries }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub mode: Mode,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<OutcomeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeView {
    pub name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Processes catalog entries strictly one after another; a failing entry never stops the batch.
#[derive(Debug, Default)]
pub struct Orchestrator {
    catalog: Vec<Box<dyn Hardening>>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(catalog: Vec<Box<dyn Hardening>>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &[Box<dyn Hardening>] {
        &self.catalog
    }

    /// Looks an entry up by name, case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn Hardening> {
        self.catalog.iter().map(|entry| &**entry).find(|entry| same_name(entry.name(), name))
    }

    /// Queries every entry, in catalog order.
    #[must_use]
    pub fn status(&self, ctx: &Context<'_>) -> Vec<Status> {
        self.catalog
            .iter()
            .map(|entry| Status {
                name: entry.name().to_owned(),
                long_name: entry.long_name().to_owned(),
                description: entry.description().to_owned(),
                harden_by_default: entry.harden_by_default(),
                hardened: entry.is_hardened(ctx),
            })
            .collect()
    }

    /// Applies or restores the selected entries.
    ///
    /// Selected entries run in catalog order; names that match no entry are reported
    /// afterwards as [`HardenError::UnknownEntry`] outcomes.
    pub fn run(&self, ctx: &Context<'_>, mode: Mode, selection: &Selection) -> Report {
        let mut outcomes: Vec<Outcome> = self
            .catalog
            .iter()
            .map(|entry| &**entry)
            .filter(|entry| is_selected(*entry, selection))
            .map(|entry| run_entry(ctx, entry, mode))
            .collect();

        if let Selection::Named(names) = selection {
            outcomes.extend(names.iter().filter(|name| self.find(name).is_none()).map(|name| {
                warn!(entry = %name, "Unknown entry requested");
                Outcome {
                    name: name.clone(),
                    result: Err(HardenError::UnknownEntry {
                        message: name.clone().into(),
                        context: None,
                    }),
                }
            }));
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(%mode, total = outcomes.len(), failed, "Run finished");
        Report { mode, outcomes }
    }
}

fn run_entry(ctx: &Context<'_>, entry: &dyn Hardening, mode: Mode) -> Outcome {
    let span = info_span!("entry", entry = %entry.name(), %mode);
    let _enter = span.enter();

    let result = entry.harden(ctx, mode.enable());
    match &result {
        Ok(()) => info!("Entry done"),
        Err(err) => warn!(error = %err, "Entry failed"),
    }
    Outcome { name: entry.name().to_owned(), result }
}

fn is_selected(entry: &dyn Hardening, selection: &Selection) -> bool {
    match selection {
        Selection::All => true,
        Selection::Defaults => entry.harden_by_default(),
        Selection::Named(names) => names.iter().any(|name| same_name(entry.name(), name)),
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
