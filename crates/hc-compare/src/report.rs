//! Comparison reporting — aggregates diagnostics into a summary status,
//! a process exit code, and human-readable and machine-readable reports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::diff::{Diagnostic, MismatchKind, Severity};

/// Overall outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Match,
    Mismatch(MismatchKind),
}

impl Status {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Status::Match => 0,
            Status::Mismatch(kind) => kind.exit_code(),
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Status::Match => write!(f, "OK"),
            Status::Mismatch(kind) => write!(f, "{:?}", kind),
        }
    }
}

/// How a list of diagnostics collapses into one status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SummaryPolicy {
    /// The kind of the last diagnostic in scan order.
    #[default]
    Last,
    /// The kind with the highest severity; the later one wins a tie.
    MostSevere,
}

/// Result of comparing two histogram sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Description of the left side (usually its file name).
    pub lhs: String,
    /// Description of the right side.
    pub rhs: String,
    pub tolerance: f64,
    /// Number of histogram pairs compared cell by cell.
    pub histograms_compared: u64,
    /// Every discrepancy, in scan order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ComparisonReport {
    /// Create a new empty report.
    pub fn new(tolerance: f64) -> Self {
        Self {
            lhs: "lhs".into(),
            rhs: "rhs".into(),
            tolerance,
            histograms_compared: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Attach labels for the two sides.
    pub fn with_labels(mut self, lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        self.lhs = lhs.into();
        self.rhs = rhs.into();
        self
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn count_compared(&mut self) {
        self.histograms_compared += 1;
    }

    /// True if no discrepancy was found.
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: MismatchKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Number of diagnostics of one severity.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == severity)
            .count()
    }

    /// Status of the last diagnostic recorded.
    pub fn last_status(&self) -> Status {
        match self.diagnostics.last() {
            Some(d) => Status::Mismatch(d.kind),
            None => Status::Match,
        }
    }

    /// Status of the most severe diagnostic.
    pub fn most_severe_status(&self) -> Status {
        // max_by_key keeps the last of equal maxima
        match self.diagnostics.iter().max_by_key(|d| d.severity()) {
            Some(d) => Status::Mismatch(d.kind),
            None => Status::Match,
        }
    }

    pub fn status(&self, policy: SummaryPolicy) -> Status {
        match policy {
            SummaryPolicy::Last => self.last_status(),
            SummaryPolicy::MostSevere => self.most_severe_status(),
        }
    }

    pub fn exit_code(&self, policy: SummaryPolicy) -> i32 {
        self.status(policy).exit_code()
    }

    /// Print one line per diagnostic to stdout.
    pub fn print_diagnostics(&self) {
        for d in &self.diagnostics {
            println!("{}", d);
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self, policy: SummaryPolicy) {
        println!("\n============================================================");
        println!("Comparison: {} vs {}", self.lhs, self.rhs);
        println!(
            "Tolerance: {:e}, histograms compared: {}",
            self.tolerance, self.histograms_compared
        );
        println!(
            "Result: {} ({}, exit code {})",
            if self.passed() { "PASS" } else { "FAIL" },
            self.status(policy),
            self.exit_code(policy)
        );
        println!(
            "Diffs: {} critical, {} major, {} minor",
            self.count_severity(Severity::Critical),
            self.count_severity(Severity::Major),
            self.count_severity(Severity::Minor)
        );
        println!("============================================================\n");
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
