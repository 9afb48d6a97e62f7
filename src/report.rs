//! Check Reporting
//!
//! The diagnostic passes audit exhaustively: every check is recorded, pass
//! or fail, and the whole report decides the exit code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckItem {
    pub id: String,
    pub description: String,
    pub passed: bool,
}

impl CheckItem {
    pub fn new(id: impl Into<String>, description: impl Into<String>, passed: bool) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            passed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub title: String,
    pub checks: Vec<CheckItem>,
}

impl CheckReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            checks: Vec::new(),
        }
    }

    pub fn record(&mut self, id: impl Into<String>, description: impl Into<String>, passed: bool) {
        self.checks.push(CheckItem::new(id, description, passed));
    }

    pub fn extend(&mut self, items: Vec<CheckItem>) {
        self.checks.extend(items);
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckItem> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Console rendering: one line per check, then a one-line verdict.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&self.title);
        out.push_str("\n\n");
        for check in &self.checks {
            let mark = if check.passed { "ok  " } else { "FAIL" };
            out.push_str(&format!("  {mark} {}: {}\n", check.id, check.description));
        }
        let failed = self.failure_count();
        if failed > 0 {
            out.push_str(&format!("\n{failed} check(s) failed out of {}.\n", self.checks.len()));
        } else {
            out.push_str(&format!("\nAll {} checks passed.\n", self.checks.len()));
        }
        out
    }
}
