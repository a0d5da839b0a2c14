//! The placed-session output type and the plan that wraps it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single placed interval in the final plan: either a study session or a
/// break. Breaks are distinguished by label prefix rather than a separate
/// type, matching the distillation's single flat item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub subject: String,
    pub paper: String,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Item {
    pub fn new(subject: String, paper: String, label: String, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { subject, paper, label, start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn is_break(&self) -> bool {
        self.label.starts_with("Break:")
    }

    pub fn is_past_paper(&self) -> bool {
        self.label.contains("Past Paper")
    }

    pub fn is_supper(&self) -> bool {
        self.label == "Break: Supper"
    }

    pub fn is_recovery(&self) -> bool {
        self.label == "Break: 2h recovery"
    }
}

/// The immutable output of the engine: an ordered item sequence plus any
/// warnings the verifier raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub items: Vec<Item>,
    pub warnings: Vec<String>,
}

impl Plan {
    /// Items on `date`, sorted by start time.
    pub fn items_on(&self, date: NaiveDate) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().filter(|i| i.date() == date).collect();
        items.sort_by_key(|i| i.start);
        items
    }

    /// Distinct dates carrying at least one item, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.items.iter().map(|i| i.date()).collect();
        dates.sort();
        dates.dedup();
        dates
    }
}
