//! Input model: the typed, read-only description of a planning run.
//!
//! `PlanInput` is built once (by the loader) and handed to the engine by
//! reference. Nothing in this module mutates after construction.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InputError};

/// Effort/theory/practice indicator attached to an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    None,
    Low,
    Medium,
    High,
}

impl Level {
    /// THEORY[level] multiplier (see workload derivation).
    pub fn theory_multiplier(self) -> f64 {
        match self {
            Level::None => 0.0,
            Level::Low => 1.0,
            Level::Medium => 2.0,
            Level::High => 3.0,
        }
    }

    /// PRACTICE[level] multiplier.
    pub fn practice_multiplier(self) -> f64 {
        match self {
            Level::None => 0.0,
            Level::Low => 1.0,
            Level::Medium => 1.5,
            Level::High => 2.0,
        }
    }

    /// EFFORT[level] multiplier.
    pub fn effort_multiplier(self) -> f64 {
        match self {
            Level::None => 1.0,
            Level::Low => 1.0,
            Level::Medium => 1.2,
            Level::High => 1.5,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::None
    }
}

/// A single exam sitting for one subject/paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub subject: String,
    pub paper: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub effort_level: Level,
    #[serde(default)]
    pub theory_level: Level,
    #[serde(default)]
    pub practice_level: Level,
    /// `None` means the field was absent (defaults to one mandatory past
    /// paper); `Some(0)` means the author explicitly asked for none. The
    /// distinction is structural, not a magic-number convention.
    #[serde(default)]
    pub past_papers_required: Option<u32>,
    /// Explicit preparation-hours override, rounded up to the nearest
    /// 45-minute multiple when present.
    #[serde(default)]
    pub hours: Option<f64>,
}

impl Exam {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }

    pub fn starts_before_noon(&self) -> bool {
        self.start.time() < NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }
}

/// A subject groups trial and final exams plus cosmetic metadata that the
/// scheduler itself ignores but a future renderer may want.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    #[serde(default)]
    pub trial_exams: Vec<Exam>,
    #[serde(default)]
    pub final_exams: Vec<Exam>,
}

impl Subject {
    pub fn all_exams(&self) -> impl Iterator<Item = &Exam> {
        self.trial_exams.iter().chain(self.final_exams.iter())
    }
}

/// A fixed tuition/class block that occupies time on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuitionBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// The display names carried through from the input's `exams` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamLabels {
    pub trial_display_name: String,
    pub final_display_name: String,
}

/// Planner-wide configuration and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub year: i32,
    pub planner_start: NaiveDate,
    pub planner_end: NaiveDate,
    #[serde(default = "default_daily_start")]
    pub daily_start: NaiveTime,
    #[serde(default = "default_daily_end")]
    pub daily_end: NaiveTime,
    #[serde(default)]
    pub study_time_per_day: Option<f64>,
    #[serde(default = "default_per_day_max_hours")]
    pub per_day_max_hours: f64,
    #[serde(default = "default_true")]
    pub adhd_frontload: bool,
    #[serde(default)]
    pub weekend_extra_hours: f64,
    #[serde(default)]
    pub free_day_extra_hours: f64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: i64,
    #[serde(default = "default_subject_cap")]
    pub per_subject_daily_cap_hours: f64,
    #[serde(default = "default_day_before_default")]
    pub day_before_sessions_default: u32,
    #[serde(default = "default_day_before_high")]
    pub day_before_sessions_high_effort: u32,
    #[serde(default)]
    pub tuition_classes: Vec<TuitionBlock>,
}

fn default_daily_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}
fn default_daily_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 0, 0).unwrap()
}
fn default_per_day_max_hours() -> f64 {
    4.0
}
fn default_true() -> bool {
    true
}
fn default_break_minutes() -> i64 {
    15
}
fn default_subject_cap() -> f64 {
    3.0
}
fn default_day_before_default() -> u32 {
    2
}
fn default_day_before_high() -> u32 {
    4
}

impl Metadata {
    /// "Use `study_time_per_day` if present, else `per_day_max_hours`."
    pub fn effective_day_cap_hours(&self) -> f64 {
        self.study_time_per_day.unwrap_or(self.per_day_max_hours)
    }

    /// Checks the invariants in the data model table: the daily window must
    /// be non-inverted within the hard 09:00-23:00 bound, capacities must be
    /// non-negative, and the planner window must not be inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_start >= self.daily_end {
            return Err(ConfigError::InvertedDailyWindow {
                start: self.daily_start.to_string(),
                end: self.daily_end.to_string(),
            });
        }
        if self.per_day_max_hours < 0.0 {
            return Err(ConfigError::NegativeCapacity {
                field: "per_day_max_hours".into(),
                value: self.per_day_max_hours,
            });
        }
        if self.per_subject_daily_cap_hours < 0.0 {
            return Err(ConfigError::NegativeCapacity {
                field: "per_subject_daily_cap_hours".into(),
                value: self.per_subject_daily_cap_hours,
            });
        }
        if let Some(study_time) = self.study_time_per_day {
            if study_time < 0.0 {
                return Err(ConfigError::NegativeCapacity {
                    field: "study_time_per_day".into(),
                    value: study_time,
                });
            }
        }
        if self.planner_start > self.planner_end {
            return Err(ConfigError::InvertedPlannerWindow {
                start: self.planner_start.to_string(),
                end: self.planner_end.to_string(),
            });
        }
        Ok(())
    }
}

/// The fully-loaded, read-only description of a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub metadata: Metadata,
    pub labels: ExamLabels,
    pub subjects: Vec<Subject>,
}

impl PlanInput {
    /// All exams across all subjects, in no particular order.
    pub fn all_exams(&self) -> impl Iterator<Item = (&Subject, &Exam)> {
        self.subjects
            .iter()
            .flat_map(|s| s.all_exams().map(move |e| (s, e)))
    }

    /// Checks every exam's interval is non-inverted and falls within the
    /// planner window, per the data model table.
    pub fn validate(&self) -> Result<(), InputError> {
        self.metadata
            .validate()
            .map_err(|e| InputError::Malformed {
                path: std::path::PathBuf::new(),
                message: e.to_string(),
            })?;
        for (_, exam) in self.all_exams() {
            if exam.end <= exam.start {
                return Err(InputError::InvertedInterval {
                    subject: exam.subject.clone(),
                    paper: exam.paper.clone(),
                    start: exam.start.to_string(),
                    end: exam.end.to_string(),
                });
            }
            if exam.date() < self.metadata.planner_start || exam.date() > self.metadata.planner_end
            {
                return Err(InputError::DateOutOfRange {
                    subject: exam.subject.clone(),
                    paper: exam.paper.clone(),
                    date: exam.date().to_string(),
                    planner_start: self.metadata.planner_start.to_string(),
                    planner_end: self.metadata.planner_end.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_multipliers_match_table() {
        assert_eq!(Level::Medium.theory_multiplier(), 2.0);
        assert_eq!(Level::High.practice_multiplier(), 2.0);
        assert_eq!(Level::Medium.effort_multiplier(), 1.2);
        assert_eq!(Level::None.effort_multiplier(), 1.0);
    }

    #[test]
    fn effective_day_cap_prefers_study_time_per_day() {
        let mut meta = sample_metadata();
        meta.per_day_max_hours = 4.0;
        meta.study_time_per_day = Some(6.0);
        assert_eq!(meta.effective_day_cap_hours(), 6.0);

        meta.study_time_per_day = None;
        assert_eq!(meta.effective_day_cap_hours(), 4.0);
    }

    #[test]
    fn validate_rejects_inverted_daily_window() {
        let mut meta = sample_metadata();
        meta.daily_start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        meta.daily_end = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(meta.validate().is_err());
    }

    #[test]
    fn validate_accepts_default_metadata() {
        assert!(sample_metadata().validate().is_ok());
    }

    fn sample_metadata() -> Metadata {
        Metadata {
            title: "Test".into(),
            year: 2025,
            planner_start: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            planner_end: NaiveDate::from_ymd_opt(2025, 10, 10).unwrap(),
            daily_start: default_daily_start(),
            daily_end: default_daily_end(),
            study_time_per_day: None,
            per_day_max_hours: default_per_day_max_hours(),
            adhd_frontload: true,
            weekend_extra_hours: 0.0,
            free_day_extra_hours: 0.0,
            break_minutes: default_break_minutes(),
            per_subject_daily_cap_hours: default_subject_cap(),
            day_before_sessions_default: default_day_before_default(),
            day_before_sessions_high_effort: default_day_before_high(),
            tuition_classes: Vec::new(),
        }
    }
}
