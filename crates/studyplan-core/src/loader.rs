//! JSON input loader.
//!
//! Deserializes the external document shape (a `subjects` map keyed by
//! subject name, each with nested `exam_types.trial`/`exam_types.final`
//! exam lists) into the flat, typed [`PlanInput`] the engine consumes.
//! Grounded on the teacher's `storage::Config` load pattern and the
//! original distillation's `load_exam_data`/`build_runtime_structures`
//! shape.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{InputError, PlannerError};
use crate::model::{Exam, ExamLabels, Level, Metadata, PlanInput, Subject, TuitionBlock};

/// The raw document shape as it appears on disk.
#[derive(Debug, Deserialize)]
struct Document {
    metadata: RawMetadata,
    #[serde(default)]
    exams: RawExamLabels,
    #[serde(default)]
    subjects: BTreeMap<String, RawSubject>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    title: String,
    year: i32,
    planner_start_date: chrono::NaiveDate,
    planner_end_date: chrono::NaiveDate,
    #[serde(default)]
    daily_start_time: Option<chrono::NaiveTime>,
    #[serde(default)]
    daily_end_time: Option<chrono::NaiveTime>,
    #[serde(default)]
    study_time_per_day: Option<f64>,
    #[serde(default)]
    per_day_max_hours: Option<f64>,
    #[serde(default)]
    adhd_frontload: Option<bool>,
    #[serde(default)]
    weekend_extra_hours: Option<f64>,
    #[serde(default)]
    free_day_extra_hours: Option<f64>,
    #[serde(default)]
    break_minutes: Option<i64>,
    #[serde(default)]
    per_subject_daily_cap_hours: Option<f64>,
    #[serde(default)]
    day_before_sessions_default: Option<u32>,
    #[serde(default)]
    day_before_sessions_high_effort: Option<u32>,
    #[serde(default)]
    tuition_classes: Vec<RawTuitionBlock>,
}

#[derive(Debug, Deserialize)]
struct RawTuitionBlock {
    start_datetime: chrono::NaiveDateTime,
    end_datetime: chrono::NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
struct RawExamLabels {
    #[serde(default)]
    trial: RawExamLabel,
    #[serde(default)]
    r#final: RawExamLabel,
}

#[derive(Debug, Default, Deserialize)]
struct RawExamLabel {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    color: Option<[f32; 3]>,
    #[serde(default)]
    exam_types: RawExamTypes,
}

#[derive(Debug, Default, Deserialize)]
struct RawExamTypes {
    #[serde(default)]
    trial: RawExamGroup,
    #[serde(default)]
    r#final: RawExamGroup,
}

#[derive(Debug, Default, Deserialize)]
struct RawExamGroup {
    #[serde(default)]
    exams: Vec<RawExam>,
}

#[derive(Debug, Deserialize)]
struct RawExam {
    #[serde(default)]
    paper: String,
    start_datetime: chrono::NaiveDateTime,
    end_datetime: chrono::NaiveDateTime,
    #[serde(default)]
    effort_level: Option<Level>,
    #[serde(default)]
    theory_level: Option<Level>,
    #[serde(default)]
    practice_level: Option<Level>,
    #[serde(default)]
    past_papers_required: Option<u32>,
    #[serde(default)]
    hours: Option<f64>,
}

fn default_daily_start() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}
fn default_daily_end() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap()
}

/// Load a `PlanInput` from a JSON file at `path`.
pub fn load_from_path(path: &Path) -> Result<PlanInput, PlannerError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PlannerError::Input(InputError::FileNotFound { path: path.to_path_buf() })
        } else {
            PlannerError::Io(source)
        }
    })?;
    load_from_str(&contents, path)
}

/// Load a `PlanInput` from an in-memory JSON string. `path` is only used to
/// label errors.
pub fn load_from_str(contents: &str, path: &Path) -> Result<PlanInput, PlannerError> {
    let document: Document = serde_json::from_str(contents).map_err(|source| {
        PlannerError::Input(InputError::Malformed {
            path: path.to_path_buf(),
            message: source.to_string(),
        })
    })?;

    let input = to_plan_input(document);
    input.validate().map_err(|e| {
        if let InputError::Malformed { message, .. } = e {
            PlannerError::Input(InputError::Malformed { path: path.to_path_buf(), message })
        } else {
            PlannerError::Input(e)
        }
    })?;
    Ok(input)
}

fn to_plan_input(document: Document) -> PlanInput {
    let metadata = Metadata {
        title: document.metadata.title,
        year: document.metadata.year,
        planner_start: document.metadata.planner_start_date,
        planner_end: document.metadata.planner_end_date,
        daily_start: document.metadata.daily_start_time.unwrap_or_else(default_daily_start),
        daily_end: document.metadata.daily_end_time.unwrap_or_else(default_daily_end),
        study_time_per_day: document.metadata.study_time_per_day,
        per_day_max_hours: document.metadata.per_day_max_hours.unwrap_or(4.0),
        adhd_frontload: document.metadata.adhd_frontload.unwrap_or(true),
        weekend_extra_hours: document.metadata.weekend_extra_hours.unwrap_or(0.0),
        free_day_extra_hours: document.metadata.free_day_extra_hours.unwrap_or(0.0),
        break_minutes: document.metadata.break_minutes.unwrap_or(15),
        per_subject_daily_cap_hours: document.metadata.per_subject_daily_cap_hours.unwrap_or(3.0),
        day_before_sessions_default: document.metadata.day_before_sessions_default.unwrap_or(2),
        day_before_sessions_high_effort: document.metadata.day_before_sessions_high_effort.unwrap_or(4),
        tuition_classes: document
            .metadata
            .tuition_classes
            .into_iter()
            .map(|t| TuitionBlock { start: t.start_datetime, end: t.end_datetime })
            .collect(),
    };

    let labels = ExamLabels {
        trial_display_name: document.exams.trial.display_name,
        final_display_name: document.exams.r#final.display_name,
    };

    let subjects = document
        .subjects
        .into_iter()
        .map(|(name, raw)| Subject {
            name: name.clone(),
            abbreviation: raw.abbreviation,
            emoji: raw.emoji,
            color: raw.color,
            trial_exams: raw
                .exam_types
                .trial
                .exams
                .into_iter()
                .map(|e| to_exam(&name, e))
                .collect(),
            final_exams: raw
                .exam_types
                .r#final
                .exams
                .into_iter()
                .map(|e| to_exam(&name, e))
                .collect(),
        })
        .collect();

    PlanInput { metadata, labels, subjects }
}

fn to_exam(subject_name: &str, raw: RawExam) -> Exam {
    Exam {
        subject: subject_name.to_string(),
        paper: raw.paper,
        start: raw.start_datetime,
        end: raw.end_datetime,
        effort_level: raw.effort_level.unwrap_or(Level::None),
        theory_level: raw.theory_level.unwrap_or(Level::None),
        practice_level: raw.practice_level.unwrap_or(Level::None),
        past_papers_required: raw.past_papers_required,
        hours: raw.hours,
    }
}
