//! Workload derivation: turning an `Exam` into an ordered list of `Task`s.

use serde::{Deserialize, Serialize};

use crate::model::Exam;

/// The kind of work a `Task` represents. The placer dispatches on this tag
/// to decide contiguous-block (past papers) vs. session-splitting
/// (preparation/theory/practice) placement behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    PastPaperNonWritten,
    PastPaperTimed,
    Preparation,
    Theory,
    Practice,
}

impl TaskKind {
    pub fn is_past_paper(self) -> bool {
        matches!(self, TaskKind::PastPaperNonWritten | TaskKind::PastPaperTimed)
    }

    /// Label used on the emitted `Item`, matching the distillation's type
    /// strings verbatim (the verifier greps for "Past Paper" in this text).
    pub fn label(self, past_paper_index: Option<u32>) -> String {
        match self {
            TaskKind::PastPaperNonWritten => "Past Paper 1 (non-written)".to_string(),
            TaskKind::PastPaperTimed => format!(
                "Past Paper {} (timed)",
                past_paper_index.unwrap_or(2)
            ),
            TaskKind::Preparation => "Preparation".to_string(),
            TaskKind::Theory => "Theory Study".to_string(),
            TaskKind::Practice => "Practice".to_string(),
        }
    }

    /// Post-placement downtime required after a session of this kind, in
    /// minutes. Zero for non-past-paper kinds.
    pub fn post_downtime_minutes(self) -> i64 {
        match self {
            TaskKind::PastPaperNonWritten => 45,
            TaskKind::PastPaperTimed => 90,
            _ => 0,
        }
    }
}

/// A unit of work derived from an exam, to be distributed into one or more
/// sessions by the placer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub subject: String,
    pub paper: String,
    pub kind: TaskKind,
    pub label: String,
    pub hours: f64,
    pub mandatory: bool,
}

impl Task {
    pub fn remaining_minutes(&self) -> i64 {
        (self.hours * 60.0).round() as i64
    }

    pub fn is_done(&self) -> bool {
        self.hours <= 1e-6
    }
}

/// Round `hours` up to the nearest 45-minute multiple.
fn round_up_to_45_minutes(hours: f64) -> f64 {
    let minutes = hours * 60.0;
    let blocks = (minutes / 45.0).ceil();
    blocks * 45.0 / 60.0
}

/// Derive the ordered task list for a single exam.
///
/// Past papers always precede preparation/theory/practice tasks — the
/// placer's frontloading depends on this ordering.
pub fn derive_tasks(exam: &Exam) -> Vec<Task> {
    let mut tasks = Vec::new();

    let required_past_papers = exam.past_papers_required.unwrap_or(1);

    if required_past_papers >= 1 {
        tasks.push(Task {
            subject: exam.subject.clone(),
            paper: exam.paper.clone(),
            kind: TaskKind::PastPaperNonWritten,
            label: TaskKind::PastPaperNonWritten.label(None),
            hours: 2.0,
            mandatory: true,
        });
    }

    for i in 2..=required_past_papers {
        tasks.push(Task {
            subject: exam.subject.clone(),
            paper: exam.paper.clone(),
            kind: TaskKind::PastPaperTimed,
            label: TaskKind::PastPaperTimed.label(Some(i)),
            hours: 3.0,
            mandatory: false,
        });
    }

    if let Some(hours) = exam.hours {
        let rounded = round_up_to_45_minutes(hours);
        tasks.push(Task {
            subject: exam.subject.clone(),
            paper: exam.paper.clone(),
            kind: TaskKind::Preparation,
            label: TaskKind::Preparation.label(None),
            hours: rounded,
            mandatory: false,
        });
        return tasks;
    }

    let length_hours = exam.duration_hours();
    let effort = exam.effort_level.effort_multiplier();
    let theory_hours = length_hours * exam.theory_level.theory_multiplier() * effort;
    let practice_hours = length_hours * exam.practice_level.practice_multiplier() * effort;

    if theory_hours > 0.0 {
        tasks.push(Task {
            subject: exam.subject.clone(),
            paper: exam.paper.clone(),
            kind: TaskKind::Theory,
            label: TaskKind::Theory.label(None),
            hours: theory_hours,
            mandatory: false,
        });
    }
    if practice_hours > 0.0 {
        tasks.push(Task {
            subject: exam.subject.clone(),
            paper: exam.paper.clone(),
            kind: TaskKind::Practice,
            label: TaskKind::Practice.label(None),
            hours: practice_hours,
            mandatory: false,
        });
    }

    tasks
}
