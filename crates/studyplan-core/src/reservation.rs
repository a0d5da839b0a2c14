//! Day-before priority reservation.
//!
//! A second scheduling pass that runs before forward placement: it
//! reserves a minimum number of sessions on the eve of each exam (falling
//! back to two days before when the eve can't fit them all), bypassing the
//! day and per-subject capacity ledgers entirely. The reserved sessions are
//! drawn only from the exam's non-past-paper tasks (Preparation/Theory/
//! Practice) — past papers are left for forward placement.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::freeintervals::{free_slots, ordered_for_placement};
use crate::item::Item;
use crate::model::{Exam, Metadata};
use crate::occupancy::{clamp_day_window, Interval, OccupancyKind, OccupancyMap};
use crate::task::Task;

const SESSION_MIN_MINUTES: i64 = crate::placer::SESSION_MIN_MINUTES;
const SESSION_MAX_MINUTES: i64 = crate::placer::SESSION_MAX_MINUTES;
const BREAK_MINUTES: i64 = crate::placer::BREAK_MINUTES;

fn required_sessions(exam: &Exam, metadata: &Metadata) -> u32 {
    if exam.effort_level.is_high() {
        metadata.day_before_sessions_high_effort
    } else {
        metadata.day_before_sessions_default
    }
}

/// Reserve `required_sessions(exam)` sessions on `exam.date() - 1`, falling
/// back to `exam.date() - 2` for any that don't fit. Mutates `occupancy`
/// and `tasks` (consuming hours from whichever non-past-paper task is
/// reserved into) and appends the placed sessions/breaks to `items`.
pub fn reserve_day_before(
    exam: &Exam,
    tasks: &mut [Task],
    occupancy: &mut OccupancyMap,
    items: &mut Vec<Item>,
    metadata: &Metadata,
) {
    let required = required_sessions(exam, metadata);
    if required == 0 {
        return;
    }

    let mut placed = 0u32;
    for days_before in [1i64, 2i64] {
        if placed >= required {
            break;
        }
        let day = exam.date() - Duration::days(days_before);
        if day < metadata.planner_start {
            continue;
        }

        let (window_start, window_end) = clamp_day_window(day, metadata.daily_start, metadata.daily_end);
        while placed < required {
            let Some(task) = tasks.iter_mut().find(|t| !t.kind.is_past_paper() && !t.is_done()) else {
                return;
            };

            let free = ordered_for_placement(
                free_slots(window_start, window_end, &occupancy.for_date(day)),
                metadata.adhd_frontload,
            );
            let Some(slot) = free.into_iter().next() else {
                break;
            };

            let task_remaining = task.remaining_minutes();
            let session_len = SESSION_MAX_MINUTES.min(slot.duration_minutes()).min(task_remaining);
            let is_final_tail = session_len == task_remaining;
            if session_len <= 0 || (session_len < SESSION_MIN_MINUTES && !is_final_tail) {
                break;
            }

            let start = slot.start;
            let end = start + Duration::minutes(session_len);
            items.push(Item::new(task.subject.clone(), task.paper.clone(), task.label.clone(), start, end));
            occupancy.push(day, Interval { start, end, kind: OccupancyKind::Placed });
            task.hours -= session_len as f64 / 60.0;
            if task.hours < 0.0 {
                task.hours = 0.0;
            }

            append_reservation_break(occupancy, items, day, task, end, window_end);
            placed += 1;
        }
    }
}

fn append_reservation_break(
    occupancy: &mut OccupancyMap,
    items: &mut Vec<Item>,
    day: NaiveDate,
    task: &Task,
    start: NaiveDateTime,
    window_end: NaiveDateTime,
) {
    let available = (window_end - start).num_minutes().max(0);
    let minutes = BREAK_MINUTES.min(available);
    if minutes <= 0 {
        return;
    }
    let end = start + Duration::minutes(minutes);
    items.push(Item::new(task.subject.clone(), task.paper.clone(), "Break: 15m".to_string(), start, end));
    occupancy.push(day, Interval { start, end, kind: OccupancyKind::Placed });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;
    use crate::task::TaskKind;

    fn exam(effort: Level, day: NaiveDate) -> Exam {
        Exam {
            subject: "Physics".into(),
            paper: "P1".into(),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            end: day.and_hms_opt(12, 0, 0).unwrap(),
            effort_level: effort,
            theory_level: Level::Medium,
            practice_level: Level::Medium,
            past_papers_required: Some(0),
            hours: None,
        }
    }

    fn metadata(planner_start: NaiveDate, exam_day: NaiveDate) -> Metadata {
        Metadata {
            title: "Test".into(),
            year: 2025,
            planner_start,
            planner_end: exam_day,
            daily_start: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            daily_end: chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            study_time_per_day: None,
            per_day_max_hours: 4.0,
            adhd_frontload: true,
            weekend_extra_hours: 0.0,
            free_day_extra_hours: 0.0,
            break_minutes: 15,
            per_subject_daily_cap_hours: 3.0,
            day_before_sessions_default: 2,
            day_before_sessions_high_effort: 4,
            tuition_classes: Vec::new(),
        }
    }

    #[test]
    fn reserves_default_count_on_eve() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let e = exam(Level::Medium, day);
        let meta = metadata(day - Duration::days(10), day);
        let mut tasks = vec![Task {
            subject: "Physics".into(),
            paper: "P1".into(),
            kind: TaskKind::Theory,
            label: "Theory Study".into(),
            hours: 10.0,
            mandatory: false,
        }];
        let mut occupancy = OccupancyMap::new();
        let mut items = Vec::new();

        reserve_day_before(&e, &mut tasks, &mut occupancy, &mut items, &meta);

        let sessions = items.iter().filter(|i| !i.is_break()).count();
        assert_eq!(sessions, 2);
    }

    #[test]
    fn high_effort_reserves_more_sessions() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let e = exam(Level::High, day);
        let meta = metadata(day - Duration::days(10), day);
        let mut tasks = vec![Task {
            subject: "Physics".into(),
            paper: "P1".into(),
            kind: TaskKind::Theory,
            label: "Theory Study".into(),
            hours: 10.0,
            mandatory: false,
        }];
        let mut occupancy = OccupancyMap::new();
        let mut items = Vec::new();

        reserve_day_before(&e, &mut tasks, &mut occupancy, &mut items, &meta);

        let sessions = items.iter().filter(|i| !i.is_break()).count();
        assert_eq!(sessions, 4);
    }

    #[test]
    fn reservation_ignores_past_paper_tasks() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let e = exam(Level::Medium, day);
        let meta = metadata(day - Duration::days(10), day);
        let mut tasks = vec![Task {
            subject: "Physics".into(),
            paper: "P1".into(),
            kind: TaskKind::PastPaperNonWritten,
            label: "Past Paper 1 (non-written)".into(),
            hours: 2.0,
            mandatory: true,
        }];
        let mut occupancy = OccupancyMap::new();
        let mut items = Vec::new();

        reserve_day_before(&e, &mut tasks, &mut occupancy, &mut items, &meta);

        assert!(items.is_empty());
        assert_eq!(tasks[0].hours, 2.0);
    }
}
