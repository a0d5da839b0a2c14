//! Greedy first-fit placer.
//!
//! This module drives the whole engine: for each exam, in ascending start
//! order, it runs day-before priority reservation and then forward
//! placement across the candidate days, consulting the occupancy map and
//! free-interval computer and writing placed sessions/breaks back into
//! both the occupancy map (so later exams and later days see them as
//! immovable) and the output item list.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::error::Result;
use crate::freeintervals::{free_slots, ordered_for_placement};
use crate::item::{Item, Plan};
use crate::model::{Metadata, PlanInput};
use crate::occupancy::{clamp_day_window, Interval, OccupancyKind, OccupancyMap, SUPPER_END, SUPPER_START};
use crate::task::{derive_tasks, Task};

/// Minimum session length, in minutes.
pub const SESSION_MIN_MINUTES: i64 = 45;
/// Maximum session length, in minutes.
pub const SESSION_MAX_MINUTES: i64 = 75;
/// Mandatory inter-session break, in minutes. Counts toward daily capacity.
pub const BREAK_MINUTES: i64 = 15;
/// Non-counting recovery break inserted every [`RECOVERY_EVERY_N_SESSIONS`].
pub const RECOVERY_MINUTES: i64 = 120;
/// How many sessions trigger a recovery break.
pub const RECOVERY_EVERY_N_SESSIONS: u32 = 4;
/// "Free day" threshold: counting occupancy at or below this gets bonus capacity.
pub const FREE_DAY_THRESHOLD_MINUTES: i64 = 30;

/// Run the full scheduling pipeline: workload derivation, occupancy
/// construction, day-before reservation, forward placement, supper
/// insertion, and verification.
///
/// `today` is the caller-supplied wall-clock floor below which no
/// placement is attempted (see §4.4.2) — passing it in keeps the engine
/// itself free of any hidden clock reads.
pub fn build_plan(input: &PlanInput, today: NaiveDate) -> Result<Plan> {
    input.validate()?;

    let mut occupancy = OccupancyMap::build(input);
    let mut session_counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut items = Vec::new();

    let mut exams: Vec<_> = input.all_exams().collect();
    exams.sort_by(|(sa, ea), (sb, eb)| ea.start.cmp(&eb.start).then(sa.name.cmp(&sb.name)));

    for (_, exam) in &exams {
        let mut tasks = derive_tasks(exam);
        crate::reservation::reserve_day_before(exam, &mut tasks, &mut occupancy, &mut items, &input.metadata);
        forward_place(exam, &mut tasks, &mut occupancy, &mut session_counts, &mut items, &input.metadata, today);
    }

    insert_supper_items(&mut items, &input.metadata);
    items.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let warnings = crate::verifier::verify(&items);
    Ok(Plan { items, warnings })
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Append a break item of up to `requested_minutes`, clamped to
/// `window_end`. Returns the break's end time (equal to `start` if no
/// break could fit). Pushes the break into the occupancy map so
/// subsequent free-interval computations treat it as immovable.
fn append_break(
    occupancy: &mut OccupancyMap,
    items: &mut Vec<Item>,
    day: NaiveDate,
    subject: &str,
    paper: &str,
    label: &str,
    start: NaiveDateTime,
    requested_minutes: i64,
    window_end: NaiveDateTime,
) -> NaiveDateTime {
    let available = (window_end - start).num_minutes().max(0);
    let minutes = requested_minutes.min(available);
    if minutes <= 0 {
        return start;
    }
    let end = start + Duration::minutes(minutes);
    items.push(Item::new(subject.to_string(), paper.to_string(), label.to_string(), start, end));
    occupancy.push(day, Interval { start, end, kind: OccupancyKind::Placed });
    end
}

/// Append the post-session break sequence: the mandatory 15-minute break,
/// an optional post-past-paper downtime break, and a recovery break every
/// `RECOVERY_EVERY_N_SESSIONS`th session. Returns the minutes consumed
/// from the counting ledgers (the 15-minute break and any post-past-paper
/// downtime; the recovery break is non-counting).
#[allow(clippy::too_many_arguments)]
fn append_post_session_breaks(
    occupancy: &mut OccupancyMap,
    items: &mut Vec<Item>,
    day: NaiveDate,
    task: &Task,
    session_end: NaiveDateTime,
    window_end: NaiveDateTime,
    session_count: u32,
) -> i64 {
    let mut counting_minutes = 0i64;

    let after_break = append_break(
        occupancy,
        items,
        day,
        &task.subject,
        &task.paper,
        "Break: 15m",
        session_end,
        BREAK_MINUTES,
        window_end,
    );
    counting_minutes += (after_break - session_end).num_minutes();

    let mut cursor = after_break;
    if task.kind.is_past_paper() {
        let downtime = task.kind.post_downtime_minutes();
        let label = if downtime == 45 {
            "Break: Post Past Paper (45m)"
        } else {
            "Break: Post Past Paper (90m)"
        };
        let after_downtime = append_break(
            occupancy, items, day, &task.subject, &task.paper, label, cursor, downtime, window_end,
        );
        counting_minutes += (after_downtime - cursor).num_minutes();
        cursor = after_downtime;
    }

    if session_count % RECOVERY_EVERY_N_SESSIONS == 0 {
        append_break(
            occupancy,
            items,
            day,
            &task.subject,
            &task.paper,
            "Break: 2h recovery",
            cursor,
            RECOVERY_MINUTES,
            window_end,
        );
    }

    counting_minutes
}

/// Attempt to place one contiguous past-paper block on `day`. Returns
/// `true` if placed.
#[allow(clippy::too_many_arguments)]
fn try_place_past_paper(
    task: &mut Task,
    day: NaiveDate,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    occupancy: &mut OccupancyMap,
    session_counts: &mut BTreeMap<NaiveDate, u32>,
    items: &mut Vec<Item>,
    day_remaining: &mut i64,
    subject_remaining: &mut i64,
    frontload: bool,
) -> bool {
    if task.is_done() {
        return false;
    }
    let required = task.remaining_minutes();
    if !task.mandatory && (*day_remaining < required || *subject_remaining < required) {
        return false;
    }

    let free = ordered_for_placement(free_slots(window_start, window_end, &occupancy.for_date(day)), frontload);
    let Some(slot) = free.into_iter().find(|s| s.duration_minutes() >= required) else {
        return false;
    };

    let start = slot.start;
    let end = start + Duration::minutes(required);
    items.push(Item::new(task.subject.clone(), task.paper.clone(), task.label.clone(), start, end));
    occupancy.push(day, Interval { start, end, kind: OccupancyKind::Placed });
    *day_remaining = (*day_remaining - required).max(0);
    *subject_remaining = (*subject_remaining - required).max(0);
    task.hours = 0.0;

    let count = {
        let entry = session_counts.entry(day).or_insert(0);
        *entry += 1;
        *entry
    };
    let consumed = append_post_session_breaks(occupancy, items, day, task, end, window_end, count);
    *day_remaining = (*day_remaining - consumed).max(0);
    *subject_remaining = (*subject_remaining - consumed).max(0);
    true
}

/// Place as many sessions of a non-past-paper task as fit on `day` given
/// the remaining ledgers. Runs until the task is done, a ledger is
/// exhausted, or no free slot can host even the minimum session length
/// (except for a final tail shorter than the minimum, which is allowed to
/// finish the task).
#[allow(clippy::too_many_arguments)]
fn place_regular_task(
    task: &mut Task,
    day: NaiveDate,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    occupancy: &mut OccupancyMap,
    session_counts: &mut BTreeMap<NaiveDate, u32>,
    items: &mut Vec<Item>,
    day_remaining: &mut i64,
    subject_remaining: &mut i64,
    frontload: bool,
) {
    while !task.is_done() && *day_remaining > 0 && *subject_remaining > 0 {
        let free = ordered_for_placement(free_slots(window_start, window_end, &occupancy.for_date(day)), frontload);
        let Some(slot) = free.into_iter().next() else {
            break;
        };

        let task_remaining = task.remaining_minutes();
        let uncapped = SESSION_MAX_MINUTES
            .min(slot.duration_minutes())
            .min(*subject_remaining)
            .min(*day_remaining);
        let session_len = uncapped.min(task_remaining);
        let is_final_tail = session_len == task_remaining;
        if session_len <= 0 || (session_len < SESSION_MIN_MINUTES && !is_final_tail) {
            break;
        }

        let start = slot.start;
        let end = start + Duration::minutes(session_len);
        items.push(Item::new(task.subject.clone(), task.paper.clone(), task.label.clone(), start, end));
        occupancy.push(day, Interval { start, end, kind: OccupancyKind::Placed });
        *day_remaining -= session_len;
        *subject_remaining -= session_len;
        task.hours -= session_len as f64 / 60.0;
        if task.hours < 0.0 {
            task.hours = 0.0;
        }

        let count = {
            let entry = session_counts.entry(day).or_insert(0);
            *entry += 1;
            *entry
        };
        let consumed = append_post_session_breaks(occupancy, items, day, task, end, window_end, count);
        *day_remaining = (*day_remaining - consumed).max(0);
        *subject_remaining = (*subject_remaining - consumed).max(0);
    }
}

/// Run forward placement for a single exam across its candidate day range.
fn forward_place(
    exam: &crate::model::Exam,
    tasks: &mut [Task],
    occupancy: &mut OccupancyMap,
    session_counts: &mut BTreeMap<NaiveDate, u32>,
    items: &mut Vec<Item>,
    metadata: &Metadata,
    today: NaiveDate,
) {
    let start_day = metadata.planner_start.max(today);
    if start_day > exam.date() {
        return;
    }

    let mut day = start_day;
    loop {
        let (window_start, mut window_end) = clamp_day_window(day, metadata.daily_start, metadata.daily_end);

        if day == exam.date() {
            if exam.starts_before_noon() {
                window_end = window_start;
            } else {
                window_end = window_end.min(exam.start);
            }
        }

        if window_end > window_start {
            let base_occupancy = occupancy.for_date(day);
            let counting_minutes: i64 = base_occupancy
                .iter()
                .filter(|i| i.kind != OccupancyKind::Supper)
                .map(|i| i.duration_minutes())
                .sum();

            let mut day_cap_minutes = hours_to_minutes(metadata.effective_day_cap_hours()) - counting_minutes;
            if is_weekend(day) {
                day_cap_minutes += hours_to_minutes(metadata.weekend_extra_hours);
            }
            if counting_minutes <= FREE_DAY_THRESHOLD_MINUTES {
                day_cap_minutes += hours_to_minutes(metadata.free_day_extra_hours);
            }
            let mut day_remaining = day_cap_minutes.max(0);
            let mut subject_remaining = hours_to_minutes(metadata.per_subject_daily_cap_hours);

            for task in tasks.iter_mut() {
                if task.is_done() {
                    continue;
                }
                if task.kind.is_past_paper() {
                    try_place_past_paper(
                        task,
                        day,
                        window_start,
                        window_end,
                        occupancy,
                        session_counts,
                        items,
                        &mut day_remaining,
                        &mut subject_remaining,
                        metadata.adhd_frontload,
                    );
                } else {
                    place_regular_task(
                        task,
                        day,
                        window_start,
                        window_end,
                        occupancy,
                        session_counts,
                        items,
                        &mut day_remaining,
                        &mut subject_remaining,
                        metadata.adhd_frontload,
                    );
                }
            }
        }

        if day >= exam.date() {
            break;
        }
        day = day.succ_opt().unwrap();
    }
}

/// Emit a `Break: Supper` item on every day that already carries at least
/// one other scheduled activity.
fn insert_supper_items(items: &mut Vec<Item>, metadata: &Metadata) {
    let days_with_activity: BTreeSet<NaiveDate> = items.iter().map(|i| i.date()).collect();
    for day in days_with_activity {
        if day < metadata.planner_start || day > metadata.planner_end {
            continue;
        }
        let start = day.and_hms_opt(SUPPER_START.0, SUPPER_START.1, 0).unwrap();
        let end = day.and_hms_opt(SUPPER_END.0, SUPPER_END.1, 0).unwrap();
        items.push(Item::new(String::new(), String::new(), "Break: Supper".to_string(), start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exam, ExamLabels, Level, Subject};

    fn metadata(start: NaiveDate, end: NaiveDate) -> Metadata {
        Metadata {
            title: "Test".into(),
            year: 2025,
            planner_start: start,
            planner_end: end,
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

    fn single_exam_input(exam_day: NaiveDate) -> PlanInput {
        let exam = Exam {
            subject: "Mathematics".into(),
            paper: "P1".into(),
            start: exam_day.and_hms_opt(9, 0, 0).unwrap(),
            end: exam_day.and_hms_opt(12, 0, 0).unwrap(),
            effort_level: Level::Medium,
            theory_level: Level::Medium,
            practice_level: Level::Low,
            past_papers_required: Some(0),
            hours: None,
        };
        PlanInput {
            metadata: metadata(exam_day - Duration::days(10), exam_day),
            labels: ExamLabels::default(),
            subjects: vec![Subject {
                name: "Mathematics".into(),
                abbreviation: None,
                emoji: None,
                color: None,
                trial_exams: Vec::new(),
                final_exams: vec![exam],
            }],
        }
    }

    #[test]
    fn build_plan_produces_no_overlaps_per_day() {
        let exam_day = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let input = single_exam_input(exam_day);
        let today = input.metadata.planner_start;
        let plan = build_plan(&input, today).unwrap();

        for day in plan.dates() {
            let items = plan.items_on(day);
            for window in items.windows(2) {
                assert!(window[0].end <= window[1].start, "overlap on {day}");
            }
        }
    }

    #[test]
    fn build_plan_never_places_outside_hard_bounds() {
        let exam_day = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let input = single_exam_input(exam_day);
        let today = input.metadata.planner_start;
        let plan = build_plan(&input, today).unwrap();

        let hard_start = chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let hard_end = chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        for item in &plan.items {
            assert!(item.start.time() >= hard_start);
            assert!(item.end.time() <= hard_end);
            assert!(item.end > item.start);
        }
    }

    #[test]
    fn build_plan_rejects_invalid_config() {
        let exam_day = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let mut input = single_exam_input(exam_day);
        input.metadata.daily_start = chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        let today = input.metadata.planner_start;
        assert!(build_plan(&input, today).is_err());
    }

    #[test]
    fn supper_item_present_on_days_with_activity() {
        let exam_day = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let input = single_exam_input(exam_day);
        let today = input.metadata.planner_start;
        let plan = build_plan(&input, today).unwrap();
        assert!(plan.items.iter().any(|i| i.is_supper()));
    }
}
