//! Per-day occupancy map: the immovable intervals the placer must route
//! study sessions around (exams, post-exam downtime, tuition buffers, and
//! the daily supper break).

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::PlanInput;

pub const SUPPER_START: (u32, u32) = (18, 30);
pub const SUPPER_END: (u32, u32) = (20, 0);
pub const POST_EXAM_DOWNTIME_MINUTES: i64 = 120;
pub const TUITION_PRE_BUFFER_MINUTES: i64 = 30;
pub const TUITION_POST_BUFFER_MINUTES: i64 = 90;

/// A reason an interval is occupied, used only for diagnostics — the
/// placer treats every kind identically (it cannot be scheduled over).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyKind {
    Exam,
    PostExamDowntime,
    Tuition,
    Supper,
    /// A study session or break placed by the engine, pushed back into the
    /// map so later placement passes treat it as immovable.
    Placed,
}

/// A half-open, immovable interval on a given day. May extend outside the
/// day's effective window — callers clamp before using it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: OccupancyKind,
}

impl Interval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }

    /// Clamp this interval to `[window_start, window_end]`. Returns `None`
    /// if the clamped interval is empty.
    pub fn clamped(&self, window_start: NaiveDateTime, window_end: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.start.max(window_start);
        let end = self.end.min(window_end);
        if end > start {
            Some((start, end))
        } else {
            None
        }
    }
}

/// Per-date sorted occupancy, built once per planning run and consulted
/// (read-only) by the free-interval computer and placer.
#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    by_date: BTreeMap<NaiveDate, Vec<Interval>>,
}

impl OccupancyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, interval: Interval) {
        self.by_date.entry(date).or_default().push(interval);
    }

    /// Sorted intervals occupying `date` (ascending by start).
    pub fn for_date(&self, date: NaiveDate) -> Vec<Interval> {
        let mut intervals = self.by_date.get(&date).cloned().unwrap_or_default();
        intervals.sort_by_key(|i| i.start);
        intervals
    }

    /// Build the base occupancy map for an entire planning run: exams,
    /// post-exam downtime, tuition buffers, and the daily supper break.
    pub fn build(input: &PlanInput) -> Self {
        let mut map = Self::new();

        for (_, exam) in input.all_exams() {
            map.push(
                exam.date(),
                Interval {
                    start: exam.start,
                    end: exam.end,
                    kind: OccupancyKind::Exam,
                },
            );
            let downtime_end = exam.end + Duration::minutes(POST_EXAM_DOWNTIME_MINUTES);
            map.push(
                exam.date(),
                Interval {
                    start: exam.end,
                    end: downtime_end,
                    kind: OccupancyKind::PostExamDowntime,
                },
            );
        }

        for block in &input.metadata.tuition_classes {
            let buffered_start = block.start - Duration::minutes(TUITION_PRE_BUFFER_MINUTES);
            let buffered_end = block.end + Duration::minutes(TUITION_POST_BUFFER_MINUTES);
            map.push(
                block.start.date(),
                Interval {
                    start: buffered_start,
                    end: buffered_end,
                    kind: OccupancyKind::Tuition,
                },
            );
        }

        let mut day = input.metadata.planner_start;
        while day <= input.metadata.planner_end {
            let supper_start = day.and_hms_opt(SUPPER_START.0, SUPPER_START.1, 0).unwrap();
            let supper_end = day.and_hms_opt(SUPPER_END.0, SUPPER_END.1, 0).unwrap();
            map.push(
                day,
                Interval {
                    start: supper_start,
                    end: supper_end,
                    kind: OccupancyKind::Supper,
                },
            );
            day = day.succ_opt().unwrap();
        }

        map
    }
}

/// Clamp the daily window to the hard 09:00–23:00 bound.
pub fn clamp_day_window(day: NaiveDate, daily_start: NaiveTime, daily_end: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
    let hard_start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let hard_end = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
    let start = day.and_time(daily_start.max(hard_start));
    let end = day.and_time(daily_end.min(hard_end));
    (start, end)
}
