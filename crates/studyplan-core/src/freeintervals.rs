//! Free-interval computation: subtracts a day's occupancy from its
//! effective window to produce the candidate slots the placer may use.
//!
//! The sweep is the same shape as a calendar-gap detector: sort occupied
//! intervals, walk a cursor forward, and emit whatever's left between the
//! cursor and the next occupied interval (or the window end).

use chrono::NaiveDateTime;

use crate::occupancy::Interval;

/// Minimum segment length worth keeping — shorter slots can never host a
/// study session.
pub const DEFAULT_SESSION_MIN_MINUTES: i64 = 45;

/// A free, unoccupied slot available for placing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FreeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Subtract `occupied` from `[window_start, window_end]`, returning the
/// disjoint free segments of at least `DEFAULT_SESSION_MIN_MINUTES`,
/// sorted ascending by start time. `occupied` need not be sorted or
/// pre-clamped.
pub fn free_slots(
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    occupied: &[Interval],
) -> Vec<FreeSlot> {
    if window_end <= window_start {
        return Vec::new();
    }

    let mut clamped: Vec<(NaiveDateTime, NaiveDateTime)> = occupied
        .iter()
        .filter_map(|i| i.clamped(window_start, window_end))
        .collect();
    clamped.sort_by_key(|(start, _)| *start);

    let mut slots = Vec::new();
    let mut cursor = window_start;

    for (start, end) in clamped {
        if start > cursor {
            push_if_large_enough(&mut slots, cursor, start);
        }
        if end > cursor {
            cursor = end;
        }
    }

    if cursor < window_end {
        push_if_large_enough(&mut slots, cursor, window_end);
    }

    slots
}

fn push_if_large_enough(slots: &mut Vec<FreeSlot>, start: NaiveDateTime, end: NaiveDateTime) {
    let duration = (end - start).num_minutes();
    if duration >= DEFAULT_SESSION_MIN_MINUTES {
        slots.push(FreeSlot { start, end });
    }
}

/// Order free slots for the placer's scan: ascending when `frontload` is
/// true (bias toward earliest-in-day), descending otherwise.
pub fn ordered_for_placement(mut slots: Vec<FreeSlot>, frontload: bool) -> Vec<FreeSlot> {
    if !frontload {
        slots.reverse();
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::OccupancyKind;
    use chrono::NaiveDate;

    fn dt(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn no_occupancy_yields_whole_window() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let slots = free_slots(dt(day, 9, 0), dt(day, 23, 0), &[]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].duration_minutes(), 14 * 60);
    }

    #[test]
    fn occupancy_splits_window_and_drops_short_tail() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let occupied = vec![Interval {
            start: dt(day, 18, 30),
            end: dt(day, 20, 0),
            kind: OccupancyKind::Supper,
        }];
        let slots = free_slots(dt(day, 9, 0), dt(day, 23, 0), &occupied);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, dt(day, 9, 0));
        assert_eq!(slots[0].end, dt(day, 18, 30));
        assert_eq!(slots[1].start, dt(day, 20, 0));
        assert_eq!(slots[1].end, dt(day, 23, 0));
    }

    #[test]
    fn short_segments_are_dropped() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        // Occupancy leaves only a 30-minute gap before supper.
        let occupied = vec![
            Interval {
                start: dt(day, 9, 0),
                end: dt(day, 18, 0),
                kind: OccupancyKind::Exam,
            },
            Interval {
                start: dt(day, 18, 30),
                end: dt(day, 20, 0),
                kind: OccupancyKind::Supper,
            },
        ];
        let slots = free_slots(dt(day, 9, 0), dt(day, 23, 0), &occupied);
        // The 18:00-18:30 gap (30 min) is dropped; only the post-supper slot remains.
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, dt(day, 20, 0));
    }

    #[test]
    fn frontload_orders_ascending_otherwise_descending() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let slots = vec![
            FreeSlot { start: dt(day, 9, 0), end: dt(day, 10, 0) },
            FreeSlot { start: dt(day, 14, 0), end: dt(day, 15, 0) },
        ];
        let front = ordered_for_placement(slots.clone(), true);
        assert_eq!(front[0].start, dt(day, 9, 0));

        let back = ordered_for_placement(slots, false);
        assert_eq!(back[0].start, dt(day, 14, 0));
    }
}
