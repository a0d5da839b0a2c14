//! Post-placement verifier.
//!
//! Scans the finalized item list per day and checks the invariants the
//! placer is supposed to have upheld, producing human-readable warnings
//! rather than failing the run — a violated invariant here is a planner
//! defect, not an input error, so the plan is still returned.

use crate::item::Item;

const RECOVERY_MIN_MINUTES: i64 = 90;
const BREAK_MIN_MINUTES: i64 = 15;

/// Verify `items` (already sorted by start time) and return warnings keyed
/// by ISO date and reason.
pub fn verify(items: &[Item]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut dates: Vec<_> = items.iter().map(|i| i.date()).collect();
    dates.sort();
    dates.dedup();

    for date in dates {
        let mut day_items: Vec<&Item> = items.iter().filter(|i| i.date() == date).collect();
        day_items.sort_by_key(|i| i.start);

        check_supper(date, &day_items, &mut warnings);
        check_inter_session_breaks(date, &day_items, &mut warnings);
        check_recovery_cadence(date, &day_items, &mut warnings);
        check_post_past_paper_downtime(date, &day_items, &mut warnings);
    }

    warnings
}

fn check_supper(date: chrono::NaiveDate, day_items: &[&Item], warnings: &mut Vec<String>) {
    let supper_start = date.and_hms_opt(18, 30, 0).unwrap();
    let supper_end = date.and_hms_opt(20, 0, 0).unwrap();
    let has_supper = day_items
        .iter()
        .any(|i| i.is_supper() && i.start < supper_end && i.end > supper_start);
    if !has_supper {
        warnings.push(format!("{date}: missing supper break"));
    }
}

fn check_inter_session_breaks(date: chrono::NaiveDate, day_items: &[&Item], warnings: &mut Vec<String>) {
    for window in day_items.windows(2) {
        let (current, next) = (window[0], window[1]);
        if current.is_break() || current.label.contains("Exam") {
            continue;
        }
        let gap = (next.start - current.end).num_minutes();
        if gap < BREAK_MIN_MINUTES {
            continue;
        }
        let covered = day_items
            .iter()
            .any(|i| i.is_break() && i.start >= current.end && i.end <= next.start && i.duration_minutes() >= BREAK_MIN_MINUTES);
        if !covered {
            warnings.push(format!(
                "{date}: missing {BREAK_MIN_MINUTES}-minute break after {} ending {}",
                current.label, current.end
            ));
        }
    }
}

fn check_recovery_cadence(date: chrono::NaiveDate, day_items: &[&Item], warnings: &mut Vec<String>) {
    let sessions: Vec<&&Item> = day_items.iter().filter(|i| !i.is_break()).collect();
    for (index, session) in sessions.iter().enumerate() {
        let session_number = index + 1;
        if session_number % 4 != 0 {
            continue;
        }
        let has_recovery = day_items
            .iter()
            .any(|i| i.is_recovery() && i.start >= session.end && i.duration_minutes() >= RECOVERY_MIN_MINUTES);
        if !has_recovery {
            warnings.push(format!(
                "{date}: missing recovery break after session {session_number} ending {}",
                session.end
            ));
        }
    }
}

fn check_post_past_paper_downtime(date: chrono::NaiveDate, day_items: &[&Item], warnings: &mut Vec<String>) {
    for item in day_items.iter().filter(|i| i.is_past_paper()) {
        let required_total = if item.duration_minutes() >= 180 { 90 } else { 45 };
        let required = required_total / 2;
        let occupied_after: i64 = day_items
            .iter()
            .filter(|i| i.start >= item.end && i.start < item.end + chrono::Duration::minutes(required_total))
            .map(|i| i.duration_minutes())
            .sum();
        if occupied_after < required {
            warnings.push(format!(
                "{date}: insufficient post-past-paper downtime after {} ending {}",
                item.label, item.end
            ));
        }
    }
}
