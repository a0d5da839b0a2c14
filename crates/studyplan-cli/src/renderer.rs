//! Text and JSON rendering of a finished [`Plan`].
//!
//! Grounded on the original's `create_daily_planner_pages`/
//! `create_exam_summary_page` shape (a summary table, then a day-by-day
//! breakdown) but produced as plain text rather than a PDF: cosmetic
//! color/emoji/abbreviation styling is not reproduced here.

use studyplan_core::{PlanInput, Plan};

/// Render `plan` as a human-readable report: exam summary, then one block
/// per date, then any verifier warnings.
pub fn render_text(input: &PlanInput, plan: &Plan) -> String {
    let mut out = String::new();
    render_summary(input, &mut out);
    out.push('\n');

    for date in plan.dates() {
        out.push_str(&format!("== {} ({}) ==\n", date, date.format("%A")));
        for item in plan.items_on(date) {
            out.push_str(&format!(
                "  {} - {}  {}\n",
                item.start.format("%H:%M"),
                item.end.format("%H:%M"),
                describe(item),
            ));
        }
        out.push('\n');
    }

    if plan.warnings.is_empty() {
        out.push_str("No warnings.\n");
    } else {
        out.push_str("Warnings:\n");
        for warning in &plan.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}

fn describe(item: &studyplan_core::Item) -> String {
    if item.subject.is_empty() {
        item.label.clone()
    } else {
        format!("{} {} - {}", item.subject, item.paper, item.label)
    }
}

fn render_summary(input: &PlanInput, out: &mut String) {
    out.push_str(&format!("{} ({})\n", input.metadata.title, input.metadata.year));
    out.push_str(&format!(
        "Planner window: {} - {}\n",
        input.metadata.planner_start, input.metadata.planner_end
    ));
    out.push_str("Exams:\n");

    let mut exams: Vec<_> = input.all_exams().collect();
    exams.sort_by_key(|(_, exam)| exam.start);
    for (_, exam) in exams {
        out.push_str(&format!(
            "  {} {} {} - {}\n",
            exam.subject,
            exam.paper,
            exam.start.format("%Y-%m-%d %H:%M"),
            exam.end.format("%H:%M"),
        ));
    }
}

/// Render `plan` as pretty-printed JSON.
pub fn render_json(plan: &Plan) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use studyplan_core::{build_plan, Exam, ExamLabels, Level, Metadata, Subject};

    fn sample_input() -> PlanInput {
        let planner_start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let exam_date = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
        PlanInput {
            metadata: Metadata {
                title: "Grade 12 Finals".into(),
                year: 2025,
                planner_start,
                planner_end: exam_date,
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
            },
            labels: ExamLabels { trial_display_name: "Trial".into(), final_display_name: "Final".into() },
            subjects: vec![Subject {
                name: "Mathematics".into(),
                abbreviation: None,
                emoji: None,
                color: None,
                trial_exams: Vec::new(),
                final_exams: vec![Exam {
                    subject: "Mathematics".into(),
                    paper: "P1".into(),
                    start: exam_date.and_hms_opt(9, 0, 0).unwrap(),
                    end: exam_date.and_hms_opt(12, 0, 0).unwrap(),
                    effort_level: Level::Medium,
                    theory_level: Level::Medium,
                    practice_level: Level::Medium,
                    past_papers_required: Some(1),
                    hours: Some(4.0),
                }],
            }],
        }
    }

    #[test]
    fn text_render_includes_title_and_dates() {
        let input = sample_input();
        let plan = build_plan(&input, input.metadata.planner_start).unwrap();
        let text = render_text(&input, &plan);
        assert!(text.contains("Grade 12 Finals"));
        assert!(text.contains("Mathematics"));
    }

    #[test]
    fn json_render_round_trips_item_count() {
        let input = sample_input();
        let plan = build_plan(&input, input.metadata.planner_start).unwrap();
        let json = render_json(&plan).unwrap();
        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.items.len(), plan.items.len());
    }
}
