use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::models::Goal;
use crate::utils;
use crate::view::{Filter, SortKey, Summary};

const PAGE_WIDTH: usize = 78;
const PAGE_LINES: usize = 56;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Where exports land when the user has not asked for anywhere else:
/// the platform download directory, or the working directory without one.
pub fn default_export_dir() -> PathBuf {
    utils::get_download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write the visible dashboard as a paginated plain-text document and
/// return the path of the file produced.
pub fn export_dashboard(
    visible: &[Goal],
    summary: Summary,
    filter: Filter,
    sort: SortKey,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let now = Utc::now();
    let lines = compose_lines(visible, summary, filter, sort, now.date_naive());
    let document = paginate(&lines);

    let filename = format!("strive-dashboard-{}.txt", now.format("%Y%m%d-%H%M%S"));
    let path = dir.join(filename);
    fs::write(&path, document)?;
    tracing::info!(path = %path.display(), goals = visible.len(), "dashboard exported");
    Ok(path)
}

fn compose_lines(
    visible: &[Goal],
    summary: Summary,
    filter: Filter,
    sort: SortKey,
    today: NaiveDate,
) -> Vec<String> {
    let mut lines = vec![
        "=".repeat(PAGE_WIDTH),
        "STRIVE GOAL DASHBOARD".to_string(),
        format!("Generated {} UTC", today.format("%Y-%m-%d")),
        format!("Filter: {} | Sort: {}", filter.label(), sort.label()),
        format!(
            "Total: {} | Completed: {} | Pending: {}",
            summary.total, summary.completed, summary.pending
        ),
        "=".repeat(PAGE_WIDTH),
        String::new(),
    ];

    if visible.is_empty() {
        lines.push("No goals to show for this view.".to_string());
        return lines;
    }

    for goal in visible {
        lines.extend(goal_lines(goal, today));
        lines.push(String::new());
    }
    lines
}

/// One card per goal: marker and title with the priority badge pushed to
/// the right edge, deadline line, progress line for multi-step goals, then
/// the wrapped description.
fn goal_lines(goal: &Goal, today: NaiveDate) -> Vec<String> {
    let marker = if goal.completed { "[x]" } else { "[ ]" };
    let badge = format!("[{}]", goal.priority.label());

    let head = format!("{} {}", marker, goal.title);
    let head_len = head.chars().count();
    let badge_len = badge.chars().count();
    let line = if head_len + badge_len + 1 <= PAGE_WIDTH {
        format!("{}{}{}", head, " ".repeat(PAGE_WIDTH - head_len - badge_len), badge)
    } else {
        let keep = PAGE_WIDTH.saturating_sub(badge_len + 4);
        let truncated: String = head.chars().take(keep).collect();
        format!("{}... {}", truncated, badge)
    };

    let mut lines = vec![line];
    lines.push(format!(
        "    Due {} ({})",
        utils::format_date(&goal.deadline),
        goal.deadline_status(today)
    ));
    if goal.steps > 1 {
        lines.push(format!(
            "    Progress: {}/{} steps ({}%)",
            goal.completed_steps,
            goal.steps,
            goal.progress_percent()
        ));
    }
    if !goal.description.trim().is_empty() {
        for wrapped in wrap_text(goal.description.trim(), PAGE_WIDTH - 4) {
            lines.push(format!("    {}", wrapped));
        }
    }
    lines
}

/// Greedy word wrap; words longer than the width are split hard.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                if word_len <= width {
                    current = word.to_string();
                } else {
                    let chars: Vec<char> = word.chars().collect();
                    for chunk in chars.chunks(width) {
                        lines.push(chunk.iter().collect());
                    }
                }
            } else if current.chars().count() + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Chunk the composed lines into fixed-height pages, each closed by a
/// right-aligned page footer, with a form feed between pages.
fn paginate(lines: &[String]) -> String {
    let total_pages = lines.len().div_ceil(PAGE_LINES).max(1);
    let mut out = String::new();
    for (page_idx, chunk) in lines.chunks(PAGE_LINES).enumerate() {
        for line in chunk {
            out.push_str(line);
            out.push('\n');
        }
        for _ in chunk.len()..PAGE_LINES {
            out.push('\n');
        }
        let footer = format!("Page {} of {}", page_idx + 1, total_pages);
        out.push_str(&format!("{:>width$}\n", footer, width = PAGE_WIDTH));
        if page_idx + 1 < total_pages {
            out.push('\u{000C}');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalDraft, Priority};
    use crate::view::summarize;
    use chrono::TimeZone;

    fn goal(title: &str, steps: i64) -> Goal {
        Goal::new(GoalDraft {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap(),
            priority: Priority::High,
            steps,
        })
    }

    #[test]
    fn export_writes_a_single_page_document() {
        let dir = tempfile::tempdir().unwrap();
        let goals = vec![goal("Climb a mountain", 1), goal("Save money", 4)];
        let summary = summarize(&goals);

        let path = export_dashboard(
            &goals,
            summary,
            Filter::All,
            SortKey::CreatedDesc,
            dir.path(),
        )
        .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("strive-dashboard-"));
        assert!(name.ends_with(".txt"));

        let document = fs::read_to_string(&path).unwrap();
        assert!(document.contains("STRIVE GOAL DASHBOARD"));
        assert!(document.contains("Filter: All | Sort: Newest first"));
        assert!(document.contains("Total: 2 | Completed: 0 | Pending: 2"));
        assert!(document.contains("[ ] Climb a mountain"));
        assert!(document.contains("Page 1 of 1"));
        assert!(!document.contains('\u{000C}'));
    }

    #[test]
    fn long_dashboards_split_into_pages() {
        let dir = tempfile::tempdir().unwrap();
        let goals: Vec<Goal> = (0..30).map(|i| goal(&format!("goal {}", i), 1)).collect();
        let summary = summarize(&goals);

        let path = export_dashboard(
            &goals,
            summary,
            Filter::All,
            SortKey::CreatedDesc,
            dir.path(),
        )
        .unwrap();

        let document = fs::read_to_string(&path).unwrap();
        assert!(document.contains("Page 1 of 2"));
        assert!(document.contains("Page 2 of 2"));
        assert_eq!(document.matches('\u{000C}').count(), 1);
    }

    #[test]
    fn cards_carry_badge_deadline_progress_and_description() {
        let mut g = goal("Write a novel", 10);
        g.completed_steps = 3;
        g.description = "One chapter at a time, every single week.".to_string();
        let today = chrono::NaiveDate::from_ymd_opt(2026, 11, 28).unwrap();

        let lines = goal_lines(&g, today);
        assert!(lines[0].starts_with("[ ] Write a novel"));
        assert!(lines[0].ends_with("[High]"));
        assert_eq!(lines[0].chars().count(), PAGE_WIDTH);
        assert_eq!(lines[1], "    Due 2026-12-01 (3 days left)");
        assert_eq!(lines[2], "    Progress: 3/10 steps (30%)");
        assert_eq!(lines[3], "    One chapter at a time, every single week.");
    }

    #[test]
    fn single_step_cards_skip_the_progress_line() {
        let g = goal("Small thing", 1);
        let today = chrono::NaiveDate::from_ymd_opt(2026, 11, 28).unwrap();
        let lines = goal_lines(&g, today);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn overlong_titles_are_truncated_before_the_badge() {
        let g = goal(&"x".repeat(120), 1);
        let today = chrono::NaiveDate::from_ymd_opt(2026, 11, 28).unwrap();
        let lines = goal_lines(&g, today);
        assert!(lines[0].contains("..."));
        assert!(lines[0].ends_with("[High]"));
        assert!(lines[0].chars().count() <= PAGE_WIDTH);
    }

    #[test]
    fn wrap_splits_on_words_and_hard_breaks_long_ones() {
        let wrapped = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 15));
        assert_eq!(wrapped.join(" "), "the quick brown fox jumps over the lazy dog");

        let hard = wrap_text(&"y".repeat(40), 15);
        assert_eq!(hard.len(), 3);
    }

    #[test]
    fn empty_views_still_produce_a_document() {
        let lines = compose_lines(
            &[],
            Summary {
                total: 0,
                completed: 0,
                pending: 0,
            },
            Filter::Completed,
            SortKey::CreatedDesc,
            chrono::NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
        );
        assert!(lines.iter().any(|l| l.contains("No goals to show")));
    }
}
