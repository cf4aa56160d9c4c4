use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<ThemeMode> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Editable fields captured by the create/edit form. `steps` stays signed
/// here; it is coerced to >= 1 when applied to a record.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub priority: Priority,
    pub steps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>, // RFC 3339 in the persisted JSON
    pub priority: Priority,
    pub steps: u32,
    pub completed_steps: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Step counts below 1 are invalid input, not errors. Clamped into u32
/// range so oversized input cannot wrap to 0.
pub fn coerce_steps(raw: i64) -> u32 {
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

impl Goal {
    pub fn new(draft: GoalDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            deadline: draft.deadline,
            priority: draft.priority,
            steps: coerce_steps(draft.steps),
            completed_steps: 0,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Rounded progress for display. Single-step goals are all-or-nothing:
    /// their percentage follows the completed flag, not the step counter.
    pub fn progress_percent(&self) -> u8 {
        if self.steps > 1 {
            (100.0 * self.completed_steps as f64 / self.steps as f64).round() as u8
        } else if self.completed {
            100
        } else {
            0
        }
    }

    /// Human deadline status relative to `today`: completion date for done
    /// goals, otherwise days remaining, due today, or overdue.
    pub fn deadline_status(&self, today: NaiveDate) -> String {
        if self.completed {
            return match self.completed_at {
                Some(at) => format!("Completed {}", at.format("%Y-%m-%d")),
                None => "Completed".to_string(),
            };
        }
        let days = (self.deadline.date_naive() - today).num_days();
        if days > 1 {
            format!("{} days left", days)
        } else if days == 1 {
            "1 day left".to_string()
        } else if days == 0 {
            "Due today".to_string()
        } else if days == -1 {
            "Overdue (1 day ago)".to_string()
        } else {
            format!("Overdue ({} days ago)", -days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(steps: i64) -> GoalDraft {
        GoalDraft {
            title: "Learn piano".to_string(),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            steps,
        }
    }

    #[test]
    fn new_goal_starts_incomplete_with_zero_progress() {
        let goal = Goal::new(draft(4));
        assert!(!goal.completed);
        assert_eq!(goal.completed_steps, 0);
        assert_eq!(goal.completed_at, None);
        assert_eq!(goal.steps, 4);
    }

    #[test]
    fn steps_of_zero_or_negative_coerce_to_one() {
        assert_eq!(Goal::new(draft(0)).steps, 1);
        assert_eq!(Goal::new(draft(-7)).steps, 1);
        assert_eq!(coerce_steps(1), 1);
        assert_eq!(coerce_steps(12), 12);
    }

    #[test]
    fn oversized_steps_saturate_instead_of_wrapping() {
        // 2^32 would wrap to 0 under a plain cast
        assert_eq!(coerce_steps(1 << 32), u32::MAX);
        assert_eq!(coerce_steps(i64::MAX), u32::MAX);
        assert_eq!(coerce_steps(i64::from(u32::MAX)), u32::MAX);
        assert!(Goal::new(draft(1 << 32)).steps >= 1);
    }

    #[test]
    fn title_is_trimmed_at_creation() {
        let mut d = draft(1);
        d.title = "  Run a marathon  ".to_string();
        assert_eq!(Goal::new(d).title, "Run a marathon");
    }

    #[test]
    fn progress_follows_step_counter_for_multi_step_goals() {
        let mut goal = Goal::new(draft(4));
        assert_eq!(goal.progress_percent(), 0);
        goal.completed_steps = 3;
        assert_eq!(goal.progress_percent(), 75);
        goal.completed_steps = 4;
        assert_eq!(goal.progress_percent(), 100);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let mut goal = Goal::new(draft(3));
        goal.completed_steps = 1;
        assert_eq!(goal.progress_percent(), 33);
        goal.completed_steps = 2;
        assert_eq!(goal.progress_percent(), 67);
    }

    #[test]
    fn single_step_progress_follows_completed_flag() {
        let mut goal = Goal::new(draft(1));
        assert_eq!(goal.progress_percent(), 0);
        goal.completed = true;
        assert_eq!(goal.progress_percent(), 100);
    }

    #[test]
    fn priority_orders_high_above_medium_above_low() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn deadline_status_counts_days_both_ways() {
        let goal = Goal::new(draft(1));
        let deadline_day = goal.deadline.date_naive();
        assert_eq!(
            goal.deadline_status(deadline_day - chrono::Days::new(3)),
            "3 days left"
        );
        assert_eq!(
            goal.deadline_status(deadline_day - chrono::Days::new(1)),
            "1 day left"
        );
        assert_eq!(goal.deadline_status(deadline_day), "Due today");
        assert_eq!(
            goal.deadline_status(deadline_day + chrono::Days::new(2)),
            "Overdue (2 days ago)"
        );
    }

    #[test]
    fn deadline_status_shows_completion_date_when_done() {
        let mut goal = Goal::new(draft(1));
        goal.completed = true;
        goal.completed_at = Some(Utc.with_ymd_and_hms(2026, 8, 20, 15, 30, 0).unwrap());
        assert_eq!(
            goal.deadline_status(goal.deadline.date_naive()),
            "Completed 2026-08-20"
        );
    }

    #[test]
    fn persisted_json_uses_camel_case_keys_and_lowercase_priority() {
        let goal = Goal::new(draft(2));
        let json = serde_json::to_string(&goal).unwrap();
        assert!(json.contains("\"completedSteps\":0"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"completedAt\":null"));
        assert!(json.contains("\"priority\":\"medium\""));

        let back: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, goal);
    }

    #[test]
    fn theme_mode_round_trips_through_its_string_form() {
        assert_eq!(ThemeMode::parse("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("solarized"), None);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
    }
}
