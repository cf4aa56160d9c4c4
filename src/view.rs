use crate::models::Goal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn passes(&self, goal: &Goal) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !goal.completed,
            Filter::Completed => goal.completed,
        }
    }

    pub fn next(&self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn previous(&self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Active => Filter::All,
            Filter::Completed => Filter::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedDesc,
    DeadlineAsc,
    DeadlineDesc,
    PriorityDesc,
    PriorityAsc,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::CreatedDesc => "Newest first",
            SortKey::DeadlineAsc => "Deadline (soonest)",
            SortKey::DeadlineDesc => "Deadline (latest)",
            SortKey::PriorityDesc => "Priority (highest)",
            SortKey::PriorityAsc => "Priority (lowest)",
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::CreatedDesc => SortKey::DeadlineAsc,
            SortKey::DeadlineAsc => SortKey::DeadlineDesc,
            SortKey::DeadlineDesc => SortKey::PriorityDesc,
            SortKey::PriorityDesc => SortKey::PriorityAsc,
            SortKey::PriorityAsc => SortKey::CreatedDesc,
        }
    }
}

/// Project the goal list for display: filter, then stable-sort. The source
/// list is never touched; ties keep their repository order.
pub fn visible_goals(goals: &[Goal], filter: Filter, sort: SortKey) -> Vec<Goal> {
    let mut visible: Vec<Goal> = goals.iter().filter(|g| filter.passes(g)).cloned().collect();
    match sort {
        SortKey::CreatedDesc => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DeadlineAsc => visible.sort_by(|a, b| a.deadline.cmp(&b.deadline)),
        SortKey::DeadlineDesc => visible.sort_by(|a, b| b.deadline.cmp(&a.deadline)),
        SortKey::PriorityDesc => visible.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortKey::PriorityAsc => visible.sort_by(|a, b| a.priority.cmp(&b.priority)),
    }
    visible
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Counts over the full list, independent of the active filter.
pub fn summarize(goals: &[Goal]) -> Summary {
    let completed = goals.iter().filter(|g| g.completed).count();
    Summary {
        total: goals.len(),
        completed,
        pending: goals.len() - completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalDraft, Priority};
    use chrono::{TimeZone, Utc};

    fn goal(title: &str, priority: Priority, completed: bool, day: u32) -> Goal {
        let mut goal = Goal::new(GoalDraft {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2026, 11, day, 0, 0, 0).unwrap(),
            priority,
            steps: 1,
        });
        goal.completed = completed;
        if completed {
            goal.completed_at = Some(goal.deadline);
        }
        // Deterministic creation order: later day, later creation.
        goal.created_at = Utc.with_ymd_and_hms(2026, 8, day, 0, 0, 0).unwrap();
        goal
    }

    fn fixture() -> Vec<Goal> {
        vec![
            goal("write", Priority::Low, false, 3),
            goal("run", Priority::High, true, 1),
            goal("read", Priority::Medium, true, 2),
            goal("paint", Priority::High, false, 4),
        ]
    }

    #[test]
    fn filters_partition_by_completion() {
        let goals = fixture();
        assert_eq!(visible_goals(&goals, Filter::All, SortKey::default()).len(), 4);

        let active = visible_goals(&goals, Filter::Active, SortKey::default());
        assert!(active.iter().all(|g| !g.completed));
        assert_eq!(active.len(), 2);

        let completed = visible_goals(&goals, Filter::Completed, SortKey::default());
        assert!(completed.iter().all(|g| g.completed));
        assert_eq!(completed.len(), 2);
    }

    #[test]
    fn default_sort_is_newest_creation_first() {
        let titles: Vec<String> = visible_goals(&fixture(), Filter::All, SortKey::CreatedDesc)
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, ["paint", "write", "read", "run"]);
    }

    #[test]
    fn deadline_sorts_run_both_directions() {
        let goals = fixture();
        let soonest: Vec<String> = visible_goals(&goals, Filter::All, SortKey::DeadlineAsc)
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(soonest, ["run", "read", "write", "paint"]);

        let latest: Vec<String> = visible_goals(&goals, Filter::All, SortKey::DeadlineDesc)
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(latest, ["paint", "write", "read", "run"]);
    }

    #[test]
    fn completed_filter_with_priority_sort_composes() {
        let mut goals = fixture();
        goals.push(goal("stretch", Priority::Low, true, 5));

        let ordered = visible_goals(&goals, Filter::Completed, SortKey::PriorityDesc);
        assert!(ordered.iter().all(|g| g.completed));
        let priorities: Vec<Priority> = ordered.iter().map(|g| g.priority).collect();
        assert_eq!(priorities, [Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn priority_ties_keep_repository_order() {
        let goals = vec![
            goal("alpha", Priority::High, false, 1),
            goal("beta", Priority::High, false, 2),
            goal("gamma", Priority::Low, false, 3),
        ];
        let ordered = visible_goals(&goals, Filter::All, SortKey::PriorityDesc);
        assert_eq!(ordered[0].title, "alpha");
        assert_eq!(ordered[1].title, "beta");
        assert_eq!(ordered[2].title, "gamma");
    }

    #[test]
    fn projection_leaves_the_source_untouched() {
        let goals = fixture();
        let before = goals.clone();
        let _ = visible_goals(&goals, Filter::Active, SortKey::PriorityAsc);
        assert_eq!(goals, before);
    }

    #[test]
    fn summary_counts_total_completed_and_pending() {
        let summary = summarize(&fixture());
        assert_eq!(
            summary,
            Summary {
                total: 4,
                completed: 2,
                pending: 2,
            }
        );
        assert_eq!(
            summarize(&[]),
            Summary {
                total: 0,
                completed: 0,
                pending: 0,
            }
        );
    }

    #[test]
    fn filter_cycling_wraps_in_both_directions() {
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Completed.next(), Filter::All);
        assert_eq!(Filter::All.previous(), Filter::Completed);
        let mut sort = SortKey::default();
        for _ in 0..5 {
            sort = sort.next();
        }
        assert_eq!(sort, SortKey::CreatedDesc);
    }
}
