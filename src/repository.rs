use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Goal, GoalDraft, coerce_steps};
use crate::storage::Store;

const UNDO_WINDOW_SECS: u64 = 5;

/// Single-slot undo for completion toggles. Arming replaces any previous
/// slot, so a stale snapshot can never be restored.
#[derive(Debug)]
enum UndoState {
    Idle,
    Armed { snapshot: Goal, deadline: Instant },
}

/// The ordered goal list, source of truth for the whole session. Every
/// mutation replaces the affected record wholesale and flushes the full
/// list to the store.
pub struct Repository {
    goals: Vec<Goal>,
    store: Store,
    undo: UndoState,
    undo_window: Duration,
}

impl Repository {
    /// Hydrate the repository from whatever the store holds.
    pub fn open(store: Store) -> Self {
        Self::with_undo_window(store, Duration::from_secs(UNDO_WINDOW_SECS))
    }

    fn with_undo_window(store: Store, undo_window: Duration) -> Self {
        let goals = store.load_goals();
        tracing::info!(count = goals.len(), "repository hydrated");
        Self {
            goals,
            store,
            undo: UndoState::Idle,
            undo_window,
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// The store is shared with the theme preference, which lives next to
    /// the goal list under its own key.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create a goal from the draft and prepend it, most-recent-first.
    pub fn create(&mut self, draft: GoalDraft) -> Uuid {
        let goal = Goal::new(draft);
        let id = goal.id;
        tracing::debug!(%id, "goal created");
        self.goals.insert(0, goal);
        self.flush();
        id
    }

    /// Replace the record with the draft's fields, keeping id and createdAt.
    /// Unknown ids are ignored. The progress counter is clamped when the
    /// edit lowers the step total.
    pub fn update(&mut self, id: Uuid, draft: GoalDraft) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let prior = &self.goals[idx];
        let steps = coerce_steps(draft.steps);
        self.goals[idx] = Goal {
            id: prior.id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            deadline: draft.deadline,
            priority: draft.priority,
            steps,
            completed_steps: prior.completed_steps.min(steps),
            completed: prior.completed,
            created_at: prior.created_at,
            completed_at: prior.completed_at,
        };
        tracing::debug!(%id, "goal updated");
        self.flush();
    }

    /// Remove the record. Confirmation happens in the UI; once called,
    /// removal is unconditional and not undoable.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.goals.remove(idx);
        tracing::debug!(%id, "goal deleted");
        self.flush();
        true
    }

    /// Flip the completed flag, stamping or clearing completedAt, and arm
    /// the undo slot with the prior record. Returns the new completed state.
    pub fn toggle_completed(&mut self, id: Uuid) -> Option<bool> {
        let idx = self.index_of(id)?;
        let snapshot = self.goals[idx].clone();

        let mut updated = snapshot.clone();
        updated.completed = !snapshot.completed;
        updated.completed_at = if updated.completed {
            Some(Utc::now())
        } else {
            None
        };
        let now_completed = updated.completed;

        self.goals[idx] = updated;
        self.undo = UndoState::Armed {
            snapshot,
            deadline: Instant::now() + self.undo_window,
        };
        tracing::debug!(%id, completed = now_completed, "completion toggled");
        self.flush();
        Some(now_completed)
    }

    /// Restore the undo snapshot if the window is still open. Consumes the
    /// slot either way.
    pub fn undo_toggle(&mut self) -> bool {
        let undo = std::mem::replace(&mut self.undo, UndoState::Idle);
        match undo {
            UndoState::Armed { snapshot, deadline } if Instant::now() < deadline => {
                let Some(idx) = self.index_of(snapshot.id) else {
                    return false;
                };
                tracing::debug!(id = %snapshot.id, "completion toggle undone");
                self.goals[idx] = snapshot;
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Drop the undo slot once its window has lapsed. Called on every
    /// event-loop tick.
    pub fn expire_undo(&mut self) {
        if let UndoState::Armed { deadline, .. } = &self.undo {
            if Instant::now() >= *deadline {
                self.undo = UndoState::Idle;
            }
        }
    }

    pub fn undo_armed(&self) -> bool {
        matches!(self.undo, UndoState::Armed { .. })
    }

    /// Time left in the undo window, if one is open.
    pub fn undo_remaining(&self) -> Option<Duration> {
        match &self.undo {
            UndoState::Armed { deadline, .. } => {
                let now = Instant::now();
                (now < *deadline).then(|| deadline.duration_since(now))
            }
            UndoState::Idle => None,
        }
    }

    /// Advance progress by one step. No-op on completed goals and at the
    /// step total.
    pub fn increment_step(&mut self, id: Uuid) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let goal = &self.goals[idx];
        if goal.completed || goal.completed_steps == goal.steps {
            return false;
        }
        let mut updated = goal.clone();
        updated.completed_steps += 1;
        self.goals[idx] = updated;
        self.flush();
        true
    }

    /// Roll progress back by one step. No-op on completed goals and at zero.
    pub fn decrement_step(&mut self, id: Uuid) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let goal = &self.goals[idx];
        if goal.completed || goal.completed_steps == 0 {
            return false;
        }
        let mut updated = goal.clone();
        updated.completed_steps -= 1;
        self.goals[idx] = updated;
        self.flush();
        true
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.goals.iter().position(|g| g.id == id)
    }

    fn flush(&self) {
        self.store.save_goals(&self.goals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{TimeZone, Utc};

    fn temp_store(dir: &tempfile::TempDir) -> Store {
        let path = dir.path().join("strive.db");
        Store::open(path.to_str().unwrap()).expect("store should open")
    }

    fn draft(title: &str, steps: i64) -> GoalDraft {
        GoalDraft {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            steps,
        }
    }

    fn assert_step_bounds(repo: &Repository) {
        for goal in repo.goals() {
            assert!(goal.completed_steps <= goal.steps);
        }
    }

    #[test]
    fn create_prepends_and_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        repo.create(draft("first", 1));
        repo.create(draft("second", 1));
        assert_eq!(repo.goals()[0].title, "second");
        assert_eq!(repo.goals()[1].title, "first");

        let reopened = Repository::open(temp_store(&dir));
        assert_eq!(reopened.goals(), repo.goals());
    }

    #[test]
    fn create_coerces_invalid_step_counts_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("zero", 0));
        assert_eq!(repo.get(id).unwrap().steps, 1);
        let id = repo.create(draft("negative", -3));
        assert_eq!(repo.get(id).unwrap().steps, 1);
        assert_step_bounds(&repo);
    }

    #[test]
    fn update_replaces_fields_but_keeps_id_and_created_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("before", 2));
        let created_at = repo.get(id).unwrap().created_at;

        let mut edited = draft("after", 5);
        edited.priority = Priority::High;
        repo.update(id, edited);

        let goal = repo.get(id).unwrap();
        assert_eq!(goal.title, "after");
        assert_eq!(goal.priority, Priority::High);
        assert_eq!(goal.steps, 5);
        assert_eq!(goal.id, id);
        assert_eq!(goal.created_at, created_at);
    }

    #[test]
    fn update_with_unknown_id_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        repo.create(draft("only", 1));
        let before = repo.goals().to_vec();
        repo.update(Uuid::new_v4(), draft("ghost", 1));
        assert_eq!(repo.goals(), before);
    }

    #[test]
    fn update_clamps_progress_when_steps_shrink() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("shrinking", 5));
        for _ in 0..4 {
            repo.increment_step(id);
        }
        repo.update(id, draft("shrinking", 2));
        assert_eq!(repo.get(id).unwrap().completed_steps, 2);
        assert_step_bounds(&repo);
    }

    #[test]
    fn delete_removes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("doomed", 1));
        repo.create(draft("kept", 1));
        assert!(repo.delete(id));
        assert_eq!(repo.goals().len(), 1);
        assert_eq!(repo.goals()[0].title, "kept");
        assert!(!repo.delete(id));
    }

    #[test]
    fn toggle_stamps_and_clears_completed_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("flip", 1));

        assert_eq!(repo.toggle_completed(id), Some(true));
        let goal = repo.get(id).unwrap();
        assert!(goal.completed);
        assert!(goal.completed_at.is_some());

        assert_eq!(repo.toggle_completed(id), Some(false));
        let goal = repo.get(id).unwrap();
        assert!(!goal.completed);
        assert!(goal.completed_at.is_none());
        assert_step_bounds(&repo);
    }

    #[test]
    fn increment_stops_at_the_step_total() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("bounded", 2));
        assert!(repo.increment_step(id));
        assert!(repo.increment_step(id));
        assert!(!repo.increment_step(id));
        assert_eq!(repo.get(id).unwrap().completed_steps, 2);
        assert_step_bounds(&repo);
    }

    #[test]
    fn decrement_stops_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("floored", 3));
        assert!(!repo.decrement_step(id));
        repo.increment_step(id);
        assert!(repo.decrement_step(id));
        assert!(!repo.decrement_step(id));
        assert_eq!(repo.get(id).unwrap().completed_steps, 0);
        assert_step_bounds(&repo);
    }

    #[test]
    fn step_ops_ignore_completed_goals() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("done", 3));
        repo.increment_step(id);
        repo.toggle_completed(id);
        assert!(!repo.increment_step(id));
        assert!(!repo.decrement_step(id));
        assert_eq!(repo.get(id).unwrap().completed_steps, 1);
    }

    #[test]
    fn filling_all_steps_does_not_complete_the_goal() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("four steps", 4));
        for _ in 0..4 {
            assert!(repo.increment_step(id));
        }
        let goal = repo.get(id).unwrap();
        assert_eq!(goal.completed_steps, 4);
        assert!(!goal.completed);
    }

    #[test]
    fn undo_within_window_restores_the_exact_prior_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("revert me", 1));

        repo.toggle_completed(id);
        let first_completed_at = repo.get(id).unwrap().completed_at;
        assert!(first_completed_at.is_some());

        // Toggle back off; undo must restore the completed record including
        // its original completion stamp.
        repo.toggle_completed(id);
        assert!(repo.undo_armed());
        assert!(repo.undo_toggle());

        let goal = repo.get(id).unwrap();
        assert!(goal.completed);
        assert_eq!(goal.completed_at, first_completed_at);
        assert!(!repo.undo_armed());
    }

    #[test]
    fn undo_after_the_window_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::with_undo_window(temp_store(&dir), Duration::ZERO);
        let id = repo.create(draft("too late", 1));

        repo.toggle_completed(id);
        assert!(!repo.undo_toggle());
        let goal = repo.get(id).unwrap();
        assert!(goal.completed);
        assert!(goal.completed_at.is_some());
    }

    #[test]
    fn expire_discards_a_lapsed_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::with_undo_window(temp_store(&dir), Duration::ZERO);
        let id = repo.create(draft("lapsed", 1));

        repo.toggle_completed(id);
        repo.expire_undo();
        assert!(!repo.undo_armed());
        assert!(!repo.undo_toggle());
    }

    #[test]
    fn retoggle_replaces_the_undo_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let first = repo.create(draft("first", 1));
        let second = repo.create(draft("second", 1));

        repo.toggle_completed(first);
        repo.toggle_completed(second);
        assert!(repo.undo_toggle());

        // Only the most recent toggle is covered by the slot.
        assert!(!repo.get(second).unwrap().completed);
        assert!(repo.get(first).unwrap().completed);
        assert!(!repo.undo_toggle());
    }

    #[test]
    fn undo_of_a_deleted_goal_restores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = Repository::open(temp_store(&dir));
        let id = repo.create(draft("gone", 1));
        repo.toggle_completed(id);
        repo.delete(id);
        assert!(!repo.undo_toggle());
        assert!(repo.goals().is_empty());
    }
}
