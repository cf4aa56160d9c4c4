use crate::Config;
use crate::export;
use crate::models::{Goal, GoalDraft, Priority, ThemeMode};
use crate::repository::Repository;
use crate::tui::widgets::editor::Editor;
use crate::utils;
use crate::view::{self, Filter, SortKey, Summary};
use ratatui::widgets::ListState;
use std::cmp;
use std::time::Instant;
use uuid::Uuid;

/// Seconds between rotations of the summary panel one-liner
const QUOTE_ROTATION_SECS: u64 = 15;

/// Cosmetic one-liners cycled through in the summary panel
const MOTIVATIONAL_QUOTES: &[&str] = &[
    "Small steps every day add up.",
    "Done is better than perfect.",
    "A goal without a deadline is just a wish.",
    "Progress, not perfection.",
    "You don't have to see the whole staircase.",
    "Start where you are. Use what you have.",
    "The best time to start was yesterday. The next best is now.",
    "Discipline is choosing what you want most.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Title,
    Description,
    Deadline,
    Priority,
    Steps,
}

#[derive(Debug, Clone)]
pub struct GoalForm {
    pub current_field: GoalField,
    pub title: Editor,
    pub description: Editor,
    pub deadline: Editor,
    pub steps: Editor,
    pub priority_index: usize, // index into Priority::ALL
    pub editing_goal_id: Option<Uuid>, // None for new goals, Some(id) for editing
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_filter: Filter,
    pub sort_key: SortKey,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub selected_goal: Option<Goal>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_filter: Filter::All,
            sort_key: SortKey::CreatedDesc,
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            selected_goal: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModalState {
    pub delete_confirmation: Option<Goal>,
    pub delete_modal_selection: usize,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            delete_confirmation: None,
            delete_modal_selection: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            message: None,
            message_time: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MotivationState {
    pub quote_index: usize,
    pub last_rotation: Instant,
}

impl Default for MotivationState {
    fn default() -> Self {
        Self {
            quote_index: 0,
            last_rotation: Instant::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub create_form: Option<GoalForm>,
}

impl Default for FormState {
    fn default() -> Self {
        Self { create_form: None }
    }
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub repository: Repository,

    // Display mode, persisted to the store on every toggle
    pub theme: ThemeMode,

    // Grouped state
    pub ui: UiState,
    pub modals: ModalState,
    pub status: StatusState,
    pub form: FormState,
    pub motivation: MotivationState,
}

impl App {
    pub fn new(config: Config, repository: Repository) -> Self {
        let theme = repository
            .store()
            .load_theme()
            .unwrap_or_else(utils::detect_ambient_theme);

        let mut app = Self {
            config,
            repository,
            theme,
            ui: UiState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
            form: FormState::default(),
            motivation: MotivationState::default(),
        };

        app.sync_list_state();
        // Auto-select the first goal if available
        app.select_current_goal();
        app
    }

    /// The filtered and sorted projection currently on screen.
    /// Recomputed from the repository on every call; goal lists are small.
    pub fn visible_goals(&self) -> Vec<Goal> {
        view::visible_goals(
            self.repository.goals(),
            self.ui.current_filter,
            self.ui.sort_key,
        )
    }

    /// Counts over the full, unfiltered list
    pub fn summary(&self) -> Summary {
        view::summarize(self.repository.goals())
    }

    pub fn select_current_goal(&mut self) {
        let goals = self.visible_goals();
        if goals.is_empty() {
            self.ui.selected_goal = None;
            return;
        }

        // If the index fell out of bounds, try to recover the position of
        // the goal that was selected before resetting to the top.
        if self.ui.selected_index >= goals.len() {
            let recovered = self.ui.selected_goal.as_ref().and_then(|selected| {
                goals.iter().position(|goal| goal.id == selected.id)
            });
            self.ui.selected_index = recovered.unwrap_or(0);
            self.sync_list_state();
        }

        self.ui.selected_goal = goals.get(self.ui.selected_index).cloned();
    }

    pub fn adjust_selected_index(&mut self) {
        let goals = self.visible_goals();
        if goals.is_empty() {
            self.ui.selected_index = 0;
            self.ui.selected_goal = None;
        } else if self.ui.selected_index >= goals.len() {
            let recovered = self.ui.selected_goal.as_ref().and_then(|selected| {
                goals.iter().position(|goal| goal.id == selected.id)
            });
            self.ui.selected_index = recovered.unwrap_or(0);
        } else {
            self.ui.selected_index = cmp::min(self.ui.selected_index, goals.len() - 1);
        }
        self.sync_list_state();
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
            self.select_current_goal();
        }
    }

    pub fn move_selection_down(&mut self) {
        let goals = self.visible_goals();
        if self.ui.selected_index < goals.len().saturating_sub(1) {
            self.ui.selected_index += 1;
            self.sync_list_state();
            self.select_current_goal();
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    /// Switch to a new filter tab and auto-select the first goal under it
    pub fn switch_filter(&mut self, filter: Filter) {
        self.ui.current_filter = filter;
        self.ui.selected_index = 0;
        self.sync_list_state();
        self.select_current_goal();
    }

    pub fn cycle_sort(&mut self) {
        self.ui.sort_key = self.ui.sort_key.next();
        // Keep the same goal under the cursor across the reorder
        if let Some(selected) = self.ui.selected_goal.clone() {
            let goals = self.visible_goals();
            if let Some(index) = goals.iter().position(|goal| goal.id == selected.id) {
                self.ui.selected_index = index;
                self.sync_list_state();
            }
        }
        self.set_status_message(format!("Sorted by: {}", self.ui.sort_key.label()));
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.repository.store().save_theme(self.theme);
        self.set_status_message(format!("Switched to {} theme", self.theme.as_str()));
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn current_quote(&self) -> &'static str {
        MOTIVATIONAL_QUOTES[self.motivation.quote_index % MOTIVATIONAL_QUOTES.len()]
    }

    /// Advance the summary panel one-liner when its interval has lapsed
    pub fn rotate_quote(&mut self) {
        if self.motivation.last_rotation.elapsed().as_secs() >= QUOTE_ROTATION_SECS {
            self.motivation.quote_index =
                (self.motivation.quote_index + 1) % MOTIVATIONAL_QUOTES.len();
            self.motivation.last_rotation = Instant::now();
        }
    }

    pub fn enter_create_mode(&mut self) {
        self.form.create_form = Some(GoalForm {
            current_field: GoalField::Title,
            title: Editor::new(),
            description: Editor::new(),
            // Prefill with today so the expected format is visible
            deadline: Editor::from_string(utils::get_current_date_string()),
            steps: Editor::from_string("1".to_string()),
            priority_index: 1, // Medium
            editing_goal_id: None,
        });
        self.ui.mode = Mode::Create;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(goal) = self.ui.selected_goal.clone() else {
            self.set_status_message("No goal selected".to_string());
            return;
        };

        let priority_index = Priority::ALL
            .iter()
            .position(|p| *p == goal.priority)
            .unwrap_or(1);

        self.form.create_form = Some(GoalForm {
            current_field: GoalField::Title,
            title: Editor::from_string(goal.title.clone()),
            description: Editor::from_string(goal.description.clone()),
            deadline: Editor::from_string(utils::format_date(&goal.deadline)),
            steps: Editor::from_string(goal.steps.to_string()),
            priority_index,
            editing_goal_id: Some(goal.id),
        });
        self.ui.mode = Mode::Create;
    }

    pub fn exit_create_mode(&mut self) {
        self.ui.mode = Mode::View;
        self.form.create_form = None;
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    /// Move to the next (or previous) form field, wrapping around
    pub fn navigate_form_field(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form.create_form {
            form.current_field = match (form.current_field, forward) {
                (GoalField::Title, true) => GoalField::Description,
                (GoalField::Description, true) => GoalField::Deadline,
                (GoalField::Deadline, true) => GoalField::Priority,
                (GoalField::Priority, true) => GoalField::Steps,
                (GoalField::Steps, true) => GoalField::Title,
                (GoalField::Title, false) => GoalField::Steps,
                (GoalField::Description, false) => GoalField::Title,
                (GoalField::Deadline, false) => GoalField::Description,
                (GoalField::Priority, false) => GoalField::Deadline,
                (GoalField::Steps, false) => GoalField::Priority,
            };
        }
    }

    /// Editor for the active form field; None for the priority selector
    pub fn get_current_form_editor(&mut self) -> Option<&mut Editor> {
        let form = self.form.create_form.as_mut()?;
        match form.current_field {
            GoalField::Title => Some(&mut form.title),
            GoalField::Description => Some(&mut form.description),
            GoalField::Deadline => Some(&mut form.deadline),
            GoalField::Steps => Some(&mut form.steps),
            GoalField::Priority => None,
        }
    }

    /// Whether the multi-line description field has focus
    pub fn is_description_field_active(&self) -> bool {
        self.form
            .create_form
            .as_ref()
            .map(|form| form.current_field == GoalField::Description)
            .unwrap_or(false)
    }

    pub fn is_priority_field_active(&self) -> bool {
        self.form
            .create_form
            .as_ref()
            .map(|form| form.current_field == GoalField::Priority)
            .unwrap_or(false)
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form.create_form {
            let len = Priority::ALL.len();
            form.priority_index = if forward {
                (form.priority_index + 1) % len
            } else {
                (form.priority_index + len - 1) % len
            };
        }
    }

    /// Title and deadline are validated; the step count is coerced on
    /// save instead of being rejected here.
    pub fn validate_goal_form(&self) -> Result<(), String> {
        let Some(ref form) = self.form.create_form else {
            return Err("No form".to_string());
        };

        if form.title.to_string().trim().is_empty() {
            return Err("Title is required".to_string());
        }

        let deadline_text = form.deadline.to_string();
        if chrono::NaiveDate::parse_from_str(deadline_text.trim(), "%Y-%m-%d").is_err() {
            return Err("Deadline must be in YYYY-MM-DD format".to_string());
        }

        Ok(())
    }

    pub fn save_create_form(&mut self) {
        if let Err(e) = self.validate_goal_form() {
            self.set_status_message(format!("Validation error: {}", e));
            return;
        }

        let Some(ref form) = self.form.create_form else {
            return;
        };

        let deadline = match utils::parse_deadline(form.deadline.to_string().trim()) {
            Ok(deadline) => deadline,
            Err(e) => {
                self.set_status_message(format!("Validation error: {}", e));
                return;
            }
        };

        let draft = GoalDraft {
            title: form.title.to_string().trim().to_string(),
            description: form.description.to_string().trim().to_string(),
            deadline,
            priority: Priority::ALL[form.priority_index % Priority::ALL.len()],
            steps: form.steps.to_string().trim().parse::<i64>().unwrap_or(1),
        };
        let editing_goal_id = form.editing_goal_id;

        if let Some(id) = editing_goal_id {
            self.repository.update(id, draft);
            self.adjust_selected_index();
            self.select_current_goal();
            self.set_status_message("Goal updated".to_string());
        } else {
            self.repository.create(draft);
            // New goals are prepended under the default sort; put the
            // cursor on the goal that was just written.
            self.ui.selected_index = 0;
            self.adjust_selected_index();
            self.select_current_goal();
            self.set_status_message("Goal created".to_string());
        }

        self.exit_create_mode();
    }

    /// Flip completion on the selected goal, arming the undo window
    pub fn toggle_goal_status(&mut self) {
        let Some(id) = self.ui.selected_goal.as_ref().map(|goal| goal.id) else {
            self.set_status_message("No goal selected".to_string());
            return;
        };

        match self.repository.toggle_completed(id) {
            Some(completed) => {
                self.adjust_selected_index();
                self.select_current_goal();
                let undo_key =
                    utils::format_key_binding_for_display(&self.config.key_bindings.undo);
                let state = if completed { "done" } else { "active" };
                self.set_status_message(format!("Goal marked as {} ({}: undo)", state, undo_key));
            }
            None => {
                self.set_status_message("No goal selected".to_string());
            }
        }
    }

    pub fn undo_last_toggle(&mut self) {
        if self.repository.undo_toggle() {
            self.adjust_selected_index();
            self.select_current_goal();
            self.set_status_message("Completion change undone".to_string());
        } else {
            self.set_status_message("Nothing to undo".to_string());
        }
    }

    pub fn increment_selected_step(&mut self) {
        let Some(id) = self.ui.selected_goal.as_ref().map(|goal| goal.id) else {
            self.set_status_message("No goal selected".to_string());
            return;
        };
        if self.repository.increment_step(id) {
            self.select_current_goal();
            if let Some((done, total)) = self.selected_step_counts() {
                self.set_status_message(format!("Progress: {}/{} steps", done, total));
            }
        }
    }

    pub fn decrement_selected_step(&mut self) {
        let Some(id) = self.ui.selected_goal.as_ref().map(|goal| goal.id) else {
            self.set_status_message("No goal selected".to_string());
            return;
        };
        if self.repository.decrement_step(id) {
            self.select_current_goal();
            if let Some((done, total)) = self.selected_step_counts() {
                self.set_status_message(format!("Progress: {}/{} steps", done, total));
            }
        }
    }

    fn selected_step_counts(&self) -> Option<(u32, u32)> {
        self.ui
            .selected_goal
            .as_ref()
            .map(|goal| (goal.completed_steps, goal.steps))
    }

    /// Delete the goal held by the confirmation modal
    pub fn delete_confirmed_goal(&mut self) {
        let Some(goal) = self.modals.delete_confirmation.take() else {
            return;
        };
        self.modals.delete_modal_selection = 0;

        if self.repository.delete(goal.id) {
            self.adjust_selected_index();
            self.select_current_goal();
            self.set_status_message("Goal deleted".to_string());
        } else {
            self.set_status_message("Goal not found".to_string());
        }
    }

    /// Render the visible dashboard to a text document in the download
    /// directory. Runs synchronously; the status bar reports the outcome.
    pub fn export_dashboard(&mut self) {
        let visible = self.visible_goals();
        let summary = self.summary();
        let dir = export::default_export_dir();
        match export::export_dashboard(
            &visible,
            summary,
            self.ui.current_filter,
            self.ui.sort_key,
            &dir,
        ) {
            Ok(path) => self.set_status_message(format!("Exported to {}", path.display())),
            Err(e) => self.set_status_message(format!("Export failed: {}", e)),
        }
    }
}
