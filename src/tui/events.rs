use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
// Cursor positioning is handled by ratatui's Frame::set_cursor_position() inside render
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use crate::tui::App;
use crate::tui::error::TuiError;
use crate::tui::widgets::confirm_delete::DELETE_MODAL_OPTIONS;
use crate::utils::parse_key_binding;
use crate::view::Filter;

/// Guard that ensures terminal state is restored even on panic
/// This is critical for TUI applications - if the terminal is left in raw mode
/// or alternate screen, the user's terminal will be unusable.
struct TerminalGuard {
    /// Track if we successfully entered raw mode
    raw_mode_enabled: bool,
    /// Track if we successfully entered alternate screen
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    /// Initialize terminal state and return a guard
    /// The guard will restore terminal state when dropped (even on panic)
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit)
    /// After calling this, the guard will do nothing on drop
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Restore terminal state even if we panic
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen
    // This allows us to show a helpful error message in the normal terminal
    let (width, height) = terminal_size()
        .map_err(|e| TuiError::IoError(e))?;

    use crate::tui::layout::Layout;
    let min_width_with_border = Layout::MIN_WIDTH + 2; // +2 for borders
    let min_height_with_border = Layout::MIN_HEIGHT + 2; // +2 for borders

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    // Setup terminal with guard to ensure restoration on panic
    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        // Per-tick housekeeping: fade the status message, close the undo
        // window when its deadline passes, advance the summary one-liner
        app.check_status_message_timeout();
        app.repository.expire_undo();
        app.rotate_quote();

        // Update form editor scroll before rendering
        if app.ui.mode == crate::tui::app::Mode::Create {
            // Extract values before borrowing editor
            let sidebar_width_percent = app.config.sidebar_width_percent;
            let sidebar_collapsed = app.ui.sidebar_state == crate::tui::app::SidebarState::Collapsed;
            let is_description = app.is_description_field_active();

            if let Some(editor) = app.get_current_form_editor() {
                use crate::tui::widgets::form::{calculate_field_viewport_height, description_field_height};
                let size = terminal.size()?;
                use ratatui::layout::Rect;
                let rect = Rect::new(0, 0, size.width, size.height);
                let layout = Layout::calculate(
                    rect,
                    sidebar_width_percent,
                    sidebar_collapsed,
                );

                // Only the description spans multiple rows; the other
                // fields scroll horizontally within a single row
                let viewport_height = if is_description {
                    let field_height = description_field_height(layout.main_area.height);
                    calculate_field_viewport_height(field_height)
                } else {
                    1
                };

                let viewport_width = layout.main_area.width as usize;
                editor.update_scroll(viewport_height);
                editor.update_horizontal_scroll(viewport_width);
            }
        }

        // Render
        // Get terminal size explicitly to ensure compatibility across different terminals
        let terminal_size = terminal.size()?;
        use ratatui::layout::Rect;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            use crate::tui::layout::Layout;
            // Use explicit terminal size instead of f.area() for better compatibility
            // f.area() should match, but some terminals (like Ghostty) may report differently
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == crate::tui::app::SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Handle events - only process Press events to avoid duplicate processing on Windows
        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only process Press events (ignore Release events to prevent double-processing on Windows)
                    if key_event.kind == KeyEventKind::Press {
                        if handle_key_event(&mut app, key_event)? {
                            break; // Quit requested
                        }
                    }
                }
                Event::Resize(_width, _height) => {
                    // Layout recalculates from terminal.size() on the next draw
                }
                _ => {
                    // Ignore other event types (mouse, etc.)
                }
            }
        }
    }

    // Restore terminal state explicitly (guard will also restore on drop, but this is cleaner)
    guard.restore()?;

    Ok(())
}

fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Handle delete confirmation modal first (before other modes)
    if app.modals.delete_confirmation.is_some() {
        return handle_delete_confirmation_modal(app, key_event);
    }

    // Handle create mode
    // When in create mode, handle form navigation and editor input
    if app.ui.mode == crate::tui::app::Mode::Create {
        return handle_create_mode(app, key_event);
    }

    // Handle help mode
    if app.ui.mode == crate::tui::app::Mode::Help {
        return handle_help_mode(app, key_event);
    }

    handle_global_key_bindings(app, key_event)
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down => {
            // Two options, so either arrow flips the selection
            app.modals.delete_modal_selection =
                (app.modals.delete_modal_selection + 1) % DELETE_MODAL_OPTIONS;
            return Ok(false);
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                // Delete - status message is set by delete_confirmed_goal
                app.delete_confirmed_goal();
            } else {
                // Cancel - just close modal
                app.modals.delete_confirmation = None;
                app.modals.delete_modal_selection = 0;
            }
            return Ok(false);
        }
        KeyCode::Esc => {
            // Cancel deletion
            app.modals.delete_confirmation = None;
            app.modals.delete_modal_selection = 0;
            return Ok(false);
        }
        _ => {
            // Ignore all other keys when confirmation modal is shown
            return Ok(false);
        }
    }
}

fn handle_create_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Check for save binding (Ctrl+s or Alt+s on macOS)
    let save_binding = parse_key_binding(&app.config.key_bindings.save)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    let mut is_save = matches_key_event(key_event, &save_binding);

    // On macOS, Option+s may produce a special character (like 'ś') without ALT modifier
    // Check for this case before the character gets inserted into the editor
    #[cfg(target_os = "macos")]
    {
        if !is_save {
            is_save = match key_event.code {
                KeyCode::Char(c) => {
                    // Option+s on macOS typically produces 'ś' (U+015B)
                    // Also check for other possible Option+s results depending on keyboard layout
                    c == 'ś' || c == 'Ś' || c == 'ß' || c == '§'
                }
                _ => false,
            };
        }
    }

    if is_save {
        // Validation failures surface as status messages
        app.save_create_form();
        return Ok(false);
    }

    // Priority field is a selector: arrow keys cycle it instead of moving a cursor
    // Tab/Shift+Tab/Enter still navigate away from it
    if app.is_priority_field_active() {
        match key_event.code {
            KeyCode::Left | KeyCode::Up => {
                app.cycle_priority(false);
                return Ok(false);
            }
            KeyCode::Right | KeyCode::Down => {
                app.cycle_priority(true);
                return Ok(false);
            }
            _ => {}
        }
    }

    // Check for Tab/Shift+Tab/Enter for field navigation
    // Enter behavior: insert newline if the description is active, otherwise navigate
    match key_event.code {
        KeyCode::BackTab => {
            // Shift+Tab is sometimes sent as BackTab on some terminals
            app.navigate_form_field(false);
            return Ok(false);
        }
        KeyCode::Tab => {
            let forward = !key_event.modifiers.contains(KeyModifiers::SHIFT);
            app.navigate_form_field(forward);
            return Ok(false);
        }
        KeyCode::Enter => {
            if app.is_description_field_active() {
                if let Some(editor) = app.get_current_form_editor() {
                    editor.insert_newline();
                }
            } else {
                app.navigate_form_field(true);
            }
            return Ok(false);
        }
        KeyCode::Esc => {
            // Cancel creation
            app.exit_create_mode();
            return Ok(false);
        }
        _ => {}
    }

    // Forward all other keys to the current form field's editor
    if let Some(editor) = app.get_current_form_editor() {
        match key_event.code {
            KeyCode::Char(c) => {
                // Skip if primary modifier is held so shortcuts don't insert their letter
                if crate::utils::has_primary_modifier(key_event.modifiers) {
                    return Ok(false);
                }
                editor.insert_char(c);
                return Ok(false);
            }
            KeyCode::Backspace => {
                editor.delete_char();
                return Ok(false);
            }
            KeyCode::Up => {
                editor.move_cursor_up();
                return Ok(false);
            }
            KeyCode::Down => {
                editor.move_cursor_down();
                return Ok(false);
            }
            KeyCode::Left => {
                editor.move_cursor_left();
                return Ok(false);
            }
            KeyCode::Right => {
                editor.move_cursor_right();
                return Ok(false);
            }
            KeyCode::Home => {
                editor.move_cursor_home();
                return Ok(false);
            }
            KeyCode::End => {
                editor.move_cursor_end();
                return Ok(false);
            }
            _ => {
                // Ignore other keys in create mode
                return Ok(false);
            }
        }
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => {
            app.exit_help_mode();
            return Ok(false);
        }
        _ => {
            // Check if help binding is pressed again to toggle off
            let help_binding = parse_key_binding(&app.config.key_bindings.help)
                .map_err(|e| TuiError::KeyBindingError(e))?;
            if matches_key_event(key_event, &help_binding) {
                app.exit_help_mode();
                return Ok(false);
            }
            // Ignore all other keys in help mode
            return Ok(false);
        }
    }
}

fn handle_global_key_bindings(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Check for quit key
    let quit_binding = parse_key_binding(&app.config.key_bindings.quit)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &quit_binding) {
        return Ok(true); // Quit
    }

    // Check for toggle sidebar
    let toggle_binding = parse_key_binding(&app.config.key_bindings.toggle_sidebar)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &toggle_binding) {
        app.toggle_sidebar();
        return Ok(false);
    }

    // Check for filter tab navigation - process these early and return to prevent double-processing
    let tab_left_binding = parse_key_binding(&app.config.key_bindings.tab_left)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &tab_left_binding) {
        app.switch_filter(app.ui.current_filter.previous());
        return Ok(false);
    }

    let tab_right_binding = parse_key_binding(&app.config.key_bindings.tab_right)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &tab_right_binding) {
        app.switch_filter(app.ui.current_filter.next());
        return Ok(false);
    }

    // Arrow keys work as an alternative to the configured list bindings
    match key_event.code {
        KeyCode::Up => {
            app.move_selection_up();
            return Ok(false);
        }
        KeyCode::Down => {
            app.move_selection_down();
            return Ok(false);
        }
        _ => {}
    }

    // Check for list navigation bindings
    let list_down_binding = parse_key_binding(&app.config.key_bindings.list_down)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &list_down_binding) {
        app.move_selection_down();
        return Ok(false);
    }

    let list_up_binding = parse_key_binding(&app.config.key_bindings.list_up)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &list_up_binding) {
        app.move_selection_up();
        return Ok(false);
    }

    // Check for filter tab number bindings
    let tab_1_binding = parse_key_binding(&app.config.key_bindings.tab_1)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &tab_1_binding) {
        app.switch_filter(Filter::All);
        return Ok(false);
    }

    let tab_2_binding = parse_key_binding(&app.config.key_bindings.tab_2)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &tab_2_binding) {
        app.switch_filter(Filter::Active);
        return Ok(false);
    }

    let tab_3_binding = parse_key_binding(&app.config.key_bindings.tab_3)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &tab_3_binding) {
        app.switch_filter(Filter::Completed);
        return Ok(false);
    }

    // Check for select binding
    let select_binding = parse_key_binding(&app.config.key_bindings.select)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &select_binding) {
        app.select_current_goal();
        return Ok(false);
    }

    // Check for new binding
    let new_binding = parse_key_binding(&app.config.key_bindings.new)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &new_binding) {
        app.enter_create_mode();
        return Ok(false);
    }

    // Check for edit binding
    let edit_binding = parse_key_binding(&app.config.key_bindings.edit)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &edit_binding) {
        app.enter_edit_mode();
        return Ok(false);
    }

    // Check for delete binding
    let delete_binding = parse_key_binding(&app.config.key_bindings.delete)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &delete_binding) {
        // Show confirmation modal instead of deleting immediately
        if let Some(goal) = app.ui.selected_goal.clone() {
            app.modals.delete_confirmation = Some(goal);
            app.modals.delete_modal_selection = 0; // Initialize to Delete option
        } else {
            app.set_status_message("No goal selected".to_string());
        }
        return Ok(false);
    }

    // Check for toggle goal status binding
    let toggle_goal_status_binding = parse_key_binding(&app.config.key_bindings.toggle_goal_status)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &toggle_goal_status_binding) {
        app.toggle_goal_status();
        return Ok(false);
    }

    // Check for undo binding
    let undo_binding = parse_key_binding(&app.config.key_bindings.undo)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &undo_binding) {
        app.undo_last_toggle();
        return Ok(false);
    }

    // Check for step adjustment bindings
    let step_up_binding = parse_key_binding(&app.config.key_bindings.step_up)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &step_up_binding) {
        app.increment_selected_step();
        return Ok(false);
    }

    let step_down_binding = parse_key_binding(&app.config.key_bindings.step_down)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &step_down_binding) {
        app.decrement_selected_step();
        return Ok(false);
    }

    // Check for sort binding
    let sort_binding = parse_key_binding(&app.config.key_bindings.sort)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &sort_binding) {
        app.cycle_sort();
        return Ok(false);
    }

    // Check for theme binding
    let theme_binding = parse_key_binding(&app.config.key_bindings.theme)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &theme_binding) {
        app.toggle_theme();
        return Ok(false);
    }

    // Check for export binding
    let export_binding = parse_key_binding(&app.config.key_bindings.export)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &export_binding) {
        app.export_dashboard();
        return Ok(false);
    }

    // Check for help binding
    let help_binding = parse_key_binding(&app.config.key_bindings.help)
        .map_err(|e| TuiError::KeyBindingError(e))?;
    if matches_key_event(key_event, &help_binding) {
        app.enter_help_mode();
        return Ok(false);
    }

    Ok(false)
}

fn matches_key_event(key_event: KeyEvent, binding: &crate::utils::ParsedKeyBinding) -> bool {
    // Check modifiers
    // Use primary modifier check (Ctrl on Windows/Linux, Option/Alt on macOS)
    // This follows cross-platform TUI best practices
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }

    // Check key code
    binding.key_code == key_event.code
}
