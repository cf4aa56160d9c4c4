use ratatui::Frame;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Color, Style};
use ratatui::layout::{Alignment, Constraint, Flex, Layout as RatLayout};
use crate::tui::{App, Layout};
use crate::tui::widgets::{
    tabs::render_tabs,
    goal_list::render_goal_list,
    goal_view::render_goal_view,
    summary::render_summary,
    status_bar::render_status_bar,
    help::render_help,
    form::render_goal_form,
    color::parse_color,
    confirm_delete::render_confirm_delete,
};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Render outer border with "STRIVE" title centered in top border
    // Use theme colors for consistent appearance
    let theme = app.config.theme_for(app.theme);
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    // Frames below the layout minimum get a centered notice instead of
    // clipped widgets. Startup refuses undersized terminals before the
    // alternate screen; this catches a mid-session shrink.
    if f.area().width < Layout::MIN_WIDTH + 2 || f.area().height < Layout::MIN_HEIGHT + 2 {
        render_resize_notice(f, fg_color, bg_color);
        return;
    }

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("STRIVE")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    // Render filter tabs - following ratatui example: tabs render in 1 line without Block
    // Content areas below have borders that visually connect
    render_tabs(f, layout.tabs_area, app.ui.current_filter, &theme);

    // Render sidebar if not collapsed
    if app.ui.sidebar_state == crate::tui::app::SidebarState::Expanded
        && layout.sidebar_area.width > 0
    {
        let goals = app.visible_goals();
        let total_count = app.repository.goals().len();
        render_goal_list(
            f,
            layout.sidebar_area,
            &goals,
            total_count,
            &mut app.ui.list_state,
            &theme,
        );
    }

    // Render main pane (always render normal content first)
    // Note: Help mode renders a popup overlay separately after normal content
    match app.ui.mode {
        crate::tui::app::Mode::View | crate::tui::app::Mode::Help => {
            if let Some(ref goal) = app.ui.selected_goal {
                render_goal_view(f, layout.main_area, goal, &app.config, &theme);
            } else {
                // Empty state
                let empty_text = if app.repository.goals().is_empty() {
                    format!(
                        "No goals yet. Press {} to create one.",
                        crate::utils::format_key_binding_for_display(&app.config.key_bindings.new)
                    )
                } else {
                    "Select a goal to view details".to_string()
                };
                let paragraph = Paragraph::new(empty_text)
                    .block(Block::default().borders(Borders::ALL).title("Goal"))
                    .style(Style::default().fg(fg_color));
                f.render_widget(paragraph, layout.main_area);
            }
        }
        crate::tui::app::Mode::Create => {
            if let Some(ref form) = app.form.create_form {
                render_goal_form(f, layout.main_area, form, &theme);
            } else {
                // Empty state (shouldn't happen)
                let paragraph = Paragraph::new("No form")
                    .block(Block::default().borders(Borders::ALL).title("Goal"))
                    .style(Style::default().fg(fg_color));
                f.render_widget(paragraph, layout.main_area);
            }
        }
    }

    // Render summary panel with counts, active sort and the rotating one-liner
    let summary = app.summary();
    render_summary(
        f,
        layout.summary_area,
        &summary,
        app.ui.sort_key,
        app.current_quote(),
        &theme,
    );

    // Render help popup overlay if in help mode (after normal content)
    if app.ui.mode == crate::tui::app::Mode::Help {
        render_help(f, f.area(), &app.config, &theme);
    }

    // Render delete confirmation modal if pending (after normal content)
    if let Some(ref goal) = app.modals.delete_confirmation {
        render_confirm_delete(f, f.area(), goal, app.modals.delete_modal_selection, &theme);
    }

    // Render status bar
    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &theme);
}

/// Centered notice shown when the frame is smaller than the layout minimum
fn render_resize_notice(f: &mut Frame, fg: Color, bg: Color) {
    f.render_widget(
        Block::default().style(Style::default().fg(fg).bg(bg)),
        f.area(),
    );

    let text = format!(
        "Terminal too small.\nResize to at least {}x{}.",
        Layout::MIN_WIDTH + 2,
        Layout::MIN_HEIGHT + 2
    );
    let [notice_area] = RatLayout::vertical([Constraint::Length(2)])
        .flex(Flex::Center)
        .areas(f.area());
    let notice = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(notice, notice_area);
}

fn get_key_hints(app: &App) -> Vec<String> {
    match app.ui.mode {
        crate::tui::app::Mode::Help => {
            vec![
                format!("Esc or {}: Exit help", crate::utils::format_key_binding_for_display(&app.config.key_bindings.help)),
            ]
        }
        crate::tui::app::Mode::Create => {
            vec![
                "Tab/Enter: Next field".to_string(),
                "Shift+Tab: Previous field".to_string(),
                format!("{}: Save", crate::utils::format_key_binding_for_display(&app.config.key_bindings.save)),
                "Esc: Cancel".to_string(),
            ]
        }
        _ => {
            let mut hints = Vec::new();

            // Live countdown while the completion toggle can still be undone
            if let Some(remaining) = app.repository.undo_remaining() {
                hints.push(format!(
                    "{}: Undo ({}s)",
                    crate::utils::format_key_binding_for_display(&app.config.key_bindings.undo),
                    remaining.as_secs() + 1
                ));
            }

            hints.push(format!("{}: Quit", crate::utils::format_key_binding_for_display(&app.config.key_bindings.quit)));
            hints.push(format!("{}: New", crate::utils::format_key_binding_for_display(&app.config.key_bindings.new)));
            hints.push(format!("{}: Edit", crate::utils::format_key_binding_for_display(&app.config.key_bindings.edit)));
            hints.push(format!("{}: Delete", crate::utils::format_key_binding_for_display(&app.config.key_bindings.delete)));
            hints.push(format!("{}: Done/Active", crate::utils::format_key_binding_for_display(&app.config.key_bindings.toggle_goal_status)));
            hints.push(format!(
                "{}/{}: Steps",
                crate::utils::format_key_binding_for_display(&app.config.key_bindings.step_up),
                crate::utils::format_key_binding_for_display(&app.config.key_bindings.step_down)
            ));
            hints.push(format!("{}: Sort", crate::utils::format_key_binding_for_display(&app.config.key_bindings.sort)));
            hints.push(format!("{}: Export", crate::utils::format_key_binding_for_display(&app.config.key_bindings.export)));
            hints.push(format!("{}: Theme", crate::utils::format_key_binding_for_display(&app.config.key_bindings.theme)));
            hints.push(format!("{}: Help", crate::utils::format_key_binding_for_display(&app.config.key_bindings.help)));

            hints
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::repository::Repository;
    use crate::storage::Store;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn test_app(dir: &tempfile::TempDir) -> App {
        let path = dir.path().join("strive.db");
        let store = Store::open(path.to_str().unwrap()).expect("store should open");
        App::new(Config::default(), Repository::open(store))
    }

    /// Draw one frame at the given size and flatten the buffer to a string
    fn draw_screen(width: u16, height: u16, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(f.area(), app.config.sidebar_width_percent, false);
                render(f, app, &layout);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn undersized_frame_shows_a_resize_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        let screen = draw_screen(30, 8, &mut app);

        assert!(screen.contains("Terminal too small."));
        assert!(screen.contains("Resize to at least 40x12."));
        assert!(!screen.contains("STRIVE"));
    }

    #[test]
    fn minimum_sized_frame_renders_the_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        let screen = draw_screen(
            Layout::MIN_WIDTH + 2,
            Layout::MIN_HEIGHT + 2,
            &mut app,
        );

        assert!(screen.contains("STRIVE"));
        assert!(!screen.contains("Terminal too small."));
    }
}
