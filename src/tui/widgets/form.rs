use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Constraint, Layout, Direction};
use ratatui::text::{Line, Span};
use crate::config::Theme;
use crate::models::Priority;
use crate::tui::app::{GoalForm, GoalField};
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::color::parse_color;

/// Field order and heights for the goal form. Kept in one place so the
/// scroll handling in the event loop sees the same layout the renderer does.
fn field_constraints() -> [Constraint; 5] {
    [
        Constraint::Length(3), // Title
        Constraint::Min(5),    // Description (minimum 5 lines for multi-line)
        Constraint::Length(3), // Deadline
        Constraint::Length(3), // Priority
        Constraint::Length(3), // Steps
    ]
}

/// Content rows inside a bordered field (total height minus the borders)
pub fn calculate_field_viewport_height(field_area_height: u16) -> usize {
    field_area_height.saturating_sub(2) as usize
}

/// Height the description field gets for a given main area height
pub fn description_field_height(main_area_height: u16) -> u16 {
    // Width is irrelevant for a vertical split; use a fixed test width
    let test_area = Rect::new(0, 0, 80, main_area_height);
    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(field_constraints())
        .split(test_area);
    field_areas[1].height
}

/// First line of a single-line field, clipped to the field's horizontal
/// scroll window
fn single_line_text(editor: &Editor, field_width: u16) -> String {
    let (_, visible) = editor.get_visible_lines(1, field_width as usize);
    visible.into_iter().next().unwrap_or_default()
}

pub fn render_goal_form(f: &mut Frame, area: Rect, form: &GoalForm, theme: &Theme) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let highlight_style = Style::default()
        .bg(parse_color(&theme.highlight_bg))
        .fg(parse_color(&theme.highlight_fg));
    let inactive_field_style = Style::default()
        .fg(parse_color(&theme.fg))
        .add_modifier(Modifier::DIM);

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(field_constraints())
        .split(area);

    // Title field
    let is_title_active = form.current_field == GoalField::Title;
    let title_style = if is_title_active { highlight_style } else { inactive_field_style };
    let title_paragraph = Paragraph::new(Line::from(Span::styled(
        single_line_text(&form.title, field_areas[0].width),
        title_style,
    )))
    .block(Block::default().borders(Borders::ALL).title("Title"));
    f.render_widget(title_paragraph, field_areas[0]);

    // Description field (multi-line)
    let is_desc_active = form.current_field == GoalField::Description;
    let desc_style = if is_desc_active { highlight_style } else { inactive_field_style };

    let content_height = calculate_field_viewport_height(field_areas[1].height);
    let total_lines = form.description.lines.len();
    let needs_scrollbar = total_lines > content_height;

    // Reserve the rightmost column for the scrollbar when content overflows
    let (desc_area, scrollbar_area) = if needs_scrollbar {
        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(field_areas[1]);
        (horizontal_chunks[0], Some(horizontal_chunks[1]))
    } else {
        (field_areas[1], None)
    };

    let (scroll_start, visible) =
        form.description.get_visible_lines(content_height, desc_area.width as usize);
    let desc_lines: Vec<Line> = visible
        .into_iter()
        .map(|line| Line::from(Span::styled(line, desc_style)))
        .collect();
    let desc_paragraph = Paragraph::new(desc_lines)
        .style(desc_style)
        .block(Block::default().borders(Borders::ALL).title("Description"));
    f.render_widget(desc_paragraph, desc_area);

    if let Some(scrollbar_area) = scrollbar_area {
        if scrollbar_area.width > 0 && desc_area.height > 2 {
            let scrollbar_inner_area = Rect::new(
                scrollbar_area.x,
                desc_area.y + 1,
                scrollbar_area.width,
                desc_area.height.saturating_sub(2),
            );
            if scrollbar_inner_area.width > 0 && scrollbar_inner_area.height > 0 {
                let mut scrollbar_state = ScrollbarState::new(total_lines)
                    .viewport_content_length(content_height)
                    .position(scroll_start);
                let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓"))
                    .track_symbol(Some("│"))
                    .thumb_symbol("█");
                f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
            }
        }
    }

    // Deadline field
    let is_deadline_active = form.current_field == GoalField::Deadline;
    let deadline_style = if is_deadline_active { highlight_style } else { inactive_field_style };
    let deadline_paragraph = Paragraph::new(Line::from(Span::styled(
        single_line_text(&form.deadline, field_areas[2].width),
        deadline_style,
    )))
    .block(Block::default().borders(Borders::ALL).title("Deadline (YYYY-MM-DD)"));
    f.render_widget(deadline_paragraph, field_areas[2]);

    // Priority field: a selector cycled with the arrow keys, no cursor
    let is_priority_active = form.current_field == GoalField::Priority;
    let priority_style = if is_priority_active { highlight_style } else { inactive_field_style };
    let priority = Priority::ALL[form.priority_index % Priority::ALL.len()];
    let priority_display = if is_priority_active {
        format!("< {} >", priority.label())
    } else {
        priority.label().to_string()
    };
    let priority_paragraph = Paragraph::new(priority_display)
        .block(Block::default().borders(Borders::ALL).title("Priority"))
        .style(priority_style);
    f.render_widget(priority_paragraph, field_areas[3]);

    // Steps field
    let is_steps_active = form.current_field == GoalField::Steps;
    let steps_style = if is_steps_active { highlight_style } else { inactive_field_style };
    let steps_paragraph = Paragraph::new(Line::from(Span::styled(
        single_line_text(&form.steps, field_areas[4].width),
        steps_style,
    )))
    .block(Block::default().borders(Borders::ALL).title("Steps"));
    f.render_widget(steps_paragraph, field_areas[4]);

    // Set cursor position for the active field
    if let Some((x, y)) = cursor_position(form, &field_areas) {
        f.set_cursor_position((x, y));
    }
}

fn cursor_position(form: &GoalForm, field_areas: &[Rect]) -> Option<(u16, u16)> {
    let (editor, field_area, viewport_height) = match form.current_field {
        GoalField::Title => (&form.title, field_areas[0], 1),
        GoalField::Description => (
            &form.description,
            field_areas[1],
            calculate_field_viewport_height(field_areas[1].height),
        ),
        GoalField::Deadline => (&form.deadline, field_areas[2], 1),
        GoalField::Priority => return None, // Selector field doesn't use a cursor
        GoalField::Steps => (&form.steps, field_areas[4], 1),
    };
    editor.get_cursor_screen_pos(field_area, viewport_height)
}
