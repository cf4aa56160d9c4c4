use ratatui::widgets::{Block, Borders, List, ListItem, StatefulWidget, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::widgets::ListState;
use ratatui::text::Line;
use crate::config::Theme;
use crate::models::Goal;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

fn truncate(text: String, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text
    }
}

/// Sidebar list of goal cards. Each card is two lines: status indicator
/// and title, then priority badge, deadline status and progress.
pub fn render_goal_list(
    f: &mut Frame,
    area: Rect,
    goals: &[Goal],
    total_count: usize,
    list_state: &mut ListState,
    theme: &Theme,
) {
    // Max width for truncation (2 for borders, 2 for padding)
    let max_width = area.width.saturating_sub(4) as usize;

    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = if theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&theme.highlight_fg)
    };

    let today = chrono::Utc::now().date_naive();
    let items: Vec<ListItem> = goals
        .iter()
        .map(|goal| {
            let status_indicator = if goal.completed { "✓" } else { "○" };
            let title_line = truncate(
                format!("{} {}", status_indicator, goal.title),
                max_width,
            );

            let progress_str = if goal.steps > 1 {
                format!(" {}%", goal.progress_percent())
            } else {
                String::new()
            };
            let detail_line = truncate(
                format!(
                    "  [{}] {}{}",
                    goal.priority.label(),
                    goal.deadline_status(today),
                    progress_str
                ),
                max_width,
            );

            ListItem::new(vec![Line::from(title_line), Line::from(detail_line)])
        })
        .collect();

    // Split area to reserve space for scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);

    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let title = format!("Goals ({} of {})", goals.len(), total_count);
    let list = List::new(items.clone())
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
        );

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    // Render scrollbar if needed
    let total_items = items.len();
    let list_inner_height = list_area.height.saturating_sub(2) as usize; // Account for borders
    let lines_per_item = 2;
    let visible_items = if list_inner_height >= lines_per_item {
        list_inner_height / lines_per_item
    } else {
        0
    };

    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1, // Start after top border
            scrollbar_area.width,
            list_area.height.saturating_sub(2), // Match inner list height
        );

        if scrollbar_inner_area.width > 0 && scrollbar_inner_area.height > 0 {
            // Scroll position follows the selected index
            let selected_index = list_state.selected().unwrap_or(0);
            let scroll_position = if selected_index < visible_items {
                0
            } else {
                selected_index.saturating_sub(visible_items - 1)
            };

            let mut scrollbar_state = ScrollbarState::new(total_items)
                .viewport_content_length(visible_items)
                .position(scroll_position);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
        }
    }
}
