use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::style::{Modifier, Style};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout as RatLayout, Direction, Constraint};
use ratatui::text::{Line, Span};
use crate::Config;
use crate::config::Theme;
use crate::models::Goal;
use crate::tui::widgets::color::parse_color;
use crate::utils::{format_date, format_key_binding_for_display};

/// Detail pane for the selected goal: full fields, a progress gauge when
/// the goal tracks more than one step, and the step adjustment hints.
pub fn render_goal_view(f: &mut Frame, area: Rect, goal: &Goal, config: &Config, theme: &Theme) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let fg_color = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    // Reserve a gauge row under the text for multi-step goals
    let (text_area, gauge_area) = if goal.steps > 1 {
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);
        (vertical[0], Some(vertical[1]))
    } else {
        (area, None)
    };

    let today = chrono::Utc::now().date_naive();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            goal.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let status = if goal.completed { "Done" } else { "Active" };
    lines.push(Line::from(format!("Status: {}", status)));
    lines.push(Line::from(format!("Priority: {}", goal.priority.label())));
    lines.push(Line::from(format!(
        "Deadline: {} ({})",
        format_date(&goal.deadline),
        goal.deadline_status(today)
    )));
    lines.push(Line::from(format!("Created: {}", format_date(&goal.created_at))));
    if let Some(ref completed_at) = goal.completed_at {
        lines.push(Line::from(format!("Completed: {}", format_date(completed_at))));
    }

    if goal.steps > 1 {
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Steps: {}/{} ({}%)",
            goal.completed_steps,
            goal.steps,
            goal.progress_percent()
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "{}: step done  {}: step back",
                format_key_binding_for_display(&config.key_bindings.step_up),
                format_key_binding_for_display(&config.key_bindings.step_down)
            ),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    if !goal.description.is_empty() {
        lines.push(Line::from(""));
        for text_line in goal.description.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Goal"))
        .style(Style::default().fg(fg_color))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, text_area);

    if let Some(gauge_area) = gauge_area {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(highlight_bg))
            .percent(goal.progress_percent() as u16)
            .label(format!(
                "{}/{} steps ({}%)",
                goal.completed_steps,
                goal.steps,
                goal.progress_percent()
            ));
        f.render_widget(gauge, gauge_area);
    }
}
