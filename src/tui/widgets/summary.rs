use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::config::Theme;
use crate::tui::widgets::color::parse_color;
use crate::view::{SortKey, Summary};

pub fn render_summary(
    f: &mut Frame,
    area: Rect,
    summary: &Summary,
    sort_key: SortKey,
    quote: &str,
    theme: &Theme,
) {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let counts_line = format!(
        "Total: {}  Completed: {}  Pending: {}  |  Sort: {}",
        summary.total,
        summary.completed,
        summary.pending,
        sort_key.label()
    );

    let lines = vec![
        Line::from(counts_line),
        Line::from(quote.to_string()).style(Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Summary")
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, area);
}
