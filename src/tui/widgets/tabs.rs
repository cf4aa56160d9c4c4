use ratatui::widgets::Tabs;
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::config::Theme;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};
use crate::view::Filter;

pub fn render_tabs(f: &mut Frame, area: Rect, current_filter: Filter, theme: &Theme) {
    let highlight_bg = parse_color(&theme.highlight_bg);
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let tab_bg = parse_color(&theme.tab_bg);

    // Contrast-aware text color for non-selected tabs, so they stay
    // readable regardless of how the terminal renders tab_bg
    let tab_fg = get_contrast_text_color(tab_bg);

    // Each filter tab gets padding on a colored background to look like a box
    let titles: Vec<Line> = Filter::ALL
        .iter()
        .map(|filter| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(tab_bg)),
                Span::styled(filter.label(), Style::default().fg(tab_fg).bg(tab_bg)),
                Span::styled("  ", Style::default().bg(tab_bg)),
            ])
        })
        .collect();

    let tab_index = Filter::ALL
        .iter()
        .position(|filter| *filter == current_filter)
        .unwrap_or(0);

    let highlight_fg = get_contrast_text_color(highlight_bg);

    let tabs = Tabs::new(titles)
        .select(tab_index)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        )
        .divider("  ") // Space between tab boxes
        .padding("", "");

    f.render_widget(tabs, area);
}
