use ratatui::widgets::Paragraph;
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::config::Theme;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    theme: &Theme,
) {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let width = area.width as usize;

    // A transient message takes over the whole bar, highlighted; otherwise
    // show as many key hints as the width allows
    let (content, style) = match message {
        Some(msg) => {
            let msg_fg = get_contrast_text_color(highlight_bg);
            let text = if msg.chars().count() > width {
                clip_to_width(msg, width)
            } else {
                msg.clone()
            };
            let style = Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD);
            (text, style)
        }
        None => (
            fit_hints(key_hints, width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    // No Block wrapper - the status bar is a simple 1-line display
    let paragraph = Paragraph::new(content)
        .style(style)
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Join as many whole hints as fit in `width` columns. Dropped hints are
/// marked with a trailing ellipsis; when not even the first hint fits, it
/// is clipped instead.
fn fit_hints(hints: &[String], width: usize) -> String {
    let separator_len = SEPARATOR.chars().count();

    let mut kept = 0;
    let mut used = 0;
    for hint in hints {
        let cost = if kept == 0 {
            hint.chars().count()
        } else {
            separator_len + hint.chars().count()
        };
        if used + cost > width {
            break;
        }
        used += cost;
        kept += 1;
    }

    if kept == hints.len() {
        return hints.join(SEPARATOR);
    }
    if kept == 0 {
        return clip_to_width(hints.first().map(String::as_str).unwrap_or(""), width);
    }

    let line = hints[..kept].join(SEPARATOR);
    if used + ELLIPSIS.chars().count() <= width {
        line + ELLIPSIS
    } else {
        clip_to_width(&line, width)
    }
}

/// Cut to `width` columns total, ending in the ellipsis
fn clip_to_width(text: &str, width: usize) -> String {
    let keep = width.saturating_sub(ELLIPSIS.chars().count());
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str(ELLIPSIS);
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_hints_fit_without_an_ellipsis() {
        let line = fit_hints(&hints(&["q: Quit", "n: New"]), 40);
        assert_eq!(line, "q: Quit • n: New");
    }

    #[test]
    fn overflow_drops_whole_hints_and_marks_the_rest() {
        // "q: Quit • n: New" is 16 columns; the third hint does not fit
        let line = fit_hints(&hints(&["q: Quit", "n: New", "e: Edit"]), 20);
        assert_eq!(line, "q: Quit • n: New...");
        assert!(line.chars().count() <= 20);
    }

    #[test]
    fn oversized_first_hint_is_clipped() {
        let line = fit_hints(&hints(&["ctrl+s: Save the current form"]), 10);
        assert_eq!(line.chars().count(), 10);
        assert!(line.ends_with(ELLIPSIS));
    }

    #[test]
    fn no_hints_renders_an_empty_bar() {
        assert_eq!(fit_hints(&[], 20), "");
    }

    #[test]
    fn long_messages_clip_to_the_bar_width() {
        let msg = "x".repeat(30);
        let clipped = clip_to_width(&msg, 12);
        assert_eq!(clipped.chars().count(), 12);
        assert!(clipped.ends_with(ELLIPSIS));
    }
}
