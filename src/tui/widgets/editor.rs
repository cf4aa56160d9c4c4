use ratatui::layout::Rect;
use std::cmp;

/// Plain text editor state backing the form fields. Cursor positions are
/// character offsets, not byte offsets, so multi-byte input stays intact.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    pub fn from_string(content: String) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    /// Ensure cursor_line is within valid bounds
    fn ensure_cursor_valid(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len().saturating_sub(1);
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.ensure_cursor_valid();
        let line = self.lines.get_mut(self.cursor_line)
            .expect("cursor_line should be valid after ensure_cursor_valid");
        let col = cmp::min(self.cursor_col, line.chars().count());
        let mut chars: Vec<char> = line.chars().collect();
        chars.insert(col, ch);
        *line = chars.into_iter().collect();
        self.cursor_col = col + 1;
    }

    /// Delete the character before the cursor. At column 0 the current
    /// line is merged into the previous one.
    pub fn delete_char(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col > 0 {
            let line = self.lines.get_mut(self.cursor_line)
                .expect("cursor_line should be valid after ensure_cursor_valid");
            let col = cmp::min(self.cursor_col, line.chars().count());
            if col > 0 {
                let mut chars: Vec<char> = line.chars().collect();
                chars.remove(col - 1);
                *line = chars.into_iter().collect();
                self.cursor_col = col - 1;
            }
        } else if self.cursor_line > 0 && self.cursor_line < self.lines.len() {
            let current_line = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            let prev_line = self.lines.get_mut(self.cursor_line)
                .expect("cursor_line should be valid after decrement");
            self.cursor_col = prev_line.chars().count();
            prev_line.push_str(&current_line);
        }
    }

    pub fn insert_newline(&mut self) {
        self.ensure_cursor_valid();
        let line = self.lines.get_mut(self.cursor_line)
            .expect("cursor_line should be valid after ensure_cursor_valid");
        let col = cmp::min(self.cursor_col, line.chars().count());
        let mut chars: Vec<char> = line.chars().collect();
        let remainder: String = chars.split_off(col).into_iter().collect();
        *line = chars.into_iter().collect();
        self.lines.insert(self.cursor_line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            let line_len = self.lines.get(self.cursor_line)
                .map(|l| l.chars().count())
                .unwrap_or(0);
            self.cursor_col = cmp::min(self.cursor_col, line_len);
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line < self.lines.len().saturating_sub(1) {
            self.cursor_line += 1;
            let line_len = self.lines.get(self.cursor_line)
                .map(|l| l.chars().count())
                .unwrap_or(0);
            self.cursor_col = cmp::min(self.cursor_col, line_len);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.lines.get(self.cursor_line)
                .map(|l| l.chars().count())
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let line_len = self.lines.get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_line < self.lines.len().saturating_sub(1) {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        if let Some(line) = self.lines.get(self.cursor_line) {
            self.cursor_col = line.chars().count();
        }
    }

    /// Lines currently in the viewport, horizontally clipped to the
    /// viewport width. Returns the index of the first visible line.
    pub fn get_visible_lines(&self, viewport_height: usize, viewport_width: usize) -> (usize, Vec<String>) {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());

        let effective_width = viewport_width.saturating_sub(2);

        let visible: Vec<String> = self.lines[start..end]
            .iter()
            .map(|line| {
                let chars: Vec<char> = line.chars().collect();
                if self.scroll_col >= chars.len() {
                    String::new() // Line is scrolled past
                } else {
                    let start_idx = self.scroll_col;
                    let end_idx = cmp::min(start_idx + effective_width, chars.len());
                    chars[start_idx..end_idx].iter().collect()
                }
            })
            .collect();

        (start, visible)
    }

    pub fn update_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line.saturating_sub(viewport_height - 1);
        }
    }

    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        // viewport_width includes the borders (width - 2 usable)
        let effective_width = viewport_width.saturating_sub(2);
        if effective_width == 0 {
            return;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + effective_width {
            self.scroll_col = self.cursor_col.saturating_sub(effective_width - 1);
        }
    }

    pub fn to_string(&self) -> String {
        self.lines.join("\n")
    }

    /// Screen coordinates for the cursor inside a bordered field area, or
    /// None when the cursor is scrolled out of view.
    pub fn get_cursor_screen_pos(&self, area: Rect, viewport_height: usize) -> Option<(u16, u16)> {
        let visible_start = self.scroll_offset;
        if self.cursor_line < visible_start || self.cursor_line >= visible_start + viewport_height {
            return None;
        }
        let line_y = (self.cursor_line - visible_start) as u16;
        if line_y >= area.height.saturating_sub(2) {
            return None;
        }

        let line = self.lines.get(self.cursor_line)?;
        let col = cmp::min(self.cursor_col, line.chars().count());

        let visible_col = if col >= self.scroll_col {
            col - self.scroll_col
        } else {
            return None; // Cursor is to the left of visible area
        };

        let max_x = area.width.saturating_sub(2);
        if visible_col >= max_x as usize {
            return None; // Cursor is to the right of visible area
        }

        let screen_x = area.x + 1 + visible_col as u16;
        let screen_y = area.y + 1 + line_y;

        if screen_x >= area.x + area.width || screen_y >= area.y + area.height {
            return None;
        }

        Some((screen_x, screen_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_puts_cursor_at_end() {
        let editor = Editor::from_string("first\nsecond".to_string());
        assert_eq!(editor.lines, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 6);
    }

    #[test]
    fn from_string_counts_chars_not_bytes() {
        let editor = Editor::from_string("héllo".to_string());
        assert_eq!(editor.cursor_col, 5);
    }

    #[test]
    fn insert_and_delete_round_trip() {
        let mut editor = Editor::new();
        for ch in "goal".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.to_string(), "goal");

        editor.delete_char();
        assert_eq!(editor.to_string(), "goa");
        assert_eq!(editor.cursor_col, 3);
    }

    #[test]
    fn newline_splits_at_cursor() {
        let mut editor = Editor::from_string("topline".to_string());
        editor.cursor_col = 3;
        editor.insert_newline();
        assert_eq!(editor.lines, vec!["top".to_string(), "line".to_string()]);
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 0);
    }

    #[test]
    fn delete_at_line_start_merges_lines() {
        let mut editor = Editor::from_string("ab\ncd".to_string());
        editor.cursor_line = 1;
        editor.cursor_col = 0;
        editor.delete_char();
        assert_eq!(editor.to_string(), "abcd");
        assert_eq!(editor.cursor_line, 0);
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn cursor_col_clamps_when_moving_to_shorter_line() {
        let mut editor = Editor::from_string("long line here\nhi".to_string());
        editor.cursor_line = 0;
        editor.cursor_col = 10;
        editor.move_cursor_down();
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn scroll_follows_cursor() {
        let content = (0..20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let mut editor = Editor::from_string(content);
        // from_string leaves the cursor on the last line
        editor.update_scroll(5);
        assert_eq!(editor.scroll_offset, 15);

        editor.cursor_line = 0;
        editor.update_scroll(5);
        assert_eq!(editor.scroll_offset, 0);

        let (start, visible) = editor.get_visible_lines(5, 80);
        assert_eq!(start, 0);
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[0], "line 0");
    }
}
