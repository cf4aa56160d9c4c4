use ratatui::style::Color;

/// Parse a color string from the theme config into a ratatui Color.
/// Accepts named colors (black, red, ..., gray/grey, darkgray, light*),
/// hex (#RRGGBB or #RGB) and rgb(r,g,b). Unrecognized input falls back
/// to Color::White.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        // ratatui has no LightGray variant; Gray is the light one
        "lightgray" | "lightgrey" => Color::Gray,
        _ => {
            if s.starts_with('#') {
                if let Some(color) = parse_hex_color(&s) {
                    return color;
                }
            } else if s.starts_with("rgb(") {
                if let Some(color) = parse_rgb_color(&s) {
                    return color;
                }
            }
            Color::White
        }
    }
}

/// #RRGGBB or the short #RGB form (each digit doubled)
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');

    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Some(Color::Rgb(r, g, b));
        }
    } else if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
        return Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b));
    }

    None
}

/// rgb(r,g,b), spaces around components allowed
fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;

    let parts: Vec<&str> = content.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Format a Color back into the string form the config files use
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::White => "white".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(_) => "indexed".to_string(),
        Color::Reset => "reset".to_string(),
    }
}

/// Relative luminance per the WCAG formula, 0.0 (dark) to 1.0 (light).
/// Named colors use approximate RGB values.
fn calculate_luminance(color: Color) -> f64 {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0),
        Color::Black => (0.0, 0.0, 0.0),
        Color::Red => (1.0, 0.0, 0.0),
        Color::Green => (0.0, 1.0, 0.0),
        Color::Yellow => (1.0, 1.0, 0.0),
        Color::Blue => (0.0, 0.0, 1.0),
        Color::Magenta => (1.0, 0.0, 1.0),
        Color::Cyan => (0.0, 1.0, 1.0),
        Color::White => (1.0, 1.0, 1.0),
        Color::Gray => (0.5, 0.5, 0.5),
        Color::DarkGray => (0.25, 0.25, 0.25),
        Color::LightRed => (1.0, 0.5, 0.5),
        Color::LightGreen => (0.5, 1.0, 0.5),
        Color::LightYellow => (1.0, 1.0, 0.5),
        Color::LightBlue => (0.5, 0.5, 1.0),
        Color::LightMagenta => (1.0, 0.5, 1.0),
        Color::LightCyan => (0.5, 1.0, 1.0),
        Color::Indexed(_) | Color::Reset => (0.5, 0.5, 0.5),
    };

    // Gamma correction
    let r_linear = if r <= 0.03928 { r / 12.92 } else { ((r + 0.055) / 1.055).powf(2.4) };
    let g_linear = if g <= 0.03928 { g / 12.92 } else { ((g + 0.055) / 1.055).powf(2.4) };
    let b_linear = if b <= 0.03928 { b / 12.92 } else { ((b + 0.055) / 1.055).powf(2.4) };

    0.2126 * r_linear + 0.7152 * g_linear + 0.0722 * b_linear
}

/// Named colors that need light text on top of them.
/// Gray renders light in most terminals, so it is treated as light.
fn is_dark_color(color: Color) -> bool {
    matches!(
        color,
        Color::Black | Color::Blue | Color::Magenta | Color::Red
    )
}

/// Foreground color that stays readable on the given background:
/// black on light backgrounds, white on dark ones. RGB backgrounds go
/// through the luminance calculation, named colors use the heuristic.
pub fn get_contrast_text_color(background: Color) -> Color {
    if matches!(background, Color::Rgb(_, _, _)) {
        if calculate_luminance(background) < 0.5 {
            Color::White
        } else {
            Color::Black
        }
    } else if is_dark_color(background) {
        Color::White
    } else {
        Color::Black
    }
}
