//! Terminal styling and color utilities.
//!
//! ANSI escape codes for grid and summary rendering, plus detection of
//! whether the current terminal should receive them at all.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Cell colors
    /// Gray for obstacles.
    pub const WALL: &str = "\x1b[90m";
    /// Bold reverse green for the start cell.
    pub const START: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta for the end cell.
    pub const END: &str = "\x1b[1;7;35m";
    /// Bright yellow for cells on the final path.
    pub const PATH: &str = "\x1b[1;93m";
    /// Blue for expanded cells.
    pub const VISITED: &str = "\x1b[34m";
    /// Cyan for cells waiting in the frontier.
    pub const FRONTIER: &str = "\x1b[36m";

    // Text colors
    /// Bright bold white for headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Green for passed checks.
    pub const GREEN: &str = "\x1b[32m";
    /// Red for failures.
    pub const RED: &str = "\x1b[31m";
    /// Yellow for stars.
    pub const YELLOW: &str = "\x1b[33m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub wall: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub path: &'static str,
    pub visited: &'static str,
    pub frontier: &'static str,
    pub white_bold: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub yellow: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            wall: colors::WALL,
            start: colors::START,
            end: colors::END,
            path: colors::PATH,
            visited: colors::VISITED,
            frontier: colors::FRONTIER,
            white_bold: colors::WHITE_BOLD,
            green: colors::GREEN,
            red: colors::RED,
            yellow: colors::YELLOW,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            wall: "",
            start: "",
            end: "",
            path: "",
            visited: "",
            frontier: "",
            white_bold: "",
            green: "",
            red: "",
            yellow: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, else `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for an ASCII grid glyph as produced by `Grid::render_ascii`.
    pub fn for_glyph(&self, glyph: char) -> &'static str {
        match glyph {
            '#' => self.wall,
            'S' => self.start,
            'E' => self.end,
            '*' => self.path,
            'o' => self.visited,
            '+' => self.frontier,
            _ => "",
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check if the terminal advertises Unicode support through `LANG` or
/// `LC_ALL`.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LANG", "LC_ALL"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Star rating as a fixed-width gauge, e.g. `★★☆` or `**-`.
#[must_use]
pub fn star_gauge(stars: u8, max: u8, unicode: bool) -> String {
    let (full, empty) = if unicode { ('★', '☆') } else { ('*', '-') };
    (0..max)
        .map(|index| if index < stars { full } else { empty })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn colored_and_plain_palettes() {
        let colored = ColorPalette::colored();
        assert!(!colored.reset.is_empty());
        assert!(!colored.path.is_empty());

        let plain = ColorPalette::plain();
        assert!(plain.reset.is_empty());
        assert!(plain.for_glyph('#').is_empty());
    }

    #[test]
    fn glyph_colors_follow_render_legend() {
        let palette = ColorPalette::colored();
        assert_eq!(palette.for_glyph('*'), colors::PATH);
        assert_eq!(palette.for_glyph('+'), colors::FRONTIER);
        assert_eq!(palette.for_glyph('.'), "");
    }

    #[test]
    fn no_color_disables_colors() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color(), "NO_COLOR=1 should disable colors");
        });
    }

    #[test]
    fn dumb_terminal_disables_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color(), "TERM=dumb should disable colors");
        });
    }

    #[test]
    fn regular_terminal_supports_colors() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || assert!(supports_color()),
        );
    }

    #[test]
    fn utf8_locale_enables_unicode() {
        with_env_vars(&[("LANG", Some("en_US.UTF-8")), ("LC_ALL", None)], || {
            assert!(supports_unicode());
        });
        with_env_vars(&[("LANG", Some("C")), ("LC_ALL", None)], || {
            assert!(!supports_unicode());
        });
    }

    #[test]
    fn star_gauge_pads_to_max() {
        assert_eq!(star_gauge(2, 3, false), "**-");
        assert_eq!(star_gauge(0, 3, true), "☆☆☆");
    }
}
