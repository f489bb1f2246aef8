/// ANSI color helper utilities for terminal output.
use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Placeholder shown for sessions without a check-in.
pub const ABSENT: &str = "--:--";

static ANSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern is valid")
});

pub fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// Terminal columns taken by `s`: colour codes are free, wide glyphs take two.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Grey for an empty cell (None, "" or "--:--"), green otherwise.
pub fn color_for_presence<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() && v.as_ref() != ABSENT => GREEN,
        _ => GREY,
    }
}

/// Wrap a presence cell in its color.
///
/// `colorize_presence("--:--")` → "<grey>--:--<reset>"
pub fn colorize_presence(value: &str) -> String {
    format!("{}{value}{RESET}", color_for_presence(Some(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_cells_are_grey() {
        assert_eq!(color_for_presence::<&str>(None), GREY);
        assert_eq!(color_for_presence(Some(ABSENT)), GREY);
        assert_eq!(color_for_presence(Some("08:15")), GREEN);
        assert_eq!(colorize_presence("--:--"), format!("{GREY}--:--{RESET}"));
    }
}
