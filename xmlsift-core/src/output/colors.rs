//! ANSI color support for terminal output

use once_cell::sync::Lazy;
use regex::Regex;

/// ANSI color codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const YELLOW: &str = "\x1b[33m";
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(</?)([\w][\w\-\.]*)(>)").unwrap());

/// Determine if color should be used based on mode and environment
pub fn should_use_color(mode: &str) -> bool {
    match mode {
        "always" => true,
        "never" => false,
        _ => {
            // Auto mode: check if stdout is a tty and NO_COLOR is not set
            atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
        }
    }
}

/// Wrap text in a color, or return it unchanged
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, ansi::RESET)
    } else {
        text.to_string()
    }
}

/// Colorize tags of an exported fragment: dim brackets, blue names
pub fn colorize_xml(xml: &str) -> String {
    if xml.is_empty() {
        return xml.to_string();
    }

    TAG_RE
        .replace_all(xml, |caps: &regex::Captures| {
            format!(
                "{}{}{}{}{}{}{}{}{}",
                ansi::DIM,
                &caps[1],
                ansi::RESET,
                ansi::BLUE,
                &caps[2],
                ansi::RESET,
                ansi::DIM,
                &caps[3],
                ansi::RESET
            )
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_modes() {
        assert!(should_use_color("always"));
        assert!(!should_use_color("never"));
    }

    #[test]
    fn test_paint_without_color_is_identity() {
        assert_eq!(paint("book", ansi::BLUE, false), "book");
        assert_eq!(paint("book", ansi::BLUE, true), "\x1b[34mbook\x1b[0m");
    }

    #[test]
    fn test_colorize_xml_keeps_text() {
        let colored = colorize_xml("<title>Dune</title>");
        assert!(colored.contains("Dune"));
        assert!(colored.contains(&format!("{}title", ansi::BLUE)));
        assert_eq!(colored.matches(ansi::BLUE).count(), 2);
    }
}
