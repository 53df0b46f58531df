//! Terminal styling and number formatting for reports.
//!
//! Color is decided once per run from [`FormattingConfig`]; writers then ask a
//! [`Painter`] to render text in a report [`Style`].

use colored::{Color, ColoredString, Colorize};
use std::env;
use std::io::IsTerminal;

/// Whether report text may carry ANSI color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color only when stdout is a terminal that supports it
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn resolve(self, stdout_is_color_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_is_color_terminal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }

    /// Read NO_COLOR, CLICOLOR and CLICOLOR_FORCE.
    pub fn from_env() -> Self {
        Self::new(color_mode_from_vars(
            env::var("NO_COLOR").ok().as_deref(),
            env::var("CLICOLOR").ok().as_deref(),
            env::var("CLICOLOR_FORCE").ok().as_deref(),
        ))
    }

    /// Resolved against the real stdout.
    pub fn use_color(&self) -> bool {
        self.color.resolve(stdout_supports_color())
    }
}

/// CLICOLOR_FORCE=1 beats NO_COLOR, which beats CLICOLOR=0.
pub fn color_mode_from_vars(
    no_color: Option<&str>,
    clicolor: Option<&str>,
    clicolor_force: Option<&str>,
) -> ColorMode {
    if clicolor_force == Some("1") {
        ColorMode::Always
    } else if no_color.is_some() || clicolor == Some("0") {
        ColorMode::Never
    } else {
        ColorMode::Auto
    }
}

fn stdout_supports_color() -> bool {
    env::var("TERM").map_or(true, |term| term != "dumb") && std::io::stdout().is_terminal()
}

/// Role of a piece of report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Heading,
    Good,
    Bad,
    Caution,
    Muted,
}

/// Renders text in a [`Style`], or verbatim when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn for_config(config: FormattingConfig) -> Self {
        let color = config.use_color();
        colored::control::set_override(color);
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        styled(style, text).to_string()
    }
}

fn styled(style: Style, text: &str) -> ColoredString {
    match style {
        Style::Title => text.bold(),
        Style::Heading => text.color(Color::Blue).bold(),
        Style::Good => text.color(Color::Green),
        Style::Bad => text.color(Color::Red),
        Style::Caution => text.color(Color::Yellow),
        Style::Muted => text.dimmed(),
    }
}

// Insert thousands separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Hours with two decimals and separators: `6,549.25`.
pub fn format_hours(hours: f64) -> String {
    group_thousands(&format!("{:.2}", hours))
}

/// Whole-currency amount with separators: `$1,024,500`.
pub fn format_currency(amount: f64) -> String {
    let grouped = group_thousands(&format!("{:.0}", amount.abs()));
    if amount < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Rate with two decimals: `$152.37`.
pub fn format_rate(rate: f64) -> String {
    format!("${}", group_thousands(&format!("{:.2}", rate)))
}

/// Fraction as a percentage: `2.25%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_env_precedence() {
        assert_eq!(color_mode_from_vars(None, None, None), ColorMode::Auto);
        assert_eq!(color_mode_from_vars(Some(""), None, None), ColorMode::Never);
        assert_eq!(color_mode_from_vars(None, Some("0"), None), ColorMode::Never);
        assert_eq!(
            color_mode_from_vars(Some("1"), None, Some("1")),
            ColorMode::Always
        );
    }

    #[test]
    fn test_plain_painter_returns_text_verbatim() {
        let painter = Painter::plain();
        assert!(!painter.is_colored());
        assert_eq!(painter.paint(Style::Heading, "Summary"), "Summary");
        assert_eq!(painter.paint(Style::Bad, "broken"), "broken");
    }

    #[test]
    fn test_format_hours_groups_thousands() {
        assert_eq!(format_hours(6549.25), "6,549.25");
        assert_eq!(format_hours(150.75), "150.75");
        assert_eq!(format_hours(1234567.0), "1,234,567.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1024500.4), "$1,024,500");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }

    #[test]
    fn test_format_percent_and_rate() {
        assert_eq!(format_percent(0.0225), "2.25%");
        assert_eq!(format_rate(152.374), "$152.37");
    }
}
