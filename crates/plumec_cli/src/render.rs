//! colored rendering of diagnostics

use owo_colors::{OwoColorize, Stream, Style};
use plume_tokens::Diagnostic;
use std::fmt::{Display, Formatter};

/// Displays a diagnostic the same way [Diagnostic]'s own `Display` does, colored when
/// `stream` supports it
pub struct Colored<'a> {
    diagnostic: &'a Diagnostic,
    stream: Stream,
}

impl<'a> Colored<'a> {
    pub fn new(diagnostic: &'a Diagnostic, stream: Stream) -> Self {
        Self { diagnostic, stream }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        text.if_supports_color(self.stream, |text| text.style(style))
            .to_string()
    }
}

impl Display for Colored<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let diagnostic = self.diagnostic;
        let span = diagnostic.span;
        let error_style = Style::new().bright_red().bold();
        let gutter_style = Style::new().bright_blue().bold();

        writeln!(
            f,
            "{}{}",
            self.paint("error", error_style),
            self.paint(&format!(": {}", diagnostic.message), Style::new().bold())
        )?;
        let location = format!(
            "{}:{}:{}",
            diagnostic.source_id,
            span.start_row(),
            span.start_col()
        );
        writeln!(f, "  {} {location}", self.paint("->", gutter_style))?;

        let row = span.start_row().to_string();
        let empty_gutter = format!("{:width$} |", "", width = row.len());
        writeln!(f, "{}", self.paint(&empty_gutter, gutter_style))?;
        writeln!(
            f,
            "{} {}",
            self.paint(&format!("{row} |"), gutter_style),
            diagnostic.line_text.trim_end()
        )?;
        let col = span.start_col() - 1;
        let underline = match diagnostic.underline_width() {
            0 => format!("{}^", "-".repeat(col)),
            width => format!("{}{}", " ".repeat(col), "~".repeat(width)),
        };
        write!(
            f,
            "{} {}",
            self.paint(&empty_gutter, gutter_style),
            self.paint(&underline, error_style)
        )
    }
}
