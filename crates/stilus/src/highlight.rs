use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Syntax highlighting for the visible document slice, driven by the file
/// extension of the buffer being edited.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| theme_set.themes.remove(FALLBACK_THEME))
            .or_else(|| theme_set.themes.into_values().next())
            .unwrap_or_default();

        Self { syntax_set, theme }
    }

    fn syntax_for(&self, path: Option<&Path>) -> &SyntaxReference {
        path.and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.syntax_set.find_syntax_by_extension(ext))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlights `lines` (a contiguous slice of the document starting at
    /// its first visible row) into styled ratatui lines. Lines that fail to
    /// tokenize fall back to plain text rather than erroring mid-draw.
    pub fn highlight(&self, lines: &[String], path: Option<&Path>) -> Vec<Line<'static>> {
        let syntax = self.syntax_for(path);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| {
                let regions = highlighter
                    .highlight_line(line, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), line.as_str())]);
                let spans: Vec<Span> = regions
                    .into_iter()
                    .map(|(style, text)| Span::styled(text.to_string(), convert_style(style)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn convert_style(style: SynStyle) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}
