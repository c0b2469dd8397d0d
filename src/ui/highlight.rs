use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Cached syntax highlighting state — loaded once, reused for all files.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// `theme_name` comes from config; unknown names fall back to the
    /// default dark theme.
    pub fn new(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| theme_set.themes.remove(FALLBACK_THEME))
            .unwrap_or_default();
        Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Highlight a single line of code, returning styled spans.
    /// `filename` is used to detect the language (e.g., "worker.py" → Python).
    /// `base_style` is layered under the syntax foreground so cursor-line
    /// backgrounds survive highlighting.
    pub fn highlight_line(&self, line: &str, filename: &str, base_style: Style) -> Vec<Span<'static>> {
        let syntax = self
            .syntax_set
            .find_syntax_for_file(filename)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        // syntect needs a trailing newline
        let input = if line.ends_with('\n') {
            line.to_string()
        } else {
            format!("{}\n", line)
        };

        match highlighter.highlight_line(&input, &self.syntax_set) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(syn_style, text)| {
                    let text = text.trim_end_matches('\n');
                    let fg = Color::Rgb(
                        syn_style.foreground.r,
                        syn_style.foreground.g,
                        syn_style.foreground.b,
                    );
                    Span::styled(text.to_string(), base_style.fg(fg))
                })
                .collect(),
            Err(_) => {
                // Fallback: return unstyled
                vec![Span::styled(line.to_string(), base_style)]
            }
        }
    }
}
