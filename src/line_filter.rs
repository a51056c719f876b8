use crate::helpers::replace_all;
use clap::ValueEnum;
use colored::Colorize;
use regex::Regex;
use serde::{Deserialize, Serialize};

const HTML_OPEN: &str = "<span class=\"log-date\">";
const HTML_CLOSE: &str = "</span>";
const BRACKET_OPEN: &str = "«";
const BRACKET_CLOSE: &str = "»";
// Stand-in date used to recover the escape codes around a wrapped value
const ANSI_MARKER: &str = "\u{0}";

/// How a matched date is marked in a display line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// `<span class="log-date">…</span>`
    #[default]
    Html,
    /// Bold yellow terminal colors
    Ansi,
    /// `«…»`
    Brackets,
    /// Leave the date as-is
    None,
}

impl Highlight {
    /// Wrap a matched date for display
    pub fn wrap(self, date: &str) -> String {
        match self {
            Highlight::Html => format!("{HTML_OPEN}{date}{HTML_CLOSE}"),
            Highlight::Ansi => date.yellow().bold().to_string(),
            Highlight::Brackets => format!("{BRACKET_OPEN}{date}{BRACKET_CLOSE}"),
            Highlight::None => date.to_string(),
        }
    }

    /// Remove the markup added by [`Highlight::wrap`]
    ///
    /// Every copy of the wrapper text is removed, so a line that already
    /// contained it (a literal `</span>` or `«`, say) does not come back
    /// exactly. `Ansi` strips the escape codes `wrap` emits under the current
    /// color setting.
    pub fn strip(self, display_line: &str) -> String {
        match self {
            Highlight::Html => strip_wrapper(display_line, HTML_OPEN, HTML_CLOSE),
            Highlight::Brackets => strip_wrapper(display_line, BRACKET_OPEN, BRACKET_CLOSE),
            Highlight::Ansi => {
                let marked = self.wrap(ANSI_MARKER);
                match marked.split_once(ANSI_MARKER) {
                    Some((open, close)) => strip_wrapper(display_line, open, close),
                    None => display_line.to_string(),
                }
            }
            Highlight::None => display_line.to_string(),
        }
    }
}

fn strip_wrapper(line: &str, open: &str, close: &str) -> String {
    let mut stripped = line.to_string();
    for wrapper in [open, close] {
        if !wrapper.is_empty() {
            stripped = replace_all(&stripped, wrapper, "");
        }
    }
    stripped
}

/// A log line that matched the date rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredLine {
    pub original_line: String,
    pub display_line: String,
    pub matched: bool,
}

/// Lines retained by a filter pass, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub lines: Vec<FilteredLine>,
    /// Number of lines the filter looked at
    pub total_lines: usize,
    pub reversed: bool,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn display_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.display_line.clone()).collect()
    }

    /// Retained lines without highlight markup, newline separated
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.original_line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Highlight the first date found in a line, or `None` if there is none
///
/// Only the first match is located, but every occurrence of that exact text
/// in the line gets wrapped.
pub fn highlight_line(line: &str, rule: &Regex, highlight: Highlight) -> Option<FilteredLine> {
    let found = rule.find(line)?;
    let date = found.as_str();

    Some(FilteredLine {
        original_line: line.to_string(),
        display_line: replace_all(line, date, &highlight.wrap(date)),
        matched: true,
    })
}

/// Keep the lines containing a date, highlighted, optionally reversed
///
/// Reversal happens after filtering, so it inverts the order of the
/// retained lines only.
pub fn filter_lines<S: AsRef<str>>(
    lines: &[S],
    rule: &Regex,
    reverse: bool,
    highlight: Highlight,
) -> FilterResult {
    let mut retained: Vec<FilteredLine> = lines
        .iter()
        .filter_map(|line| highlight_line(line.as_ref(), rule, highlight))
        .collect();

    if reverse {
        retained.reverse();
    }

    tracing::debug!(
        total = lines.len(),
        retained = retained.len(),
        reverse,
        "filtered log lines"
    );

    FilterResult {
        lines: retained,
        total_lines: lines.len(),
        reversed: reverse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_rule() -> Regex {
        Regex::new(r"(\[[0-9]{2}\])").unwrap()
    }

    #[test]
    fn test_unmatched_lines_are_dropped() {
        let lines = ["[01] a", "b", "[02] c"];
        let result = filter_lines(&lines, &date_rule(), false, Highlight::Html);
        assert_eq!(result.len(), 2);
        assert_eq!(result.total_lines, 3);
        assert_eq!(result.lines[0].original_line, "[01] a");
        assert_eq!(result.lines[1].original_line, "[02] c");
    }

    #[test]
    fn test_reverse_applies_to_retained_lines() {
        let lines = ["[01] a", "b", "[02] c", "[03] d"];
        let result = filter_lines(&lines, &date_rule(), true, Highlight::None);
        let originals: Vec<_> = result
            .lines
            .iter()
            .map(|l| l.original_line.as_str())
            .collect();
        assert_eq!(originals, vec!["[03] d", "[02] c", "[01] a"]);
        assert!(result.reversed);
    }

    #[test]
    fn test_first_match_text_is_wrapped_everywhere() {
        let line = "[01] retry of [01], then [02]";
        let filtered = highlight_line(line, &date_rule(), Highlight::Brackets).unwrap();
        assert_eq!(filtered.display_line, "«[01]» retry of «[01]», then [02]");
    }

    #[test]
    fn test_html_strip_restores_original() {
        let line = "[07] something happened";
        let filtered = highlight_line(line, &date_rule(), Highlight::Html).unwrap();
        assert_eq!(
            filtered.display_line,
            "<span class=\"log-date\">[07]</span> something happened"
        );
        assert_eq!(Highlight::Html.strip(&filtered.display_line), line);
    }

    #[test]
    fn test_strip_is_lossy_on_literal_wrapper_text() {
        let line = "[07] saw </span> in output";
        let filtered = highlight_line(line, &date_rule(), Highlight::Html).unwrap();
        assert_eq!(
            Highlight::Html.strip(&filtered.display_line),
            "[07] saw  in output"
        );
    }

    #[test]
    fn test_plain_text_joins_original_lines() {
        let lines = ["[01] a", "[02] b"];
        let result = filter_lines(&lines, &date_rule(), false, Highlight::Html);
        assert_eq!(result.plain_text(), "[01] a\n[02] b");
    }

    #[test]
    fn test_empty_match_keeps_line() {
        let rule = Regex::new("()").unwrap();
        let filtered = highlight_line("ab", &rule, Highlight::Brackets).unwrap();
        assert_eq!(filtered.display_line, "a«»b");
    }
}
