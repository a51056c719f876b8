use crate::date_format::DEFAULT_DATE_FORMAT;

/// What a change to the log means for the application status
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSignal {
    /// A log was ingested and is ready to browse
    Available,
    /// The log was closed
    Closed,
}

/// The loaded log and the date format used to read it
#[derive(Debug, Clone)]
pub struct LogState {
    raw_text: Option<String>,
    lines: Vec<String>,
    date_format: String,
}

impl Default for LogState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogState {
    pub fn new() -> Self {
        Self {
            raw_text: None,
            lines: Vec::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Replace the log with `text`, split on `\n`
    ///
    /// Any text is accepted. An empty string yields a single empty line.
    pub fn ingest(&mut self, text: impl Into<String>) -> LogSignal {
        let text = text.into();
        self.lines = text.split('\n').map(str::to_string).collect();
        self.raw_text = Some(text);
        tracing::debug!(lines = self.lines.len(), "ingested log text");
        LogSignal::Available
    }

    pub fn clear(&mut self) -> LogSignal {
        self.raw_text = None;
        self.lines.clear();
        LogSignal::Closed
    }

    /// Replace the date format; filters are not re-applied here
    pub fn set_date_format(&mut self, format: impl Into<String>) {
        self.date_format = format.into();
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.raw_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = LogState::new();
        assert!(!state.is_loaded());
        assert!(state.lines().is_empty());
        assert_eq!(state.date_format(), "[d/m/Y, H:i:s]");
    }

    #[test]
    fn test_ingest_splits_on_newline() {
        let mut state = LogState::new();
        assert_eq!(state.ingest("a\nb\n"), LogSignal::Available);
        assert_eq!(state.lines(), ["a", "b", ""]);
        assert_eq!(state.raw_text(), Some("a\nb\n"));
    }

    #[test]
    fn test_ingest_empty_text_is_one_line() {
        let mut state = LogState::new();
        let _ = state.ingest("");
        assert_eq!(state.line_count(), 1);
        assert_eq!(state.lines()[0], "");
        assert!(state.is_loaded());
    }

    #[test]
    fn test_ingest_replaces_previous_log() {
        let mut state = LogState::new();
        let _ = state.ingest("one\ntwo\nthree");
        let _ = state.ingest("four");
        assert_eq!(state.lines(), ["four"]);
    }

    #[test]
    fn test_carriage_returns_are_kept() {
        let mut state = LogState::new();
        let _ = state.ingest("a\r\nb");
        assert_eq!(state.lines(), ["a\r", "b"]);
    }

    #[test]
    fn test_clear_drops_text_but_keeps_format() {
        let mut state = LogState::new();
        state.set_date_format("Y-m-d");
        let _ = state.ingest("x");
        assert_eq!(state.clear(), LogSignal::Closed);
        assert!(!state.is_loaded());
        assert!(state.lines().is_empty());
        assert_eq!(state.date_format(), "Y-m-d");
    }
}
