use crate::date_format::{DateField, DateFormatSpec, compile};
use crate::error::ViewerError;
use crate::line_filter::{FilterResult, Highlight, filter_lines};
use crate::log_state::{LogSignal, LogState};
use crate::render::{ClipboardSink, Confirm, Renderer};
use crate::status::{AppStatus, StatusChange, StatusMachine};
use std::path::Path;
use std::time::Duration;

/// How long the "copied" confirmation stays up
pub const COPY_FLASH: Duration = Duration::from_millis(250);

pub const CLOSE_PROMPT: &str = "Are you sure you wish to close the current log?";

const TEASER_PENDING: &str = "upload your log file to browse";
const TEASER_IDLE: &str = "use the tools to browse your log file";

/// Current values of the filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterValues {
    pub fields: DateFormatSpec,
    pub reverse: bool,
}

/// The log browser: loaded log, status and filters, driving a renderer
///
/// Every user action maps to one method. Actions run to completion before
/// returning, including any entry actions of the status they lead to.
pub struct App<R: Renderer> {
    log: LogState,
    status: StatusMachine,
    filters: FilterValues,
    highlight: Highlight,
    renderer: R,
    last_result: FilterResult,
}

impl<R: Renderer> App<R> {
    /// Create the application and enter `PENDING_LOG`
    pub fn new(renderer: R) -> Result<Self, ViewerError> {
        Self::with_log_state(renderer, LogState::new())
    }

    /// Like [`App::new`] but starting with a custom date format
    pub fn with_date_format(renderer: R, format: impl Into<String>) -> Result<Self, ViewerError> {
        let mut log = LogState::new();
        log.set_date_format(format);
        Self::with_log_state(renderer, log)
    }

    fn with_log_state(renderer: R, log: LogState) -> Result<Self, ViewerError> {
        let mut app = Self {
            log,
            status: StatusMachine::new(),
            filters: FilterValues::default(),
            highlight: Highlight::default(),
            renderer,
            last_result: FilterResult::default(),
        };
        app.set_status(AppStatus::PendingLog)?;
        Ok(app)
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set the initial reverse flag without re-filtering
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.filters.reverse = reverse;
        self
    }

    pub fn status(&self) -> AppStatus {
        self.status.status().unwrap_or(AppStatus::PendingLog)
    }

    pub fn log(&self) -> &LogState {
        &self.log
    }

    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Result of the most recent filter pass
    pub fn last_result(&self) -> &FilterResult {
        &self.last_result
    }

    /// Change status, running entry actions on an effective transition
    ///
    /// Returns whether the status actually changed.
    pub fn set_status(&mut self, status: AppStatus) -> Result<bool, ViewerError> {
        match self.status.set_status(status) {
            Some(change) => {
                self.on_status_change(change)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn on_status_change(&mut self, change: StatusChange) -> Result<(), ViewerError> {
        let status = change.new;
        self.renderer.show_status(status, &status.status_label());

        let visibility = self.renderer.regions().visibility(status);
        for (region, visible) in &visibility {
            self.renderer.set_region_visible(region, *visible);
        }

        match status {
            AppStatus::PendingLog => {
                self.renderer.set_teaser(TEASER_PENDING);
                self.clear_filters()?;
            }
            AppStatus::Idle => {
                // Sync the inputs first so a format that fails to compile stays visible
                let format = self.log.date_format().to_string();
                self.renderer.set_date_format_input(&format);
                self.renderer.set_teaser(TEASER_IDLE);
                self.apply_filters()?;
            }
            AppStatus::ProcessingLog => {}
        }

        Ok(())
    }

    fn route_signal(&mut self, signal: LogSignal) -> Result<(), ViewerError> {
        match signal {
            LogSignal::Available => {
                // Already idle: the transition is a no-op, so refresh directly
                if !self.set_status(AppStatus::Idle)? {
                    self.apply_filters()?;
                }
                Ok(())
            }
            LogSignal::Closed => self.set_status(AppStatus::PendingLog).map(|_| ()),
        }
    }

    /// Load pasted text as the log
    pub fn submit_text(&mut self, text: impl Into<String>) -> Result<(), ViewerError> {
        let signal = self.log.ingest(text);
        self.route_signal(signal)
    }

    /// Mark the start of a file read
    pub fn begin_upload(&mut self) -> Result<(), ViewerError> {
        self.set_status(AppStatus::ProcessingLog).map(|_| ())
    }

    /// Finish a file read with the bytes that were read
    ///
    /// Bytes are decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn complete_upload(&mut self, bytes: &[u8]) -> Result<(), ViewerError> {
        let text = String::from_utf8_lossy(bytes).into_owned();
        self.submit_text(text)
    }

    /// Read a log file from disk through the upload path
    ///
    /// If the read fails the status returns to what the loaded log implies.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ViewerError> {
        self.begin_upload()?;

        match std::fs::read(path) {
            Ok(bytes) => self.complete_upload(&bytes),
            Err(source) => {
                let fallback = if self.log.is_loaded() {
                    AppStatus::Idle
                } else {
                    AppStatus::PendingLog
                };
                // The fallback is not a close, so the user's filters survive it
                let filters = self.filters.clone();
                self.set_status(fallback)?;
                self.filters = filters;
                Err(ViewerError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    /// Close the current log once the user confirms
    ///
    /// Returns `false` when the user declined and nothing changed.
    pub fn close_log(&mut self, confirm: &mut impl Confirm) -> Result<bool, ViewerError> {
        if !confirm.confirm(CLOSE_PROMPT) {
            return Ok(false);
        }

        let signal = self.log.clear();
        self.route_signal(signal)?;
        Ok(true)
    }

    /// Save a new date format; takes effect on the next filter pass
    pub fn save_date_format(&mut self, format: impl Into<String>) {
        self.log.set_date_format(format);
    }

    pub fn set_filter(
        &mut self,
        field: DateField,
        value: impl Into<String>,
    ) -> Result<&FilterResult, ViewerError> {
        self.filters.fields.set(field, value);
        self.apply_filters()
    }

    pub fn set_reverse(&mut self, reverse: bool) -> Result<&FilterResult, ViewerError> {
        self.filters.reverse = reverse;
        self.apply_filters()
    }

    /// Reset all six date fields and re-apply
    pub fn clear_filters(&mut self) -> Result<&FilterResult, ViewerError> {
        self.filters.fields.clear();
        self.apply_filters()
    }

    /// Filter the loaded log and render the result
    ///
    /// With no log loaded this renders an empty result without compiling
    /// the date format.
    pub fn apply_filters(&mut self) -> Result<&FilterResult, ViewerError> {
        let result = if self.log.is_loaded() {
            let rule = compile(self.log.date_format(), &self.filters.fields);
            let regex = rule.to_regex().inspect_err(|e| {
                tracing::warn!("{e}");
            })?;
            filter_lines(
                self.log.lines(),
                &regex,
                self.filters.reverse,
                self.highlight,
            )
        } else {
            FilterResult {
                reversed: self.filters.reverse,
                ..FilterResult::default()
            }
        };

        self.renderer
            .render_lines(&result.display_lines(), result.len());
        self.last_result = result;
        Ok(&self.last_result)
    }

    /// Copy the plain text of the displayed log
    pub fn copy_log_text(&mut self, sink: &mut impl ClipboardSink) -> Result<(), ViewerError> {
        sink.copy(&self.last_result.plain_text())?;
        self.renderer.flash_copied(COPY_FLASH);
        Ok(())
    }
}
