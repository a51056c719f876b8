//! Collaborators the application drives: the renderer, the close
//! confirmation and the clipboard

use crate::error::ViewerError;
use crate::status::{AppStatus, RegionId, StatusRegions};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Presentation side of the log browser
pub trait Renderer {
    /// Mapping from status to the regions visible in it
    fn regions(&self) -> &StatusRegions;

    fn show_status(&mut self, status: AppStatus, label: &str);

    fn set_region_visible(&mut self, region: &RegionId, visible: bool);

    /// Replace the displayed log with `lines`
    fn render_lines(&mut self, lines: &[String], count: usize);

    fn set_teaser(&mut self, text: &str);

    fn set_date_format_input(&mut self, format: &str);

    /// Briefly confirm that the log text was copied
    fn flash_copied(&mut self, duration: Duration);
}

/// Blocking yes/no question put to the user
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Destination for copied log text
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), ViewerError>;
}

/// Renderer that keeps everything it is told in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub regions: StatusRegions,
    pub status: Option<AppStatus>,
    pub status_label: String,
    pub visible: BTreeMap<RegionId, bool>,
    pub lines: Vec<String>,
    pub line_count: usize,
    /// Number of times lines were rendered
    pub renders: usize,
    pub teaser: String,
    pub date_format_input: String,
    pub copied_flashes: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions(regions: StatusRegions) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn is_visible(&self, region: &str) -> bool {
        self.visible
            .get(&RegionId::new(region))
            .copied()
            .unwrap_or(false)
    }
}

impl Renderer for RecordingRenderer {
    fn regions(&self) -> &StatusRegions {
        &self.regions
    }

    fn show_status(&mut self, status: AppStatus, label: &str) {
        self.status = Some(status);
        self.status_label = label.to_string();
    }

    fn set_region_visible(&mut self, region: &RegionId, visible: bool) {
        self.visible.insert(region.clone(), visible);
    }

    fn render_lines(&mut self, lines: &[String], count: usize) {
        self.lines = lines.to_vec();
        self.line_count = count;
        self.renders += 1;
    }

    fn set_teaser(&mut self, text: &str) {
        self.teaser = text.to_string();
    }

    fn set_date_format_input(&mut self, format: &str) {
        self.date_format_input = format.to_string();
    }

    fn flash_copied(&mut self, _duration: Duration) {
        self.copied_flashes += 1;
    }
}

/// Renderer writing the log to a terminal or any other writer
///
/// Only the log lines and the line count go to the writer. Status and
/// region changes are traced.
pub struct TerminalRenderer<W: Write> {
    out: W,
    regions: StatusRegions,
    show_count: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, regions: StatusRegions) -> Self {
        Self {
            out,
            regions,
            show_count: true,
        }
    }

    /// Whether to print `N lines found` after the lines
    pub fn show_count(mut self, show: bool) -> Self {
        self.show_count = show;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String], count: usize) -> std::io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        if self.show_count {
            writeln!(self.out, "{}", line_count_label(count))?;
        }
        self.out.flush()
    }
}

/// Text shown under the log, e.g. `3 lines found`
pub fn line_count_label(count: usize) -> String {
    format!("{count} lines found")
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn regions(&self) -> &StatusRegions {
        &self.regions
    }

    fn show_status(&mut self, status: AppStatus, label: &str) {
        tracing::info!(status = status.as_str(), "{label}");
    }

    fn set_region_visible(&mut self, region: &RegionId, visible: bool) {
        tracing::trace!(region = region.as_str(), visible, "region visibility");
    }

    fn render_lines(&mut self, lines: &[String], count: usize) {
        if let Err(e) = self.write_lines(lines, count) {
            tracing::warn!("failed to write log lines: {e}");
        }
    }

    fn set_teaser(&mut self, text: &str) {
        tracing::debug!("{text}");
    }

    fn set_date_format_input(&mut self, format: &str) {
        tracing::debug!(format, "date format");
    }

    fn flash_copied(&mut self, duration: Duration) {
        tracing::info!(flash_ms = duration.as_millis() as u64, "[ copied ]");
    }
}

/// Asks on a writer and reads `y`/`yes` from a reader
pub struct PromptConfirm<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Clipboard sink that writes the copied text to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ClipboardSink for FileSink {
    fn copy(&mut self, text: &str) -> Result<(), ViewerError> {
        std::fs::write(&self.path, text).map_err(|e| {
            ViewerError::Clipboard(format!(
                "failed to write '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Clipboard sink keeping the last copied text
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub contents: Option<String>,
}

impl ClipboardSink for MemorySink {
    fn copy(&mut self, text: &str) -> Result<(), ViewerError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_renderer_writes_lines_and_count() {
        let mut renderer = TerminalRenderer::new(Vec::new(), StatusRegions::default());
        renderer.render_lines(&["one".to_string(), "two".to_string()], 2);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "one\ntwo\n2 lines found\n");
    }

    #[test]
    fn test_terminal_renderer_without_count() {
        let mut renderer =
            TerminalRenderer::new(Vec::new(), StatusRegions::default()).show_count(false);
        renderer.render_lines(&["one".to_string()], 1);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "one\n");
    }

    #[test]
    fn test_prompt_confirm_accepts_yes() {
        let mut confirm = PromptConfirm::new("yes\n".as_bytes(), Vec::new());
        assert!(confirm.confirm("Close?"));

        let mut confirm = PromptConfirm::new("\n".as_bytes(), Vec::new());
        assert!(!confirm.confirm("Close?"));
    }

    #[test]
    fn test_memory_sink_keeps_text() {
        let mut sink = MemorySink::default();
        sink.copy("hello").unwrap();
        assert_eq!(sink.contents.as_deref(), Some("hello"));
    }
}
