//! Line-oriented interactive front end over [`App`]

use crate::app::App;
use crate::date_format::{DateField, compile};
use crate::error::ViewerError;
use crate::render::{FileSink, PromptConfirm, Renderer};
use std::io::{BufRead, Write};
use std::path::Path;

const PASTE_END: &str = ".";

const HELP: &str = "\
commands:
  paste                 paste a log, end with a line containing only '.'
  load <file>           read a log file
  close                 close the current log
  format [template]     show or set the date format (applies on next filter)
  day|month|year|hour|minute|second [value]
                        filter on a date field, no value clears it
  reverse [on|off]      show newest lines first (toggles without argument)
  clear                 clear all date filters
  show                  re-apply filters and show the log
  rule                  print the compiled date rule
  copy <file>           copy the shown log text to a file
  status                print the current status
  help                  this text
  quit                  leave";

/// Outcome of a single shell command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R: Renderer> {
    app: App<R>,
}

impl<R: Renderer> Shell<R> {
    pub fn new(app: App<R>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App<R> {
        &self.app
    }

    pub fn into_app(self) -> App<R> {
        self.app
    }

    /// Read commands from `input` until it ends or `quit` is given
    pub fn run<I: BufRead, O: Write>(&mut self, mut input: I, mut out: O) -> std::io::Result<()> {
        writeln!(out, "{}", self.app.status().status_label())?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            match self.execute(line.trim(), &mut input, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }

        Ok(())
    }

    fn execute<I: BufRead, O: Write>(
        &mut self,
        command: &str,
        input: &mut I,
        out: &mut O,
    ) -> Result<Flow, ShellError> {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "" => {}
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => writeln!(out, "{HELP}")?,
            "paste" => {
                let text = read_paste(input)?;
                self.app.submit_text(text)?;
            }
            "load" => {
                if arg.is_empty() {
                    writeln!(out, "usage: load <file>")?;
                } else {
                    self.app.load_file(Path::new(arg))?;
                }
            }
            "close" => {
                let mut confirm = PromptConfirm::new(&mut *input, &mut *out);
                if !self.app.close_log(&mut confirm)? {
                    writeln!(out, "log kept open")?;
                }
            }
            "format" => {
                if !arg.is_empty() {
                    self.app.save_date_format(arg);
                }
                writeln!(out, "date format: {}", self.app.log().date_format())?;
            }
            "reverse" => {
                let reverse = match arg {
                    "" => !self.app.filters().reverse,
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    other => {
                        writeln!(out, "expected on or off, got '{other}'")?;
                        return Ok(Flow::Continue);
                    }
                };
                self.app.set_reverse(reverse)?;
            }
            "clear" => {
                self.app.clear_filters()?;
            }
            "show" => {
                self.app.apply_filters()?;
            }
            "rule" => {
                let rule = compile(self.app.log().date_format(), &self.app.filters().fields);
                writeln!(out, "{rule}")?;
            }
            "copy" => {
                if arg.is_empty() {
                    writeln!(out, "usage: copy <file>")?;
                } else {
                    self.app.copy_log_text(&mut FileSink::new(arg))?;
                    writeln!(out, "[ copied ]")?;
                }
            }
            "status" => writeln!(out, "{}", self.app.status().status_label())?,
            other => match other.parse::<DateField>() {
                Ok(field) => {
                    self.app.set_filter(field, arg)?;
                }
                Err(_) => writeln!(out, "unknown command '{other}', try 'help'")?,
            },
        }

        Ok(Flow::Continue)
    }
}

/// Read pasted lines up to a line holding only `.`
fn read_paste<I: BufRead>(input: &mut I) -> std::io::Result<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let content = line.strip_suffix('\n').unwrap_or(&line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        if content == PASTE_END {
            break;
        }
        lines.push(content.to_string());
    }

    Ok(lines.join("\n"))
}

#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
