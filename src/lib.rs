pub mod app;
pub mod cli;
pub mod config;
pub mod date_format;
pub mod error;
pub mod helpers;
pub mod line_filter;
pub mod log_state;
pub mod render;
pub mod shell;
pub mod status;

use anyhow::Context;
use std::io::Read;
use std::path::Path;

pub use app::{App, COPY_FLASH, FilterValues};
pub use cli::{ColorMode, Commands, DateFilterArgs, OutputFormat, cli_parse};
pub use config::{ViewerConfig, load_config};
pub use date_format::{
    CompiledRule, DEFAULT_DATE_FORMAT, DateField, DateFormatSpec, compile, pad_two,
};
pub use error::ViewerError;
pub use helpers::replace_all;
pub use line_filter::{FilterResult, FilteredLine, Highlight, filter_lines};
pub use log_state::{LogSignal, LogState};
pub use render::{
    ClipboardSink, Confirm, FileSink, MemorySink, RecordingRenderer, Renderer, TerminalRenderer,
    line_count_label,
};
pub use status::{AppStatus, RegionId, StatusChange, StatusMachine, StatusRegions};

/// Set up stderr logging; `RUST_LOG` adds to the level picked here
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// Feed a log file, or stdin for `-`, through the upload path
fn load_source<R: Renderer>(app: &mut App<R>, file: &Path) -> anyhow::Result<()> {
    if file == Path::new("-") {
        app.begin_upload()?;
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read log from stdin")?;
        app.complete_upload(&bytes)?;
    } else {
        app.load_file(file)?;
    }
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);
    apply_color_mode(cli.color);

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;

    match &cli.command {
        Commands::View {
            file,
            filters,
            reverse,
            format,
            highlight,
            output,
        } => {
            let date_format = filters
                .date_format
                .clone()
                .unwrap_or_else(|| config.date_format.clone());
            let highlight = highlight.or(config.highlight).unwrap_or(match format {
                OutputFormat::Text => Highlight::Ansi,
                OutputFormat::Json => Highlight::Html,
            });

            let renderer = RecordingRenderer::with_regions(config.status_regions());
            let mut app = App::with_date_format(renderer, date_format)?
                .with_highlight(highlight)
                .with_reverse(*reverse || config.reverse);
            let spec = filters.to_spec();
            for field in DateField::ALL {
                if let Some(value) = spec.get(field) {
                    app.set_filter(field, value)?;
                }
            }

            load_source(&mut app, file)
                .with_context(|| format!("Failed to load log '{}'", file.display()))?;

            let result = app.last_result();
            match format {
                OutputFormat::Text => {
                    for line in &result.lines {
                        println!("{}", line.display_line);
                    }
                    println!("{}", line_count_label(result.len()));
                }
                OutputFormat::Json => {
                    let rule = compile(app.log().date_format(), &app.filters().fields);
                    let json = serde_json::json!({
                        "dateFormat": app.log().date_format(),
                        "rule": rule.as_str(),
                        "lineCount": result.len(),
                        "totalLines": result.total_lines,
                        "reversed": result.reversed,
                        "lines": result.lines,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
            }

            if let Some(path) = output {
                app.copy_log_text(&mut FileSink::new(path))
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
        }
        Commands::Rule { filters } => {
            let date_format = filters
                .date_format
                .as_deref()
                .unwrap_or(&config.date_format);
            let rule = compile(date_format, &filters.to_spec());
            println!("{rule}");
            rule.to_regex()?;
        }
        Commands::Shell { file } => {
            let stdout = std::io::stdout();
            let renderer = TerminalRenderer::new(stdout, config.status_regions());
            let mut app = App::with_date_format(renderer, config.date_format.clone())?
                .with_highlight(config.highlight.unwrap_or(Highlight::Ansi))
                .with_reverse(config.reverse);

            if let Some(file) = file {
                app.load_file(file)
                    .with_context(|| format!("Failed to load log '{}'", file.display()))?;
            }

            let mut shell = shell::Shell::new(app);
            let stdin = std::io::stdin();
            shell.run(stdin.lock(), std::io::stdout())?;
        }
    }

    Ok(())
}
