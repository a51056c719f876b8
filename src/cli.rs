use crate::date_format::{DateField, DateFormatSpec};
use crate::line_filter::Highlight;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Browse a text log by the timestamps in its lines
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "LOG_BROWSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to use terminal colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Date format and the six field filters
#[derive(Debug, Clone, Default, Args)]
pub struct DateFilterArgs {
    /// Date format template (letters d m Y H i s are placeholders)
    #[arg(short = 'd', long)]
    pub date_format: Option<String>,

    /// Only lines whose day matches (padded to two digits)
    #[arg(long)]
    pub day: Option<String>,

    /// Only lines whose month matches (padded to two digits)
    #[arg(long)]
    pub month: Option<String>,

    /// Only lines whose year matches (used verbatim)
    #[arg(long)]
    pub year: Option<String>,

    /// Only lines whose hour matches (padded to two digits)
    #[arg(long)]
    pub hour: Option<String>,

    /// Only lines whose minute matches (padded to two digits)
    #[arg(long)]
    pub minute: Option<String>,

    /// Only lines whose second matches (padded to two digits)
    #[arg(long)]
    pub second: Option<String>,
}

impl DateFilterArgs {
    pub fn to_spec(&self) -> DateFormatSpec {
        let values = [
            (DateField::Day, &self.day),
            (DateField::Month, &self.month),
            (DateField::Year, &self.year),
            (DateField::Hour, &self.hour),
            (DateField::Minute, &self.minute),
            (DateField::Second, &self.second),
        ];

        let mut spec = DateFormatSpec::new();
        for (field, value) in values {
            if let Some(value) = value {
                spec.set(field, value.as_str());
            }
        }
        spec
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the lines of a log that carry a matching date
    View {
        /// Log file to read, or "-" for stdin
        file: PathBuf,

        #[command(flatten)]
        filters: DateFilterArgs,

        /// Show newest lines first
        #[arg(short, long)]
        reverse: bool,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// How to mark matched dates (defaults to the config, then ansi for text and html for json)
        #[arg(long, value_enum)]
        highlight: Option<Highlight>,

        /// Also copy the plain text of the result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the regular expression compiled from a date format
    Rule {
        #[command(flatten)]
        filters: DateFilterArgs,
    },
    /// Browse a log interactively
    Shell {
        /// Log file to open at start
        file: Option<PathBuf>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
