use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::locale::Locale;

#[derive(Parser, Debug)]
#[command(name = "hoax-lens")]
#[command(version)]
#[command(about = "Classify news text as hoax or fact using a remote analysis API")]
pub struct Args {
    /// News text to analyze; `-` reads it from stdin
    #[arg(required_unless_present_any = ["history", "health", "web"])]
    pub text: Option<String>,

    /// Show the analysis history instead of analyzing
    #[arg(long, conflicts_with_all = ["text", "health", "web"])]
    pub history: bool,

    /// Check whether the analysis API is up
    #[arg(long, conflicts_with_all = ["text", "web"])]
    pub health: bool,

    /// Launch the web front end on localhost
    #[arg(long, conflicts_with = "text")]
    pub web: bool,

    /// Port for the web front end [default: 8888]
    #[arg(long)]
    pub port: Option<u16>,

    /// Print the result as an HTML fragment
    #[arg(long, conflicts_with = "json")]
    pub html: bool,

    /// Print the raw API response as JSON
    #[arg(long)]
    pub json: bool,

    /// Display language [default: id]
    #[arg(long, value_enum)]
    pub locale: Option<Locale>,

    /// Analysis API base URL (overrides config and HOAX_LENS_API_BASE)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// How results are printed in one-shot modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Html,
    Json,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze(String),
    History,
    Health,
    Web,
}

impl Args {
    pub fn output_format(&self) -> OutputFormat {
        if self.html {
            OutputFormat::Html
        } else if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        }
    }

    /// Resolve the command, reading stdin when the text is `-`.
    pub fn command(&self, stdin: impl Read) -> std::io::Result<Command> {
        if self.web {
            return Ok(Command::Web);
        }
        if self.health {
            return Ok(Command::Health);
        }
        if self.history {
            return Ok(Command::History);
        }
        match self.text.as_deref() {
            Some("-") => {
                let mut buf = String::new();
                let mut stdin = stdin;
                stdin.read_to_string(&mut buf)?;
                Ok(Command::Analyze(buf))
            }
            Some(text) => Ok(Command::Analyze(text.to_string())),
            None => Ok(Command::Analyze(String::new())),
        }
    }

    /// CLI flags take precedence over everything in `config`.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(base) = &self.api_base {
            config.api_base = base.clone();
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}
