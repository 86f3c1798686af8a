use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use hoax_lens::cli::{Args, Command, OutputFormat};
use hoax_lens::client::AnalysisClient;
use hoax_lens::config::Config;
use hoax_lens::error::{LensError, Result};
use hoax_lens::render::{html, terminal, HistoryPanel, ResultView};
use hoax_lens::session::Session;
use hoax_lens::web;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hoax_lens=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_session(config: &Config) -> Session {
    let mut builder = AnalysisClient::builder(config.api_base.clone());
    if let Some(timeout) = config.connect_timeout() {
        builder = builder.connect_timeout(timeout);
    }
    Session::new(builder.build(), config.locale)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| LensError::Io(e.into()))
}

async fn run_analyze(
    session: &Session,
    text: &str,
    format: OutputFormat,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let locale = session.locale();
    let result = match session.analyze(text).await {
        Ok(result) => result,
        Err(e) => {
            if !matches!(e, LensError::Validation(_)) {
                tracing::error!(error = %e, "analysis failed");
            }
            writeln!(err, "{}", e.user_message(locale).red())?;
            return Ok(false);
        }
    };
    match format {
        OutputFormat::Json => writeln!(out, "{}", to_json(&*result)?)?,
        OutputFormat::Html => writeln!(out, "{}", html::render_result(&result, locale)?)?,
        OutputFormat::Terminal => write!(out, "{}", terminal::format_result(&ResultView::build(&result, locale)))?,
    }
    Ok(true)
}

async fn run_history(
    session: &Session,
    format: OutputFormat,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let locale = session.locale();
    if format == OutputFormat::Json {
        return match session.client().fetch_history().await {
            Ok(items) => {
                writeln!(out, "{}", to_json(&items)?)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "history unavailable");
                writeln!(err, "{}", locale.strings().history_unavailable.red())?;
                Ok(false)
            }
        };
    }
    let panel = session.history_panel().await;
    let ok = !matches!(panel, HistoryPanel::Unavailable);
    match format {
        OutputFormat::Html => writeln!(out, "{}", html::render_history_panel(&panel, locale)?)?,
        _ => write!(out, "{}", terminal::format_history(&panel, locale))?,
    }
    Ok(ok)
}

async fn run_health(session: &Session, out: &mut impl Write) -> Result<bool> {
    let base = session.client().base_url();
    let ok = match session.client().check_health().await {
        Ok(health) if health.is_healthy() => {
            writeln!(out, "{} {}", "healthy".bright_green().bold(), base.dimmed())?;
            true
        }
        Ok(health) => {
            writeln!(out, "{} {}", terminal::plain(&health.status).yellow().bold(), base.dimmed())?;
            false
        }
        Err(e) => {
            writeln!(out, "{} {}", "unreachable".red().bold(), e)?;
            false
        }
    };
    Ok(ok)
}

#[tokio::main]
async fn main() -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let config = args.apply_to(Config::load(args.config.as_deref())?).validated()?;
    let session = build_session(&config);
    tracing::debug!(api_base = %config.api_base, locale = %config.locale, "configuration resolved");

    let (mut out, mut err) = (std::io::stdout().lock(), std::io::stderr());
    let ok = match args.command(std::io::stdin().lock())? {
        Command::Web => {
            web::serve(config.port, Arc::new(session)).await?;
            true
        }
        Command::Health => run_health(&session, &mut out).await?,
        Command::History => run_history(&session, args.output_format(), &mut out, &mut err).await?,
        Command::Analyze(text) => {
            run_analyze(&session, &text, args.output_format(), &mut out, &mut err).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
