use anyhow::{Context, Result};
use bibquery::{Highlight, Highlighter, Locale, Settings};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Plain,
    Json,
    Html,
}

#[derive(Parser)]
#[command(name = "bibquery")]
#[command(about = "Validate and highlight boolean search expressions", long_about = None)]
struct Args {
    /// Expressions to check; read one per line from stdin when omitted
    expressions: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    format: Format,

    /// Only validate; print rejections and report through the exit code
    #[arg(long)]
    check: bool,

    /// Language of error messages (en, ru)
    #[arg(long, env = "BIBQUERY_LOCALE")]
    locale: Option<String>,

    /// JSON settings file
    #[arg(long, env = "BIBQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Longest accepted expression, in characters
    #[arg(long, env = "BIBQUERY_MAX_INPUT_LEN")]
    max_input_len: Option<usize>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    info!("bibquery v{} with {:?}", bibquery::VERSION, settings);

    let expressions = if args.expressions.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .context("Failed to read expressions from stdin")?
    } else {
        args.expressions.clone()
    };

    let highlighter = Highlighter::new(settings);
    let mut out = io::stdout().lock();
    let mut all_valid = true;

    for text in &expressions {
        if args.check {
            if let Err(e) = highlighter.check(text) {
                all_valid = false;
                writeln!(out, "error: {}: {}", e, text)?;
            }
            continue;
        }

        match highlighter.highlight(text) {
            Ok(highlight) => {
                all_valid &= highlight.is_accepted();
                print_highlight(&mut out, &highlighter, args.format, text, &highlight)?;
            }
            Err(e) => {
                all_valid = false;
                warn!("Skipping expression: {}", e);
                writeln!(out, "error: {}", e)?;
            }
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => Settings::default(),
    };

    if let Some(locale) = &args.locale {
        match locale.parse::<Locale>() {
            Ok(locale) => settings = settings.with_locale(locale),
            Err(_) => warn!("Unknown locale '{}', using '{:?}'", locale, settings.locale),
        }
    }
    if let Some(max_input_len) = args.max_input_len {
        settings = settings.with_max_input_len(max_input_len);
    }

    settings.check()?;
    Ok(settings)
}

fn print_highlight(
    out: &mut impl Write,
    highlighter: &Highlighter,
    format: Format,
    text: &str,
    highlight: &Highlight,
) -> Result<()> {
    let message = highlighter.message(highlight);

    match format {
        Format::Plain => match highlight {
            Highlight::Accepted { tokens } => {
                let rendered: String = tokens.iter().map(|token| token.display(text)).collect();
                writeln!(out, "ok: {}", rendered)?;
            }
            Highlight::Rejected { error, .. } => {
                writeln!(
                    out,
                    "error: {} (offset {}): {}",
                    message.unwrap_or_default(),
                    error.offset,
                    text
                )?;
            }
        },
        Format::Json => {
            let report = serde_json::json!({
                "input": text,
                "result": highlight,
                "message": message,
            });
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
        Format::Html => {
            write!(out, "<div class=\"highlight\">{}</div>", highlight.render_html(text))?;
            if let Some(message) = message {
                write!(out, "<div class=\"error-message\">{}</div>", message)?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
