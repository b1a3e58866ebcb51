//! CLI binary for study-buddy.
//!
//! A thin shim over the library crate that maps CLI flags to `StudyConfig`,
//! sets up logging, and prints the summary and flashcards.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use study_buddy::{
    render_markdown, run_study, FlashcardSource, Provenance, QuestionStyle, StudyConfig,
    StudyObserver, StudyOutput,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: a spinner for the current step plus one log line per
/// completed step.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Authorizing…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl StudyObserver for CliObserver {
    fn on_run_start(&self, source: &str) {
        self.bar.set_prefix("Loading");
        self.bar.set_message(source.to_string());
    }

    fn on_document_loaded(&self, source: &str, chars: usize) {
        self.bar.println(format!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("Notes from {source}")),
            dim(&format!("{chars} chars"))
        ));
    }

    fn on_summarize_start(&self, _chars: usize) {
        self.bar.set_prefix("Summarising");
        self.bar.set_message("");
    }

    fn on_summary_complete(&self, sentences: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Summary     {:>3} sentences  {}",
            green("✓"),
            sentences,
            dim(&format!("{chars} chars"))
        ));
    }

    fn on_flashcards_start(&self, requested: usize) {
        self.bar.set_prefix("Flashcards");
        self.bar.set_message(format!("up to {requested}"));
    }

    fn on_fallback(&self, reason: &str) {
        let msg = if reason.chars().count() > 80 {
            format!("{}\u{2026}", reason.chars().take(79).collect::<String>())
        } else {
            reason.to_string()
        };
        self.bar.println(format!(
            "  {} Payload rejected, using sentence fallback  {}",
            yellow("⚠"),
            dim(&msg)
        ));
    }

    fn on_flashcards_complete(&self, count: usize, provenance: Provenance) {
        self.bar.println(format!(
            "  {} Flashcards  {:>3} cards      {}",
            green("✓"),
            count,
            dim(&provenance.to_string())
        ));
        self.bar.set_prefix("Publishing");
        self.bar.set_message("");
    }

    fn on_publish_complete(&self, deck_id: &str, _url: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} Deck {} published", green("✔"), bold(deck_id));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise the bundled sample notes (or ./sample_document.txt)
  study-buddy run

  # Your own notes, 3 summary sentences, 15 cards
  study-buddy run lecture.txt --sentences 3 -n 15

  # Cards from the summary, phrased as "Explain: ...?"
  study-buddy run lecture.txt --from summary --style explain

  # Repair a generator's JSON payload, falling back to the notes
  study-buddy run lecture.txt --payload cards.json

  # Markdown study note on stdout
  study-buddy run lecture.txt --markdown > lecture.md

  # Google Doc in, Google Slides out
  GOOGLE_ACCESS_TOKEN=ya29... study-buddy run 1AbC...xyz --remote-slides

ENVIRONMENT VARIABLES:
  GOOGLE_ACCESS_TOKEN   Bearer token for Google Docs / Slides
  RUST_LOG              Override the log filter (e.g. study_buddy=debug,flashcards=debug)
"#;

/// Summarise study notes and turn them into flashcards.
#[derive(Parser, Debug)]
#[command(
    name = "study-buddy",
    version,
    about = "Summarise study notes and turn them into flashcards, deterministically",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "STUDY_BUDDY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "STUDY_BUDDY_QUIET")]
    quiet: bool,

    /// Also append logs to this file.
    #[arg(long, global = true, env = "STUDY_BUDDY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "STUDY_BUDDY_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch notes, summarise them, synthesise flashcards, publish a deck.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Notes file path or Google Docs ID. Default: ./sample_document.txt,
    /// else the bundled sample notes.
    source: Option<String>,

    /// Number of flashcards to generate.
    #[arg(short = 'n', long, env = "STUDY_BUDDY_CARDS", default_value_t = 10)]
    cards: usize,

    /// Maximum summary sentences.
    #[arg(long, env = "STUDY_BUDDY_SENTENCES", default_value_t = 5)]
    sentences: usize,

    /// Maximum summary characters.
    #[arg(long, env = "STUDY_BUDDY_MAX_CHARS")]
    max_chars: Option<usize>,

    /// Text the flashcards are drawn from.
    #[arg(long, env = "STUDY_BUDDY_FROM", value_enum, default_value = "notes")]
    from: SourceArg,

    /// Question phrasing.
    #[arg(long, env = "STUDY_BUDDY_STYLE", value_enum, default_value = "key-term")]
    style: StyleArg,

    /// Keyword pool size used when scoring sentences.
    #[arg(long, env = "STUDY_BUDDY_KEYWORDS", default_value_t = 10)]
    keywords: usize,

    /// Structured flashcard payload (JSON) to repair instead of synthesising.
    #[arg(long, env = "STUDY_BUDDY_PAYLOAD")]
    payload: Option<PathBuf>,

    /// Deck title.
    #[arg(long, env = "STUDY_BUDDY_TITLE")]
    title: Option<String>,

    /// Directory for presentation_<id>.json.
    #[arg(short, long, env = "STUDY_BUDDY_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Token file used when no access token is given.
    #[arg(long, env = "STUDY_BUDDY_TOKEN_PATH", default_value = "token.json")]
    token_path: PathBuf,

    /// Google bearer token for Docs and Slides.
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Publish to Google Slides instead of a local file.
    #[arg(long, env = "STUDY_BUDDY_REMOTE_SLIDES")]
    remote_slides: bool,

    /// HTTP timeout for Google API calls in seconds.
    #[arg(long, env = "STUDY_BUDDY_HTTP_TIMEOUT", default_value_t = 30)]
    http_timeout: u64,

    /// Output structured JSON (StudyOutput).
    #[arg(long, env = "STUDY_BUDDY_JSON", conflicts_with = "markdown")]
    json: bool,

    /// Output a Markdown study note.
    #[arg(long, env = "STUDY_BUDDY_MARKDOWN")]
    markdown: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum SourceArg {
    Notes,
    Summary,
}

impl From<SourceArg> for FlashcardSource {
    fn from(v: SourceArg) -> Self {
        match v {
            SourceArg::Notes => FlashcardSource::Notes,
            SourceArg::Summary => FlashcardSource::Summary,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum StyleArg {
    KeyTerm,
    Explain,
}

impl From<StyleArg> for QuestionStyle {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::KeyTerm => QuestionStyle::KeyTerm,
            StyleArg::Explain => QuestionStyle::Explain,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let Command::Run(ref args) = cli.command;

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner replaces INFO lines on stderr; the log file always gets them.
    let show_progress = !cli.quiet && !cli.no_progress && !args.json;
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    init_logging(level, cli.verbose, cli.log_file.as_ref())?;

    // ── Run ──────────────────────────────────────────────────────────────
    let cli_observer = show_progress.then(CliObserver::new);
    let (config, output) = execute(args, cli_observer.as_ref()).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if args.markdown {
        print!("{}", render_markdown(&config.deck_title, &output.summary, &output.flashcards));
    } else {
        print_plain(&output);
    }

    if !cli.quiet && !args.json {
        eprintln!(
            "Presentation created: {}  {}",
            bold(&output.deck.url),
            dim(&format!("{}ms", output.stats.total_duration_ms))
        );
    }

    Ok(())
}

/// Build the config, read the payload and run the study. An error stops
/// the spinner where it is; `on_publish_complete` finishes it on success.
async fn execute(
    args: &RunArgs,
    cli_observer: Option<&Arc<CliObserver>>,
) -> Result<(StudyConfig, StudyOutput)> {
    let result = async {
        let observer = cli_observer.map(|obs| Arc::clone(obs) as Arc<dyn StudyObserver>);
        let config = build_config(args, observer)?;

        let payload = match args.payload {
            Some(ref path) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read payload from {}", path.display()))?,
            ),
            None => None,
        };

        let output = run_study(args.source.as_deref(), payload.as_deref(), &config)
            .await
            .context("Study run failed")?;
        Ok::<_, anyhow::Error>((config, output))
    }
    .await;

    if let (Err(_), Some(obs)) = (&result, cli_observer) {
        obs.bar.abandon();
    }
    result
}

fn init_logging(level: &str, verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_filter(stderr_filter);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let file_level = if verbose { "debug" } else { "info" };
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(file_level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// Map CLI args to `StudyConfig`.
fn build_config(
    args: &RunArgs,
    observer: Option<Arc<dyn StudyObserver>>,
) -> Result<StudyConfig> {
    let mut builder = StudyConfig::builder()
        .max_sentences(args.sentences)
        .flashcard_count(args.cards)
        .flashcard_source(args.from.clone().into())
        .question_style(args.style.clone().into())
        .keyword_pool(args.keywords)
        .output_dir(args.output_dir.clone())
        .token_path(args.token_path.clone())
        .remote_slides(args.remote_slides)
        .http_timeout_secs(args.http_timeout);

    if let Some(chars) = args.max_chars {
        builder = builder.max_summary_chars(chars);
    }
    if let Some(ref title) = args.title {
        builder = builder.deck_title(title.clone());
    }
    if let Some(ref token) = args.access_token {
        builder = builder.access_token(token.clone());
    }
    if let Some(obs) = observer {
        builder = builder.observer(obs);
    }

    builder.build().context("Invalid configuration")
}

fn print_plain(output: &StudyOutput) {
    println!("{}", bold("Summary"));
    if output.summary.is_empty() {
        println!("  {}", dim("(no sentences found)"));
    } else {
        for sentence in &output.summary.sentences {
            println!("  • {sentence}.");
        }
    }

    println!();
    let heading = format!("Flashcards ({})", output.flashcards.len());
    println!("{}", bold(&heading));
    if output.flashcards.is_fallback() {
        println!("  {}", yellow("generated by the sentence-based fallback"));
    }
    for (i, card) in output.flashcards.cards.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, cyan(&card.question));
        println!("      {}", card.answer);
    }
}
