//! verdict-lens: classify an image from the terminal.
//!
//! Usage:
//!   verdict-lens [--config <file>] classify <image>     One-shot verdict
//!   verdict-lens [--config <file>] session [image]      Interactive panels

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use verdict_lens::view::render_panel;
use verdict_lens::{
    Action, Classifier, ClassifierConfig, GeminiClassifier, Panel, SelectedFile, Session,
    ViewController,
};

#[derive(Parser, Debug)]
#[command(name = "verdict-lens", version, about = "Image verdicts from Gemini")]
struct Args {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Classify one image and print the result panel
    Classify { image: PathBuf },
    /// Interactive session: open, clear, analyze, retry
    Session { image: Option<PathBuf> },
}

/// Stands in for the HTTP client when configuration is unusable; the
/// controller is locked in that case, so this is never called.
struct Unconfigured;

#[async_trait::async_trait]
impl Classifier for Unconfigured {
    async fn classify(
        &self,
        _image: &verdict_lens::ImagePayload,
    ) -> verdict_lens::Result<verdict_lens::AnalysisResult> {
        Err(verdict_lens::Error::configuration_with_context(
            "classifier not configured",
            verdict_lens::ErrorContext::new().with_source("cli"),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let (config, check) = match ClassifierConfig::load(args.config.as_deref()) {
        Ok(config) => {
            let check = config.validate();
            (config, check)
        }
        Err(e) => (ClassifierConfig::default(), Err(e)),
    };
    let classifier: Arc<dyn Classifier> = match &check {
        Ok(()) => Arc::new(GeminiClassifier::new(config)?),
        Err(_) => Arc::new(Unconfigured),
    };
    let mut session = Session::new(ViewController::new(check), classifier);

    match args.command {
        Cmd::Classify { image } => {
            open(&mut session, &image).await;
            if session.controller().visible_panel() == Panel::Preview {
                session.handle(Action::Analyze).await;
            }
            print!("{}", render_panel(session.controller()));
            if session.controller().visible_panel() != Panel::Result {
                std::process::exit(1);
            }
        }
        Cmd::Session { image } => {
            if let Some(path) = image {
                open(&mut session, &path).await;
            }
            run_interactive(&mut session).await?;
        }
    }
    Ok(())
}

async fn open(session: &mut Session, path: &std::path::Path) {
    let action = match SelectedFile::from_path(path).await {
        Ok(file) => Action::Select(file),
        Err(e) => Action::SelectFailed(e),
    };
    session.handle(action).await;
}

async fn run_interactive(session: &mut Session) -> Result<()> {
    print!("{}", render_panel(session.controller()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word {
            "" => continue,
            "open" | "drop" => {
                if rest.trim().is_empty() {
                    println!("usage: open <path>");
                    continue;
                }
                open(session, std::path::Path::new(rest.trim())).await;
            }
            "clear" => session.handle(Action::Clear).await,
            "analyze" | "retry" => {
                let action = if word == "retry" {
                    Action::Retry
                } else {
                    Action::Analyze
                };
                if let Some(command) = session.dispatch(action) {
                    print!("{}", render_panel(session.controller()));
                    let done = session.execute(command).await;
                    session.handle(done).await;
                }
            }
            "status" => {}
            "help" => {
                println!("commands: open <path>, clear, analyze, retry, status, quit");
                continue;
            }
            "quit" | "exit" => break,
            other => {
                println!("unknown command: {other}");
                continue;
            }
        }
        print!("{}", render_panel(session.controller()));
    }
    Ok(())
}
