use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use featureflow::config::Config;
use featureflow::counter::{CounterModel, CounterNews, UiEvent};
use featureflow::logging::init_tracing;
use featureflow::saved_state::FileSavedStateRegistry;
use featureflow::FeatureScope;

#[derive(Parser)]
#[command(name = "featureflow", about = "Counter demo for the featureflow MVI engine")]
struct Args {
    /// Config file (default: ~/.config/featureflow/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Saved-state file (overrides the config value)
    #[arg(short, long)]
    state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Increment,
    Show,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "+" | "inc" => Some(Self::Increment),
            "show" => Some(Self::Show),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Apply one command. Breaks on quit, and when the counter can no longer
/// accept input so the caller still saves what it has.
fn run_command(model: &CounterModel, command: Command) -> ControlFlow<()> {
    match command {
        Command::Increment => {
            if let Err(err) = model.accept(UiEvent::ButtonInc) {
                tracing::error!(error = %err, "Counter stopped accepting input");
                eprintln!("{err}");
                return ControlFlow::Break(());
            }
        }
        Command::Show => println!("counter: {}", model.value().counter),
        Command::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config_path = args.config.unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let state_path = args
        .state_file
        .or_else(|| config.saved_state.path.clone())
        .unwrap_or_else(FileSavedStateRegistry::default_path);
    let registry = Arc::new(FileSavedStateRegistry::open(&state_path));

    let scope = FeatureScope::new();
    let guard = scope.guard();
    let model = CounterModel::new(&config, registry.clone(), &scope);

    let mut counter = Box::pin(model.counter());
    let mut news = model.news();
    let printer = scope.spawn(async move {
        loop {
            tokio::select! {
                value = counter.next() => match value {
                    Some(value) => println!("counter: {value}"),
                    None => break,
                },
                item = news.recv() => match item {
                    Some(CounterNews::Milestone { counter }) => println!("milestone reached: {counter}"),
                    None => break,
                },
            }
        }
    });

    println!("commands: inc (or enter), show, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match Command::parse(&line) {
            Some(command) => {
                if run_command(&model, command).is_break() {
                    break;
                }
            }
            None => eprintln!("unknown command: {} (try inc, show, quit)", line.trim()),
        }
    }

    let saved = registry
        .perform_save()
        .context("Failed to save counter state")?;
    tracing::info!(saved, path = %registry.path().display(), "Counter state saved");

    drop(guard);
    printer.abort();
    Ok(())
}
