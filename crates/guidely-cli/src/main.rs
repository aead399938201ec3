//! guidely CLI: the hero section in a terminal, plus a scripted demo

use clap::{Parser, Subcommand};
use guidely_engine::{
    CannedResponder, Config, ConversationMode, ConversationTurn, HeroPage, ManualClock,
    SeededDelays, Sender,
};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Tour-guide landing page hero: animated search box that turns into a chat
#[derive(Parser)]
#[command(name = "guidely")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (JSON); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui {
        /// Write logs to this file; the TUI drops them otherwise
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Play the hero on virtual time and print what it shows
    Demo {
        /// Seconds of search animation before the queries are sent
        #[arg(long, default_value = "6")]
        seconds: u64,

        /// Seed for typing delays and bot replies
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Query to submit (repeatable)
        #[arg(long = "query")]
        queries: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write the default configuration to this path instead
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

/// Virtual time between demo samples.
const SAMPLE_MS: u64 = 10;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        None => cmd_tui(cli.config.as_deref(), cli.verbose, None),
        Some(Commands::Tui { log_file }) => {
            cmd_tui(cli.config.as_deref(), cli.verbose, log_file.as_deref())
        }
        Some(Commands::Demo {
            seconds,
            seed,
            queries,
            json,
        }) => {
            init_logging(cli.verbose, None)?;
            let config = Config::load_or_default(cli.config.as_deref())?;
            let report = run_demo(&config, seconds, seed, &queries);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Some(Commands::Config { init }) => {
            init_logging(cli.verbose, None)?;
            cmd_config(cli.config.as_deref(), init.as_deref())
        }
    }
}

fn cmd_tui(
    config: Option<&Path>,
    verbose: u8,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    // Anything written to stderr would land on the alternate screen
    if let Some(path) = log_file {
        init_logging(verbose, Some(path))?;
    }
    let config = Config::load_or_default(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(guidely_tui::run_tui(&config))
}

fn cmd_config(config: Option<&Path>, init: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match init {
        Some(path) => {
            if path.exists() {
                return Err(format!("{} already exists", path.display()).into());
            }
            Config::default().save(path)?;
            info!(path = %path.display(), "wrote default config");
            println!("Wrote {}", path.display());
        }
        None => {
            let config = Config::load_or_default(config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Install the global subscriber. Logs go to `log_file` when given, else
/// to stderr. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init()
            .map_err(|e| e.to_string())?,
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| e.to_string())?,
    }
    Ok(())
}

/// What the hero showed at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Frame {
    at_ms: u64,
    headline: String,
    placeholder: String,
}

/// Outcome of a demo run.
#[derive(Debug, Serialize)]
struct DemoReport {
    seed: u64,
    frames: Vec<Frame>,
    mode: ConversationMode,
    turns: Vec<ConversationTurn>,
}

/// Play the hero on a manual clock.
///
/// Samples the search view every [`SAMPLE_MS`] for `seconds` and keeps a
/// frame whenever it changes, then submits each query and waits out the
/// reply latency.
fn run_demo(config: &Config, seconds: u64, seed: u64, queries: &[String]) -> DemoReport {
    let clock = ManualClock::new();
    let mut page = HeroPage::mount(
        config,
        Box::new(clock.clone()),
        Box::new(SeededDelays::new(seed)),
        Box::new(CannedResponder::seeded(config.responses.clone(), seed)),
    );

    let end_ms = search_window_ms(seconds);
    let mut frames: Vec<Frame> = Vec::new();
    let mut at_ms = 0;
    loop {
        page.advance();
        let frame = Frame {
            at_ms,
            headline: page.headline_word().to_string(),
            placeholder: page.placeholder(),
        };
        let unchanged = frames.last().is_some_and(|last| {
            last.headline == frame.headline && last.placeholder == frame.placeholder
        });
        if !unchanged {
            frames.push(frame);
        }

        if at_ms >= end_ms {
            break;
        }
        clock.advance_ms(SAMPLE_MS);
        at_ms = at_ms.saturating_add(SAMPLE_MS);
    }
    debug!(frames = frames.len(), "search animation sampled");

    for query in queries {
        page.set_input(query.as_str());
        if !page.submit() {
            debug!(%query, "blank query skipped");
            continue;
        }
        clock.advance(config.response_latency());
        page.advance();
    }

    let report = DemoReport {
        seed,
        frames,
        mode: page.mode(),
        turns: page.turns().to_vec(),
    };
    page.unmount();
    report
}

/// Length of the sampled search animation, capped instead of overflowing.
fn search_window_ms(seconds: u64) -> u64 {
    seconds.saturating_mul(1000)
}

fn print_report(report: &DemoReport) {
    for frame in &report.frames {
        println!(
            "[{:>6}ms] Find your ideal {:<6}| {}",
            frame.at_ms, frame.headline, frame.placeholder
        );
    }

    if report.turns.is_empty() {
        return;
    }
    println!();
    for turn in &report.turns {
        let who = match turn.sender {
            Sender::User => "you",
            Sender::Bot => "guide",
        };
        println!("{who:>5}: {}", turn.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidely_engine::DEFAULT_RESPONSES;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_demo_flags() {
        let cli = Cli::try_parse_from([
            "guidely", "demo", "--seconds", "2", "--seed", "7", "--query", "Oslo", "--query",
            "Paris", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Demo {
                seconds,
                seed,
                queries,
                json,
            }) => {
                assert_eq!(seconds, 2);
                assert_eq!(seed, 7);
                assert_eq!(queries, vec!["Oslo", "Paris"]);
                assert!(json);
            }
            _ => panic!("expected demo command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["guidely", "tui", "--config", "g.json", "-vv"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("g.json")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Tui { log_file: None })));
    }

    #[test]
    fn test_search_window_saturates() {
        assert_eq!(search_window_ms(6), 6_000);
        assert_eq!(search_window_ms(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_demo_starts_with_prefix_and_cursor() {
        let report = run_demo(&Config::default(), 1, 1, &[]);
        let first = &report.frames[0];
        assert_eq!(first.at_ms, 0);
        assert_eq!(first.headline, "tour");
        assert_eq!(first.placeholder, "I want a guide |");
        assert_eq!(report.mode, ConversationMode::Search);
        assert!(report.turns.is_empty());
    }

    #[test]
    fn test_demo_types_the_first_phrase() {
        let report = run_demo(&Config::default(), 3, 1, &[]);
        let typed = "I want a guide in Oslo on the 15th of December";
        assert!(report
            .frames
            .iter()
            .any(|f| f.placeholder.starts_with(typed)));
        assert!(report.frames.windows(2).all(|w| w[0].at_ms < w[1].at_ms));
    }

    #[test]
    fn test_demo_is_deterministic_per_seed() {
        let a = run_demo(&Config::default(), 4, 9, &["Oslo".to_string()]);
        let b = run_demo(&Config::default(), 4, 9, &["Oslo".to_string()]);
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.turns[1].text, b.turns[1].text);
    }

    #[test]
    fn test_demo_queries_produce_replies() {
        let queries = vec!["Oslo".to_string(), "   ".to_string(), "Munich".to_string()];
        let report = run_demo(&Config::default(), 0, 3, &queries);

        assert_eq!(report.mode, ConversationMode::Chat);
        assert_eq!(report.turns.len(), 4);
        assert_eq!(report.turns[0].text, "Oslo");
        assert_eq!(report.turns[0].sender, Sender::User);
        assert_eq!(report.turns[1].sender, Sender::Bot);
        assert!(DEFAULT_RESPONSES.contains(&report.turns[1].text.as_str()));
        assert_eq!(report.turns[2].text, "Munich");
    }

    #[test]
    fn test_demo_report_json_shape() {
        let report = run_demo(&Config::default(), 0, 3, &["Oslo".to_string()]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["mode"], "chat");
        assert_eq!(value["turns"][0]["sender"], "user");
        assert_eq!(value["frames"][0]["at_ms"], 0);
    }

    #[test]
    fn test_config_init_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guidely.json");

        cmd_config(None, Some(path.as_path())).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(cmd_config(None, Some(path.as_path())).is_err());
    }
}
