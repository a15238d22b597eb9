//! Mpelembe Insights CLI — analyze articles with Gemini.
//!
//! Usage:
//!   mpelembe-insights analyze <URL> [--json]
//!   mpelembe-insights analyze --text <TEXT|-> [--json]
//!   mpelembe-insights schema
//!   mpelembe-insights session

use clap::{Args, Parser, Subcommand};
use mpelembe_insights::render::{render_history, render_result};
use mpelembe_insights::{
    analysis::response_schema, AnalysisResult, AnalyzeError, Analyzer, AnalyzerConfig,
    GeminiClient, InputMode, Session,
};
use std::io::Read;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mpelembe-insights",
    version,
    about = "Summaries, sentiment and entities for news articles"
)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ApiArgs {
    /// Gemini API key (default: $GEMINI_API_KEY, then $API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Model name (default: $GEMINI_MODEL or gemini-3-flash-preview)
    #[arg(long, global = true)]
    model: Option<String>,
    /// API root URL (default: $GEMINI_BASE_URL or the public endpoint)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one article
    Analyze {
        /// Article URL, or the article text with --text ("-" reads stdin)
        content: String,
        /// Treat CONTENT as pasted article text instead of a URL
        #[arg(long)]
        text: bool,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the response schema declared to the model
    Schema,
    /// Interactive session with in-memory history
    Session,
}

const SESSION_HELP: &str = "\
Commands:
  url <URL>     analyze the article at URL
  text <TEXT>   analyze pasted article text
  history       list recent analyses (newest first)
  show <N>      show the N-th history entry again
  clear         clear the displayed result
  help          show this help
  quit          leave the session";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: ApiArgs) -> AnalyzerConfig {
    let mut config = AnalyzerConfig::from_env();
    if let Some(key) = args.api_key {
        config = config.with_api_key(key);
    }
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    config
}

fn report_error(e: &AnalyzeError) {
    eprintln!("Error: {}", e);
    if let Some(raw) = e.raw_response() {
        tracing::debug!(raw, "rejected response");
    }
}

fn print_result(result: &AnalysisResult, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        print!("{}", render_result(result));
    }
    0
}

fn read_stdin() -> Result<String, std::io::Error> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

async fn cmd_analyze(analyzer: &Analyzer, content: String, text: bool, json: bool) -> i32 {
    let content = if content == "-" {
        match read_stdin() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: cannot read stdin: {}", e);
                return 1;
            }
        }
    } else {
        content
    };
    let mode = if text { InputMode::Text } else { InputMode::Url };

    match analyzer.analyze(&content, mode).await {
        Ok(result) => print_result(&result, json),
        Err(e) => {
            report_error(&e);
            1
        }
    }
}

fn cmd_schema() -> i32 {
    match serde_json::to_string_pretty(&response_schema()) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_session(analyzer: Analyzer) -> i32 {
    let mut session = Session::new(analyzer);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Mpelembe Insights session. Type 'help' for commands.");
    loop {
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: cannot read input: {}", e);
                return 1;
            }
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "url" | "text" => {
                let mode = if command == "url" {
                    InputMode::Url
                } else {
                    InputMode::Text
                };
                println!("Processing...");
                match session.submit(rest, mode).await {
                    Ok(result) => print!("{}", render_result(&result)),
                    Err(e) => report_error(&e),
                }
            }
            "history" => print!("{}", render_history(&session.history().list())),
            "show" => {
                let entry = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|idx| session.history().nth(idx))
                    .map(|e| e.id.clone());
                match entry.and_then(|id| session.select(&id)) {
                    Some(result) => print!("{}", render_result(&result)),
                    None => eprintln!("Error: no history entry '{}'", rest),
                }
            }
            "clear" => {
                session.clear_current();
                println!("Cleared.");
            }
            "help" => println!("{}", SESSION_HELP),
            "quit" | "exit" => break,
            other => eprintln!("Error: unknown command '{}' (try 'help')", other),
        }
    }
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Commands::Schema = cli.command {
        std::process::exit(cmd_schema());
    }

    let config = build_config(cli.api);
    tracing::debug!(?config, "configuration loaded");
    let analyzer = Analyzer::new(Arc::new(GeminiClient::new(config)));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = rt.block_on(async {
        match cli.command {
            Commands::Analyze {
                content,
                text,
                json,
            } => cmd_analyze(&analyzer, content, text, json).await,
            Commands::Session => cmd_session(analyzer).await,
            Commands::Schema => cmd_schema(),
        }
    });
    std::process::exit(code);
}
