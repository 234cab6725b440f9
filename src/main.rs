use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use assist_parser::config::{AssistConfig, OutputFormat};
use assist_parser::diagnostics::{self, CompletionError};
use assist_parser::span::Span;
use assist_parser::{ParentRef, ParseMode, ParseResult};

#[derive(Parser)]
#[command(name = "assistc", version, about = "Completion-aware parser for Java-like sources")]
struct Cli {
    /// Settings file (defaults to the nearest assist.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file for completion and print the recovered tree
    Complete {
        /// Source file path
        file: PathBuf,
        /// Byte offset of the last typed character
        #[arg(long, conflicts_with = "behind", required_unless_present = "behind")]
        offset: Option<usize>,
        /// Put the cursor on the last character of the last occurrence of TEXT
        #[arg(long, value_name = "TEXT")]
        behind: Option<String>,
        /// Body parsing mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Dump the token stream of a file
    Tokens {
        /// Source file path
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Diet,
    Method,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Diet => ParseMode::Diet,
            ModeArg::Method => ParseMode::Method,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Tree,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Tree => OutputFormat::Tree,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tree: String,
    completion: Option<JsonCompletion<'a>>,
}

#[derive(Serialize)]
struct JsonCompletion<'a> {
    tag: &'static str,
    node: String,
    token: &'a str,
    replaced_source: &'a str,
    replaced: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a ParentRef>,
}

fn read_source(file: &Path) -> Result<String, CompletionError> {
    std::fs::read_to_string(file)
        .map_err(|e| CompletionError::io(format!("could not read file: {e}"), file.to_path_buf()))
}

fn load_config(explicit: Option<&Path>, file: &Path) -> Result<AssistConfig, CompletionError> {
    match explicit {
        Some(path) => AssistConfig::load(path),
        None => {
            let dir = file.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            AssistConfig::discover(dir)
        }
    }
}

fn fail(source: &str, file: &Path, err: &CompletionError) -> ! {
    diagnostics::render_error(source, &file.to_string_lossy(), err);
    std::process::exit(1);
}

fn print_result(result: &ParseResult, config: &AssistConfig) {
    match config.output.format {
        OutputFormat::Tree => {
            print!("{}", result.render());
            match &result.completion {
                Some(c) => {
                    println!("-- completion: {}", c.node);
                    if config.output.parent {
                        match &c.parent {
                            Some(parent) => println!("-- parent: {}", parent.text),
                            None => println!("-- parent: <none>"),
                        }
                    }
                }
                None => println!("-- no completion"),
            }
        }
        OutputFormat::Json => {
            let report = JsonReport {
                tree: result.render(),
                completion: result.completion.as_ref().map(|c| JsonCompletion {
                    tag: c.node.tag(),
                    node: c.node.to_string(),
                    token: &c.node.token,
                    replaced_source: &c.node.replaced_source,
                    replaced: c.node.replaced,
                    parent: if config.output.parent { c.parent.as_ref() } else { None },
                }),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: could not serialize report: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(EnvFilter::try_from_env("ASSIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Complete { file, offset, behind, mode, format } => {
            let source = read_source(&file).unwrap_or_else(|err| fail("", &file, &err));
            let mut config = load_config(cli.config.as_deref(), &file).unwrap_or_else(|err| fail("", &file, &err));
            if let Some(mode) = mode {
                config.parse.mode = mode.into();
            }
            if let Some(format) = format {
                config.output.format = format.into();
            }

            let cursor = match (offset, behind) {
                (Some(offset), _) => offset,
                (None, Some(text)) => match source.rfind(&text) {
                    Some(at) if !text.is_empty() => at + text.len() - 1,
                    _ => {
                        eprintln!("error: `{text}` does not occur in {}", file.display());
                        std::process::exit(1);
                    }
                },
                (None, None) => {
                    eprintln!("error: one of --offset or --behind is required");
                    std::process::exit(1);
                }
            };
            tracing::debug!(file = %file.display(), cursor, mode = ?config.parse.mode, "completing");

            match assist_parser::complete(&source, cursor, config.parse.mode) {
                Ok(result) => print_result(&result, &config),
                Err(err) => fail(&source, &file, &err),
            }
        }
        Commands::Tokens { file } => {
            let source = read_source(&file).unwrap_or_else(|err| fail("", &file, &err));
            let lexed = assist_parser::lexer::lex(&source);
            for tok in &lexed.tokens {
                println!("{:>5}..{:<5} {:?} {:?}", tok.span.start, tok.span.end, tok.node, tok.span.slice(&source));
            }
            for comment in &lexed.comments {
                println!("{:>5}..{:<5} comment", comment.start, comment.end);
            }
        }
    }
}
