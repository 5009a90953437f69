use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docqa::{AssistantConfig, Document, Persona, Session};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Assistant {
    /// Answers about the built-in resume, or about an uploaded document.
    Resume,
    /// Math tutoring; documents are not used.
    Math,
}

impl From<Assistant> for Persona {
    fn from(value: Assistant) -> Self {
        match value {
            Assistant::Resume => Persona::Resume,
            Assistant::Math => Persona::MathTutor,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "docqa", about = "Chat with a document or a built-in persona")]
struct Cli {
    #[arg(long, value_enum, default_value = "resume")]
    persona: Assistant,

    /// Document (csv, txt, pdf, docx, md) to process before the first question
    #[arg(long)]
    document: Option<PathBuf>,

    /// TOML config file; defaults to the per-user config if present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AssistantConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if config.completion.api_key.is_none() {
        eprintln!(
            "Warning: no API key set (DOCQA_API_KEY or GROQ_API_KEY); requests may be rejected."
        );
    }

    let mut session = Session::from_config(cli.persona.into(), &config)?;

    if let Some(path) = &cli.document {
        load_document(&mut session, path).await;
    } else if session.persona().accepts_documents() {
        println!(
            "No document loaded. Answering from the built-in profile; use :load <path> to add one."
        );
    }

    println!(
        "Commands: :load <path>, :new, :history, :export, :quit. Anything else is a question."
    );

    loop {
        let mut line = String::new();
        print!("> ");
        std::io::stdout().flush()?;

        if std::io::stdin().read_line(&mut line)? == 0 {
            break; // EOF (Ctrl+D)
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            (":quit" | ":q", _) => break,
            (":load", "") => println!("Usage: :load <path>"),
            (":load", path) => load_document(&mut session, Path::new(path)).await,
            (":new", _) => {
                session.reset();
                println!("Started new conversation!");
            }
            (":history", _) => {
                let questions = session.history().questions();
                if questions.is_empty() {
                    println!("No conversation history yet.");
                }
                for question in questions {
                    println!("{question}");
                }
            }
            (":export", _) => println!("{}", session.history().to_json()?),
            _ => {
                print!("Thinking...");
                std::io::stdout().flush()?;
                if let Some(turn) = session.ask(line).await {
                    println!("\r{}\n", turn.answer);
                }
            }
        }
    }

    Ok(())
}

async fn load_document(session: &mut Session, path: &Path) {
    match Document::from_path(path) {
        Ok(doc) => {
            let outcome = session.process_document(&doc).await;
            println!("{}", outcome.message());
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}
