use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use studymate_core::{
    ApiConfig, BackendClient, DocumentId, DocumentRef, Message, Shell, SourceKind, UploadSource,
    View,
    config::{API_URL_ENV, DEFAULT_API_URL},
};
use tracing_subscriber::EnvFilter;

use crate::ui::{Flow, LineReader};

mod chat;
mod dashboard;
mod flashcards;
mod quiz;
mod ui;
mod upload;

/// CLI wrapper for SourceKind (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliSourceKind {
    #[default]
    Video,
    Pdf,
}

impl From<CliSourceKind> for SourceKind {
    fn from(cli: CliSourceKind) -> Self {
        match cli {
            CliSourceKind::Video => SourceKind::Video,
            CliSourceKind::Pdf => SourceKind::Pdf,
        }
    }
}

#[derive(Parser)]
#[command(name = "studymate")]
#[command(about = "Turn YouTube videos and PDFs into flashcards, quizzes and a tutor chat")]
struct Cli {
    /// Base URL of the study backend
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a YouTube video and open its dashboard
    Video { url: String },
    /// Upload a PDF and open its dashboard
    Pdf { path: PathBuf },
    /// Open the dashboard for a document the backend already has
    Open {
        document_id: String,

        /// What the document was made from
        #[arg(short, long, default_value = "video")]
        kind: CliSourceKind,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = BackendClient::new(ApiConfig::new(cli.api_url))?;
    tracing::debug!(base_url = %client.config().base_url, "backend configured");

    println!(
        "\n{}  {}",
        style("studymate").cyan().bold(),
        style("AI Study Companion").dim()
    );
    println!("{}", style(&client.config().base_url).dim());

    let mut input = LineReader::new()?;
    let mut shell = Shell::new();
    match cli.command {
        Some(Command::Video { url }) => {
            upload::submit(&mut shell, &client, UploadSource::Video { url }).await;
        }
        Some(Command::Pdf { path }) => {
            upload::submit(&mut shell, &client, UploadSource::Pdf { path }).await;
        }
        Some(Command::Open { document_id, kind }) => {
            shell.update(Message::DocumentReady(DocumentRef {
                id: DocumentId::new(document_id),
                kind: kind.into(),
            }));
        }
        None => {}
    }

    loop {
        let flow = if matches!(shell.view(), View::Upload(_)) {
            upload::run(&mut shell, &client, &mut input).await?
        } else {
            dashboard::run(&mut shell, &client, &mut input).await?
        };
        if flow == Flow::Quit {
            break;
        }
    }

    println!("{}", style("Bye!").dim());
    Ok(())
}
