use std::{path::PathBuf, time::Instant};

use console::style;
use studymate_core::{BackendClient, Message, Shell, UploadSource};

use crate::ui::{self, Flow, LineReader};

/// Guess the source from free text: anything ending in `.pdf` is a file
pub fn parse_source(input: &str) -> UploadSource {
    let input = input.trim();
    if input.to_ascii_lowercase().ends_with(".pdf") {
        UploadSource::Pdf {
            path: PathBuf::from(input),
        }
    } else {
        UploadSource::Video {
            url: input.to_string(),
        }
    }
}

/// Submit one source. On success the shell moves to the dashboard.
pub async fn submit(shell: &mut Shell, client: &BackendClient, source: UploadSource) {
    let Some(coordinator) = shell.upload_mut() else {
        return;
    };

    let start = Instant::now();
    let spinner = ui::create_spinner(&format!("Processing {}...", source.kind().label()));
    let document = coordinator.submit(client, &source).await;
    spinner.finish_and_clear();

    match document {
        Some(document) => {
            println!(
                "{} Processed {} {}",
                style("✓").green().bold(),
                document.kind.label(),
                style(format!("({})", ui::format_duration(start.elapsed()))).dim()
            );
            shell.update(Message::DocumentReady(document));
        }
        None => {
            if let Some(failure) = coordinator.error() {
                ui::print_error(&failure.message);
                if let Some(hint) = failure.hint {
                    ui::print_hint(hint.message());
                }
            }
            coordinator.dismiss_error();
        }
    }
}

pub async fn run(
    shell: &mut Shell,
    client: &BackendClient,
    input: &mut LineReader,
) -> anyhow::Result<Flow> {
    println!();
    println!("{}", style("Upload a source").bold());
    println!(
        "{}",
        style("Paste a YouTube URL or a path to a PDF. Type 'quit' to exit.").dim()
    );

    let Some(input) = input.prompt("source>")? else {
        return Ok(Flow::Quit);
    };
    if matches!(input.trim(), "quit" | "exit") {
        return Ok(Flow::Quit);
    }

    submit(shell, client, parse_source(&input)).await;
    Ok(Flow::Continue)
}
