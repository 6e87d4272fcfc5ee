use console::style;
use studymate_core::{BackendClient, FlashcardState, FlashcardViewer, format::format_flashcard};

use crate::ui::{self, Flow, LineReader};

fn render(viewer: &FlashcardViewer) -> &'static str {
    println!();
    match viewer.state() {
        FlashcardState::Loading => {
            println!("{}", style("Loading flashcards...").dim());
            "b back"
        }
        FlashcardState::Failed(message) => {
            ui::print_error(message);
            "r retry · b back"
        }
        FlashcardState::Empty => {
            println!("No flashcards available for this document.");
            "b back"
        }
        FlashcardState::Ready(deck) => {
            print!("{}", format_flashcard(deck));
            "enter flip · n next · p previous · b back"
        }
    }
}

async fn load(viewer: &mut FlashcardViewer, client: &BackendClient, retry: bool) {
    let spinner = ui::create_spinner("Generating flashcards...");
    if retry {
        viewer.retry(client).await;
    } else {
        viewer.load(client).await;
    }
    spinner.finish_and_clear();
}

pub async fn run(
    viewer: &mut FlashcardViewer,
    client: &BackendClient,
    input: &mut LineReader,
) -> anyhow::Result<Flow> {
    if viewer.needs_load() {
        load(viewer, client, false).await;
    }

    loop {
        let keys = render(viewer);
        println!("{}", style(keys).dim());
        let Some(input) = input.prompt("cards>")? else {
            return Ok(Flow::Quit);
        };

        match input.trim() {
            "b" | "back" => return Ok(Flow::Continue),
            "r" | "retry" if matches!(viewer.state(), FlashcardState::Failed(_)) => {
                load(viewer, client, true).await;
            }
            "" | "f" | "flip" => {
                if let Some(deck) = viewer.deck_mut() {
                    deck.flip();
                }
            }
            "n" | "next" => {
                if let Some(deck) = viewer.deck_mut() {
                    deck.next();
                }
            }
            "p" | "prev" | "previous" => {
                if let Some(deck) = viewer.deck_mut() {
                    deck.previous();
                }
            }
            other => println!("{} {}", style("Unknown key:").yellow(), other),
        }
    }
}
