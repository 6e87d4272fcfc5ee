use std::io::Write;

use console::{Term, style};
use studymate_core::{
    BackendClient, ChatSession, SendOutcome, chat::STREAM_ERROR_MESSAGE, format::format_turn,
};

use crate::ui::{Flow, LineReader};

/// Write streamed text straight away. A failed write only loses the echo;
/// the transcript still holds the text.
fn echo(out: &mut impl Write, text: &str) {
    if let Err(error) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        tracing::debug!(%error, "failed to echo chat text");
    }
}

fn print_transcript(session: &ChatSession) {
    println!();
    for turn in session.turns() {
        println!("{}", format_turn(turn));
    }
}

pub async fn run(
    session: &mut ChatSession,
    client: &BackendClient,
    input: &mut LineReader,
) -> anyhow::Result<Flow> {
    let mut term = Term::stdout();
    print_transcript(session);
    println!("{}", style("Ask a question. Type /back to leave the chat.").dim());

    loop {
        let Some(message) = input.prompt("you>")? else {
            return Ok(Flow::Quit);
        };
        match message.trim() {
            "/back" => return Ok(Flow::Continue),
            "" => continue,
            _ => {}
        }

        term.write_str(&format!("{} ", style("Tutor:").green().bold()))?;
        let outcome = session
            .send(client, &message, |delta| echo(&mut term, delta))
            .await;

        match outcome {
            SendOutcome::Completed => println!(),
            SendOutcome::Rejected => println!("{}", style("(nothing to send)").dim()),
            SendOutcome::Failed(error) => {
                println!();
                println!("{}", style(STREAM_ERROR_MESSAGE).red());
                tracing::debug!(%error, "chat failure shown to user");
            }
        }
    }
}
