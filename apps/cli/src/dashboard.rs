use console::style;
use studymate_core::{BackendClient, Message, Shell, Tool};

use crate::{
    chat, flashcards, quiz,
    ui::{self, Flow, LineReader},
};

fn print_header(shell: &Shell) {
    let Some(dashboard) = shell.dashboard() else {
        return;
    };
    let document = dashboard.document();
    let tab = |tool: Tool, label: &str| {
        if dashboard.tool() == tool {
            style(format!("[{}]", label)).cyan().bold().to_string()
        } else {
            style(format!(" {} ", label)).dim().to_string()
        }
    };

    println!();
    ui::print_rule();
    println!(
        "{}  {}",
        style(document.kind.label()).bold(),
        style(&document.id).dim()
    );
    println!(
        "{} {}",
        tab(Tool::Flashcards, "Flashcards"),
        tab(Tool::Quiz, "Quiz")
    );
    ui::print_rule();
    println!(
        "{}",
        style("f flashcards · q quiz · c chat with tutor · u upload another · quit").dim()
    );
}

pub async fn run(
    shell: &mut Shell,
    client: &BackendClient,
    input: &mut LineReader,
) -> anyhow::Result<Flow> {
    print_header(shell);
    let Some(command) = input.prompt("study>")? else {
        return Ok(Flow::Quit);
    };

    let flow = match command.trim() {
        "f" | "flashcards" => {
            shell.update(Message::SelectTool(Tool::Flashcards));
            match shell.dashboard_mut() {
                Some(dashboard) => flashcards::run(&mut dashboard.flashcards, client, input).await?,
                None => Flow::Continue,
            }
        }
        "q" | "quiz" => {
            shell.update(Message::SelectTool(Tool::Quiz));
            match shell.dashboard_mut() {
                Some(dashboard) => quiz::run(&mut dashboard.quiz, client, input).await?,
                None => Flow::Continue,
            }
        }
        "c" | "chat" => match shell.dashboard_mut() {
            Some(dashboard) => chat::run(&mut dashboard.chat, client, input).await?,
            None => Flow::Continue,
        },
        "u" | "upload" => {
            shell.update(Message::UploadAnother);
            Flow::Continue
        }
        "quit" | "exit" => Flow::Quit,
        "" => Flow::Continue,
        other => {
            println!("{} {}", style("Unknown command:").yellow(), other);
            Flow::Continue
        }
    };
    Ok(flow)
}
