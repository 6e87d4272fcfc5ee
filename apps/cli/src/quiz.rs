use console::style;
use studymate_core::{
    BackendClient, QuizRunner, QuizState,
    format::{format_question, format_quiz_result, option_index},
};

use crate::ui::{self, Flow, LineReader};

fn render(runner: &QuizRunner) -> &'static str {
    println!();
    match runner.state() {
        QuizState::Loading => {
            println!("{}", style("Loading quiz...").dim());
            "b back"
        }
        QuizState::Failed(message) => {
            ui::print_error(message);
            "r retry · b back"
        }
        QuizState::Empty => {
            println!("No quiz questions available for this document.");
            "b back"
        }
        QuizState::Active(session) => {
            if let Some(result) = session.result() {
                print!("{}", format_quiz_result(&result));
                return "r retake · b back";
            }
            print!("{}", format_question(session));
            match session.current_answer() {
                Some(answer) if answer.is_evaluated() && session.is_last() => {
                    "enter finish · b back"
                }
                Some(answer) if answer.is_evaluated() => "enter next question · b back",
                Some(answer) if answer.selected().is_some() => {
                    "letter change answer · enter check · b back"
                }
                _ => "letter choose an answer · b back",
            }
        }
    }
}

async fn load(runner: &mut QuizRunner, client: &BackendClient, retry: bool) {
    let spinner = ui::create_spinner("Generating quiz...");
    if retry {
        runner.retry(client).await;
    } else {
        runner.load(client).await;
    }
    spinner.finish_and_clear();
}

pub async fn run(
    runner: &mut QuizRunner,
    client: &BackendClient,
    input: &mut LineReader,
) -> anyhow::Result<Flow> {
    if runner.needs_load() {
        load(runner, client, false).await;
    }

    loop {
        let keys = render(runner);
        println!("{}", style(keys).dim());
        let Some(input) = input.prompt("quiz>")? else {
            return Ok(Flow::Quit);
        };
        let input = input.trim();

        if matches!(input, "b" | "back") {
            return Ok(Flow::Continue);
        }
        if matches!(runner.state(), QuizState::Failed(_)) {
            if matches!(input, "r" | "retry") {
                load(runner, client, true).await;
            }
            continue;
        }
        let Some(session) = runner.session_mut() else {
            continue;
        };

        if session.is_finished() {
            if matches!(input, "r" | "retake") {
                session.retake();
            }
            continue;
        }

        if input.is_empty() {
            // first enter checks the answer, the next one moves on
            if session.current_answer().is_some_and(|a| a.is_evaluated()) {
                session.advance();
            } else if session.evaluate().is_none() {
                println!("{}", style("Choose an answer first.").yellow());
            }
            continue;
        }

        let picked = session
            .current()
            .and_then(|q| option_index(input, q.options.len()).map(|i| q.options[i].clone()));
        match picked {
            Some(option) => {
                if !session.select(&option) {
                    println!("{}", style("This question is already answered.").yellow());
                }
            }
            None => println!("{} {}", style("Unknown key:").yellow(), input),
        }
    }
}
