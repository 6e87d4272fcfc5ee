use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::{DefaultEditor, error::ReadlineError};

/// What the caller should do once a screen returns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Line editor shared by every screen, so history spans the whole session
pub struct LineReader {
    editor: DefaultEditor,
}

impl LineReader {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Show `label` and read one line. `None` means input is closed or was
    /// interrupted.
    pub fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let prompt = format!("{} ", style(label).cyan().bold());
        let line = into_line(self.editor.readline(&prompt))?;
        if let Some(text) = &line {
            if !text.trim().is_empty() {
                self.editor.add_history_entry(text.as_str())?;
            }
        }
        Ok(line)
    }
}

fn into_line(result: Result<String, ReadlineError>) -> Result<Option<String>, ReadlineError> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
        Err(error) => Err(error),
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

pub fn print_hint(message: &str) {
    eprintln!("{} {}", style("Hint:").yellow().bold(), message);
}

pub fn print_rule() {
    println!("{}", style("─".repeat(60)).dim());
}
