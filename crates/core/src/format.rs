use crate::{
    chat::Turn,
    flashcards::Deck,
    quiz::{Answer, QuizResult, QuizSession},
    types::Role,
};

/// Format a fraction in `0.0..=1.0` as a fixed-width bar
pub fn format_progress_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Letter label for an option index: 0 -> 'A'
pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Map a typed letter back to an option index
pub fn option_index(input: &str, option_count: usize) -> Option<usize> {
    let mut chars = input.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    let index = (letter as u8 - b'A') as usize;
    (index < option_count).then_some(index)
}

/// Format the visible side of the current card
pub fn format_flashcard(deck: &Deck) -> String {
    let card = deck.current();
    let (label, text) = if deck.is_flipped() {
        ("ANSWER", &card.back)
    } else {
        ("QUESTION", &card.front)
    };

    let mut output = String::new();
    output.push_str(&format!(
        "Card {} of {} {}\n\n",
        deck.index() + 1,
        deck.len(),
        format_progress_bar(deck.progress(), 20)
    ));
    output.push_str(&format!("{}\n", label));
    output.push_str(&format!("{}\n", text));
    output
}

/// Format the current quiz question with option markers
pub fn format_question(session: &QuizSession) -> String {
    let (Some(question), Some(answer)) = (session.current(), session.current_answer()) else {
        return String::new();
    };

    let mut output = String::new();
    output.push_str(&format!(
        "Question {} of {} | Score: {}\n\n",
        session.index() + 1,
        session.total(),
        session.score()
    ));
    output.push_str(&format!("{}\n\n", question.question));

    for (i, option) in question.options.iter().enumerate() {
        let is_selected = answer.selected() == Some(option.as_str());
        let marker = match answer {
            Answer::Evaluated { .. } if *option == question.correct_answer => "✓",
            Answer::Evaluated { .. } if is_selected => "✗",
            Answer::Selected(_) if is_selected => "›",
            _ => " ",
        };
        output.push_str(&format!("{} {}. {}\n", marker, option_letter(i), option));
    }
    output
}

pub fn format_quiz_result(result: &QuizResult) -> String {
    let percentage = result.percentage();
    format!(
        "Quiz completed!\nYou scored {} out of {}\n{} {}%\n",
        result.score,
        result.total,
        format_progress_bar(f64::from(percentage) / 100.0, 20),
        percentage
    )
}

pub fn format_turn(turn: &Turn) -> String {
    let speaker = match turn.role {
        Role::User => "You",
        Role::Assistant => "Tutor",
    };
    if turn.is_open() && turn.text.is_empty() {
        return format!("{}: …", speaker);
    }
    format!("{}: {}", speaker, turn.text)
}
