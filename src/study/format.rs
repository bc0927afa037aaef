use crate::utils::trim_line;

const QUESTION_MARKER: char = 'Q';
const HINT_MARKER: char = 'H';
const ANSWER_MARKER: char = 'A';
const SEPARATOR: char = ':';

const HINT_LABEL: &str = "Hint";
const ANSWER_LABEL: &str = "Answer";

pub const MISSING_HINT: &str = "Hint: (not provided)";
pub const MISSING_ANSWER: &str = "(No answer provided)";

const CARD_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyCard {
    pub question: String,
    pub hint: String,
    pub answer: String,
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Question(&'a str),
    Hint(&'a str),
    Answer(&'a str),
    Continuation(&'a str),
}

/// Only the leading character and the presence of a separator anywhere in
/// the line are checked, so `Question7xyz:` is a question line too.
fn classify(line: &str) -> LineKind<'_> {
    if !line.contains(SEPARATOR) {
        return LineKind::Continuation(line);
    }
    match line.chars().next() {
        Some(QUESTION_MARKER) => LineKind::Question(line),
        Some(HINT_MARKER) => LineKind::Hint(line),
        Some(ANSWER_MARKER) => LineKind::Answer(line),
        _ => LineKind::Continuation(line),
    }
}

/// Replaces the first occurrence of the marker with its label. Marker lines
/// always start with the marker, so `H1: ...` becomes `Hint1: ...`.
fn expand_marker(line: &str, marker: char, label: &str) -> String {
    line.replacen(marker, label, 1)
}

#[derive(Debug)]
struct PendingCard {
    question: String,
    hint: Option<String>,
    answer_lines: Vec<String>,
}

impl PendingCard {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            hint: None,
            answer_lines: Vec::new(),
        }
    }

    fn finish(self) -> StudyCard {
        let hint = self.hint.unwrap_or_else(|| MISSING_HINT.to_string());
        let answer = if self.answer_lines.is_empty() {
            MISSING_ANSWER.to_string()
        } else {
            self.answer_lines.join("\n").trim().to_string()
        };
        StudyCard {
            question: self.question,
            hint,
            answer,
        }
    }
}

#[derive(Debug)]
enum ParseState {
    Idle,
    Collecting(PendingCard),
}

impl ParseState {
    fn flush(self, cards: &mut Vec<StudyCard>) {
        if let ParseState::Collecting(card) = self {
            cards.push(card.finish());
        }
    }
}

// Every boundary that Unicode and the ASCII separators treat as a line end.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{b}' | '\u{c}' | '\u{1c}'..='\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Splits a model reply into cards. Blank lines are ignored and anything
/// seen before the first question line is dropped.
pub fn parse_study_cards(text: &str) -> Vec<StudyCard> {
    let mut cards = Vec::new();
    let mut state = ParseState::Idle;

    for line in text.split(is_line_break).filter_map(trim_line) {
        state = match (state, classify(line)) {
            (previous, LineKind::Question(question)) => {
                previous.flush(&mut cards);
                ParseState::Collecting(PendingCard::new(question))
            }
            (ParseState::Idle, _) => ParseState::Idle,
            (ParseState::Collecting(mut card), LineKind::Hint(hint)) => {
                card.hint = Some(expand_marker(hint, HINT_MARKER, HINT_LABEL));
                ParseState::Collecting(card)
            }
            (ParseState::Collecting(mut card), LineKind::Answer(answer)) => {
                card.answer_lines
                    .push(expand_marker(answer, ANSWER_MARKER, ANSWER_LABEL));
                ParseState::Collecting(card)
            }
            (ParseState::Collecting(mut card), LineKind::Continuation(rest)) => {
                card.answer_lines.push(rest.to_string());
                ParseState::Collecting(card)
            }
        };
    }

    state.flush(&mut cards);
    cards
}

pub fn render_card(card: &StudyCard) -> String {
    format!(
        "### {question}\n**{hint}**\n\n<details>\n<summary><b>Show answer</b></summary>\n\n{answer}\n\n</details>\n",
        question = card.question,
        hint = card.hint,
        answer = card.answer,
    )
}

pub fn render_cards(cards: &[StudyCard]) -> String {
    cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join(CARD_SEPARATOR)
}

/// Formats a raw reply as question/hint cards with collapsed answers. Replies
/// without a single question line come back unchanged.
pub fn format_study_set(text: &str) -> String {
    let cards = parse_study_cards(text);
    if cards.is_empty() {
        return text.to_string();
    }
    render_cards(&cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TWO_CARDS: &str =
        "Q1: What is X?\nH1: think simple\nA1: It is Y\nQ2: What is Z?\nH2: compare\nA2: line one\nmore detail";

    #[test]
    fn parses_cards_in_order() {
        let cards = parse_study_cards(TWO_CARDS);
        assert_eq!(cards.len(), 2);

        assert_eq!(
            cards[0],
            StudyCard {
                question: "Q1: What is X?".into(),
                hint: "Hint1: think simple".into(),
                answer: "Answer1: It is Y".into(),
            }
        );
        assert_eq!(cards[1].question, "Q2: What is Z?");
        assert_eq!(cards[1].answer, "Answer2: line one\nmore detail");
    }

    #[test]
    fn renders_card_template() {
        let card = StudyCard {
            question: "Q1: What is X?".into(),
            hint: "Hint1: think simple".into(),
            answer: "Answer1: It is Y".into(),
        };
        assert_eq!(
            render_card(&card),
            "### Q1: What is X?\n**Hint1: think simple**\n\n<details>\n<summary><b>Show answer</b></summary>\n\nAnswer1: It is Y\n\n</details>\n"
        );
    }

    #[test]
    fn splits_on_carriage_returns_and_unicode_separators() {
        let cards = parse_study_cards("Q1: a?\rH1: h\r\nA1: one\u{2028}two\u{85}Q2: b?\u{c}A2: x");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].hint, "Hint1: h");
        assert_eq!(cards[0].answer, "Answer1: one\ntwo");
        assert_eq!(cards[1].question, "Q2: b?");
        assert_eq!(cards[1].answer, "Answer2: x");
    }

    #[test]
    fn joins_cards_with_horizontal_rule() {
        let formatted = format_study_set(TWO_CARDS);
        let parts: Vec<_> = formatted.split("\n\n---\n\n").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("### Q1: What is X?\n"));
        assert!(parts[1].starts_with("### Q2: What is Z?\n"));
        assert!(parts[1].contains("\n\nAnswer2: line one\nmore detail\n\n</details>\n"));
    }

    #[test]
    fn missing_answer_uses_placeholder() {
        let cards = parse_study_cards("Q1: Why?\nH1: because");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].answer, "(No answer provided)");
    }

    #[test]
    fn missing_hint_uses_placeholder() {
        let cards = parse_study_cards("Q1: Why?\nA1: because");
        assert_eq!(cards[0].hint, "Hint: (not provided)");
        assert_eq!(cards[0].answer, "Answer1: because");
    }

    #[test]
    fn text_without_questions_passes_through() {
        let reply = "Sorry, I can't help with that.\n\nH1: stray hint\nA1: stray answer\n";
        assert!(parse_study_cards(reply).is_empty());
        assert_eq!(format_study_set(reply), reply);
        assert_eq!(format_study_set(""), "");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let reply = "\n\nQ1: One?\n\n   \nH1: hint\n\nA1: first\n\n- bullet\n\n\nQ2: Two?\n\n";
        let cards = parse_study_cards(reply);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].answer, "Answer1: first\n- bullet");
        assert_eq!(cards[1].hint, MISSING_HINT);
        assert_eq!(cards[1].answer, MISSING_ANSWER);
    }

    #[test]
    fn lines_before_first_question_are_dropped() {
        let reply = "Here is your study set:\nH0: early hint\nA0: early answer\nQ1: Real?\nH1: yes";
        let cards = parse_study_cards(reply);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].hint, "Hint1: yes");
        assert_eq!(cards[0].answer, MISSING_ANSWER);
    }

    #[test]
    fn last_hint_wins() {
        let cards = parse_study_cards("Q1: x?\nH1: first\nH1: second");
        assert_eq!(cards[0].hint, "Hint1: second");
    }

    #[test]
    fn marker_only_needs_leading_char_and_separator() {
        let cards = parse_study_cards("Question7xyz: odd\nQuick note: still a question\nQ without colon");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "Question7xyz: odd");
        assert_eq!(cards[1].question, "Quick note: still a question");
        assert_eq!(cards[1].answer, "Q without colon");
    }

    #[test]
    fn marker_lines_are_trimmed() {
        let cards = parse_study_cards("   Q1: padded?  \n\tH1: tab\n  A1: spaced  ");
        assert_eq!(cards[0].question, "Q1: padded?");
        assert_eq!(cards[0].hint, "Hint1: tab");
        assert_eq!(cards[0].answer, "Answer1: spaced");
    }

    // Pins the current label expansion: only the first marker letter is
    // replaced, later occurrences of the same letter are left alone.
    #[test]
    fn label_expansion_replaces_first_marker_only() {
        let cards = parse_study_cards("Q1: HTTP?\nH1: How HTTP works\nA1: A protocol. Also ASCII");
        assert_eq!(cards[0].hint, "Hint1: How HTTP works");
        assert_eq!(cards[0].answer, "Answer1: A protocol. Also ASCII");
    }

    #[test]
    fn answer_order_is_not_cross_checked() {
        let cards = parse_study_cards("Q1: x?\nA3: late answer\nH9: odd hint\n- extra");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].hint, "Hint9: odd hint");
        assert_eq!(cards[0].answer, "Answer3: late answer\n- extra");
    }

    #[test]
    fn parses_fixture_reply() {
        let reply = std::fs::read_to_string("test_data/study_set_reply.txt").unwrap();
        let cards = parse_study_cards(&reply);
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|card| card.question.starts_with('Q')));
        assert!(cards[2].answer.contains("- Use an index"));
        assert_eq!(cards[1].hint, MISSING_HINT);
    }

    proptest! {
        #[test]
        fn formatter_is_total(content in "\\PC*") {
            format_study_set(&content);
        }

        #[test]
        fn no_question_marker_passes_through(content in "[^Q]*") {
            prop_assert_eq!(format_study_set(&content), content);
        }

        #[test]
        fn one_card_per_question_line(count in 1usize..12) {
            let reply = (1..=count)
                .map(|n| format!("Q{n}: question {n}?\nH{n}: hint\n\nA{n}: answer"))
                .collect::<Vec<_>>()
                .join("\n");
            prop_assert_eq!(parse_study_cards(&reply).len(), count);
        }
    }
}
