use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use super::{Theme, render_markdown};
use crate::llm::StudySet;
use crate::study::StudyCard;
use crate::utils::pluralize;

const SCROLL_STEP: u16 = 3;

struct ViewerState<'a> {
    title: &'a str,
    study_set: &'a StudySet,
    current_idx: usize,
    revealed: Vec<bool>,
    scroll: u16,
}

impl<'a> ViewerState<'a> {
    fn new(title: &'a str, study_set: &'a StudySet) -> Self {
        Self {
            title,
            study_set,
            current_idx: 0,
            revealed: vec![false; study_set.cards.len()],
            scroll: 0,
        }
    }

    fn cards(&self) -> &[StudyCard] {
        &self.study_set.cards
    }

    fn current_card(&self) -> Option<&StudyCard> {
        self.cards().get(self.current_idx)
    }

    fn is_revealed(&self) -> bool {
        self.revealed.get(self.current_idx).copied().unwrap_or(false)
    }

    fn toggle_answer(&mut self) {
        if let Some(revealed) = self.revealed.get_mut(self.current_idx) {
            *revealed = !*revealed;
        }
    }

    fn next(&mut self) {
        if self.current_idx + 1 < self.cards().len() {
            self.current_idx += 1;
            self.scroll = 0;
        }
    }

    fn previous(&mut self) {
        if self.current_idx > 0 {
            self.current_idx -= 1;
            self.scroll = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(SCROLL_STEP);
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
    }

    fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|shown| **shown).count()
    }

    fn header_line(&self) -> Line<'static> {
        if self.cards().is_empty() {
            return Theme::title_line(format!("{} • model reply", self.title));
        }
        Line::from(vec![
            Span::styled(
                format!(" Card {}/{} ", self.current_idx + 1, self.cards().len()),
                Theme::label(),
            ),
            Theme::bullet(),
            Theme::span(self.title.to_string()),
            Theme::bullet(),
            Theme::span(format!("{} revealed ", self.revealed_count())),
        ])
    }

    fn body(&self) -> Text<'static> {
        match self.current_card() {
            Some(card) => card_text(card, self.is_revealed()),
            None => render_markdown(&self.study_set.raw),
        }
    }
}

fn card_text(card: &StudyCard, show_answer: bool) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(card.question.clone(), Theme::question())),
        Line::default(),
        Line::from(Span::styled(card.hint.clone(), Theme::hint())),
        Line::default(),
    ];

    if show_answer {
        lines.push(Line::from(Span::styled("▼ Hide answer", Theme::revealed())));
        lines.push(Line::default());
        lines.extend(render_markdown(&card.answer).lines);
    } else {
        lines.push(Line::from(Span::styled("▶ Show answer", Theme::muted())));
    }

    Text::from(lines)
}

fn instructions_text(state: &ViewerState<'_>) -> Vec<Line<'static>> {
    let mut line = Vec::new();
    if state.current_card().is_some() {
        let toggle = if state.is_revealed() {
            " hide answer"
        } else {
            " show answer"
        };
        line.extend([
            Theme::key_chip("Space"),
            Theme::span(" or "),
            Theme::key_chip("Enter"),
            Theme::span(toggle),
            Theme::bullet(),
            Theme::key_chip("←"),
            Theme::span(" / "),
            Theme::key_chip("→"),
            Theme::span(" previous / next"),
            Theme::bullet(),
        ]);
    }
    line.extend([
        Theme::key_chip("↑"),
        Theme::span(" / "),
        Theme::key_chip("↓"),
        Theme::span(" scroll"),
        Theme::bullet(),
        Theme::key_chip("Esc"),
        Theme::span(" / "),
        Theme::key_chip("Ctrl+C"),
        Theme::span(" exit"),
    ]);

    let summary = if state.cards().is_empty() {
        "No cards found in the reply, showing it as-is.".to_string()
    } else {
        format!("{} in this study set", pluralize("card", state.cards().len()))
    };

    vec![
        Line::from(line),
        Line::from(Span::styled(summary, Theme::muted())),
    ]
}

/// Shows the study set full-screen until the user exits.
pub fn run_viewer(title: &str, study_set: &StudySet) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = restore_on_error(start_terminal(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;

    let mut state = ViewerState::new(title, study_set);
    let loop_result = event_loop(&mut terminal, &mut state);

    teardown_terminal(&mut terminal)?;
    loop_result
}

fn start_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to configure terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to start terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;
    Ok(terminal)
}

// Undoes raw mode when setup fails before the event loop owns the terminal.
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut ViewerState<'_>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| {
                let area = frame.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(5), Constraint::Length(4)])
                    .split(area);

                let card_widget = Paragraph::new(state.body())
                    .block(Theme::panel_with_line(state.header_line()))
                    .wrap(Wrap { trim: false })
                    .scroll((state.scroll, 0));
                frame.render_widget(card_widget, chunks[0]);

                let footer = Paragraph::new(instructions_text(state))
                    .block(Theme::panel("Controls"))
                    .wrap(Wrap { trim: true });
                frame.render_widget(footer, chunks[1]);
            })
            .context("failed to render frame")?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Char(' ') | KeyCode::Enter => state.toggle_answer(),
            KeyCode::Right | KeyCode::Char('n') => state.next(),
            KeyCode::Left | KeyCode::Char('p') => state.previous(),
            KeyCode::Down | KeyCode::Char('j') => state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => state.scroll_up(),
            _ => {}
        }
    }
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to restore terminal")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}
