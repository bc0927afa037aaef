use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Renders the markdown a model typically puts in answers (bullets, numbered
/// steps, inline code, fenced snippets) into styled terminal text.
pub fn render_markdown(md: &str) -> Text<'static> {
    let mut renderer = Renderer::default();
    for event in Parser::new_ext(md, Options::ENABLE_STRIKETHROUGH) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current_line: Vec<Span<'static>>,
    styles: Vec<Style>,
    list_stack: Vec<ListKind>,
    pending_prefix: Option<String>,
    in_code_block: bool,
}

impl Renderer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text, self.current_style()),
            Event::Code(code) => {
                self.apply_prefix();
                self.current_line.push(Span::styled(
                    code.to_string(),
                    Style::default().add_modifier(Modifier::REVERSED),
                ));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_text(&html, self.current_style().add_modifier(Modifier::DIM))
            }
            Event::SoftBreak => {
                if self.in_code_block {
                    self.flush_line();
                } else {
                    self.apply_prefix();
                    self.current_line.push(Span::raw(" "));
                }
            }
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(20),
                    Style::default().add_modifier(Modifier::DIM),
                )));
                self.lines.push(Line::default());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.push_style(|_| heading_style(level));
            }
            Tag::Strong => self.push_style(|style| style.add_modifier(Modifier::BOLD)),
            Tag::Emphasis => self.push_style(|style| style.add_modifier(Modifier::ITALIC)),
            Tag::Strikethrough => {
                self.push_style(|style| style.add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::BlockQuote(_) => self.push_style(|style| style.add_modifier(Modifier::DIM)),
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
                self.push_style(|_| Style::default().add_modifier(Modifier::DIM));
            }
            Tag::List(start) => self.list_stack.push(ListKind::from(start)),
            Tag::Item => {
                self.flush_line();
                self.pending_prefix = Some(list_prefix(&mut self.list_stack));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Heading(_) => {
                self.flush_line();
                self.lines.push(Line::default());
                self.pop_style();
            }
            TagEnd::CodeBlock => {
                self.flush_line();
                self.lines.push(Line::default());
                self.in_code_block = false;
                self.pop_style();
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::BlockQuote(_) => {
                self.pop_style()
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.pending_prefix = None;
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if !self.in_code_block {
            self.apply_prefix();
            self.current_line.push(Span::styled(text.to_string(), style));
            return;
        }

        // code blocks arrive as one text event with embedded newlines
        for (idx, segment) in text.split('\n').enumerate() {
            if idx > 0 {
                self.flush_line();
            }
            if !segment.is_empty() {
                self.current_line.push(Span::styled(segment.to_string(), style));
            }
        }
    }

    fn apply_prefix(&mut self) {
        if self.current_line.is_empty()
            && let Some(prefix) = self.pending_prefix.take()
        {
            self.current_line.push(Span::raw(prefix));
        }
    }

    fn flush_line(&mut self) {
        if self.current_line.is_empty() {
            return;
        }
        self.lines
            .push(Line::from(std::mem::take(&mut self.current_line)));
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let base = self.current_style();
        self.styles.push(f(base));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn current_style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn finish(mut self) -> Text<'static> {
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let mut style = Style::default().add_modifier(Modifier::BOLD);
    if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

#[derive(Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

impl From<Option<u64>> for ListKind {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(n) => ListKind::Ordered(n.max(1)),
            None => ListKind::Unordered,
        }
    }
}

fn list_prefix(stack: &mut [ListKind]) -> String {
    let indent = "  ".repeat(stack.len().saturating_sub(1));
    match stack.last_mut() {
        Some(ListKind::Ordered(n)) => {
            let marker = format!("{indent}{n}. ");
            *n += 1;
            marker
        }
        Some(ListKind::Unordered) | None => format!("{indent}- "),
    }
}
