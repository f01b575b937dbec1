//! Markdown rendering with per-block styling hooks.
//!
//! Parsing is delegated to pulldown-cmark (CommonMark plus tables and
//! strikethrough); the event stream is mapped to ANSI-styled terminal text.
//! Rendering is total: events without a styling hook are skipped, and
//! malformed input renders as whatever the parser recovers. Nothing here
//! can panic.

use colored::Colorize;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

/// Renders a Markdown document to ANSI-styled text.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = AnsiRenderer::default();
    for event in Parser::new_ext(source, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct CodeBlock {
    lang: String,
    buf: String,
}

#[derive(Default)]
struct TableState {
    in_head: bool,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current: Vec<String>,
    cell: String,
}

#[derive(Default)]
struct AnsiRenderer {
    out: String,
    heading: Option<HeadingLevel>,
    heading_buf: String,
    quote_depth: usize,
    lists: Vec<Option<u64>>,
    code: Option<CodeBlock>,
    table: Option<TableState>,
    strong: bool,
    emphasis: bool,
    strikethrough: bool,
    link: Option<String>,
    in_image: bool,
}

impl AnsiRenderer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::SoftBreak | Event::HardBreak => self.line_break(),
            Event::Rule => {
                self.out.push_str(&format!("{}\n\n", "─".repeat(40).dimmed()));
            }
            // Raw HTML, footnotes, task markers: no styling hook, skipped.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.push_quote_prefix(),
            Tag::Heading(level, _, _) => {
                self.heading = Some(level);
                self.heading_buf.clear();
            }
            Tag::BlockQuote => self.quote_depth += 1,
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock {
                    lang,
                    buf: String::new(),
                });
            }
            Tag::List(start) => self.lists.push(start),
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.out.push_str(&indent);
                self.out.push_str(&format!("{}", marker.blue()));
            }
            Tag::Table(_) => self.table = Some(TableState::default()),
            Tag::TableHead => {
                if let Some(table) = &mut self.table {
                    table.in_head = true;
                }
            }
            Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.current.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = &mut self.table {
                    table.cell.clear();
                }
            }
            Tag::Emphasis => self.emphasis = true,
            Tag::Strong => self.strong = true,
            Tag::Strikethrough => self.strikethrough = true,
            Tag::Link(_, dest, _) => self.link = Some(dest.to_string()),
            Tag::Image(_, dest, _) => {
                self.in_image = true;
                self.out
                    .push_str(&format!("{}", format!("[image: {dest}]").dimmed()));
            }
            Tag::FootnoteDefinition(_) => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.out.push('\n');
                if self.quote_depth == 0 {
                    self.out.push('\n');
                }
            }
            Tag::Heading(level, _, _) => self.flush_heading(level),
            Tag::BlockQuote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.out.push('\n');
            }
            Tag::CodeBlock(_) => self.flush_code_block(),
            Tag::Item => self.out.push('\n'),
            Tag::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.out.push('\n');
                }
            }
            Tag::Table(_) => self.flush_table(),
            Tag::TableHead => {
                if let Some(table) = &mut self.table {
                    table.header = std::mem::take(&mut table.current);
                    table.in_head = false;
                }
            }
            Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    let row = std::mem::take(&mut table.current);
                    table.rows.push(row);
                }
            }
            Tag::TableCell => {
                if let Some(table) = &mut self.table {
                    let cell = std::mem::take(&mut table.cell);
                    table.current.push(cell);
                }
            }
            Tag::Emphasis => self.emphasis = false,
            Tag::Strong => self.strong = false,
            Tag::Strikethrough => self.strikethrough = false,
            Tag::Link(_, _, _) => {
                if let Some(url) = self.link.take() {
                    if !url.is_empty() {
                        self.out
                            .push_str(&format!("{}", format!(" ({url})").dimmed()));
                    }
                }
            }
            Tag::Image(_, _, _) => self.in_image = false,
            Tag::FootnoteDefinition(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.buf.push_str(text);
        } else if self.heading.is_some() {
            self.heading_buf.push_str(text);
        } else if let Some(table) = &mut self.table {
            table.cell.push_str(text);
        } else if self.in_image {
            // Alt text was already summarized by the [image: ...] marker.
        } else {
            let styled = self.styled_inline(text);
            self.out.push_str(&styled);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_some() {
            self.heading_buf.push_str(code);
        } else if let Some(table) = &mut self.table {
            table.cell.push_str(code);
        } else {
            self.out.push_str(&format!("{}", code.yellow()));
        }
    }

    fn line_break(&mut self) {
        if self.heading.is_some() {
            self.heading_buf.push(' ');
        } else if let Some(table) = &mut self.table {
            table.cell.push(' ');
        } else {
            self.out.push('\n');
            self.push_quote_prefix();
        }
    }

    fn push_quote_prefix(&mut self) {
        for _ in 0..self.quote_depth {
            self.out.push_str(&format!("{}", "┃ ".dimmed()));
        }
    }

    fn styled_inline(&self, text: &str) -> String {
        let mut styled = text.normal();
        if self.strong {
            styled = styled.bold();
        }
        if self.emphasis {
            styled = styled.italic();
        }
        if self.strikethrough {
            styled = styled.strikethrough();
        }
        if self.link.is_some() {
            styled = styled.blue().underline();
        }
        if self.quote_depth > 0 {
            styled = styled.dimmed().italic();
        }
        format!("{styled}")
    }

    fn flush_heading(&mut self, level: HeadingLevel) {
        let text = std::mem::take(&mut self.heading_buf);
        self.heading = None;
        match level {
            HeadingLevel::H1 => {
                let width = text.chars().count().max(4);
                self.out.push_str(&format!(
                    "{}\n{}\n\n",
                    text.bright_white().bold(),
                    "═".repeat(width).dimmed()
                ));
            }
            HeadingLevel::H2 => {
                self.out.push_str(&format!("{}\n\n", text.blue().bold()));
            }
            HeadingLevel::H3 => {
                self.out.push_str(&format!("{}\n\n", text.bright_blue()));
            }
            _ => {
                self.out.push_str(&format!("{}\n\n", text.bold()));
            }
        }
    }

    fn flush_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        if code.lang.is_empty() {
            self.out.push_str(&format!("{}\n", "┌──".dimmed()));
        } else {
            self.out
                .push_str(&format!("{}\n", format!("┌── {}", code.lang).dimmed()));
        }
        for line in code.buf.lines() {
            self.out
                .push_str(&format!("{}{line}\n", "│ ".dimmed()));
        }
        self.out.push_str(&format!("{}\n\n", "└──".dimmed()));
    }

    fn flush_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };

        let mut widths: Vec<usize> = table
            .header
            .iter()
            .map(|cell| cell.chars().count())
            .collect();
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                if i < widths.len() {
                    widths[i] = widths[i].max(len);
                } else {
                    widths.push(len);
                }
            }
        }

        if !table.header.is_empty() {
            self.out.push_str(&format!(
                "{}\n",
                format_row(&table.header, &widths).bold()
            ));
            let rule_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
            self.out
                .push_str(&format!("{}\n", "─".repeat(rule_width).dimmed()));
        }
        for row in &table.rows {
            self.out.push_str(&format_row(row, &widths));
            self.out.push('\n');
        }
        self.out.push('\n');
    }

    fn finish(self) -> String {
        let trimmed = self.out.trim_end();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}\n")
        }
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join(" │ ")
}
