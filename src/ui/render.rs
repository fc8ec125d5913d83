use crate::core::state::WidgetState;
use crate::terminal::CursorPos;
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::widgets::Autocomplete;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PROMPT: &str = "> ";
const MARKER: &str = "› ";
const NO_MARKER: &str = "  ";

/// Lines for one frame plus where things landed, so the host can place the
/// cursor and map mouse rows back to candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedWidget {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
    pub input_row: usize,
    /// Row of the first visible candidate, when the list is shown.
    pub list_row: Option<usize>,
}

pub fn render_autocomplete<T: Send + 'static>(
    widget: &Autocomplete<T>,
    width: u16,
    spinner: &Spinner,
) -> RenderedWidget {
    let width = (width as usize).max(PROMPT.len() + 1);
    let config = widget.config();
    let query = widget.query();
    let mut out = RenderedWidget::default();

    if let Some(label) = config.label.as_deref() {
        out.lines.push(vec![Span::styled(
            truncate(label, width),
            Style::new().bold(),
        )]);
    }

    out.input_row = out.lines.len();
    let mut input = vec![Span::styled(PROMPT, Style::new().color(Color::Green))];
    if query.is_empty() {
        if let Some(placeholder) = config.placeholder.as_deref() {
            input.push(Span::styled(
                truncate(placeholder, width - PROMPT.len()),
                Style::new().color(Color::DarkGrey),
            ));
        }
    } else {
        input.push(Span::new(truncate(query.as_str(), width - PROMPT.len())));
    }
    out.lines.push(input);

    if widget.is_focused() {
        let before: String = query.as_str().chars().take(query.cursor()).collect();
        let col = (PROMPT.len() + UnicodeWidthStr::width(before.as_str())).min(width - 1);
        out.cursor = Some(CursorPos {
            col: col as u16,
            row: out.input_row as u16,
        });
    }

    let hint = Style::new().color(Color::DarkGrey);
    match widget.state() {
        WidgetState::Idle => {}
        WidgetState::Gated => {
            if !query.is_empty() {
                let text = format!(
                    "Type at least {} characters to search",
                    config.min_query_length
                );
                out.lines.push(vec![Span::styled(truncate(&text, width), hint)]);
            }
        }
        WidgetState::Searching => {
            out.lines.push(vec![spinner.span(), Span::styled(" Searching…", hint)]);
        }
        WidgetState::Results => {
            let candidates = widget.candidates();
            let total = candidates.len();
            let (start, end) = widget.scroll().visible_range(total);
            out.list_row = Some(out.lines.len());
            for index in start..end {
                let Some(item) = candidates.get(index) else {
                    break;
                };
                let label = truncate(item.label.as_str(), width - MARKER.chars().count());
                if candidates.highlighted() == Some(index) {
                    let active = Style::new().color(Color::Cyan).bold();
                    out.lines
                        .push(vec![Span::styled(MARKER, active), Span::styled(label, active)]);
                } else {
                    out.lines.push(vec![Span::new(NO_MARKER), Span::new(label)]);
                }
            }
            if let Some(footer) = widget.scroll().footer(total) {
                out.lines.push(vec![Span::styled(truncate(&footer, width), hint)]);
            }
        }
        WidgetState::Empty => {
            let text = format!("No matches for \"{}\". Try again.", query.as_str());
            out.lines.push(vec![Span::styled(
                truncate(&text, width),
                Style::new().color(Color::Yellow),
            )]);
        }
        WidgetState::Failed => {
            let reason = widget.failure_message().unwrap_or("unknown error");
            let text = format!("Search failed: {reason}");
            out.lines.push(vec![Span::styled(
                truncate(&text, width),
                Style::new().color(Color::Red),
            )]);
        }
    }

    out
}

/// Cuts `text` to at most `max_width` display columns, ending in `…` when cut.
pub fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}
