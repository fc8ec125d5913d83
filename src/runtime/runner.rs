use crate::core::suggestion::Suggestion;
use crate::runtime::command::Command;
use crate::runtime::key_bindings::KeyBindings;
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::render::{RenderedWidget, render_autocomplete, truncate};
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::widgets::Autocomplete;
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_TIMEOUT: Duration = Duration::from_millis(250);
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);
const HELP: &str = "↑/↓ move · Enter select · Esc clear · Tab focus · Ctrl-C quit";

type DetailsFn<T> = Box<dyn Fn(&Suggestion<T>) -> Vec<String>>;

/// Where a mouse press landed relative to the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Input,
    Candidate(usize),
    Outside,
}

pub fn hit_test<T: Send + 'static>(
    widget: &Autocomplete<T>,
    layout: &RenderedWidget,
    row: usize,
) -> Hit {
    if row == layout.input_row {
        return Hit::Input;
    }
    let Some(list_row) = layout.list_row else {
        return Hit::Outside;
    };
    if row < list_row {
        return Hit::Outside;
    }
    match widget
        .scroll()
        .index_at_row(row - list_row, widget.candidates().len())
    {
        Some(index) => Hit::Candidate(index),
        None => Hit::Outside,
    }
}

/// Press on a candidate records the click before focus leaves, so the blur
/// that follows commits it.
pub fn apply_mouse_down<T: Send + 'static>(widget: &mut Autocomplete<T>, hit: Hit, now: Instant) {
    match hit {
        Hit::Input => {
            widget.focus(now);
        }
        Hit::Candidate(index) => {
            widget.press_candidate(index);
            widget.blur();
        }
        Hit::Outside => {
            widget.blur();
        }
    }
}

pub struct Runtime<T> {
    widget: Autocomplete<T>,
    terminal: Terminal,
    key_bindings: KeyBindings,
    spinner: Spinner,
    details: Option<DetailsFn<T>>,
    layout: RenderedWidget,
    should_exit: bool,
}

impl<T: Send + 'static> Runtime<T> {
    pub fn new(widget: Autocomplete<T>, terminal: Terminal) -> Self {
        Self::with_key_bindings(widget, terminal, KeyBindings::new())
    }

    pub fn with_key_bindings(
        widget: Autocomplete<T>,
        terminal: Terminal,
        key_bindings: KeyBindings,
    ) -> Self {
        Self {
            widget,
            terminal,
            key_bindings,
            spinner: Spinner::default(),
            details: None,
            layout: RenderedWidget::default(),
            should_exit: false,
        }
    }

    /// Lines shown under the widget for the committed selection.
    pub fn with_details(mut self, details: impl Fn(&Suggestion<T>) -> Vec<String> + 'static) -> Self {
        self.details = Some(Box::new(details));
        self
    }

    pub fn into_widget(self) -> Autocomplete<T> {
        self.widget
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.widget.focus(Instant::now());
            self.render()?;

            while !self.should_exit {
                let now = Instant::now();
                let mut dirty = self.widget.tick(now);
                dirty |= self.widget.poll_responses();
                if dirty {
                    self.render()?;
                }

                let timeout = if self.widget.pending_request().is_some() {
                    SPINNER_INTERVAL
                } else {
                    self.widget.poll_timeout(now, IDLE_TIMEOUT)
                };
                let event = self.terminal.poll_event(timeout)?;
                self.dispatch(event)?;
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)
    }

    fn dispatch(&mut self, event: TerminalEvent) -> io::Result<()> {
        match event {
            TerminalEvent::Resize { .. } => self.render(),
            TerminalEvent::Key(key) => {
                let command = self
                    .key_bindings
                    .resolve(key)
                    .unwrap_or(Command::InputKey(key));
                self.process_command(command)
            }
            TerminalEvent::MouseDown { row, .. } => {
                let hit = hit_test(&self.widget, &self.layout, row as usize);
                debug!(row, ?hit, "mouse down");
                apply_mouse_down(&mut self.widget, hit, Instant::now());
                self.render()
            }
            TerminalEvent::Tick => {
                if self.widget.pending_request().is_some() {
                    self.spinner.tick();
                    self.render()?;
                }
                Ok(())
            }
        }
    }

    fn process_command(&mut self, command: Command) -> io::Result<()> {
        let now = Instant::now();
        match command {
            Command::Exit => {
                self.should_exit = true;
                return Ok(());
            }
            Command::Navigate(nav) => {
                self.widget.navigate(nav);
            }
            Command::ToggleFocus => {
                if self.widget.is_focused() {
                    self.widget.blur();
                } else {
                    self.widget.focus(now);
                }
            }
            Command::DeleteWordLeft => {
                self.widget.delete_word_left(now);
            }
            Command::InputKey(key) => {
                self.widget.on_key(key, now);
            }
            Command::Noop => return Ok(()),
        }
        self.render()
    }

    fn render(&mut self) -> io::Result<()> {
        let width = self.terminal.size().width;
        self.layout = render_autocomplete(&self.widget, width, &self.spinner);

        let mut lines: Vec<SpanLine> = self.layout.lines.clone();
        if let (Some(details), Some(selection)) = (self.details.as_ref(), self.widget.selection()) {
            lines.push(Vec::new());
            for text in details(selection) {
                lines.push(vec![Span::new(truncate(text.as_str(), width as usize))]);
            }
        }
        lines.push(Vec::new());
        lines.push(vec![Span::styled(
            truncate(HELP, width as usize),
            Style::new().color(Color::DarkGrey),
        )]);

        self.terminal.render(&lines, self.layout.cursor)
    }
}
