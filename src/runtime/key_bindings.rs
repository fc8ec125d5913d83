use crate::core::navigation::NavCommand;
use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Raw key to command table. Keys without a binding fall through to the
/// focused input as text edits.
#[derive(Debug, Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut manager = Self::default();
        manager.install_defaults();
        manager
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: &KeyBinding) {
        self.bindings.remove(key);
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from_event(event)).cloned()
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(
            KeyBinding::key(KeyCode::Down),
            Command::Navigate(NavCommand::MoveDown),
        );
        self.bind(
            KeyBinding::key(KeyCode::Up),
            Command::Navigate(NavCommand::MoveUp),
        );
        self.bind(
            KeyBinding::key(KeyCode::Enter),
            Command::Navigate(NavCommand::Commit),
        );
        self.bind(
            KeyBinding::key(KeyCode::Esc),
            Command::Navigate(NavCommand::Cancel),
        );
        self.bind(KeyBinding::key(KeyCode::Tab), Command::ToggleFocus);
        self.bind(
            KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Command::ToggleFocus,
        );
        self.bind(
            KeyBinding::ctrl(KeyCode::Backspace),
            Command::DeleteWordLeft,
        );
        self.bind(KeyBinding::ctrl(KeyCode::Char('w')), Command::DeleteWordLeft);
    }
}
