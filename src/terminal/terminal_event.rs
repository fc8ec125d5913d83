use crate::terminal::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    MouseDown { row: u16, col: u16 },
    Resize { width: u16, height: u16 },
    Tick,
}
