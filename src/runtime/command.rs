use crate::core::navigation::NavCommand;
use crate::terminal::KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Navigate(NavCommand),
    ToggleFocus,
    DeleteWordLeft,
    InputKey(KeyEvent),
    Noop,
}
