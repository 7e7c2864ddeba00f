//! Key handling tables.
//!
//! Maps crossterm key events to workbench commands, and everything else to
//! the bytes a terminal expects.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Workbench command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a new tab.
    NewTab,
    /// Close the active tab.
    CloseTab,
    /// Activate the next tab.
    NextTab,
    /// Activate the previous tab.
    PrevTab,
    /// Activate the tab at this index.
    SelectTab(usize),
    /// Split side by side.
    SplitHorizontal,
    /// Split stacked.
    SplitVertical,
    /// Close the focused pane.
    ClosePane,
    /// Focus the next pane.
    FocusNext,
    /// Focus the previous pane.
    FocusPrev,
    /// Grow the focused pane.
    GrowPane,
    /// Shrink the focused pane.
    ShrinkPane,
    /// Show the active tab in the focused pane.
    ShowActiveInPane,
    /// Re-read the config file.
    ReloadConfig,
    /// Quit.
    Quit,
}

/// Returns the command bound to `key`, if any.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    let command = match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Command::NewTab,
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => Command::CloseTab,
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => Command::Quit,
        (KeyModifiers::CONTROL, KeyCode::PageDown) => Command::NextTab,
        (KeyModifiers::CONTROL, KeyCode::PageUp) => Command::PrevTab,
        (KeyModifiers::ALT, KeyCode::Char(c @ '1'..='9')) => {
            Command::SelectTab(usize::from(c as u8 - b'1'))
        }
        (KeyModifiers::ALT, KeyCode::Char('h')) => Command::SplitHorizontal,
        (KeyModifiers::ALT, KeyCode::Char('v')) => Command::SplitVertical,
        (KeyModifiers::ALT, KeyCode::Char('x')) => Command::ClosePane,
        (KeyModifiers::ALT, KeyCode::Right) => Command::FocusNext,
        (KeyModifiers::ALT, KeyCode::Left) => Command::FocusPrev,
        (KeyModifiers::ALT, KeyCode::Char(']')) => Command::GrowPane,
        (KeyModifiers::ALT, KeyCode::Char('[')) => Command::ShrinkPane,
        (KeyModifiers::ALT, KeyCode::Char('s')) => Command::ShowActiveInPane,
        (KeyModifiers::ALT, KeyCode::Char('r')) => Command::ReloadConfig,
        _ => return None,
    };
    Some(command)
}

/// Converts a key event to bytes for the terminal.
pub fn key_to_bytes(key: KeyEvent) -> Vec<u8> {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            c.to_string().into_bytes()
        }
        (KeyModifiers::CONTROL, KeyCode::Char(c)) if c.is_ascii_alphabetic() => {
            vec![(c.to_ascii_lowercase() as u8) - b'a' + 1]
        }
        (KeyModifiers::ALT, KeyCode::Char(c)) => {
            let mut bytes = vec![0x1b];
            bytes.extend(c.to_string().into_bytes());
            bytes
        }
        (_, KeyCode::Enter) => vec![b'\r'],
        (_, KeyCode::Backspace) => vec![0x7f],
        (KeyModifiers::NONE, KeyCode::Tab) => vec![b'\t'],
        (_, KeyCode::BackTab) => b"\x1b[Z".to_vec(),
        (_, KeyCode::Esc) => vec![0x1b],
        (KeyModifiers::NONE, KeyCode::Up) => b"\x1b[A".to_vec(),
        (KeyModifiers::NONE, KeyCode::Down) => b"\x1b[B".to_vec(),
        (KeyModifiers::NONE, KeyCode::Right) => b"\x1b[C".to_vec(),
        (KeyModifiers::NONE, KeyCode::Left) => b"\x1b[D".to_vec(),
        (KeyModifiers::NONE, KeyCode::Home) => b"\x1b[H".to_vec(),
        (KeyModifiers::NONE, KeyCode::End) => b"\x1b[F".to_vec(),
        (KeyModifiers::NONE, KeyCode::PageUp) => b"\x1b[5~".to_vec(),
        (KeyModifiers::NONE, KeyCode::PageDown) => b"\x1b[6~".to_vec(),
        (KeyModifiers::NONE, KeyCode::Insert) => b"\x1b[2~".to_vec(),
        (KeyModifiers::NONE, KeyCode::Delete) => b"\x1b[3~".to_vec(),
        (KeyModifiers::NONE, KeyCode::F(n)) => function_key_bytes(n),
        _ => Vec::new(),
    }
}

fn function_key_bytes(n: u8) -> Vec<u8> {
    let seq: &[u8] = match n {
        1 => b"\x1bOP",
        2 => b"\x1bOQ",
        3 => b"\x1bOR",
        4 => b"\x1bOS",
        5 => b"\x1b[15~",
        6 => b"\x1b[17~",
        7 => b"\x1b[18~",
        8 => b"\x1b[19~",
        9 => b"\x1b[20~",
        10 => b"\x1b[21~",
        11 => b"\x1b[23~",
        12 => b"\x1b[24~",
        _ => b"",
    };
    seq.to_vec()
}
