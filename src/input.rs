//! Commands and the sources that produce them: keyboard, numbered lines, scripts.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::{self, BufRead, Write};

/// One discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ShiftLeft,
    ShiftRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    Quit,
}

impl Command {
    pub const ALL: [Self; 7] = [
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::RotateCw,
        Self::RotateCcw,
        Self::SoftDrop,
        Self::HardDrop,
        Self::Quit,
    ];

    /// Numbered protocol: 0 left, 1 right, 2 rotate cw, 3 rotate ccw, 4 down, 5 drop, 6 quit.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn code(self) -> u8 {
        match self {
            Self::ShiftLeft => 0,
            Self::ShiftRight => 1,
            Self::RotateCw => 2,
            Self::RotateCcw => 3,
            Self::SoftDrop => 4,
            Self::HardDrop => 5,
            Self::Quit => 6,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::ShiftLeft => "move left",
            Self::ShiftRight => "move right",
            Self::RotateCw => "rotate right",
            Self::RotateCcw => "rotate left",
            Self::SoftDrop => "move down",
            Self::HardDrop => "drop",
            Self::Quit => "quit",
        }
    }
}

/// Help text for the numbered protocol, one code per line.
pub fn command_legend() -> String {
    Command::ALL
        .iter()
        .map(|c| format!("Number {} -> {}\n", c.code(), c.describe()))
        .collect()
}

/// Blocking supplier of commands. Anything outside [`Command`] is filtered here.
pub trait InputSource {
    fn next_command(&mut self) -> io::Result<Command>;
}

/// Map key event to command. Supports both normal (arrows, space) and vim (hjkl, etc.).
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::ShiftLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::ShiftRight),
        KeyCode::Up | KeyCode::Char('k' | 'i') => Some(Command::RotateCw),
        KeyCode::Char('u' | 'z') => Some(Command::RotateCcw),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::SoftDrop),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::HardDrop),
        _ => None,
    }
}

/// Reads crossterm key presses; unmapped keys and releases are skipped.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn next_command(&mut self) -> io::Result<Command> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = key_to_command(key) {
                    return Ok(command);
                }
            }
        }
    }
}

/// Line-oriented numbered protocol: prompts, reads one code per line.
///
/// Lines that are not a code in 0..=6 are skipped. End of input reads as quit.
pub struct LineInput<R, W> {
    reader: R,
    prompt: W,
    line: String,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub const PROMPT: &'static str = "Event number (0-6): ";

    pub fn new(reader: R, prompt: W) -> Self {
        Self {
            reader,
            prompt,
            line: String::new(),
        }
    }
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn next_command(&mut self) -> io::Result<Command> {
        loop {
            write!(self.prompt, "{}", Self::PROMPT)?;
            self.prompt.flush()?;
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(Command::Quit);
            }
            let text = self.line.trim();
            match text.parse::<u8>().ok().and_then(Command::from_code) {
                Some(command) => return Ok(command),
                None => log::warn!("ignoring input line {text:?}: expected a number 0-6"),
            }
        }
    }
}

/// Replays a fixed sequence, then quits forever.
#[derive(Debug, Clone)]
pub struct ScriptedInput<I> {
    commands: I,
}

impl<I: Iterator<Item = Command>> ScriptedInput<I> {
    pub fn new(commands: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            commands: commands.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Command>> InputSource for ScriptedInput<I> {
    fn next_command(&mut self) -> io::Result<Command> {
        Ok(self.commands.next().unwrap_or(Command::Quit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn codes_round_trip_and_reject_unknown() {
        for command in Command::ALL {
            assert_eq!(Command::from_code(command.code()), Some(command));
        }
        assert_eq!(Command::from_code(7), None);
        assert_eq!(Command::from_code(255), None);
    }

    #[test]
    fn arrows_and_vim_keys_map_alike() {
        assert_eq!(key_to_command(key(KeyCode::Left)), Some(Command::ShiftLeft));
        assert_eq!(key_to_command(key(KeyCode::Char('h'))), Some(Command::ShiftLeft));
        assert_eq!(key_to_command(key(KeyCode::Up)), Some(Command::RotateCw));
        assert_eq!(key_to_command(key(KeyCode::Char('u'))), Some(Command::RotateCcw));
        assert_eq!(key_to_command(key(KeyCode::Char('j'))), Some(Command::SoftDrop));
        assert_eq!(key_to_command(key(KeyCode::Char(' '))), Some(Command::HardDrop));
        assert_eq!(key_to_command(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(key_to_command(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn modifiers_filter_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_command(ctrl_c), Some(Command::Quit));
        let alt_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::ALT);
        assert_eq!(key_to_command(alt_h), None);
    }

    #[test]
    fn line_input_skips_garbage_and_quits_at_eof() {
        let mut prompts = Vec::new();
        let mut input = LineInput::new(&b"1\nfoo\n9\n 5 \n"[..], &mut prompts);
        assert_eq!(input.next_command().unwrap(), Command::ShiftRight);
        assert_eq!(input.next_command().unwrap(), Command::HardDrop);
        assert_eq!(input.next_command().unwrap(), Command::Quit);
        drop(input);
        let shown = String::from_utf8(prompts).unwrap();
        assert_eq!(shown.matches("Event number (0-6): ").count(), 5);
    }

    #[test]
    fn scripted_input_quits_when_exhausted() {
        let mut input = ScriptedInput::new([Command::RotateCw]);
        assert_eq!(input.next_command().unwrap(), Command::RotateCw);
        assert_eq!(input.next_command().unwrap(), Command::Quit);
        assert_eq!(input.next_command().unwrap(), Command::Quit);
    }

    #[test]
    fn legend_lists_all_codes() {
        let legend = command_legend();
        assert!(legend.starts_with("Number 0 -> move left\n"));
        assert!(legend.ends_with("Number 6 -> quit\n"));
    }
}
