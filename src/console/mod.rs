//! Interactive console that survives asynchronous output.
//!
//! Workers print whenever their alarms fire; without care that output lands
//! in the middle of whatever the user is typing. The console keeps the
//! input buffer itself: every emitted line first clears the current
//! terminal line, then writes the log line, then redraws the prompt with
//! the buffer so far.
//!
//! ```text
//! Alarm> Start_Al          ← user mid-command
//! Alarm (3) Printed by Alarm Display Thread 1 at …: Group(10) … hello
//! Alarm> Start_Al          ← redrawn, typing continues
//! ```
//!
//! The terminal is switched to raw mode for character-at-a-time input and
//! restored by [`Console::restore`] (or on drop as a backstop).

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, queue};

use crate::events::{Event, EventSink};

/// Prompt redrawn after every output line.
pub const PROMPT: &str = "Alarm> ";

struct ConsoleState {
    buffer: String,
}

/// Raw-mode console: line-preserving sink plus the blocking input reader.
pub struct Console {
    state: Mutex<ConsoleState>,
}

impl Console {
    /// Switches the terminal to raw mode and draws the first prompt.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
        Ok(Self {
            state: Mutex::new(ConsoleState {
                buffer: String::new(),
            }),
        })
    }

    /// Writes one line atomically and redraws the prompt with the pending
    /// input buffer.
    pub fn print_line(&self, line: &str) {
        let state = self.state.lock().expect("console mutex poisoned");
        let mut stdout = io::stdout();
        let _ = queue!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = write!(stdout, "{line}\r\n{PROMPT}{}", state.buffer);
        let _ = stdout.flush();
    }

    /// Blocks until the user finishes a line. Returns `None` on Ctrl-C or
    /// Ctrl-D.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        loop {
            let TermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d')
                    if key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    return Ok(None);
                }
                KeyCode::Enter => {
                    let mut state = self.state.lock().expect("console mutex poisoned");
                    let line = std::mem::take(&mut state.buffer);
                    let mut stdout = io::stdout();
                    write!(stdout, "\r\n{PROMPT}")?;
                    stdout.flush()?;
                    return Ok(Some(line));
                }
                KeyCode::Backspace => {
                    let mut state = self.state.lock().expect("console mutex poisoned");
                    if state.buffer.pop().is_some() {
                        let mut stdout = io::stdout();
                        write!(stdout, "\u{8} \u{8}")?;
                        stdout.flush()?;
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let mut state = self.state.lock().expect("console mutex poisoned");
                    state.buffer.push(c);
                    let mut stdout = io::stdout();
                    write!(stdout, "{c}")?;
                    stdout.flush()?;
                }
                _ => {}
            }
        }
    }

    /// Leaves raw mode. Safe to call more than once.
    pub fn restore(&self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl EventSink for Console {
    fn emit(&self, event: &Event) {
        self.print_line(&event.to_string());
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.restore();
    }
}
