//! Frame display and key polling.
//!
//! `TermWindow` owns
//! the alternate screen and raw mode for its lifetime, renders each frame
//! as colored half-block cells, and polls the keyboard with a bounded wait.
//! Both acquisitions are released on drop, so an error path in a demo still
//! restores the terminal.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen, SetTitle,
};
use crossterm::{cursor, execute, queue};

use crate::frame::Frame;

/// Keys the demos care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Esc,
    Char(char),
    Other,
}

/// Where processed frames go.
pub trait DisplaySink {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Bounded keyboard poll, one key per loop iteration.
pub trait KeyPoll {
    /// Wait up to `timeout` for a key. `None` means the poll timed out.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>>;
}

/// Named terminal window.
pub struct TermWindow {
    title: String,
}

impl TermWindow {
    /// Enter the alternate screen and raw mode.
    pub fn open(title: &str) -> Result<Self> {
        enable_raw_mode().context("enable terminal raw mode")?;
        if let Err(err) = execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            SetTitle(title)
        ) {
            let _ = disable_raw_mode();
            return Err(anyhow::Error::new(err).context("enter alternate screen"));
        }
        Ok(Self {
            title: title.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Drop for TermWindow {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, ResetColor, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl DisplaySink for TermWindow {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let (cols, rows) = terminal::size().context("query terminal size")?;
        // Last row is the status line.
        let cell_rows = rows.saturating_sub(1).max(1) as u32;
        let cell_cols = cols.max(1) as u32;
        // One text cell shows two pixel rows via the upper-half block.
        let out_h = cell_rows * 2;

        let mut stdout = io::stdout();
        for ty in 0..cell_rows {
            queue!(stdout, cursor::MoveTo(0, ty as u16))?;
            for tx in 0..cell_cols {
                // Nearest-neighbor sample per half-cell.
                let sx = tx * frame.width() / cell_cols;
                let top = frame.pixel(sx, (ty * 2) * frame.height() / out_h);
                let bot = frame.pixel(sx, (ty * 2 + 1) * frame.height() / out_h);
                queue!(
                    stdout,
                    SetForegroundColor(Color::Rgb {
                        r: top[0],
                        g: top[1],
                        b: top[2]
                    }),
                    SetBackgroundColor(Color::Rgb {
                        r: bot[0],
                        g: bot[1],
                        b: bot[2]
                    }),
                    Print("\u{2580}")
                )?;
            }
        }
        queue!(
            stdout,
            ResetColor,
            cursor::MoveTo(0, cell_rows as u16),
            Clear(ClearType::CurrentLine),
            Print(format!(
                "{} {}x{} | Esc quits, s saves a snapshot",
                self.title,
                frame.width(),
                frame.height()
            ))
        )?;
        stdout.flush().context("flush frame to terminal")?;
        Ok(())
    }
}

/// Keyboard poll over the raw-mode terminal event stream.
///
/// Separate from `TermWindow` so the loop can borrow the renderer and the
/// key source independently; crossterm events are process-global anyway.
pub struct TermKeys;

impl KeyPoll for TermKeys {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        if !event::poll(timeout).context("poll terminal events")? {
            return Ok(None);
        }
        match event::read().context("read terminal event")? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                // Raw mode swallows SIGINT, so Ctrl+C quits like Escape.
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(Some(Key::Esc));
                }
                Ok(Some(match key.code {
                    KeyCode::Esc => Key::Esc,
                    KeyCode::Char(c) => Key::Char(c),
                    _ => Key::Other,
                }))
            }
            _ => Ok(Some(Key::Other)),
        }
    }
}

/// Sink that discards frames and counts them. Test double.
#[derive(Default)]
pub struct NullSink {
    presented: u64,
    last_frame: Option<Frame>,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// The most recent frame, kept for overlay assertions.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}

impl DisplaySink for NullSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.presented += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

/// Scripted key source. Test double: yields one entry per poll and times
/// out forever once the script is exhausted.
pub struct ScriptedKeys {
    script: VecDeque<Option<Key>>,
}

impl ScriptedKeys {
    pub fn new<I: IntoIterator<Item = Option<Key>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl KeyPoll for ScriptedKeys {
    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<Key>> {
        Ok(self.script.pop_front().flatten())
    }
}
