// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::{Cell, Frame};

/// Attributes most recently emitted to the terminal.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

pub struct Terminal {
    stdout: Stdout,
    shown: Option<(u16, u16)>,
    pen: Pen,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(EnableMouseCapture)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: None,
            pen: Pen::default(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Flushes the changed cells of `frame`, or the whole frame after a
    /// resize or when most of it changed anyway.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let resized = self.shown != Some((frame.width, frame.height));
        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = Some((frame.width, frame.height));
        }
        self.pen = Pen::default();

        let total = frame.width as usize * frame.height as usize;
        let full = resized || frame.is_dirty_all() || frame.dirty_indices().len() >= total / 3;

        if full {
            for y in 0..frame.height {
                for x in 0..frame.width {
                    let i = y as usize * frame.width as usize + x as usize;
                    self.put(x, y, frame.cell_at_index(i))?;
                }
            }
        } else {
            let mut dirty = frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let w = frame.width as usize;
            for i in dirty {
                self.put((i % w) as u16, (i / w) as u16, frame.cell_at_index(i))?;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn put(&mut self, x: u16, y: u16, cell: Cell) -> Result<()> {
        if self.pen.pos != Some((x, y)) {
            self.stdout.queue(cursor::MoveTo(x, y))?;
        }
        if cell.fg != self.pen.fg {
            self.stdout
                .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.pen.fg = cell.fg;
        }
        if cell.bg != self.pen.bg {
            self.stdout
                .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.pen.bg = cell.bg;
        }
        if cell.bold != self.pen.bold {
            self.stdout.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.pen.bold = cell.bold;
        }
        self.stdout.queue(Print(cell.ch))?;
        // wide glyphs advance the cursor by an unknown amount
        self.pen.pos = cell.ch.is_ascii().then(|| (x.saturating_add(1), y));
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Leaves raw mode and the alternate screen from a panic hook or signal
/// handler, where the `Terminal` value is out of reach.
pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
