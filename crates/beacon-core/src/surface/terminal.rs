//! Full-screen terminal surface built on `ratatui` + `crossterm`.
//!
//! The terminal is put into raw mode on the alternate screen for the lifetime of the surface and restored on drop.
//! `q`, `Esc` or `Ctrl-C` close the surface.
use std::{
    io::{self, Stdout},
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Alignment,
    widgets::{Block, Paragraph, Wrap},
};
use tracing::debug;

use crate::{error::SurfaceError, surface::Surface};

pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
    label: String,
    open: bool,
}

impl TerminalSurface {
    pub fn open(title: &str) -> Result<Self, SurfaceError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                restore();
                return Err(e.into());
            }
        };

        let mut surface = Self {
            terminal,
            title: format!(" {title} (q to close) "),
            label: String::new(),
            open: true,
        };
        surface.draw()?;
        debug!(target: "beacon.core.surface", "terminal surface opened");
        Ok(surface)
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        let title = self.title.as_str();
        let label = self.label.as_str();
        self.terminal.draw(|frame| {
            let widget = Paragraph::new(label)
                .block(Block::bordered().title(title))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(widget, frame.area());
        })?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn pump(&mut self) -> Result<(), SurfaceError> {
        let mut redraw = false;
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => self.open = false,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.open = false
                    }
                    _ => {}
                },
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }
        if !self.open {
            debug!(target: "beacon.core.surface", "terminal surface closed by user");
        } else if redraw {
            self.draw()?;
        }
        Ok(())
    }

    fn show(&mut self, text: &str) -> Result<(), SurfaceError> {
        if self.label != text {
            self.label.clear();
            self.label.push_str(text);
            self.draw()?;
        }
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore();
    }
}

fn restore() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
