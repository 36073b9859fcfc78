//! Display surfaces that render a single status line.
//!
//! A surface is owned by exactly one thread: the one that created it.
//! Producers never touch a surface directly; they hand text to the loop running on the owning thread.
use std::{
    fmt,
    io::{self, IsTerminal},
    str::FromStr,
};

use tracing::{info, warn};

use crate::error::SurfaceError;

mod console;
pub use console::ConsoleSurface;

mod memory;
pub use memory::{MemoryHandle, MemorySurface};

#[cfg(feature = "terminal")]
mod terminal;
#[cfg(feature = "terminal")]
pub use terminal::TerminalSurface;

/// A display that shows one line of text at a time.
pub trait Surface {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// `false` once the surface was closed (e.g. by the user); render loops stop then.
    fn is_open(&self) -> bool;

    /// Process pending UI events without blocking.
    fn pump(&mut self) -> Result<(), SurfaceError>;

    /// Replace the displayed text.
    fn show(&mut self, text: &str) -> Result<(), SurfaceError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn pump(&mut self) -> Result<(), SurfaceError> {
        (**self).pump()
    }

    fn show(&mut self, text: &str) -> Result<(), SurfaceError> {
        (**self).show(text)
    }
}

/// Which surface a worker should open at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurfacePreference {
    /// Terminal surface when an interactive terminal is attached, console otherwise.
    #[default]
    Auto,
    /// Terminal surface or a startup error.
    Terminal,
    /// Plain lines on stdout.
    Console,
}

impl SurfacePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfacePreference::Auto => "auto",
            SurfacePreference::Terminal => "terminal",
            SurfacePreference::Console => "console",
        }
    }
}

impl FromStr for SurfacePreference {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "auto" => Ok(SurfacePreference::Auto),
            "terminal" | "tui" => Ok(SurfacePreference::Terminal),
            "console" | "cli" => Ok(SurfacePreference::Console),
            _ => Err(SurfaceError::InvalidPreference(s.to_string())),
        }
    }
}

impl fmt::Display for SurfacePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime capability probe for the terminal surface.
///
/// Requires the `terminal` feature, stdout attached to a terminal and `TERM` not set to `dumb`.
pub fn terminal_available() -> bool {
    if !cfg!(feature = "terminal") || !io::stdout().is_terminal() {
        return false;
    }
    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}

/// Open a surface according to `pref`.
///
/// Must be called on the thread that will drive the surface.
pub fn open_surface(pref: SurfacePreference, title: &str) -> Result<Box<dyn Surface>, SurfaceError> {
    match pref {
        SurfacePreference::Console => Ok(Box::new(ConsoleSurface::stdout())),
        SurfacePreference::Terminal => open_terminal(title),
        SurfacePreference::Auto => {
            if !terminal_available() {
                info!(target: "beacon.core.surface", "no interactive terminal; using console surface");
                return Ok(Box::new(ConsoleSurface::stdout()));
            }
            match open_terminal(title) {
                Ok(surface) => Ok(surface),
                Err(e) => {
                    warn!(target: "beacon.core.surface", error = %e, "terminal surface failed; falling back to console");
                    Ok(Box::new(ConsoleSurface::stdout()))
                }
            }
        }
    }
}

#[cfg(feature = "terminal")]
fn open_terminal(title: &str) -> Result<Box<dyn Surface>, SurfaceError> {
    if !terminal_available() {
        return Err(SurfaceError::Unavailable(
            "stdout is not an interactive terminal".into(),
        ));
    }
    Ok(Box::new(TerminalSurface::open(title)?))
}

#[cfg(not(feature = "terminal"))]
fn open_terminal(_title: &str) -> Result<Box<dyn Surface>, SurfaceError> {
    Err(SurfaceError::Unavailable(
        "built without the `terminal` feature".into(),
    ))
}
