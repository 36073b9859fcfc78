use std::io::{self, Stdout, Write};

use crate::{error::SurfaceError, surface::Surface};

/// Prints every displayed text as its own line.
///
/// Used when no interactive terminal is available; the writer is flushed after each line.
pub struct ConsoleSurface<W: Write = Stdout> {
    out: W,
}

impl ConsoleSurface<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for ConsoleSurface<W> {
    fn name(&self) -> &'static str {
        "console"
    }

    fn is_open(&self) -> bool {
        true
    }

    fn pump(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn show(&mut self, text: &str) -> Result<(), SurfaceError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_text() {
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.show("first").unwrap();
        surface.show("second").unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "first\nsecond\n");
    }
}
