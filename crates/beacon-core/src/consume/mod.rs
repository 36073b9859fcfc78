//! Blocking consumer loop for the pipe-connected worker.
//!
//! Reads one frame per line, renders status frames on the surface and stops at the shutdown frame.
//! The loop blocks on the reader; the surface is only pumped between frames.
use std::io::BufRead;

use beacon_model::{Envelope, Framing};
use tracing::{debug, info, instrument, trace, warn};

use crate::{error::CoreError, surface::Surface};

/// How the consumer loop ended and how many frames it rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The shutdown frame arrived.
    Shutdown { rendered: usize },
    /// The producer side closed the channel without sending shutdown.
    Disconnected { rendered: usize },
    /// The surface was closed from its own UI.
    Closed { rendered: usize },
}

impl ConsumeOutcome {
    pub fn rendered(&self) -> usize {
        match *self {
            ConsumeOutcome::Shutdown { rendered }
            | ConsumeOutcome::Disconnected { rendered }
            | ConsumeOutcome::Closed { rendered } => rendered,
        }
    }
}

#[instrument(level = "debug", skip(reader, surface), fields(surface = surface.name()))]
pub fn consume<R, S>(mut reader: R, surface: &mut S, framing: Framing) -> Result<ConsumeOutcome, CoreError>
where
    R: BufRead,
    S: Surface + ?Sized,
{
    let mut rendered = 0;
    let mut line = String::new();

    loop {
        surface.pump()?;
        if !surface.is_open() {
            info!(target: "beacon.core.consume", rendered, "surface closed; consumer stopping");
            return Ok(ConsumeOutcome::Closed { rendered });
        }

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            warn!(target: "beacon.core.consume", rendered, "channel closed without shutdown");
            return Ok(ConsumeOutcome::Disconnected { rendered });
        }

        let envelope = framing.decode(&line)?;
        trace!(target: "beacon.core.consume", kind = envelope.kind(), "frame received");
        match envelope {
            Envelope::Shutdown => {
                info!(target: "beacon.core.consume", surface = surface.name(), rendered, "consumer received shutdown");
                return Ok(ConsumeOutcome::Shutdown { rendered });
            }
            Envelope::Status(msg) => {
                debug!(target: "beacon.core.consume", worker = ?msg.worker(), "rendering status");
                surface.show(msg.text())?;
                rendered += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use beacon_model::{StatusMessage, WorkerId};

    use super::*;
    use crate::surface::{ConsoleSurface, MemorySurface};

    fn frames(framing: Framing, envelopes: &[Envelope]) -> Cursor<String> {
        let mut out = String::new();
        for env in envelopes {
            out.push_str(&framing.encode(env).unwrap());
            out.push('\n');
        }
        Cursor::new(out)
    }

    fn status(worker: u32, text: &str) -> Envelope {
        StatusMessage::from_text(Some(WorkerId::new(worker)), text).into()
    }

    #[test]
    fn renders_in_order_and_stops_on_shutdown() {
        let input = frames(
            Framing::Tagged,
            &[status(1, "m1"), status(2, "m2"), status(3, "m3"), Envelope::Shutdown],
        );
        let mut surface = MemorySurface::new();
        let screen = surface.handle();

        let outcome = consume(input, &mut surface, Framing::Tagged).unwrap();

        assert_eq!(outcome, ConsumeOutcome::Shutdown { rendered: 3 });
        assert_eq!(screen.shown(), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn frames_after_shutdown_are_not_read() {
        let input = frames(
            Framing::Tagged,
            &[status(1, "before"), Envelope::Shutdown, status(1, "after")],
        );
        let mut surface = MemorySurface::new();
        let screen = surface.handle();

        consume(input, &mut surface, Framing::Tagged).unwrap();
        assert_eq!(screen.shown(), vec!["before"]);
    }

    #[test]
    fn tagged_quit_text_is_rendered() {
        let input = frames(
            Framing::Tagged,
            &[status(1, "quit"), status(1, "still here"), Envelope::Shutdown],
        );
        let mut surface = MemorySurface::new();
        let screen = surface.handle();

        let outcome = consume(input, &mut surface, Framing::Tagged).unwrap();
        assert_eq!(outcome.rendered(), 2);
        assert_eq!(screen.shown(), vec!["quit", "still here"]);
    }

    #[test]
    fn sentinel_quit_text_stops_the_consumer_early() {
        let input = Cursor::new("first\nquit\nnever shown\n");
        let mut surface = MemorySurface::new();
        let screen = surface.handle();

        let outcome = consume(input, &mut surface, Framing::Sentinel).unwrap();
        assert_eq!(outcome, ConsumeOutcome::Shutdown { rendered: 1 });
        assert_eq!(screen.shown(), vec!["first"]);
    }

    #[test]
    fn eof_without_shutdown_is_disconnect() {
        let input = frames(Framing::Tagged, &[status(1, "lonely")]);
        let mut surface = MemorySurface::new();

        let outcome = consume(input, &mut surface, Framing::Tagged).unwrap();
        assert_eq!(outcome, ConsumeOutcome::Disconnected { rendered: 1 });
    }

    #[test]
    fn closed_surface_stops_before_reading() {
        let input = frames(Framing::Tagged, &[status(1, "unseen"), Envelope::Shutdown]);
        let mut surface = MemorySurface::new();
        let screen = surface.handle();
        screen.close();

        let outcome = consume(input, &mut surface, Framing::Tagged).unwrap();
        assert_eq!(outcome, ConsumeOutcome::Closed { rendered: 0 });
        assert!(screen.shown().is_empty());
    }

    #[test]
    fn malformed_frame_is_an_error() {
        let input = Cursor::new("{not json}\n");
        let mut surface = MemorySurface::new();

        let err = consume(input, &mut surface, Framing::Tagged).unwrap_err();
        assert!(matches!(err, CoreError::Codec(_)));
    }

    #[test]
    fn console_surface_prints_each_message() {
        let input = frames(Framing::Tagged, &[status(4, "a"), status(5, "b"), Envelope::Shutdown]);
        let mut surface = ConsoleSurface::new(Vec::new());

        consume(input, &mut surface, Framing::Tagged).unwrap();
        assert_eq!(String::from_utf8(surface.into_inner()).unwrap(), "a\nb\n");
    }
}
