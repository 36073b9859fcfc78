//! Entry point of the consumer process.
//!
//! The consumer reads frames from stdin and renders them on the surface chosen at startup.
//! Usage: `[--framing tagged|sentinel] [--surface auto|terminal|console] [--title <text>]`.
use std::io;

use beacon_core::{ConsumeOutcome, CoreError, SurfacePreference, consume, open_surface};
use beacon_model::Framing;
use tracing::info;

use crate::error::{ExecError, ExecResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerArgs {
    pub framing: Framing,
    pub surface: SurfacePreference,
    pub title: String,
}

impl Default for ConsumerArgs {
    fn default() -> Self {
        Self {
            framing: Framing::default(),
            surface: SurfacePreference::default(),
            title: "beacon".to_string(),
        }
    }
}

impl ConsumerArgs {
    pub fn parse<I, S>(args: I) -> ExecResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(flag) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| ExecError::InvalidArgs(format!("{name} expects a value")))
            };
            match flag.as_str() {
                "--framing" => {
                    out.framing = value("--framing")?
                        .parse()
                        .map_err(|e| ExecError::InvalidArgs(format!("{e}")))?;
                }
                "--surface" => {
                    out.surface = value("--surface")?
                        .parse()
                        .map_err(|e| ExecError::InvalidArgs(format!("{e}")))?;
                }
                "--title" => out.title = value("--title")?,
                other => return Err(ExecError::InvalidArgs(format!("unknown argument: {other}"))),
            }
        }
        Ok(out)
    }
}

/// Open the surface and run the consumer loop over this process's stdin.
pub fn run(args: &ConsumerArgs) -> Result<ConsumeOutcome, CoreError> {
    let mut surface = open_surface(args.surface, &args.title)?;
    info!(
        target: "beacon.exec.consumer",
        surface = surface.name(),
        framing = %args.framing,
        "consumer ready"
    );
    let stdin = io::stdin();
    consume(stdin.lock(), &mut surface, args.framing)
}
