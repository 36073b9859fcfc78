use std::{str::FromStr, time::Duration};

use anyhow::{Context, bail};
use beacon_core::SurfacePreference;
use beacon_model::Framing;

#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Number of concurrent producers.
    pub producers: u32,
    /// Updates per producer.
    pub rounds: usize,
    /// Pause between two updates of one producer.
    pub pause: Duration,
    pub surface: SurfacePreference,
    pub framing: Framing,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            producers: 20,
            rounds: 30,
            pause: Duration::from_millis(300),
            surface: SurfacePreference::Auto,
            framing: Framing::Tagged,
        }
    }
}

impl BoardConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Some(v) = env_parse::<u32>("BEACON_PRODUCERS")? {
            cfg.producers = v;
        }
        if let Some(v) = env_parse::<usize>("BEACON_ROUNDS")? {
            cfg.rounds = v;
        }
        if let Some(v) = env_parse::<u64>("BEACON_PAUSE_MS")? {
            cfg.pause = Duration::from_millis(v);
        }
        if let Some(v) = env_parse::<SurfacePreference>("BEACON_SURFACE")? {
            cfg.surface = v;
        }
        if let Some(v) = env_parse::<Framing>("BEACON_FRAMING")? {
            cfg.framing = v;
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.producers == 0 {
            bail!("BEACON_PRODUCERS must be at least 1");
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {key}={raw}")),
        Err(_) => Ok(None),
    }
}
