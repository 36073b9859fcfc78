//! Status board demo.
//!
//! `status-board poll`    - producer threads overwrite a shared slot, a display thread polls it.
//! `status-board process` - producer tasks stream frames to a consumer process (this binary in `consume` mode).
//! `status-board sum`     - producer threads run the element-wise sum over 10 000-element vectors.
//!
//! Logs go to stderr; with a terminal surface, silence them with `BEACON_LOG=off` or redirect stderr.
use std::{sync::Arc, thread};

use anyhow::{Context, bail};
use beacon_core::{PollConfig, PollingUpdater, add_elementwise, open_surface, sum_pairwise};
use beacon_exec::{ConsumerArgs, ConsumerConfig, ExecResult, ProcessUpdater, consumer};
use beacon_model::WorkerId;
use beacon_observe::{LoggerConfig, logger_init};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

mod config;
use config::BoardConfig;

const SUM_LEN: i64 = 10_000;
const SUM_ROUNDS: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_cfg = LoggerConfig::from_env()?;
    logger_init(&log_cfg)?;

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "poll".to_string());

    if mode == "consume" {
        let args = ConsumerArgs::parse(args)?;
        let outcome = tokio::task::spawn_blocking(move || consumer::run(&args)).await??;
        info!(?outcome, "consumer exiting");
        return Ok(());
    }

    let cfg = BoardConfig::from_env()?;
    cfg.validate()?;
    info!(
        mode = %mode,
        log_format = %log_cfg.format,
        producers = cfg.producers,
        rounds = cfg.rounds,
        pause_ms = cfg.pause.as_millis() as u64,
        "status board starting"
    );

    match mode.as_str() {
        "poll" => run_poll(&cfg),
        "process" => run_process(&cfg).await,
        "sum" => run_sum(&cfg),
        other => bail!("unknown mode: {other} (expected: poll|process|sum|consume)"),
    }
}

fn run_poll(cfg: &BoardConfig) -> anyhow::Result<()> {
    let pref = cfg.surface;
    let updater = PollingUpdater::spawn(PollConfig::default(), move || {
        open_surface(pref, "beacon: shared slot")
    })?;

    thread::scope(|s| {
        for worker in 0..cfg.producers {
            let updater = &updater;
            s.spawn(move || {
                debug!(worker, "producer started");
                for _ in 0..cfg.rounds {
                    if !updater.is_running() {
                        break;
                    }
                    updater.update(WorkerId::from(worker));
                    thread::sleep(cfg.pause);
                }
                debug!(worker, "producer exiting");
            });
        }
    });

    let exit = updater.stop()?;
    info!(?exit, "display loop stopped");
    Ok(())
}

async fn run_process(cfg: &BoardConfig) -> anyhow::Result<()> {
    let exe = std::env::current_exe().context("locating own executable")?;
    let consumer = ConsumerConfig::new(exe)
        .with_args(["consume"])
        .with_framing(cfg.framing)
        .with_surface(cfg.surface);
    let updater = Arc::new(ProcessUpdater::start(consumer)?);

    let mut producers: JoinSet<ExecResult<()>> = JoinSet::new();
    for worker in 0..cfg.producers {
        let updater = Arc::clone(&updater);
        let (rounds, pause) = (cfg.rounds, cfg.pause);
        producers.spawn(async move {
            for _ in 0..rounds {
                updater.update(WorkerId::from(worker)).await?;
                tokio::time::sleep(pause).await;
            }
            Ok(())
        });
    }

    let interrupted = tokio::select! {
        res = join_all(&mut producers) => {
            res?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        warn!("interrupted; stopping consumer");
        producers.abort_all();
    }

    let status = updater.stop().await?;
    info!(%status, "consumer stopped");
    Ok(())
}

async fn join_all(set: &mut JoinSet<ExecResult<()>>) -> anyhow::Result<()> {
    while let Some(res) = set.join_next().await {
        res.context("producer task panicked")??;
    }
    Ok(())
}

fn run_sum(cfg: &BoardConfig) -> anyhow::Result<()> {
    let left: Vec<i64> = (0..SUM_LEN).collect();
    let right: Vec<i64> = left.iter().map(|v| v * 2).collect();

    thread::scope(|s| {
        let workers: Vec<_> = (0..cfg.producers)
            .map(|worker| {
                let (left, right) = (&left, &right);
                s.spawn(move || -> anyhow::Result<()> {
                    for round in 0..SUM_ROUNDS {
                        let total = sum_pairwise(left, right)?;
                        let n = add_elementwise(left, right)?.len();
                        debug!(worker, round, total, n, "sum computed");
                    }
                    info!(worker, "sum worker done");
                    Ok(())
                })
            })
            .collect();

        for w in workers {
            w.join()
                .map_err(|_| anyhow::anyhow!("sum worker panicked"))??;
        }
        Ok(())
    })
}
