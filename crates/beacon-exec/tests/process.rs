use std::{collections::HashMap, sync::Arc};

use beacon_core::SurfacePreference;
use beacon_exec::{ConsumerConfig, ExecError, OutputMode, ProcessUpdater};
use beacon_model::{Framing, StatusMessage, WorkerId};
use tokio::sync::mpsc::UnboundedReceiver;

fn consumer(framing: Framing) -> ConsumerConfig {
    ConsumerConfig::new(env!("CARGO_BIN_EXE_beacon-consumer"))
        .with_framing(framing)
        .with_surface(SurfacePreference::Console)
        .with_output(OutputMode::Capture)
        .with_env("BEACON_LOG", "warn")
}

fn text(worker: u32, text: &str) -> StatusMessage {
    StatusMessage::from_text(Some(WorkerId::new(worker)), text)
}

async fn drain(mut rx: UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn messages_are_rendered_in_send_order() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    let output = updater.take_output().await.expect("captured output");

    updater.send(text(1, "m1")).await.unwrap();
    updater.send(text(2, "m2")).await.unwrap();
    updater.send(text(3, "m3")).await.unwrap();

    let status = updater.stop().await.unwrap();
    assert!(status.success());
    assert_eq!(drain(output).await, vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn untaken_output_is_not_retained() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    updater.send(text(1, "unread")).await.unwrap();
    updater.stop().await.unwrap();

    assert!(updater.take_output().await.is_none());
}

#[tokio::test]
async fn output_can_be_taken_once() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    let output = updater.take_output().await.expect("captured output");
    assert!(updater.take_output().await.is_none());

    updater.send(text(1, "only")).await.unwrap();
    updater.stop().await.unwrap();
    assert_eq!(drain(output).await, vec!["only"]);
}

#[tokio::test]
async fn stop_returns_after_exit_and_disconnects() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    assert!(updater.id().is_some());
    assert!(updater.is_connected().await);

    updater.update(WorkerId::new(1)).await.unwrap();
    updater.stop().await.unwrap();

    assert!(!updater.is_connected().await);
    assert!(matches!(
        updater.update(WorkerId::new(1)).await,
        Err(ExecError::NotConnected)
    ));
    assert!(matches!(updater.stop().await, Err(ExecError::NotConnected)));
}

#[tokio::test]
async fn concurrent_producers_keep_their_own_order() {
    let updater = Arc::new(ProcessUpdater::start(consumer(Framing::Tagged)).unwrap());
    let output = updater.take_output().await.expect("captured output");

    let mut producers = Vec::new();
    for worker in 0..8u32 {
        let updater = Arc::clone(&updater);
        producers.push(tokio::spawn(async move {
            let mut sent = Vec::new();
            for _ in 0..10 {
                let msg = updater.update(WorkerId::new(worker)).await.unwrap();
                sent.push(msg.into_text());
            }
            (worker, sent)
        }));
    }
    let mut sent: HashMap<u32, Vec<String>> = HashMap::new();
    for p in producers {
        let (worker, msgs) = p.await.unwrap();
        sent.insert(worker, msgs);
    }

    updater.stop().await.unwrap();
    let lines = drain(output).await;
    assert_eq!(lines.len(), 80);

    for (worker, msgs) in sent {
        let prefix = format!("Worker {worker} called.");
        let seen: Vec<String> = lines
            .iter()
            .filter(|l| l.starts_with(&prefix))
            .cloned()
            .collect();
        assert_eq!(seen, msgs, "worker {worker} messages reordered or lost");
    }
}

#[tokio::test]
async fn tagged_quit_text_is_rendered() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    let output = updater.take_output().await.expect("captured output");

    updater.send(text(1, "quit")).await.unwrap();
    updater.send(text(1, "after")).await.unwrap();
    updater.stop().await.unwrap();

    assert_eq!(drain(output).await, vec!["quit", "after"]);
}

#[tokio::test]
async fn sentinel_quit_text_stops_the_consumer_early() {
    let updater = ProcessUpdater::start(consumer(Framing::Sentinel)).unwrap();
    let output = updater.take_output().await.expect("captured output");

    updater.send(text(1, "first")).await.unwrap();
    updater.send(text(1, "quit")).await.unwrap();

    let status = updater.stop().await.unwrap();
    assert!(status.success());
    assert_eq!(drain(output).await, vec!["first"]);
}

#[tokio::test]
async fn consumer_exit_code_is_reported() {
    let cfg = consumer(Framing::Tagged).with_args(["--bogus"]);
    let updater = ProcessUpdater::start(cfg).unwrap();

    assert!(matches!(
        updater.stop().await,
        Err(ExecError::NonZeroExit { code: 2 })
    ));
}

#[tokio::test]
async fn missing_program_fails_to_start() {
    let res = ProcessUpdater::start(ConsumerConfig::new("/nonexistent/beacon-consumer"));
    assert!(matches!(res, Err(ExecError::Spawn(_))));
}

#[tokio::test]
async fn kill_disconnects_the_updater() {
    let updater = ProcessUpdater::start(consumer(Framing::Tagged)).unwrap();
    updater.update(WorkerId::new(1)).await.unwrap();

    updater.kill().await.unwrap();
    assert!(matches!(
        updater.update(WorkerId::new(1)).await,
        Err(ExecError::NotConnected)
    ));
}
