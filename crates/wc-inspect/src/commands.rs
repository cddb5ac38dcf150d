use std::sync::{Arc, Mutex};

use serde::Serialize;
use wc_sequence::{Sequence, SequenceStore, StoreConfig, StoreError};

use crate::Kind;

/// One line of `purge` output.
#[derive(Debug, Serialize)]
struct Evicted<'a> {
    kind: &'a str,
    topic: String,
}

pub fn list(config: &StoreConfig, kind: Kind) -> anyhow::Result<()> {
    match kind {
        Kind::Pairings => print_all(&mut config.open_pairings()?),
        Kind::Sessions => print_all(&mut config.open_sessions()?),
    }
}

pub fn get(config: &StoreConfig, kind: Kind, topic: &str) -> anyhow::Result<()> {
    match kind {
        Kind::Pairings => print_one(&mut config.open_pairings()?, topic),
        Kind::Sessions => print_one(&mut config.open_sessions()?, topic),
    }
}

pub fn delete(config: &StoreConfig, kind: Kind, topic: &str) -> anyhow::Result<()> {
    match kind {
        Kind::Pairings => config.open_pairings()?.delete(topic)?,
        Kind::Sessions => config.open_sessions()?.delete(topic)?,
    }
    eprintln!("deleted {topic}");
    Ok(())
}

pub fn purge(config: &StoreConfig) -> anyhow::Result<()> {
    let pairings = purge_store(&mut config.open_pairings()?)?;
    let sessions = purge_store(&mut config.open_sessions()?)?;

    for topic in &pairings {
        emit(&Evicted { kind: "pairing", topic: topic.clone() })?;
    }
    for topic in &sessions {
        emit(&Evicted { kind: "session", topic: topic.clone() })?;
    }
    eprintln!("evicted {} pairings, {} sessions", pairings.len(), sessions.len());
    Ok(())
}

/// Run a bulk read and collect whatever it evicted.
fn purge_store<S: Sequence>(store: &mut SequenceStore<S>) -> anyhow::Result<Vec<String>> {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = evicted.clone();
    store.set_on_sequence_expiration(move |topic| {
        if let Ok(mut topics) = sink.lock() {
            topics.push(topic.to_string());
        }
    });
    store.get_all()?;
    store.clear_on_sequence_expiration();

    let topics = evicted
        .lock()
        .map_err(|_| anyhow::format_err!("eviction log poisoned"))?
        .clone();
    Ok(topics)
}

fn print_all<S: Sequence>(store: &mut SequenceStore<S>) -> anyhow::Result<()> {
    for sequence in store.get_all()? {
        emit(&sequence)?;
    }
    Ok(())
}

fn print_one<S: Sequence>(store: &mut SequenceStore<S>, topic: &str) -> anyhow::Result<()> {
    match store.get_sequence(topic) {
        Ok(sequence) => emit(&sequence),
        Err(StoreError::NotFound { topic }) => anyhow::bail!("no live sequence for topic {topic}"),
        Err(e) => Err(e.into()),
    }
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
