//! Streaming ingestion pipeline
//!
//! A bounded channel carries encoded bags from the generator to a single
//! consumer thread, which is the only code that ever calls
//! [`TripleStore::add`]. The producer blocks while the channel is full;
//! dropping (or [`BagWriter::close`]-ing) the writer lets the consumer drain
//! what is left and finish. The store and the final counts come back through
//! [`IngestHandle::join`], so they are read only after the consumer has
//! stopped.

use crate::rdf::{Bag, RdfStoreError, TripleStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

/// Ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// The consumer is gone; join the handle for the cause
    #[error("Ingestion queue closed")]
    Closed,

    /// The store rejected a bag
    #[error("Store rejected bag: {0}")]
    Store(#[from] RdfStoreError),

    /// Consumer thread could not be started
    #[error("Failed to start ingestion consumer: {0}")]
    Spawn(#[from] std::io::Error),

    /// Consumer thread panicked
    #[error("Ingestion consumer panicked")]
    ConsumerPanicked,
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Destination for encoded bags
pub trait BagSink {
    fn write(&mut self, bag: Bag) -> IngestResult<()>;
}

/// Collects bags in memory, in emission order
impl BagSink for Vec<Bag> {
    fn write(&mut self, bag: Bag) -> IngestResult<()> {
        self.push(bag);
        Ok(())
    }
}

impl<T: BagSink + ?Sized> BagSink for &mut T {
    fn write(&mut self, bag: Bag) -> IngestResult<()> {
        (**self).write(bag)
    }
}

/// Producer side of the ingestion queue
#[derive(Debug)]
pub struct BagWriter {
    sender: Sender<Bag>,
}

impl BagWriter {
    /// Signal that no more bags will be written
    pub fn close(self) {
        drop(self);
    }
}

impl BagSink for BagWriter {
    fn write(&mut self, bag: Bag) -> IngestResult<()> {
        self.sender.blocking_send(bag).map_err(|_| IngestError::Closed)
    }
}

/// Outcome of a finished ingestion
#[derive(Debug)]
pub struct IngestReport<S> {
    /// The store, handed back by the consumer
    pub store: S,
    /// Bags received
    pub bags: usize,
    /// Triples received (sum of bag sizes)
    pub triples: usize,
    /// Triples that were new to the store
    pub inserted: usize,
}

/// Consumer side of the ingestion queue
pub struct IngestHandle<S> {
    consumer: JoinHandle<IngestResult<IngestReport<S>>>,
    progress: Arc<AtomicUsize>,
}

impl<S> IngestHandle<S> {
    /// Triples consumed so far; informational only, may lag the producer
    pub fn progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    /// Wait for the consumer to drain the queue and return the store
    pub fn join(self) -> IngestResult<IngestReport<S>> {
        self.consumer
            .join()
            .map_err(|_| IngestError::ConsumerPanicked)?
    }
}

/// Start a consumer thread that drains a queue of `capacity` bags into `store`
pub fn spawn<S>(store: S, capacity: usize) -> IngestResult<(BagWriter, IngestHandle<S>)>
where
    S: TripleStore + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let progress = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&progress);

    let consumer = thread::Builder::new()
        .name("lubm-ingest".to_string())
        .spawn(move || consume(store, receiver, counter))?;

    Ok((BagWriter { sender }, IngestHandle { consumer, progress }))
}

fn consume<S: TripleStore>(
    mut store: S,
    mut receiver: Receiver<Bag>,
    progress: Arc<AtomicUsize>,
) -> IngestResult<IngestReport<S>> {
    debug!("Ingestion consumer started");

    let mut bags = 0;
    let mut triples = 0;
    let mut inserted = 0;

    while let Some(bag) = receiver.blocking_recv() {
        let size = bag.len();
        match store.add(bag) {
            Ok(n) => inserted += n,
            Err(e) => {
                warn!("Ingestion stopped after {} bags: {}", bags, e);
                receiver.close();
                return Err(e.into());
            }
        }
        bags += 1;
        triples += size;
        progress.fetch_add(size, Ordering::Relaxed);
    }

    info!("Ingested {} triples from {} bags", triples, bags);
    Ok(IngestReport {
        store,
        bags,
        triples,
        inserted,
    })
}
