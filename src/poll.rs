use std::future::pending;
use std::time::Duration;
use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use crate::config::Config;
use crate::data::FlowRecord;
use crate::decode::Decoder;
use crate::error::Error;
use crate::labels::Labels;
use crate::locate::Locator;
use crate::rank::{rank, Bound};
use crate::sink::Sink;
use crate::storage::Storage;
use crate::topology::Topology;

/// Result of one collection cycle that did not stop the poller.
#[derive(Debug)]
pub enum Outcome {
    Ranked {
        key:     String,
        records: Vec<FlowRecord>,
    },
    /// The bucket holds no objects.
    Empty,
    /// The newest object is not a flow-log batch.
    Skipped(String),
    /// The cycle was abandoned and will be retried next interval.
    Failed(Error),
}

/// Stop signal shared between the poller and whoever drives it.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

pub struct Trigger {
    tx: watch::Sender<bool>,
}

pub fn shutdown() -> (Trigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (Trigger { tx }, Shutdown { rx })
}

impl Trigger {
    pub fn fire(&self) {
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    pub fn is_set(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is requested, never if the trigger is
    /// dropped without firing.
    pub async fn wait(&mut self) {
        while !self.is_set() {
            if self.rx.changed().await.is_err() {
                pending::<()>().await;
            }
        }
    }
}

pub struct Poller<S, T> {
    storage:  S,
    topology: T,
    bucket:   String,
    limit:    usize,
    bound:    Bound,
    interval: Duration,
    timeout:  Duration,
    labels:   Labels,
    locator:  Locator,
    decoder:  Decoder,
    sink:     Sink,
}

impl<S: Storage, T: Topology> Poller<S, T> {
    pub fn new(storage: S, topology: T, config: &Config, sink: Sink) -> Self {
        Self {
            storage,
            topology,
            bucket:   config.bucket.clone(),
            limit:    config.limit,
            bound:    config.bound,
            interval: config.interval,
            timeout:  config.timeout,
            labels:   Labels::new(&config.vpc, config.refresh),
            locator:  Locator::new(config.max_age),
            decoder:  Decoder::new(config.substitution),
            sink,
        }
    }

    /// Collect, render, and sleep until shutdown or a fatal error.
    pub async fn run(&self, mut shutdown: Shutdown) -> Result<(), Error> {
        info!("polling {} every {:?}", self.bucket, self.interval);

        loop {
            let outcome = tokio::select! {
                outcome = self.cycle()    => outcome?,
                _       = shutdown.wait() => break,
            };

            match outcome {
                Outcome::Ranked { key, records } => {
                    debug!("ranked {} records from {}", records.len(), key);
                    if let Err(e) = self.sink.send(&records) {
                        error!("output failed: {:?}", e);
                    }
                }
                Outcome::Empty        => debug!("no batches in {}", self.bucket),
                Outcome::Skipped(key) => debug!("skipping {}", key),
                Outcome::Failed(e)    => warn!("{}", e),
            }

            tokio::select! {
                _ = sleep(self.interval) => (),
                _ = shutdown.wait()      => break,
            }
        }

        info!("stopped polling {}", self.bucket);

        Ok(())
    }

    /// Locate, fetch, decode, and rank the newest batch. Fatal errors
    /// are returned as `Err`, everything else as an `Outcome`.
    pub async fn cycle(&self) -> Result<Outcome, Error> {
        let batch = match self.locator.latest(&self.storage, &self.bucket).await? {
            Some(batch) => batch,
            None        => return Ok(Outcome::Empty),
        };

        if !batch.is_candidate() {
            return Ok(Outcome::Skipped(batch.key));
        }

        let fetch = self.storage.fetch(&self.bucket, &batch.key);
        let bytes = match timeout(self.timeout, fetch).await {
            Ok(Ok(bytes))              => bytes,
            Ok(Err(e)) if e.is_fatal() => return Err(e),
            Ok(Err(e))                 => return Ok(Outcome::Failed(e)),
            Err(_)                     => return Ok(Outcome::Failed(Error::Download {
                key:    batch.key.clone(),
                reason: format!("timed out after {:?}", self.timeout),
            })),
        };

        let labels = self.labels.get(&self.topology).await?;

        let records = match self.decoder.decode(&bytes, labels.as_deref()) {
            Ok(records) => records,
            Err(e)      => return Ok(Outcome::Failed(e)),
        };

        Ok(Outcome::Ranked {
            key:     batch.key,
            records: rank(records, self.limit, self.bound),
        })
    }
}
