//! Background execution of engine operations with an event stream back to
//! the caller.

use crate::crypto::exponent::Exponent;
use crate::engine::ArchiveCryptoEngine;
use crate::error::Result;
use crate::events::{Event, StatusSink};
use crate::repo::RecordReader;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Clone, Debug)]
pub enum Job {
    Encrypt {
        source: PathBuf,
        record: String,
        exponent: Option<Exponent>,
    },
    Decrypt {
        archive: PathBuf,
        record: String,
    },
    GenerateKey {
        record: String,
        exponent: Option<Exponent>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct TaskRunner {
    engine: Arc<ArchiveCryptoEngine>,
    records: Arc<dyn RecordReader>,
}

impl TaskRunner {
    pub fn new(engine: Arc<ArchiveCryptoEngine>, records: Arc<dyn RecordReader>) -> Self {
        Self { engine, records }
    }

    /// Start `job` on the blocking pool. Must be called inside a Tokio runtime.
    /// The returned handle yields status events and exactly one
    /// [`Event::Finished`].
    pub fn spawn(&self, job: Job) -> TaskHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::clone(&self.engine);
        let records = Arc::clone(&self.records);
        let join = tokio::task::spawn_blocking(move || {
            let mut sink = tx;
            let finished = match run_job(&engine, records.as_ref(), job, &mut sink) {
                Ok(message) => Event::Finished {
                    success: true,
                    message,
                },
                Err(e) => {
                    error!(error = %e, "task failed");
                    Event::Finished {
                        success: false,
                        message: e.to_string(),
                    }
                }
            };
            sink.emit(finished);
        });
        TaskHandle {
            events: rx,
            join: Some(join),
            outcome: None,
        }
    }
}

fn run_job(
    engine: &ArchiveCryptoEngine,
    records: &dyn RecordReader,
    job: Job,
    sink: &mut dyn StatusSink,
) -> Result<String> {
    debug!(?job, "running job");
    match job {
        Job::Encrypt {
            source,
            record,
            exponent,
        } => {
            sink.emit(Event::Status(format!("loading parameter record {record}")));
            let record = records.read(&record)?;
            Ok(engine.encrypt(&source, &record, exponent, sink)?.message())
        }
        Job::Decrypt { archive, record } => {
            sink.emit(Event::Status(format!("loading parameter record {record}")));
            let record = records.read(&record)?;
            Ok(engine.decrypt(&archive, &record, sink)?.message())
        }
        Job::GenerateKey { record, exponent } => {
            let record = records.read(&record)?;
            let report = engine.generate_key(&record, exponent, sink)?;
            Ok(format!("generated a {}-digit key", report.key.len()))
        }
    }
}

pub struct TaskHandle {
    events: UnboundedReceiver<Event>,
    join: Option<JoinHandle<()>>,
    outcome: Option<Outcome>,
}

impl TaskHandle {
    /// Next event, or `None` once the task is gone and the stream drained.
    pub async fn recv(&mut self) -> Option<Event> {
        let event = self.events.recv().await?;
        if let Event::Finished { success, message } = &event {
            self.outcome = Some(Outcome {
                success: *success,
                message: message.clone(),
            });
        }
        Some(event)
    }

    /// Drain the remaining events and wait for the task to exit.
    pub async fn finish(mut self) -> Outcome {
        while self.recv().await.is_some() {}
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                error!(error = %e, "task aborted");
                return Outcome {
                    success: false,
                    message: format!("task aborted: {e}"),
                };
            }
        }
        self.outcome.unwrap_or_else(|| Outcome {
            success: false,
            message: "task ended without reporting a result".to_string(),
        })
    }
}
