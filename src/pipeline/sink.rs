//! Collector for failures reported by every pipeline stage

use crate::error::RegistryError;
use crate::model::{Level, Message};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cloneable handle stages use to report failures
#[derive(Clone)]
pub struct ErrorReporter {
    tx: mpsc::UnboundedSender<Message>,
}

impl ErrorReporter {
    pub fn report(&self, err: &RegistryError) {
        self.report_with(Level::Danger, err);
    }

    pub fn report_with(&self, level: Level, err: &RegistryError) {
        self.send(Message::new(level, err.to_string()));
    }

    pub fn send(&self, message: Message) {
        let _ = self.tx.send(message);
    }
}

/// Single consumer that owns the message list for one request
pub struct ErrorSink {
    reporter: ErrorReporter,
    consumer: JoinHandle<Vec<Message>>,
}

impl ErrorSink {
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        let consumer = tokio::spawn(async move {
            let mut messages = Vec::new();
            while let Some(message) = rx.recv().await {
                match message.level {
                    Level::Danger => tracing::warn!("{}", message.message),
                    Level::Info => tracing::info!("{}", message.message),
                }
                messages.push(message);
            }
            messages
        });

        Self {
            reporter: ErrorReporter { tx },
            consumer,
        }
    }

    pub fn reporter(&self) -> ErrorReporter {
        self.reporter.clone()
    }

    /// Wait for every reporter to be dropped and return the drained messages.
    ///
    /// Reporters still held by live tasks keep this pending.
    pub async fn finish(self) -> Vec<Message> {
        drop(self.reporter);
        match self.consumer.await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::error!("error sink consumer failed: {}", err);
                vec![Message::danger(format!("error collection failed: {}", err))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_messages_from_all_reporters() {
        let sink = ErrorSink::spawn();
        let reporters: Vec<_> = (0..4).map(|_| sink.reporter()).collect();

        let tasks: Vec<_> = reporters
            .into_iter()
            .enumerate()
            .map(|(i, reporter)| {
                tokio::spawn(async move {
                    reporter.report(&RegistryError::Network(format!("worker {}", i)));
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let messages = sink.finish().await;
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|m| m.level == Level::Danger));
        assert!(messages.iter().any(|m| m.message == "Network error: worker 2"));
    }
}
