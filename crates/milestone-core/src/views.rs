//! Fire-and-forget view counting.
//!
//! Request handlers call [`ViewCounter::bump`] and move on. A worker task
//! drains the queue and runs each increment on its own task, so a slow
//! backend never delays a response or another increment. Results are
//! published on a broadcast channel for anyone who cares to listen.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::backend::AlbumBackend;

/// Outcomes buffered for slow subscribers before they start lagging.
const OUTCOME_CAPACITY: usize = 64;

/// The result of one increment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
  Counted { album_id: String },
  Failed { album_id: String, error: String },
}

impl BumpOutcome {
  pub fn album_id(&self) -> &str {
    match self {
      Self::Counted { album_id } | Self::Failed { album_id, .. } => album_id,
    }
  }
}

/// Handle to the view counter queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ViewCounter {
  queue:    mpsc::UnboundedSender<String>,
  outcomes: broadcast::Sender<BumpOutcome>,
}

impl ViewCounter {
  /// Start the worker on the current tokio runtime.
  pub fn spawn<B>(backend: Arc<B>) -> Self
  where
    B: AlbumBackend + 'static,
  {
    let (queue, mut rx) = mpsc::unbounded_channel::<String>();
    let (outcomes, _) = broadcast::channel(OUTCOME_CAPACITY);

    let publisher = outcomes.clone();
    tokio::spawn(async move {
      while let Some(album_id) = rx.recv().await {
        let backend = backend.clone();
        let publisher = publisher.clone();
        tokio::spawn(async move {
          let outcome = match backend.increment_view_count(&album_id).await {
            Ok(()) => {
              tracing::debug!(album_id = %album_id, "view counted");
              BumpOutcome::Counted { album_id }
            }
            Err(e) => {
              tracing::warn!(
                album_id = %album_id,
                error = %e,
                "failed to increment view count"
              );
              BumpOutcome::Failed {
                album_id,
                error: e.to_string(),
              }
            }
          };
          // No subscribers is the normal case.
          publisher.send(outcome).ok();
        });
      }
    });

    Self { queue, outcomes }
  }

  /// Enqueue an increment for `album_id` without waiting for it.
  pub fn bump(&self, album_id: impl Into<String>) {
    if let Err(e) = self.queue.send(album_id.into()) {
      tracing::warn!(album_id = %e.0, "view counter queue is closed");
    }
  }

  /// Observe the outcome of every increment enqueued after this call.
  pub fn subscribe(&self) -> broadcast::Receiver<BumpOutcome> {
    self.outcomes.subscribe()
  }
}
