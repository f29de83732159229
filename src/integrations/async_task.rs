use crate::error::CloudError;

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

/// Write side of a task's percent-complete indicator.
#[derive(Clone)]
pub struct ProgressReporter {
    sender: Arc<watch::Sender<f64>>,
}

impl ProgressReporter {
    pub fn set_percent_complete(&self, percent: f64) {
        self.sender.send_replace(percent.clamp(0.0, 100.0));
    }
}

/// Handle to a long-running provider operation running on its own tokio task.
///
/// The caller owns waiting: poll [`AsyncTask::percent_complete`] or await
/// [`AsyncTask::result`]. Dropping the handle detaches the task.
pub struct AsyncTask<T> {
    progress: watch::Receiver<f64>,
    handle: JoinHandle<Result<T, CloudError>>,
    started_at: DateTime<Utc>,
}

impl<T: Send + 'static> AsyncTask<T> {
    /// Spawns `work` on the runtime. When `deadline` elapses first the task
    /// completes with [`CloudError::Timeout`].
    pub fn spawn<F, Fut>(deadline: Option<Duration>, work: F) -> Self
    where
        F: FnOnce(ProgressReporter) -> Fut,
        Fut: Future<Output = Result<T, CloudError>> + Send + 'static,
    {
        let (sender, progress) = watch::channel(0.0);
        let reporter = ProgressReporter {
            sender: Arc::new(sender),
        };
        let finisher = reporter.clone();
        let work = work(reporter);

        let handle = tokio::spawn(async move {
            let result = match deadline {
                Some(deadline) => match tokio::time::timeout(deadline, work).await {
                    Ok(result) => result,
                    Err(_) => Err(CloudError::Timeout(deadline)),
                },
                None => work.await,
            };

            if result.is_ok() {
                finisher.set_percent_complete(100.0);
            }
            result
        });

        Self {
            progress,
            handle,
            started_at: Utc::now(),
        }
    }
}

impl<T> AsyncTask<T> {
    pub fn percent_complete(&self) -> f64 {
        *self.progress.borrow()
    }

    pub fn is_complete(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Requests cancellation; the task stops at its next suspension point.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Waits for the next progress update. Returns `false` once the task is gone.
    pub async fn changed(&mut self) -> bool {
        self.progress.changed().await.is_ok()
    }

    pub async fn result(self) -> Result<T, CloudError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(CloudError::Cancelled),
            Err(e) => {
                error!("{:?}", e);
                Err(CloudError::Internal(format!("background task failed: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_task_reaches_full_progress() {
        let task = AsyncTask::spawn(None, |progress| async move {
            progress.set_percent_complete(2.0);
            Ok("image-1".to_string())
        });

        let started_at = task.started_at();
        assert!(started_at <= Utc::now());
        assert_eq!(task.result().await.unwrap(), "image-1");
    }

    #[tokio::test]
    async fn test_progress_is_observable() {
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let mut task = AsyncTask::spawn(None, |progress| async move {
            progress.set_percent_complete(2.0);
            let _ = release_rx.await;
            Ok(())
        });

        assert!(task.changed().await);
        assert_eq!(task.percent_complete(), 2.0);
        assert!(!task.is_complete());

        release_tx.send(()).unwrap();
        while task.changed().await {}
        assert_eq!(task.percent_complete(), 100.0);
        assert!(task.result().await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_is_captured_in_result() {
        let task: AsyncTask<String> = AsyncTask::spawn(None, |_| async move {
            Err(CloudError::Http("connection reset".to_string()))
        });

        assert!(matches!(task.result().await, Err(CloudError::Http(_))));
    }

    #[tokio::test]
    async fn test_deadline_maps_to_timeout() {
        let task: AsyncTask<()> = AsyncTask::spawn(Some(Duration::from_millis(20)), |_| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        });

        match task.result().await {
            Err(CloudError::Timeout(deadline)) => assert_eq!(deadline, Duration::from_millis(20)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_maps_to_cancelled() {
        let task: AsyncTask<()> =
            AsyncTask::spawn(None, |_| async move { std::future::pending().await });

        task.cancel();
        assert!(matches!(task.result().await, Err(CloudError::Cancelled)));
    }

    #[tokio::test]
    async fn test_panic_maps_to_internal() {
        let task: AsyncTask<()> = AsyncTask::spawn(None, |_| async move {
            let explode = true;
            if explode {
                panic!("boom");
            }
            Ok(())
        });

        assert!(matches!(task.result().await, Err(CloudError::Internal(_))));
    }
}
