//! Periodic job runner.
//!
//! Runs registered jobs on a fixed interval in its own task. The loop
//! listens for the stop signal between ticks, so an in-flight tick always
//! finishes before drain returns: work is neither lost nor duplicated.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::tasks::BackgroundSubsystem;

/// A named unit of periodic work.
#[derive(Clone)]
pub struct Job {
    name: &'static str,
    run: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
}

impl Job {
    pub fn new<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            run: Arc::new(move || Box::pin(f())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Interval scheduler over registered jobs.
pub struct JobRunner {
    interval: Duration,
    jobs: Vec<Job>,
    stop: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl JobRunner {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            jobs: Vec::new(),
            stop: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        }
    }

    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    async fn run_loop(interval: Duration, jobs: Vec<Job>, stop: Arc<Notify>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of tokio's interval fires immediately; consume it
        // so jobs first run one full interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                // Check the stop signal first so a pending tick never delays
                // shutdown once draining has begun.
                biased;
                _ = stop.notified() => {
                    tracing::info!("job runner stopping");
                    break;
                }
                _ = ticker.tick() => {
                    for job in &jobs {
                        tracing::debug!(job = job.name, "running periodic job");
                        (job.run)().await;
                    }
                }
            }
        }
    }

    async fn drain_inner(&self) {
        self.stop.notify_one();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "job runner task failed during drain");
            }
        }
    }
}

impl BackgroundSubsystem for JobRunner {
    fn name(&self) -> &'static str {
        "job-runner"
    }

    fn start(&self) {
        let mut slot = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            return;
        }

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            jobs = self.jobs.len(),
            "job runner starting"
        );
        let interval = self.interval;
        let jobs = self.jobs.clone();
        let stop = self.stop.clone();
        *slot = Some(tokio::spawn(Self::run_loop(interval, jobs, stop)));
    }

    fn drain(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.drain_inner())
    }
}
