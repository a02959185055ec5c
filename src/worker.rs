use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn, Level};

use crate::config::{match_url, Config};
use crate::error::{AppError, Result};
use crate::extract::extract_record;
use crate::session::{PageSession, SessionFactory};
use crate::store::CsvStore;
use crate::types::{MatchId, MatchRecord};

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub workers: usize,
    /// Today's matches: final score and game state are not read.
    pub is_live: bool,
    pub match_url_base: String,
    pub pacing_min_secs: f64,
    pub pacing_max_secs: f64,
}

impl PoolSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            workers: cfg.workers,
            is_live: cfg.mode.is_live(),
            match_url_base: cfg.match_url_base.clone(),
            pacing_min_secs: cfg.pacing_min_secs,
            pacing_max_secs: cfg.pacing_max_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub saved: usize,
    pub failed: usize,
}

/// Shared by every worker; each lock yields exactly one ID.
type IdSource = Box<dyn Iterator<Item = MatchId> + Send>;

#[derive(Debug, Default)]
struct Counters {
    attempted: AtomicUsize,
    saved: AtomicUsize,
    failed: AtomicUsize,
}

/// Uniform random wait in `[min, max)` seconds taken before every fetch.
pub fn pacing_delay(min_secs: f64, max_secs: f64) -> Duration {
    if max_secs <= min_secs {
        return Duration::from_secs_f64(min_secs.max(0.0));
    }
    Duration::from_secs_f64(rand::thread_rng().gen_range(min_secs..max_secs))
}

/// Fixed-size pool of workers. Each takes one match ID, runs it to completion,
/// then takes the next. A failed match is logged and dropped; it never stops
/// the other workers.
pub struct WorkerPool<F: SessionFactory> {
    settings: Arc<PoolSettings>,
    factory: Arc<F>,
    store: Arc<CsvStore>,
}

impl<F: SessionFactory> WorkerPool<F> {
    pub fn new(settings: PoolSettings, factory: F, store: Arc<CsvStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            factory: Arc::new(factory),
            store,
        }
    }

    /// Drain `ids` across the workers. The source is pulled one ID at a time, so a
    /// range of any width costs no memory up front.
    pub async fn run<I>(self, ids: I) -> RunSummary
    where
        I: IntoIterator<Item = MatchId>,
        I::IntoIter: Send + 'static,
    {
        let mut ids = ids.into_iter().peekable();
        if ids.peek().is_none() {
            info!("[POOL] nothing to do");
            return RunSummary::default();
        }

        let worker_count = match ids.size_hint().1 {
            Some(upper) => self.settings.workers.clamp(1, upper),
            None => self.settings.workers.max(1),
        };
        let queue: Arc<Mutex<IdSource>> = Arc::new(Mutex::new(Box::new(ids)));
        let counters = Arc::new(Counters::default());
        info!("[POOL] starting {worker_count} workers");

        let mut handles = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let worker = Worker {
                index,
                settings: Arc::clone(&self.settings),
                factory: Arc::clone(&self.factory),
                store: Arc::clone(&self.store),
                queue: Arc::clone(&queue),
                counters: Arc::clone(&counters),
            };
            handles.push(tokio::spawn(worker.run()));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("[POOL] worker task ended abnormally: {e}");
            }
        }

        RunSummary {
            attempted: counters.attempted.load(Ordering::Relaxed),
            saved: counters.saved.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
        }
    }
}

struct Worker<F: SessionFactory> {
    index: usize,
    settings: Arc<PoolSettings>,
    factory: Arc<F>,
    store: Arc<CsvStore>,
    queue: Arc<Mutex<IdSource>>,
    counters: Arc<Counters>,
}

impl<F: SessionFactory> Worker<F> {
    async fn run(self) {
        loop {
            let next = self.queue.lock().await.next();
            let Some(id) = next else { break };

            self.counters.attempted.fetch_add(1, Ordering::Relaxed);
            match self.process(id).await {
                Ok(rows) => {
                    self.counters.saved.fetch_add(1, Ordering::Relaxed);
                    info!(match_id = id, worker = self.index, rows, "match saved");
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    log_failure(id, self.index, &e);
                }
            }
        }
        debug!(worker = self.index, "queue drained, worker done");
    }

    /// Pace, fetch, extract, append. Returns the store's row count.
    async fn process(&self, id: MatchId) -> Result<usize> {
        let delay = pacing_delay(self.settings.pacing_min_secs, self.settings.pacing_max_secs);
        tokio::time::sleep(delay).await;

        let url = match_url(&self.settings.match_url_base, id);
        info!(match_id = id, worker = self.index, %url, "fetching match");

        let mut session = self.factory.open().await?;
        let extracted = match session.navigate(&url).await {
            Ok(()) => extract_record(&mut session, id, self.settings.is_live).await,
            Err(e) => Err(e),
        };
        session.close().await;
        let record = extracted?;

        if let Some(json) = debug_dump(&record) {
            debug!(match_id = id, record = %json, "record extracted");
        }
        self.store.append(&record).await
    }
}

/// JSON form of `record` for the debug log. Not built unless debug is enabled.
fn debug_dump(record: &MatchRecord) -> Option<String> {
    if !tracing::enabled!(Level::DEBUG) {
        return None;
    }
    serde_json::to_string(record).ok()
}

fn log_failure(id: MatchId, worker: usize, e: &AppError) {
    match e {
        AppError::StructureMissing { .. } => {
            info!(match_id = id, worker, error = %e, "match skipped: league lacks full statistics")
        }
        _ => warn!(match_id = id, worker, error = %e, "match dropped"),
    }
}
