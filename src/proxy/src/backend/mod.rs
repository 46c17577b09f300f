pub mod router;

use std::sync::atomic::{AtomicUsize, Ordering};

use gateway_common::AppError;

/// Directory of backend Executor URLs, loaded once from discovery files and
/// held for the process lifetime (spec §3). The round-robin cursor is the
/// only mutable field and is updated with a single atomic counter — the
/// generalisation of the teacher's `Mutex<StdRng>`-guarded
/// `RandomBalancer` to the lock-free counter spec §5 requires.
pub struct BackendDirectory {
    pub primary: String,
    pub replicas: Vec<String>,
    cursor: AtomicUsize,
}

impl BackendDirectory {
    pub fn new(primary: String, replicas: Vec<String>) -> Result<Self, AppError> {
        if replicas.is_empty() {
            return Err(AppError::Config("at least one replica is required".to_string()));
        }
        if replicas.contains(&primary) {
            return Err(AppError::Config(
                "primary must not also appear in the replica list".to_string(),
            ));
        }
        Ok(Self {
            primary,
            replicas,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Returns the current cursor target and advances it atomically.
    /// `fetch_add` under `Relaxed` ordering is all that's needed: the
    /// cursor has no other memory it must stay ordered with, only the
    /// fairness property of spec §5 (replica i selected `⌊N/R⌋ ± 1`
    /// times under concurrency).
    pub fn next_round_robin(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
        &self.replicas[idx]
    }
}

/// Strips `http://`/`https://` and any trailing `:port` so provenance
/// strings read as a bare host, matching the original `target_url.split("//")[1].split(":")[0]`.
pub fn host_of(url: &str) -> &str {
    let without_scheme = url.split("//").nth(1).unwrap_or(url);
    without_scheme.split(':').next().unwrap_or(without_scheme)
}
