//! Progress callbacks for the remeshing pipeline.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use voromesh::algo::Progress;
//!
//! let last = Arc::new(AtomicUsize::new(0));
//! let sink = Arc::clone(&last);
//! let progress = Progress::new(move |done, _total, _stage| {
//!     sink.store(done, Ordering::Relaxed);
//! });
//! progress.report(3, 4, "Remeshing components");
//! assert_eq!(last.load(Ordering::Relaxed), 3);
//! ```

/// Receives `(done, total, stage)` updates.
///
/// `done` counts finished steps, so `(0, total)` means "starting". Callbacks
/// are `Send + Sync` because parallel runs report from rayon workers.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Forward one update to the callback.
    #[inline]
    pub fn report(&self, done: usize, total: usize, stage: &str) {
        (self.callback)(done, total, stage);
    }

    /// Fraction of work finished for a `(done, total)` pair, in `[0, 1]`.
    ///
    /// An empty run counts as finished.
    pub fn fraction(done: usize, total: usize) -> f64 {
        if total == 0 {
            1.0
        } else {
            done.min(total) as f64 / total as f64
        }
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Progress(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_updates_reach_callback_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |d, t, s| sink.lock().unwrap().push((d, t, s.to_string())));
        progress.report(0, 2, "relax");
        progress.report(2, 2, "relax");
        Progress::default().report(1, 1, "dropped");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (2, 2, "relax".to_string()));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(Progress::fraction(1, 4), 0.25);
        assert_eq!(Progress::fraction(9, 4), 1.0);
        assert_eq!(Progress::fraction(0, 0), 1.0);
    }
}
