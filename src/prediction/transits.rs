use super::pass::{bisect, Pass};
use super::tracked::TrackedObject;
use crate::errors::PredictionError;
use crate::models::ObserverLocation;
use hifitime::{Duration, Epoch};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

/// Shared stop signal for long transit searches: an explicit flag plus an optional
/// wall-clock deadline. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), PredictionError> {
        if self.is_cancelled() {
            return Err(PredictionError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(PredictionError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Transit search tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Coarse step of the horizon-crossing scan [s]. Passes shorter than one step can
    /// fall between samples.
    pub step_s: f64,
    /// Longest pass the search follows before cutting it off [s].
    pub max_pass_s: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            step_s: 10.0,
            max_pass_s: 6.0 * 3600.0,
        }
    }
}

/// Lazily finds successive passes of one object over one observer.
///
/// Yields passes that overlap `[horizon_start, horizon_end]`: a pass already under
/// way at `horizon_start` is traced back to its rise. Once the search is exhausted,
/// fails or is cancelled, every further call returns `None`.
pub struct TransitIter {
    object: Arc<TrackedObject>,
    observer: ObserverLocation,
    cursor: Epoch,
    horizon_end: Epoch,
    options: SearchOptions,
    token: CancellationToken,
    first: bool,
    done: bool,
}

pub fn predict_transits(
    object: Arc<TrackedObject>,
    observer: ObserverLocation,
    horizon_start: Epoch,
    horizon_end: Epoch,
    options: SearchOptions,
    token: CancellationToken,
) -> TransitIter {
    TransitIter {
        object,
        observer,
        cursor: horizon_start,
        horizon_end,
        options,
        token,
        first: true,
        done: false,
    }
}

impl TransitIter {
    fn elevation(&self, epoch: Epoch) -> Result<f64, PredictionError> {
        self.object.elevation(&self.observer, epoch)
    }

    fn step(&self) -> Duration {
        Duration::from_seconds(self.options.step_s)
    }

    /// Epoch of the boundary between `below` (under the horizon) and `above`.
    fn crossing(&self, below: Epoch, above: Epoch) -> Result<Epoch, PredictionError> {
        let span = (above - below).to_seconds();
        let mut up = |t: f64| -> Result<bool, PredictionError> {
            Ok(self.elevation(below + Duration::from_seconds(t))? > 0.0)
        };
        Ok(below + Duration::from_seconds(bisect(0.0, span, &mut up)?))
    }

    /// Finds the next rise at or after the cursor, or `None` past the horizon.
    fn next_rise(&mut self) -> Result<Option<Epoch>, PredictionError> {
        if self.options.step_s <= 0.0 || !self.options.step_s.is_finite() {
            return Ok(None);
        }
        if std::mem::take(&mut self.first) && self.elevation(self.cursor)? > 0.0 {
            return self.trace_back_rise(self.cursor).map(Some);
        }

        let mut previous = self.cursor;
        while previous < self.horizon_end {
            self.token.check()?;
            let t = previous + self.step();
            if self.elevation(t)? > 0.0 {
                return self.crossing(previous, t).map(Some);
            }
            previous = t;
        }
        Ok(None)
    }

    fn trace_back_rise(&self, above: Epoch) -> Result<Epoch, PredictionError> {
        let limit = above - Duration::from_seconds(self.options.max_pass_s);
        let mut later = above;
        while later > limit {
            self.token.check()?;
            let earlier = later - self.step();
            if self.elevation(earlier)? <= 0.0 {
                return self.crossing(earlier, later);
            }
            later = earlier;
        }
        Ok(limit)
    }

    fn find_set(&self, rise: Epoch) -> Result<Epoch, PredictionError> {
        let limit = rise + Duration::from_seconds(self.options.max_pass_s);
        let mut earlier = rise;
        while earlier < limit {
            self.token.check()?;
            let later = earlier + self.step();
            if self.elevation(later)? <= 0.0 {
                // Same boundary search with the time axis reversed
                let span = (later - earlier).to_seconds();
                let mut up = |t: f64| -> Result<bool, PredictionError> {
                    Ok(self.elevation(earlier + Duration::from_seconds(t))? > 0.0)
                };
                return Ok(earlier + Duration::from_seconds(bisect(span, 0.0, &mut up)?));
            }
            earlier = later;
        }
        Ok(limit)
    }

    fn search(&mut self) -> Result<Option<Pass>, PredictionError> {
        self.token.check()?;
        let Some(rise) = self.next_rise()? else {
            return Ok(None);
        };
        if rise >= self.horizon_end {
            return Ok(None);
        }
        let set = self.find_set(rise)?;
        self.cursor = set + self.step();
        trace!(object = self.object.name(), %rise, %set, "transit found");
        Ok(Some(Pass::new(self.object.clone(), self.observer, rise, set)))
    }
}

impl Iterator for TransitIter {
    type Item = Result<Pass, PredictionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.search() {
            Ok(Some(pass)) => Some(Ok(pass)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for TransitIter {}
