use super::tracked::TrackedObject;
use crate::errors::PredictionError;
use crate::models::{ObserverLocation, SkySample, Trajectory};
use crate::physics::sample_epochs;
use hifitime::{Duration, Epoch};
use nalgebra as na;
use std::fmt;
use std::sync::Arc;

/// Grid used by [`Pass::prune`] before the boundaries are bisected [s].
const PRUNE_GRID_S: f64 = 1.0;
/// Bracket width at which a boundary search stops [s].
const BOUNDARY_TOLERANCE_S: f64 = 1e-3;
const PEAK_TOLERANCE_S: f64 = 0.05;
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Optical condition of a satellite as seen from the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Sunlit satellite against a dark sky.
    Visible,
    /// Sunlit, but the sky is too bright.
    Daylight,
    /// In the Earth's shadow.
    Eclipsed,
}

impl Visibility {
    pub fn code(&self) -> char {
        match self {
            Visibility::Visible => 'V',
            Visibility::Daylight => 'D',
            Visibility::Eclipsed => 'N',
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Look angles of a catalog object at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSample {
    pub epoch: Epoch,
    pub azimuth: f64,
    pub elevation: f64,
    pub range_km: f64,
    pub visibility: Visibility,
    pub position: na::Vector3<f64>, // ECI [km]
}

/// One contiguous interval during which an object is of interest to an observer:
/// above the horizon as found by the transit search, or a pruned part of that.
#[derive(Debug, Clone)]
pub struct Pass {
    object: Arc<TrackedObject>,
    observer: ObserverLocation,
    start: Epoch,
    end: Epoch,
}

impl Pass {
    pub(crate) fn new(object: Arc<TrackedObject>, observer: ObserverLocation, start: Epoch, end: Epoch) -> Self {
        Self {
            object,
            observer,
            start,
            end,
        }
    }

    pub fn object(&self) -> &TrackedObject {
        &self.object
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }

    pub fn observer(&self) -> &ObserverLocation {
        &self.observer
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn duration_s(&self) -> f64 {
        (self.end - self.start).to_seconds()
    }

    pub fn at(&self, epoch: Epoch) -> Result<PassSample, PredictionError> {
        self.object.look(&self.observer, epoch)
    }

    /// Sample of maximum elevation within the pass, refined by golden-section search.
    pub fn peak(&self) -> Result<PassSample, PredictionError> {
        let elevation = |t: f64| self.object.elevation(&self.observer, self.epoch_at(t));
        let (mut a, mut b) = (0.0, self.duration_s());
        let mut c = b - INV_PHI * (b - a);
        let mut d = a + INV_PHI * (b - a);
        let mut fc = elevation(c)?;
        let mut fd = elevation(d)?;
        while b - a > PEAK_TOLERANCE_S {
            if fc > fd {
                b = d;
                d = c;
                fd = fc;
                c = b - INV_PHI * (b - a);
                fc = elevation(c)?;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + INV_PHI * (b - a);
                fd = elevation(d)?;
            }
        }
        self.at(self.epoch_at((a + b) / 2.0))
    }

    /// The first contiguous part of the pass where `predicate` holds, or `None` if it
    /// never does.
    ///
    /// The pass is scanned on a one-second grid and the edges of the first satisfying
    /// run are bisected. Excursions shorter than the grid step can be missed.
    pub fn prune<F>(&self, mut predicate: F) -> Result<Option<Pass>, PredictionError>
    where
        F: FnMut(&PassSample) -> bool,
    {
        let duration = self.duration_s();
        let steps = (duration / PRUNE_GRID_S).ceil().max(0.0) as usize;
        let offsets: Vec<f64> = (0..=steps)
            .map(|k| (k as f64 * PRUNE_GRID_S).min(duration))
            .collect();

        let mut holds = |t: f64| -> Result<bool, PredictionError> { Ok(predicate(&self.at(self.epoch_at(t))?)) };

        let mut first = None;
        for (k, &t) in offsets.iter().enumerate() {
            if holds(t)? {
                first = Some(k);
                break;
            }
        }
        let Some(first) = first else {
            return Ok(None);
        };

        let mut last = first;
        while last + 1 < offsets.len() && holds(offsets[last + 1])? {
            last += 1;
        }

        let start = if first == 0 {
            self.start
        } else {
            self.epoch_at(bisect(offsets[first - 1], offsets[first], &mut holds)?)
        };
        let end = if last + 1 == offsets.len() {
            self.end
        } else {
            // Reversed bracket: holds at the left end, fails at the right
            self.epoch_at(bisect(offsets[last + 1], offsets[last], &mut holds)?)
        };

        Ok(Some(Self::new(self.object.clone(), self.observer, start, end)))
    }

    /// The part of the pass inside `[start, end]`.
    pub fn clip(&self, start: Epoch, end: Epoch) -> Option<Pass> {
        let clipped_start = if start > self.start { start } else { self.start };
        let clipped_end = if end < self.end { end } else { self.end };
        if clipped_end < clipped_start {
            return None;
        }
        Some(Self::new(self.object.clone(), self.observer, clipped_start, clipped_end))
    }

    /// Sky track of the pass at a fixed cadence, in the form the interference
    /// detector consumes.
    pub fn trajectory(&self, cadence_s: f64) -> Result<Trajectory, PredictionError> {
        let epochs = sample_epochs(self.start, self.duration_s(), cadence_s).map_err(|e| {
            PredictionError::Propagation {
                name: self.name().to_string(),
                reason: e.to_string(),
            }
        })?;
        let mut trajectory = Trajectory::default();
        for epoch in epochs {
            let position = self.object.position_at(epoch)?;
            trajectory.push(SkySample::from_eci(&position, &self.observer, epoch));
        }
        Ok(trajectory)
    }

    fn epoch_at(&self, offset_s: f64) -> Epoch {
        self.start + Duration::from_seconds(offset_s)
    }
}

/// Narrows a bracket where `holds(outside)` is false and `holds(inside)` is true
/// down to the boundary; returns the satisfying side.
pub(crate) fn bisect<F>(mut outside: f64, mut inside: f64, holds: &mut F) -> Result<f64, PredictionError>
where
    F: FnMut(f64) -> Result<bool, PredictionError>,
{
    while (inside - outside).abs() > BOUNDARY_TOLERANCE_S {
        let mid = 0.5 * (outside + inside);
        if holds(mid)? {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    Ok(inside)
}
