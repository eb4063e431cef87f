pub mod filter;
pub mod pass;
pub mod predictor;
pub mod tracked;
pub mod transits;

pub use filter::{filter_valid, is_valid_pass, prune_visible};
pub use pass::{Pass, PassSample, Visibility};
pub use predictor::{Forecast, PassPredictor, SkippedObject};
pub use tracked::TrackedObject;
pub use transits::{predict_transits, CancellationToken, SearchOptions, TransitIter};
