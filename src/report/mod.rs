pub mod metrics;
pub mod writer;

pub use metrics::PassMetrics;
pub use writer::write_visible_passes;
