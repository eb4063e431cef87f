pub mod settings;
pub mod site;

pub use settings::Settings;
pub use site::{LongitudeConvention, Site, DEFAULT_SITES};
