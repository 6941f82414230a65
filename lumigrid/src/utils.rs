mod bounding_box;
#[cfg(feature = "metrics")]
mod metrics;

pub use self::bounding_box::*;
#[cfg(feature = "metrics")]
pub use self::metrics::*;
