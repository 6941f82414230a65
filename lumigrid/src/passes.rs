mod blend;
mod compute;
mod generate_probes;
mod probe_irradiance;
mod probe_radiance;
mod probe_trace;
mod visualize_probes;

pub use self::blend::*;
pub use self::compute::*;
pub use self::generate_probes::*;
pub use self::probe_irradiance::*;
pub use self::probe_radiance::*;
pub use self::probe_trace::*;
pub use self::visualize_probes::*;
