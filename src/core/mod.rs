// Core algorithm exports
pub mod distance;
pub mod engine;
pub mod family;
pub mod preview;
pub mod requirements;
pub mod worklist;

pub use distance::{bounding_box, haversine_distance, within_bounding_box};
pub use engine::{Clusterer, EngineError, NoopObserver, RunObserver, RunOutcome};
pub use family::extract_family_units;
pub use preview::{run_preview, PreviewOutcome};
pub use requirements::meets_requirements;
pub use worklist::Worklist;
