pub mod image_io;
pub mod manifest;
pub mod source;
pub mod store;

pub use manifest::{FrameManifest, ImageFrameSet, ManifestEntry};
pub use source::{FrameSource, HeaderSource};
pub use store::{JsonTrajectoryStore, TrajectoryStore};
