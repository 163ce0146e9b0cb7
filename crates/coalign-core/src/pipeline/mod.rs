pub mod config;
mod run;

pub use config::AlignConfig;
pub use run::{align_sequence, elapsed_minutes, rotation_angles, AlignmentOutput};
