mod aligner;
mod step;

pub use aligner::SequentialAligner;
pub use step::StepPass;
