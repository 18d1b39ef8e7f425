pub mod orchestrator;
pub mod phases;

pub use orchestrator::SpringBootBuild;
pub use phases::layers::LayerPlan;
