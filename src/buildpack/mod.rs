//! Inputs handed over by the lifecycle and the declarative result returned to it

pub mod context;
pub mod resolver;
pub mod result;

pub use context::{BuildContext, BuildPlan, BuildPlanEntry, BuildpackDependency, BuildpackDescriptor};
pub use resolver::{DependencyResolver, VersionConstraint};
pub use result::{BomEntry, BuildResult, Label, Layer, LayerContribution, Slice};
