//! Native image detection from the build plan

use crate::buildpack::BuildPlan;
use serde_json::Value;

pub const PLAN_ENTRY_NAME: &str = "spring-boot";
pub const NATIVE_IMAGE_KEY: &str = "native-image";

/// Whether the plan asks for a native image build.
pub fn execute(plan: &BuildPlan) -> bool {
    plan.entries_named(PLAN_ENTRY_NAME)
        .filter_map(|entry| entry.metadata.get(NATIVE_IMAGE_KEY))
        .any(is_true)
}

fn is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
