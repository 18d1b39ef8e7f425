use super::context::BuildpackDependency;
use semver::{Version, VersionReq};
use std::cmp::Ordering;
use tracing::debug;

pub const ANY_VERSION: &str = "*";

/// Version selector for a buildpack dependency.
///
/// `*` matches everything. A full version (`1.2.3`) must match exactly and
/// any other semver requirement (`1.*`, `>=1.1, <2`) is evaluated as such.
/// Versions that are not semver fall back to a trailing-`*` prefix match or
/// string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint(String);

impl VersionConstraint {
    pub fn new(constraint: impl Into<String>) -> Self {
        Self(constraint.into())
    }

    pub fn any() -> Self {
        Self(ANY_VERSION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, version: &str) -> bool {
        let constraint = self.0.trim();
        if constraint == ANY_VERSION {
            return true;
        }

        if let Ok(candidate) = Version::parse(version.trim()) {
            if let Ok(exact) = Version::parse(constraint) {
                return exact == candidate;
            }
            if let Ok(requirement) = VersionReq::parse(constraint) {
                return requirement.matches(&candidate);
            }
        }

        match constraint.strip_suffix('*') {
            Some(prefix) => version.starts_with(prefix),
            None => constraint == version,
        }
    }
}

impl Default for VersionConstraint {
    fn default() -> Self {
        Self::any()
    }
}

/// Picks buildpack dependencies applicable to the current stack.
pub struct DependencyResolver<'a> {
    dependencies: &'a [BuildpackDependency],
    stack_id: &'a str,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(dependencies: &'a [BuildpackDependency], stack_id: &'a str) -> Self {
        Self {
            dependencies,
            stack_id,
        }
    }

    /// Highest matching version of `id` for the stack, if any.
    pub fn resolve(
        &self,
        id: &str,
        constraint: &VersionConstraint,
    ) -> Option<&'a BuildpackDependency> {
        let resolved = self
            .dependencies
            .iter()
            .filter(|d| d.id == id)
            .filter(|d| d.supports_stack(self.stack_id))
            .filter(|d| constraint.matches(&d.version))
            .max_by(|a, b| compare_versions(&a.version, &b.version));

        debug!(
            id,
            stack = self.stack_id,
            constraint = constraint.as_str(),
            version = resolved.map(|d| d.version.as_str()),
            "Resolved buildpack dependency"
        );
        resolved
    }
}

/// Order two dependency versions.
///
/// Semver versions use semver precedence, so a release outranks its
/// pre-releases. Anything else is compared segment by segment, numerically
/// where possible, with a numeric segment ranking above a textual one
/// (`2.3.0` after `2.3.RELEASE`).
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a.trim()), Version::parse(b.trim())) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => compare_segments(a, b),
    }
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    let split = |v: &str| -> Vec<String> {
        v.split(['.', '-', '+', '_'])
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    };
    let left = split(a);
    let right = split(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => l.cmp(r),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.len().cmp(&right.len())
}
