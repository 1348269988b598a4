//! Resource capacity aggregation.
//!
//! Pod requests, limits and live usage are folded into a three level tree
//! ([`ClusterMetric`] → [`NodeMetric`] → [`PodMetric`]) whose every level
//! carries one [`ResourceMetric`] per [`ResourceType`]. Once built the tree is
//! read-only; presenters walk it and use the cell accessors of
//! [`ResourceMetric`] to render values together with their [`Status`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;

pub use cluster::ClusterMetric;
pub use cluster::OrphanPolicy;
pub use cluster::ORPHAN_POLICY;
pub use error::CapacityError;
pub use node::NodeMetric;
pub use pod::PodMetric;
pub use resource::ResourceCell;
pub use resource::ResourceMetric;
pub use resource::ResourceType;
pub use resource::ResourceUnit;
pub use resource::Status;
pub use snapshot::NodeAllocatable;
pub use snapshot::PodResources;
pub use snapshot::Resources;
pub use snapshot::Snapshot;

mod cluster;
mod error;
mod node;
mod pod;
mod resource;
mod snapshot;

pub type Result<T, E = CapacityError> = std::result::Result<T, E>;

/// Identity of a pod across the whole tree, `namespace/name`.
pub fn pod_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}
