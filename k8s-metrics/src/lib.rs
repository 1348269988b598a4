//! K8s Metrics API (`metrics.k8s.io`) resource definitions
//!
//! [`v1beta1::PodMetrics`] is what `kubectl top pod` reads: per-container usage
//! snapshots published by metrics-server. [`QuantityExt`] turns the
//! Kubernetes quantity strings they carry into plain numbers.

use k8s_openapi::apimachinery::pkg::api::resource;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use serde::Deserialize;
use serde::Serialize;

pub use metrics::v1beta1;
pub use quantity::QuantityExt;
pub use quantity::QuantityParseError;

pub mod metrics;
mod quantity;
