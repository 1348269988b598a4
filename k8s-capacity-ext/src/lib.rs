pub use k8s_capacity as capacity;
pub use k8s_metrics::v1beta1 as metricsv1;
pub use k8s_metrics::QuantityExt;
pub use k8s_metrics::QuantityParseError;
pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::api::resource;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

use std::collections::BTreeMap;

use capacity::NodeAllocatable;
use capacity::PodResources;
use capacity::Resources;

use sum::ResourceSum;

mod sum;

pub type ResourceList = BTreeMap<String, resource::Quantity>;

pub trait PodExt {
    /// `namespace/name`
    fn identity(&self) -> String;

    /// Pod level requests and limits.
    ///
    /// Regular containers and sidecars (init containers with `restartPolicy:
    /// Always`) are summed. Any other init container may raise the result to
    /// its own figure plus the sidecars started before it. Pod overhead is
    /// added on top and only raises limits that are set.
    fn resources(&self) -> Result<PodResources, QuantityParseError>;
}

impl PodExt for corev1::Pod {
    fn identity(&self) -> String {
        self.metadata.identity()
    }

    fn resources(&self) -> Result<PodResources, QuantityParseError> {
        let mut requests = ResourceSum::default();
        let mut limits = ResourceSum::default();
        let mut node_name = None;

        if let Some(spec) = &self.spec {
            for container in &spec.containers {
                requests = requests.add(ResourceSum::requests(container)?);
                limits = limits.add(ResourceSum::limits(container)?);
            }

            let mut init_requests = ResourceSum::default();
            let mut init_limits = ResourceSum::default();
            let mut sidecar_requests = ResourceSum::default();
            let mut sidecar_limits = ResourceSum::default();
            for container in spec.init_containers.iter().flatten() {
                let container_requests = ResourceSum::requests(container)?;
                let container_limits = ResourceSum::limits(container)?;
                if is_sidecar(container) {
                    requests = requests.add(container_requests);
                    limits = limits.add(container_limits);
                    sidecar_requests = sidecar_requests.add(container_requests);
                    sidecar_limits = sidecar_limits.add(container_limits);
                    init_requests = init_requests.max(sidecar_requests);
                    init_limits = init_limits.max(sidecar_limits);
                } else {
                    init_requests = init_requests.max(container_requests.add(sidecar_requests));
                    init_limits = init_limits.max(container_limits.add(sidecar_limits));
                }
            }
            requests = requests.max(init_requests);
            limits = limits.max(init_limits);

            if let Some(overhead) = &spec.overhead {
                let overhead = ResourceSum::from_list(overhead)?;
                requests = requests.add(overhead);
                limits = limits.add_where_set(overhead);
            }

            node_name = spec.node_name.clone().filter(|name| !name.is_empty());
        }

        Ok(PodResources {
            name: self.metadata.name.clone().unwrap_or_default(),
            namespace: self.metadata.namespace.clone().unwrap_or_default(),
            node_name,
            requests: requests.resources(),
            limits: limits.resources(),
        })
    }
}

/// Init containers that keep running next to the regular containers.
fn is_sidecar(container: &corev1::Container) -> bool {
    container.restart_policy.as_deref() == Some("Always")
}

pub trait NodeExt {
    fn allocatable(&self) -> Result<NodeAllocatable, QuantityParseError>;
}

impl NodeExt for corev1::Node {
    fn allocatable(&self) -> Result<NodeAllocatable, QuantityParseError> {
        let name = self.metadata.name.clone().unwrap_or_default();
        let allocatable = self
            .status
            .as_ref()
            .and_then(|status| status.allocatable.as_ref())
            .map(ResourceSum::from_list)
            .transpose()?
            .unwrap_or_default();
        Ok(NodeAllocatable::new(name, allocatable.resources()))
    }
}

pub trait PodMetricsExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;
    /// `namespace/name` of the pod these metrics describe
    fn identity(&self) -> String;
    /// One usage sample per container
    fn container_usage(&self) -> Result<Vec<Resources>, QuantityParseError>;
}

impl PodMetricsExt for metricsv1::PodMetrics {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::with_namespace(name, namespace);
        Self {
            metadata,
            ..default()
        }
    }

    fn identity(&self) -> String {
        self.metadata.identity()
    }

    fn container_usage(&self) -> Result<Vec<Resources>, QuantityParseError> {
        self.containers
            .iter()
            .map(|container| {
                let cpu = container.cpu_millis()?;
                let memory = container.memory()?;
                Ok::<_, QuantityParseError>(Resources::new(cpu, memory))
            })
            .collect()
    }
}

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self;
    fn identity(&self) -> String;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }

    fn identity(&self) -> String {
        let namespace = self.namespace.as_deref().unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();
        capacity::pod_key(namespace, name)
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}
