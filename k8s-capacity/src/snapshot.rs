use super::*;

/// CPU (milli-units) and memory (bytes) quantities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resources {
    pub cpu: i64,
    pub memory: i64,
}

impl Resources {
    pub fn new(cpu: i64, memory: i64) -> Self {
        Self { cpu, memory }
    }
}

/// A node as reported by the node inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAllocatable {
    pub name: String,
    pub allocatable: Resources,
}

impl NodeAllocatable {
    pub fn new(name: impl ToString, allocatable: Resources) -> Self {
        let name = name.to_string();
        Self { name, allocatable }
    }
}

/// A pod with its requests and limits already resolved to pod level totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodResources {
    pub name: String,
    pub namespace: String,
    pub node_name: Option<String>,
    pub requests: Resources,
    pub limits: Resources,
}

impl PodResources {
    pub fn new(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            node_name: None,
            requests: Resources::default(),
            limits: Resources::default(),
        }
    }

    pub fn on_node(self, node_name: impl ToString) -> Self {
        let node_name = Some(node_name.to_string());
        Self { node_name, ..self }
    }

    pub fn requests(self, requests: Resources) -> Self {
        Self { requests, ..self }
    }

    pub fn limits(self, limits: Resources) -> Self {
        Self { limits, ..self }
    }

    pub fn key(&self) -> String {
        pod_key(&self.namespace, &self.name)
    }
}

/// Everything fetched from a cluster for one aggregation pass.
///
/// `usage` maps pod keys to per-container usage samples; pods missing from it
/// have zero utilization.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub nodes: Vec<NodeAllocatable>,
    pub pods: Vec<PodResources>,
    pub usage: HashMap<String, Vec<Resources>>,
}

impl Snapshot {
    /// Builds the cluster tree using [`ORPHAN_POLICY`].
    pub fn aggregate(&self) -> Result<ClusterMetric> {
        self.aggregate_with(ORPHAN_POLICY)
    }

    /// Builds the cluster tree: every node is registered before any pod is
    /// attributed so pods always find their node when it is known.
    pub fn aggregate_with(&self, orphan_policy: OrphanPolicy) -> Result<ClusterMetric> {
        let mut cluster = ClusterMetric::with_orphan_policy(orphan_policy);

        for node in &self.nodes {
            cluster.add_node(node)?;
        }

        for pod in &self.pods {
            let usage = self
                .usage
                .get(&pod.key())
                .map(Vec::as_slice)
                .unwrap_or_default();
            cluster.add_pod_metric(pod, usage)?;
        }

        tracing::debug!(
            nodes = cluster.node_metrics().len(),
            pods = cluster.pod_metrics().len(),
            orphans = cluster.orphan_pods().count(),
            "Aggregated cluster capacity"
        );

        Ok(cluster)
    }
}
