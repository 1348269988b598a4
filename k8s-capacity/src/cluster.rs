use super::*;

/// How pods whose node is not in the inventory count towards cluster totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Requests, limits and utilization of orphan pods are added to the
    /// cluster totals.
    #[default]
    CountTowardsCluster,
    /// Orphan pods are indexed but add nothing to the cluster totals.
    Exclude,
}

impl OrphanPolicy {
    fn counts_towards_cluster(self) -> bool {
        matches!(self, Self::CountTowardsCluster)
    }
}

/// Orphan pods count at cluster scope for every figure, so cluster totals are
/// always the node totals plus the orphan totals.
pub const ORPHAN_POLICY: OrphanPolicy = OrphanPolicy::CountTowardsCluster;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterMetric {
    cpu: ResourceMetric,
    memory: ResourceMetric,
    node_metrics: BTreeMap<String, NodeMetric>,
    pod_metrics: BTreeMap<String, PodMetric>,
    orphans: BTreeSet<String>,
    orphan_policy: OrphanPolicy,
}

impl ClusterMetric {
    pub fn new() -> Self {
        Self::with_orphan_policy(ORPHAN_POLICY)
    }

    pub fn with_orphan_policy(orphan_policy: OrphanPolicy) -> Self {
        Self {
            cpu: ResourceMetric::new(ResourceType::Cpu),
            memory: ResourceMetric::new(ResourceType::Memory),
            node_metrics: BTreeMap::new(),
            pod_metrics: BTreeMap::new(),
            orphans: BTreeSet::new(),
            orphan_policy,
        }
    }

    pub fn cpu(&self) -> &ResourceMetric {
        &self.cpu
    }

    pub fn memory(&self) -> &ResourceMetric {
        &self.memory
    }

    pub fn resource(&self, resource_type: ResourceType) -> &ResourceMetric {
        match resource_type {
            ResourceType::Cpu => &self.cpu,
            ResourceType::Memory => &self.memory,
        }
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    /// Nodes sorted by name.
    pub fn node_metrics(&self) -> &BTreeMap<String, NodeMetric> {
        &self.node_metrics
    }

    /// Every pod in the cluster, orphans included, sorted by key.
    pub fn pod_metrics(&self) -> &BTreeMap<String, PodMetric> {
        &self.pod_metrics
    }

    /// Pods whose node is not part of the cluster's node inventory, sorted by key.
    pub fn orphan_pods(&self) -> impl Iterator<Item = &PodMetric> {
        self.orphans.iter().filter_map(|key| self.pod_metrics.get(key))
    }

    /// Seeds a node from the inventory and registers it.
    pub fn add_node(&mut self, node: &NodeAllocatable) -> Result<()> {
        self.add_node_metric(NodeMetric::new(node))
    }

    /// Registers `node` and folds its figures into the cluster totals.
    ///
    /// Each node may be registered once; register nodes before attributing
    /// pods so their figures are folded exactly once.
    pub fn add_node_metric(&mut self, node: NodeMetric) -> Result<()> {
        if self.node_metrics.contains_key(node.name()) {
            return Err(CapacityError::DuplicateNode(node.name().to_string()));
        }

        self.cpu.add_metric(node.cpu());
        self.memory.add_metric(node.memory());

        tracing::trace!(node = node.name(), "Registered node");
        self.node_metrics.insert(node.name().to_string(), node);
        Ok(())
    }

    /// Attributes one pod and its per-container usage samples.
    ///
    /// Requests and limits roll up into the pod's node and the cluster;
    /// utilization follows the same path. Pods on unknown nodes are kept in the
    /// cluster index only and count towards cluster totals according to the
    /// orphan policy.
    pub fn add_pod_metric(&mut self, pod: &PodResources, usage: &[Resources]) -> Result<()> {
        let key = pod.key();
        if self.pod_metrics.contains_key(&key) {
            return Err(CapacityError::DuplicatePod(key));
        }

        let mut pod_metric = PodMetric::new(pod);
        for sample in usage {
            pod_metric.add_usage(sample);
        }

        let node = pod
            .node_name
            .as_deref()
            .and_then(|name| self.node_metrics.get_mut(name));

        let counted = if let Some(node) = node {
            node.add_requested(&pod.requests, &pod.limits);
            for sample in usage {
                node.add_usage(sample);
            }
            pod_metric.set_allocatable(node);
            node.insert_pod(pod_metric.clone());
            true
        } else {
            tracing::debug!(
                pod = key.as_str(),
                node = pod.node_name.as_deref().unwrap_or_default(),
                "Pod is not scheduled on a known node"
            );
            self.orphans.insert(key.clone());
            self.orphan_policy.counts_towards_cluster()
        };

        if counted {
            self.cpu.add_requested(pod.requests.cpu, pod.limits.cpu);
            self.memory
                .add_requested(pod.requests.memory, pod.limits.memory);
            for sample in usage {
                self.cpu.add_utilization(sample.cpu);
                self.memory.add_utilization(sample.memory);
            }
        }

        self.pod_metrics.insert(key, pod_metric);
        Ok(())
    }
}

impl Default for ClusterMetric {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
