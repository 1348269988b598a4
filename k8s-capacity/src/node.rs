use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeMetric {
    name: String,
    cpu: ResourceMetric,
    memory: ResourceMetric,
    pod_metrics: BTreeMap<String, PodMetric>,
}

impl NodeMetric {
    pub fn new(node: &NodeAllocatable) -> Self {
        Self {
            name: node.name.clone(),
            cpu: ResourceMetric::with_allocatable(ResourceType::Cpu, node.allocatable.cpu),
            memory: ResourceMetric::with_allocatable(ResourceType::Memory, node.allocatable.memory),
            pod_metrics: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
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

    /// Pods attributed to this node, sorted by key.
    pub fn pod_metrics(&self) -> &BTreeMap<String, PodMetric> {
        &self.pod_metrics
    }

    pub(crate) fn add_requested(&mut self, requests: &Resources, limits: &Resources) {
        self.cpu.add_requested(requests.cpu, limits.cpu);
        self.memory.add_requested(requests.memory, limits.memory);
    }

    pub(crate) fn add_usage(&mut self, usage: &Resources) {
        self.cpu.add_utilization(usage.cpu);
        self.memory.add_utilization(usage.memory);
    }

    pub(crate) fn insert_pod(&mut self, pod: PodMetric) {
        self.pod_metrics.insert(pod.key(), pod);
    }
}
