use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodMetric {
    name: String,
    namespace: String,
    cpu: ResourceMetric,
    memory: ResourceMetric,
}

impl PodMetric {
    pub(crate) fn new(pod: &PodResources) -> Self {
        let cpu = ResourceMetric::requested(ResourceType::Cpu, pod.requests.cpu, pod.limits.cpu);
        let memory = ResourceMetric::requested(
            ResourceType::Memory,
            pod.requests.memory,
            pod.limits.memory,
        );
        Self {
            name: pod.name.clone(),
            namespace: pod.namespace.clone(),
            cpu,
            memory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> String {
        pod_key(&self.namespace, &self.name)
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

    // Only used for relative percentages; pod allocatable never rolls up.
    pub(crate) fn set_allocatable(&mut self, node: &NodeMetric) {
        self.cpu.set_allocatable(node.cpu().allocatable());
        self.memory.set_allocatable(node.memory().allocatable());
    }

    pub(crate) fn add_usage(&mut self, usage: &Resources) {
        self.cpu.add_utilization(usage.cpu);
        self.memory.add_utilization(usage.memory);
    }
}
