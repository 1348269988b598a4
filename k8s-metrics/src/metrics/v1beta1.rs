use std::time::Duration;

use constcat::concat;

use super::*;

pub use pod::PodMetrics;

pub const METRICS_API_GROUP: &str = "metrics.k8s.io";
pub const METRICS_API_VERSION: &str = "v1beta1";
pub const METRICS_API_GROUP_VERSION: &str = concat!(METRICS_API_GROUP, "/", METRICS_API_VERSION);

mod duration;
mod pod;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub cpu: resource::Quantity,
    pub memory: resource::Quantity,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub usage: Usage,
}

impl Usage {
    pub fn new(cpu: impl ToString, memory: impl ToString) -> Self {
        Self {
            cpu: resource::Quantity(cpu.to_string()),
            memory: resource::Quantity(memory.to_string()),
        }
    }

    pub fn cpu_millis(&self) -> Result<i64, QuantityParseError> {
        self.cpu.to_millis()
    }

    pub fn memory(&self) -> Result<i64, QuantityParseError> {
        self.memory.to_memory()
    }
}

impl Container {
    pub fn new(name: impl ToString, usage: Usage) -> Self {
        let name = name.to_string();
        Self { name, usage }
    }

    pub fn cpu_millis(&self) -> Result<i64, QuantityParseError> {
        self.usage.cpu_millis()
    }

    pub fn memory(&self) -> Result<i64, QuantityParseError> {
        self.usage.memory()
    }
}
