use super::*;

const CPU: &str = "cpu";
const MEMORY: &str = "memory";

/// CPU (millicores) and memory (bytes) where `None` means not specified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResourceSum {
    cpu: Option<i64>,
    memory: Option<i64>,
}

impl ResourceSum {
    pub(crate) fn from_list(list: &ResourceList) -> Result<Self, QuantityParseError> {
        let cpu = list.get(CPU).map(QuantityExt::to_millis).transpose()?;
        let memory = list.get(MEMORY).map(QuantityExt::to_memory).transpose()?;
        Ok(Self { cpu, memory })
    }

    pub(crate) fn requests(container: &corev1::Container) -> Result<Self, QuantityParseError> {
        container
            .resources
            .as_ref()
            .and_then(|resources| resources.requests.as_ref())
            .map(Self::from_list)
            .unwrap_or_else(|| Ok(Self::default()))
    }

    pub(crate) fn limits(container: &corev1::Container) -> Result<Self, QuantityParseError> {
        container
            .resources
            .as_ref()
            .and_then(|resources| resources.limits.as_ref())
            .map(Self::from_list)
            .unwrap_or_else(|| Ok(Self::default()))
    }

    pub(crate) fn add(self, other: Self) -> Self {
        Self {
            cpu: combine(self.cpu, other.cpu, i64::saturating_add),
            memory: combine(self.memory, other.memory, i64::saturating_add),
        }
    }

    pub(crate) fn max(self, other: Self) -> Self {
        Self {
            cpu: combine(self.cpu, other.cpu, i64::max),
            memory: combine(self.memory, other.memory, i64::max),
        }
    }

    pub(crate) fn resources(self) -> Resources {
        Resources::new(self.cpu.unwrap_or_default(), self.memory.unwrap_or_default())
    }

    pub(crate) fn add_where_set(self, other: Self) -> Self {
        Self {
            cpu: self.cpu.map(|cpu| cpu.saturating_add(other.cpu.unwrap_or_default())),
            memory: self
                .memory
                .map(|memory| memory.saturating_add(other.memory.unwrap_or_default())),
        }
    }
}

fn combine(lhs: Option<i64>, rhs: Option<i64>, f: fn(i64, i64) -> i64) -> Option<i64> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(f(lhs, rhs)),
        (lhs, None) => lhs,
        (None, rhs) => rhs,
    }
}
