use super::*;

const MEBIBYTE: i64 = 1024 * 1024;

static CPU_UNIT: ResourceUnit = ResourceUnit {
    suffix: "m",
    divisor: 1,
};

static MEMORY_UNIT: ResourceUnit = ResourceUnit {
    suffix: "Mi",
    divisor: MEBIBYTE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    /// Quantities in milli-CPU
    Cpu,
    /// Quantities in bytes
    Memory,
}

/// How quantities of a [`ResourceType`] are rendered.
///
/// Rendered value is `quantity / divisor` (truncating) followed by `suffix`.
#[derive(Debug)]
pub struct ResourceUnit {
    pub suffix: &'static str,
    pub divisor: i64,
}

impl ResourceType {
    pub const ALL: [Self; 2] = [Self::Cpu, Self::Memory];

    pub fn unit(self) -> &'static ResourceUnit {
        match self {
            Self::Cpu => &CPU_UNIT,
            Self::Memory => &MEMORY_UNIT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Normal,
    Flagged,
}

impl Status {
    fn flagged_if(condition: bool) -> Self {
        if condition {
            Self::Flagged
        } else {
            Self::Normal
        }
    }

    pub fn is_flagged(self) -> bool {
        self == Self::Flagged
    }
}

/// One rendered figure: `"<value> (<percent>%)"` plus its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceCell {
    pub value: String,
    pub percent: i64,
    pub status: Status,
}

impl fmt::Display for ResourceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.value, self.percent)
    }
}

/// Allocatable, utilization, request and limit of one resource in one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceMetric {
    resource_type: ResourceType,
    allocatable: i64,
    utilization: i64,
    request: i64,
    limit: i64,
}

impl ResourceMetric {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            allocatable: 0,
            utilization: 0,
            request: 0,
            limit: 0,
        }
    }

    pub fn with_allocatable(resource_type: ResourceType, allocatable: i64) -> Self {
        Self {
            allocatable,
            ..Self::new(resource_type)
        }
    }

    pub(crate) fn requested(resource_type: ResourceType, request: i64, limit: i64) -> Self {
        Self {
            request,
            limit,
            ..Self::new(resource_type)
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn allocatable(&self) -> i64 {
        self.allocatable
    }

    pub fn utilization(&self) -> i64 {
        self.utilization
    }

    pub fn request(&self) -> i64 {
        self.request
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Element-wise accumulation of all four quantities.
    pub fn add_metric(&mut self, other: &Self) {
        self.allocatable += other.allocatable;
        self.utilization += other.utilization;
        self.request += other.request;
        self.limit += other.limit;
    }

    pub(crate) fn add_requested(&mut self, request: i64, limit: i64) {
        self.request += request;
        self.limit += limit;
    }

    pub(crate) fn add_utilization(&mut self, utilization: i64) {
        self.utilization += utilization;
    }

    pub(crate) fn set_allocatable(&mut self, allocatable: i64) {
        self.allocatable = allocatable;
    }

    // A zero limit means no limit is set, not that the request exceeds it.
    pub fn request_status(&self) -> Status {
        Status::flagged_if(self.request == 0 || (self.request > self.limit && self.limit > 0))
    }

    pub fn limit_status(&self) -> Status {
        Status::flagged_if(self.limit == 0)
    }

    pub fn utilization_status(&self) -> Status {
        Status::flagged_if(self.utilization > self.request && self.request > 0)
    }

    pub fn request_cell(&self) -> ResourceCell {
        self.cell(self.request, self.request_status())
    }

    pub fn limit_cell(&self) -> ResourceCell {
        self.cell(self.limit, self.limit_status())
    }

    pub fn utilization_cell(&self) -> ResourceCell {
        self.cell(self.utilization, self.utilization_status())
    }

    /// `quantity` rendered in the unit of this metric's resource type.
    pub fn value_string(&self, quantity: i64) -> String {
        let unit = self.resource_type.unit();
        format!("{}{}", quantity / unit.divisor, unit.suffix)
    }

    /// Whole percentage of `quantity` relative to `allocatable`, rounded down.
    ///
    /// Zero when nothing is allocatable.
    pub fn percent(&self, quantity: i64) -> i64 {
        if self.allocatable == 0 {
            return 0;
        }
        let percent = i128::from(quantity) * 100 / i128::from(self.allocatable);
        i64::try_from(percent).unwrap_or(i64::MAX)
    }

    fn cell(&self, quantity: i64, status: Status) -> ResourceCell {
        ResourceCell {
            value: self.value_string(quantity),
            percent: self.percent(quantity),
            status,
        }
    }
}
