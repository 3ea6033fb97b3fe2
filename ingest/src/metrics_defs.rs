//! Metric definitions for the ingestion service.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const REQUESTS_ACCEPTED: MetricDef = MetricDef {
    name: "requests.accepted",
    metric_type: MetricType::Counter,
    description: "Requests whose record was durably inserted",
};

pub const REQUESTS_REJECTED: MetricDef = MetricDef {
    name: "requests.rejected",
    metric_type: MetricType::Counter,
    description: "Requests rejected before or during persistence. Tagged with reason.",
};

pub const REQUESTS_DROPPED: MetricDef = MetricDef {
    name: "requests.dropped",
    metric_type: MetricType::Counter,
    description: "Non-POST requests dropped without a response",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS_ACCEPTED, REQUESTS_REJECTED, REQUESTS_DROPPED];

#[macro_export]
macro_rules! counter {
    ($def:expr) => {
        metrics::counter!($def.name)
    };
    ($def:expr, $($key:expr => $value:expr),+) => {
        metrics::counter!($def.name, $($key => $value),+)
    };
}
