use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Http,
}

impl MonitorType {
    pub fn as_str(self) -> &'static str {
        match self {
            MonitorType::Http => "http",
        }
    }
}

/// A monitor to be created in Uptime Kuma.
///
/// Serialises to `{"type":"http","name":...,"url":...}`, the body the REST
/// endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorRequest {
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    pub name: String,
    pub url: String,
}

impl MonitorRequest {
    /// An HTTP monitor named after the domain it watches.
    pub fn http(domain: impl Into<String>, url: impl Into<String>) -> Self {
        MonitorRequest {
            monitor_type: MonitorType::Http,
            name: domain.into(),
            url: url.into(),
        }
    }
}
