use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Liveness probe payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    /// Process uptime in seconds.
    pub uptime: f64,
}

impl Health {
    pub fn ok(uptime: f64) -> Self {
        Self {
            status: "OK".into(),
            message: "Server is running".into(),
            timestamp: Utc::now().to_rfc3339(),
            uptime,
        }
    }
}

/// Store connectivity probe payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DbStatus {
    pub database: String,
    pub provider: String,
    pub timestamp: String,
}

impl DbStatus {
    pub fn new(connected: bool) -> Self {
        Self {
            database: if connected { "Connected" } else { "Disconnected" }.into(),
            provider: "SeaORM".into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Root banner listing the public endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Endpoints {
    pub health: String,
    #[serde(rename = "dbStatus")]
    pub db_status: String,
    pub customers: String,
}

impl ServiceInfo {
    pub fn new(version: &str) -> Self {
        Self {
            message: "Customer API Server".into(),
            version: version.into(),
            endpoints: Endpoints {
                health: "/health".into(),
                db_status: "/db-status".into(),
                customers: "/api/customers".into(),
            },
        }
    }
}
