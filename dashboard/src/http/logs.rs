//! Log endpoints

use backend_api::models::{LogsResponse, RealLogKind, StructuredLogsResponse};
use serde::Serialize;

use crate::errors::DashboardError;
use crate::http::client::HttpClient;

/// Default number of structured entries requested
pub const DEFAULT_STRUCTURED_LIMIT: u32 = 100;

/// Query for `GET /services/{id}/structured_logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredLogQuery {
    #[serde(rename = "type")]
    pub kind: RealLogKind,
    pub limit: u32,
}

impl StructuredLogQuery {
    pub fn new(kind: RealLogKind) -> Self {
        Self {
            kind,
            limit: DEFAULT_STRUCTURED_LIMIT,
        }
    }
}

impl Default for StructuredLogQuery {
    fn default() -> Self {
        Self::new(RealLogKind::default())
    }
}

impl HttpClient {
    /// Raw container or process output
    pub async fn container_logs(&self, id: &str) -> Result<LogsResponse, DashboardError> {
        self.get(&["services", id, "logs"]).await
    }

    /// Parsed log files of one kind
    pub async fn real_logs(&self, id: &str, kind: RealLogKind) -> Result<LogsResponse, DashboardError> {
        self.get_with_query(&["services", id, "reallogs"], &[("type", kind.as_str())])
            .await
    }

    pub async fn structured_logs(
        &self,
        id: &str,
        query: &StructuredLogQuery,
    ) -> Result<StructuredLogsResponse, DashboardError> {
        self.get_with_query(&["services", id, "structured_logs"], query)
            .await
    }
}
