//! Backend API trait

use async_trait::async_trait;
use backend_api::models::{
    LogsResponse, RealLogKind, ServiceInstance, StopServiceRequest, StructuredLogsResponse,
};
use serde_json::Value;

use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::http::logs::StructuredLogQuery;

/// Operations the console performs against the backend
///
/// Every network call goes through this trait so workflows can be driven by
/// fakes in tests.
#[async_trait]
pub trait HoneypotApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceInstance>, DashboardError>;

    /// Start or save a service; `config` is the transport form
    async fn start_service(&self, config: &Value) -> Result<Value, DashboardError>;

    async fn stop_service(&self, request: &StopServiceRequest) -> Result<Value, DashboardError>;

    async fn container_logs(&self, id: &str) -> Result<LogsResponse, DashboardError>;

    async fn real_logs(&self, id: &str, kind: RealLogKind) -> Result<LogsResponse, DashboardError>;

    async fn structured_logs(
        &self,
        id: &str,
        query: &StructuredLogQuery,
    ) -> Result<StructuredLogsResponse, DashboardError>;
}

#[async_trait]
impl HoneypotApi for HttpClient {
    async fn list_services(&self) -> Result<Vec<ServiceInstance>, DashboardError> {
        HttpClient::list_services(self).await
    }

    async fn start_service(&self, config: &Value) -> Result<Value, DashboardError> {
        HttpClient::start_service(self, config).await
    }

    async fn stop_service(&self, request: &StopServiceRequest) -> Result<Value, DashboardError> {
        HttpClient::stop_service(self, request).await
    }

    async fn container_logs(&self, id: &str) -> Result<LogsResponse, DashboardError> {
        HttpClient::container_logs(self, id).await
    }

    async fn real_logs(&self, id: &str, kind: RealLogKind) -> Result<LogsResponse, DashboardError> {
        HttpClient::real_logs(self, id, kind).await
    }

    async fn structured_logs(
        &self,
        id: &str,
        query: &StructuredLogQuery,
    ) -> Result<StructuredLogsResponse, DashboardError> {
        HttpClient::structured_logs(self, id, query).await
    }
}
