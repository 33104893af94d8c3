//! Service lifecycle endpoints

use backend_api::models::{
    ServiceInstance, ServicesPayload, StartServiceRequest, StopServiceRequest,
};
use serde_json::Value;
use tracing::info;

use crate::errors::DashboardError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// List running services, as returned by the backend
    pub async fn list_services(&self) -> Result<Vec<ServiceInstance>, DashboardError> {
        let payload: ServicesPayload = self.get(&["services"]).await?;
        Ok(payload.into_services())
    }

    /// Start (or save) a service from its transport config
    pub async fn start_service(&self, config: &Value) -> Result<Value, DashboardError> {
        info!(
            "Starting service {}",
            config.get("name").and_then(serde_json::Value::as_str).unwrap_or("unknown")
        );
        let body = StartServiceRequest {
            config: config.clone(),
        };
        self.post(&["services", "start"], &body).await
    }

    /// Stop a container or process backed service
    pub async fn stop_service(&self, request: &StopServiceRequest) -> Result<Value, DashboardError> {
        info!("Stopping {} service", request.kind);
        self.post(&["services", "stop"], request).await
    }
}
