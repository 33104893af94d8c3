//! In-memory backend for driving workflows

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use backend_api::models::{
    LogsResponse, RealLogKind, ServiceInstance, StopServiceRequest, StructuredLogsResponse,
};
use serde_json::{json, Value};

use honeydash::errors::DashboardError;
use honeydash::http::api::HoneypotApi;
use honeydash::http::logs::StructuredLogQuery;

/// Canned responses plus a record of every call
pub struct FakeApi {
    pub services: Mutex<Result<Vec<ServiceInstance>, String>>,
    pub start_result: Mutex<Option<Result<Value, DashboardError>>>,
    pub start_delay: Mutex<Duration>,
    pub container_logs: Mutex<Option<LogsResponse>>,
    pub structured: Mutex<Option<StructuredLogsResponse>>,
    pub started: Mutex<Vec<Value>>,
    pub stopped: Mutex<Vec<StopServiceRequest>>,
    pub log_requests: Mutex<Vec<String>>,
    pub list_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            services: Mutex::new(Ok(Vec::new())),
            start_result: Mutex::new(None),
            start_delay: Mutex::new(Duration::ZERO),
            container_logs: Mutex::new(None),
            structured: Mutex::new(None),
            started: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
            log_requests: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_services(self, services: Value) -> Self {
        *self.services.lock().unwrap() = Ok(serde_json::from_value(services).unwrap());
        self
    }

    pub fn fail_list(&self, message: &str) {
        *self.services.lock().unwrap() = Err(message.to_string());
    }

    pub fn fail_start(self, err: DashboardError) -> Self {
        *self.start_result.lock().unwrap() = Some(Err(err));
        self
    }

    pub fn with_start_delay(self, delay: Duration) -> Self {
        *self.start_delay.lock().unwrap() = delay;
        self
    }

    pub fn with_container_logs(self, response: LogsResponse) -> Self {
        *self.container_logs.lock().unwrap() = Some(response);
        self
    }

    pub fn with_structured(self, response: StructuredLogsResponse) -> Self {
        *self.structured.lock().unwrap() = Some(response);
        self
    }

    pub fn start_calls(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HoneypotApi for FakeApi {
    async fn list_services(&self) -> Result<Vec<ServiceInstance>, DashboardError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.services
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| DashboardError::ApiError { status: 503, message })
    }

    async fn start_service(&self, config: &Value) -> Result<Value, DashboardError> {
        self.started.lock().unwrap().push(config.clone());
        let delay = *self.start_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.start_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(json!({"status": "started"})))
    }

    async fn stop_service(&self, request: &StopServiceRequest) -> Result<Value, DashboardError> {
        self.stopped.lock().unwrap().push(request.clone());
        Ok(json!({"status": "stopped"}))
    }

    async fn container_logs(&self, id: &str) -> Result<LogsResponse, DashboardError> {
        self.log_requests.lock().unwrap().push(format!("container:{}", id));
        Ok(self.container_logs.lock().unwrap().clone().unwrap_or_default())
    }

    async fn real_logs(&self, id: &str, kind: RealLogKind) -> Result<LogsResponse, DashboardError> {
        self.log_requests.lock().unwrap().push(format!("real:{}:{}", id, kind));
        Ok(LogsResponse::default())
    }

    async fn structured_logs(
        &self,
        id: &str,
        query: &StructuredLogQuery,
    ) -> Result<StructuredLogsResponse, DashboardError> {
        self.log_requests
            .lock()
            .unwrap()
            .push(format!("structured:{}:{}:{}", id, query.kind, query.limit));
        Ok(self.structured.lock().unwrap().clone().unwrap_or_default())
    }
}
