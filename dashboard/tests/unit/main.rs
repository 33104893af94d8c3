//! Integration tests for honeydash

mod fake_api;
mod test_dashboard;
mod test_deploy_workflow;
mod test_http_client;
mod test_logs_viewer;
mod test_poller;
mod test_progress;
mod test_settings_store;
