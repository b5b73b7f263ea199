// EN: src/system/manager_client.rs

use crate::models::{Execution, ExecutionStatus};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use thiserror::Error;

const API_PREFIX: &str = "api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Manager at '{url}' is not reachable: {reason}")]
    Connectivity { url: String, reason: String },
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Manager answered '{url}' with HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Could not decode the manager response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// True when the manager could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// One page of events, in delivery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsPage {
    pub items: Vec<JsonValue>,
}

/// The slice of the deployment-manager REST API this tool consumes.
pub trait ManagerClient {
    /// The manager's version string.
    fn version(&self) -> Result<String, ClientError>;
    fn list_executions(&self, deployment_id: &str) -> Result<Vec<Execution>, ClientError>;
    fn get_execution(&self, execution_id: &str) -> Result<Execution, ClientError>;
    fn cancel_execution(&self, execution_id: &str) -> Result<Execution, ClientError>;
    /// Overrides the stored status of an execution.
    fn update_execution_status(
        &self,
        execution_id: &str,
        status: ExecutionStatus,
    ) -> Result<Execution, ClientError>;
    fn list_events(
        &self,
        execution_id: &str,
        offset: usize,
        size: usize,
        include_logs: bool,
    ) -> Result<EventsPage, ClientError>;
}

/// List endpoints wrap their results as `{"items": [...], "metadata": {...}}`.
#[derive(Deserialize)]
struct ListResponse<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct VersionResponse {
    version: String,
}

/// HTTP implementation of [`ManagerClient`] talking to `http://<host>/api/v2`.
#[derive(Debug, Clone)]
pub struct RestManagerClient {
    http: Client,
    base_url: String,
}

impl RestManagerClient {
    /// A client for the manager listening on `manager_ip`, over plain HTTP.
    pub fn new(manager_ip: &str) -> Result<Self, ClientError> {
        Self::with_base_url(format!("http://{}", manager_ip))
    }

    /// A client rooted at `base_url`; a trailing slash is dropped.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Request {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, path)
    }

    fn send<T: DeserializeOwned>(&self, url: String, request: RequestBuilder) -> Result<T, ClientError> {
        log::debug!("Manager request: {}", url);
        let response = request.send().map_err(|source| {
            if source.is_connect() || source.is_timeout() {
                ClientError::Connectivity {
                    url: url.clone(),
                    reason: source.to_string(),
                }
            } else {
                ClientError::Request {
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .map_err(|source| ClientError::Decode { url, source })
    }
}

impl ManagerClient for RestManagerClient {
    fn version(&self) -> Result<String, ClientError> {
        let url = self.url("version");
        let response: VersionResponse = self.send(url.clone(), self.http.get(&url))?;
        Ok(response.version)
    }

    fn list_executions(&self, deployment_id: &str) -> Result<Vec<Execution>, ClientError> {
        let url = self.url("executions");
        let request = self.http.get(&url).query(&[("deployment_id", deployment_id)]);
        let response: ListResponse<Execution> = self.send(url, request)?;
        Ok(response.items)
    }

    fn get_execution(&self, execution_id: &str) -> Result<Execution, ClientError> {
        let url = self.url(&format!("executions/{}", execution_id));
        self.send(url.clone(), self.http.get(&url))
    }

    fn cancel_execution(&self, execution_id: &str) -> Result<Execution, ClientError> {
        let url = self.url(&format!("executions/{}", execution_id));
        let request = self.http.post(&url).json(&json!({ "action": "cancel" }));
        self.send(url, request)
    }

    fn update_execution_status(
        &self,
        execution_id: &str,
        status: ExecutionStatus,
    ) -> Result<Execution, ClientError> {
        let url = self.url(&format!("executions/{}", execution_id));
        let request = self.http.patch(&url).json(&json!({ "status": status }));
        self.send(url, request)
    }

    fn list_events(
        &self,
        execution_id: &str,
        offset: usize,
        size: usize,
        include_logs: bool,
    ) -> Result<EventsPage, ClientError> {
        let url = self.url("events");
        let mut query = vec![
            ("execution_id", execution_id.to_string()),
            ("_offset", offset.to_string()),
            ("_size", size.to_string()),
            ("type", "cloudify_event".to_string()),
        ];
        if include_logs {
            query.push(("type", "cloudify_log".to_string()));
        }
        let request = self.http.get(&url).query(&query);
        let response: ListResponse<JsonValue> = self.send(url, request)?;
        Ok(EventsPage {
            items: response.items,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_under_api_prefix() {
        let client = RestManagerClient::with_base_url("http://10.0.0.1/").unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.1");
        assert_eq!(
            client.url("executions/abc"),
            "http://10.0.0.1/api/v2/executions/abc"
        );
    }

    #[test]
    fn test_unreachable_manager_is_a_connectivity_error() {
        let client = RestManagerClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.version().unwrap_err();
        assert!(err.is_connectivity(), "unexpected error: {err}");
    }

    #[test]
    fn test_list_response_ignores_metadata() {
        let raw = r#"{"items": [{"id": "e1", "status": "started"}],
                      "metadata": {"pagination": {"total": 1, "offset": 0}}}"#;
        let response: ListResponse<Execution> = serde_json::from_str(raw).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].status, ExecutionStatus::Started);
    }
}
