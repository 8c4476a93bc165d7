//! Remote tool store talking to the REST API served by `tooltrack serve`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use super::traits::ToolStore;
use crate::domain::{Tool, ToolData};
use crate::error::{Result, ToolTrackError};

/// Tool store where every operation is one HTTP round trip.
#[derive(Debug, Clone)]
pub struct RemoteToolStore {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RemoteToolStore {
    /// Create a store for the API rooted at `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ToolTrackError::Storage(format!("Invalid remote URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ToolTrackError::Storage(format!("Remote URL '{}' cannot be a base", base_url)));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `{base}/api/tools[/{id}]`
    fn tools_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "tools"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Turn a non-success response into an error, mapping 404 to not-found.
    async fn error_from(response: Response, id: Option<&str>) -> ToolTrackError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return ToolTrackError::ToolNotFound(id.to_string());
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        ToolTrackError::Remote {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ToolStore for RemoteToolStore {
    async fn list(&self) -> Result<Vec<Tool>> {
        let response = match self.client.get(self.tools_url(None)).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                log::warn!("Tool API unreachable, showing empty list: {}", e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Err(Self::error_from(response, None).await);
        }
        Ok(response.json().await?)
    }

    async fn create(&self, data: ToolData) -> Result<Tool> {
        let data = data.normalized()?;
        let response = self.client.post(self.tools_url(None)).json(&data).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, None).await);
        }
        let tool: Tool = response.json().await?;
        tracing::debug!(tool_id = %tool.id, "Created tool remotely");
        Ok(tool)
    }

    async fn update(&self, tool: &Tool) -> Result<Tool> {
        let tool = tool.clone().normalized()?;
        let response = self
            .client
            .put(self.tools_url(Some(&tool.id)))
            .json(&tool)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, Some(&tool.id)).await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.tools_url(Some(id))).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, Some(id)).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> RemoteToolStore {
        RemoteToolStore::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_tools_url() {
        let store = store("http://localhost:3001");
        assert_eq!(store.tools_url(None).as_str(), "http://localhost:3001/api/tools");
        assert_eq!(
            store.tools_url(Some("tool-1-ab12")).as_str(),
            "http://localhost:3001/api/tools/tool-1-ab12"
        );
    }

    #[test]
    fn test_tools_url_with_prefix_and_odd_id() {
        let store = store("http://example.com/inventory/");
        assert_eq!(
            store.tools_url(Some("a/b c")).as_str(),
            "http://example.com/inventory/api/tools/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RemoteToolStore::new("not a url", Duration::from_secs(1)).is_err());
        assert!(RemoteToolStore::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_list_connection_refused_is_empty() {
        // Bind then drop a listener to get a port nobody is serving
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let store = store(&format!("http://127.0.0.1:{}", port));

        let tools = store.list().await.unwrap();
        assert!(tools.is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let store = store("http://127.0.0.1:9");
        let result = store.create(ToolData::new("", "X")).await;
        assert!(matches!(result, Err(ToolTrackError::Validation(_))));
    }
}
