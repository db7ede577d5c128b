//! Typed access to the campaign backend. Every method issues exactly one
//! request and classifies the outcome; nothing is retried.

use crate::config::ConsoleConfig;
use crate::errors::OperationError;
use crate::forms::FileUpload;
use crate::models::{
    Campaign, InboundEvent, NewCampaign, NewSegment, NewTemplate, Segment, StatsSnapshot, Template,
};
use reqwest::{
    multipart::{Form, Part},
    Client, Response, Url,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_prefix: String,
    ingestion_prefix: String,
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &ConsoleConfig) -> Self {
        Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_prefix: config.api_prefix.clone(),
            ingestion_prefix: config.ingestion_prefix.clone(),
        }
    }

    pub async fn upload_users(&self, file: FileUpload) -> Result<Value, OperationError> {
        self.upload(self.ingestion_url("/ingestions/users"), file).await
    }

    pub async fn upload_events(&self, file: FileUpload) -> Result<Value, OperationError> {
        self.upload(self.ingestion_url("/ingestions/events"), file).await
    }

    pub async fn create_template(&self, body: &NewTemplate) -> Result<Value, OperationError> {
        let url = self.api_url("/templates/");
        debug!("POST {url}");
        outcome(self.http.post(url).json(body).send().await?).await
    }

    pub async fn create_segment(&self, body: &NewSegment) -> Result<Value, OperationError> {
        let url = self.api_url("/segments/");
        debug!("POST {url}");
        outcome(self.http.post(url).json(body).send().await?).await
    }

    pub async fn create_campaign(&self, body: &NewCampaign) -> Result<Value, OperationError> {
        let url = self.api_url("/campaigns/");
        debug!("POST {url}");
        outcome(self.http.post(url).json(body).send().await?).await
    }

    pub async fn run_campaign(&self, campaign_id: &str) -> Result<Value, OperationError> {
        let url = self.api_url_with_id("/orchestration/run", campaign_id)?;
        debug!("POST {url}");
        outcome(self.http.post(url).send().await?).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<Value, OperationError> {
        self.delete("/templates", id).await
    }

    pub async fn delete_segment(&self, id: &str) -> Result<Value, OperationError> {
        self.delete("/segments", id).await
    }

    pub async fn delete_campaign(&self, id: &str) -> Result<Value, OperationError> {
        self.delete("/campaigns", id).await
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, OperationError> {
        self.get_typed(self.api_url("/templates/")).await
    }

    pub async fn list_segments(&self) -> Result<Vec<Segment>, OperationError> {
        self.get_typed(self.api_url("/segments/")).await
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, OperationError> {
        self.get_typed(self.api_url("/campaigns/")).await
    }

    pub async fn inbound_events(&self) -> Result<Vec<InboundEvent>, OperationError> {
        self.get_typed(self.api_url("/events/inbound")).await
    }

    pub async fn stats(&self) -> Result<StatsSnapshot, OperationError> {
        self.get_typed(self.ingestion_url("/ingestions/stats")).await
    }

    async fn upload(&self, url: String, file: FileUpload) -> Result<Value, OperationError> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        debug!("POST {url} (multipart)");
        outcome(self.http.post(url).multipart(form).send().await?).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<Value, OperationError> {
        let url = self.api_url_with_id(collection, id)?;
        debug!("DELETE {url}");
        outcome(self.http.delete(url).send().await?).await
    }

    async fn get_typed<T: DeserializeOwned>(&self, url: String) -> Result<T, OperationError> {
        debug!("GET {url}");
        let body = outcome(self.http.get(url).send().await?).await?;
        serde_json::from_value(body).map_err(|err| {
            OperationError::transport(format!("unexpected response shape: {err}"))
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    fn ingestion_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.ingestion_prefix, path)
    }

    /// Appends `id` as one escaped path segment.
    fn api_url_with_id(&self, path: &str, id: &str) -> Result<Url, OperationError> {
        let mut url = Url::parse(&self.api_url(path)).map_err(OperationError::transport)?;
        url.path_segments_mut()
            .map_err(|_| OperationError::transport(format!("cannot address {path} on backend URL")))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

/// Success needs a 2xx status and a JSON body; an empty success body counts
/// as `{}`. An empty error body is replaced by `{ "error": "HTTP <status>" }`.
async fn outcome(response: Response) -> Result<Value, OperationError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let empty = bytes.iter().all(u8::is_ascii_whitespace);

    if !status.is_success() && empty {
        return Err(OperationError::Server {
            status: status.as_u16(),
            body: json!({ "error": format!("HTTP {status}") }),
        });
    }

    let body = if empty {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&bytes).map_err(|err| {
            OperationError::transport(format!("HTTP {status}: response is not JSON ({err})"))
        })?
    };

    if status.is_success() {
        Ok(body)
    } else {
        Err(OperationError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(prefix: &str) -> ApiClient {
        let config = ConsoleConfig {
            backend_url: "http://backend.local:5000/".into(),
            api_prefix: prefix.into(),
            ..ConsoleConfig::default()
        };
        ApiClient::new(&config)
    }

    #[test]
    fn crud_routes_carry_prefix_but_ingestion_does_not() {
        let api = client("/api/v1");
        assert_eq!(api.api_url("/templates/"), "http://backend.local:5000/api/v1/templates/");
        assert_eq!(
            api.ingestion_url("/ingestions/stats"),
            "http://backend.local:5000/ingestions/stats"
        );
    }

    #[test]
    fn ids_are_escaped_as_one_segment() {
        let api = client("/api/v1");
        let url = api.api_url_with_id("/orchestration/run", "spring sale/2").unwrap();
        assert_eq!(
            url.as_str(),
            "http://backend.local:5000/api/v1/orchestration/run/spring%20sale%2F2"
        );
    }
}
