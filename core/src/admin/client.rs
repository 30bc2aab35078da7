// bulk_reroute/src/admin/client.rs
use super::{AdminGraphql, GraphqlRequest, ResultFileSource};
use crate::error::{RelayError, RelayResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, error, instrument};

pub const DEFAULT_API_VERSION: &str = "2025-07";

/// What is needed to reach one shop's admin API.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
  pub shop_domain: String,
  pub access_token: String,
  pub api_version: String,
}

impl AdminCredentials {
  /// Fails when the domain or token is blank.
  pub fn new(
    shop_domain: impl Into<String>,
    access_token: impl Into<String>,
    api_version: Option<String>,
  ) -> RelayResult<Self> {
    let shop_domain = shop_domain.into().trim().to_string();
    let access_token = access_token.into().trim().to_string();
    if shop_domain.is_empty() {
      return Err(RelayError::Configuration("shop domain is not set".to_string()));
    }
    if access_token.is_empty() {
      return Err(RelayError::Configuration("admin API access token is not set".to_string()));
    }
    Ok(Self {
      shop_domain,
      access_token,
      api_version: api_version
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
    })
  }

  pub fn graphql_endpoint(&self) -> String {
    let base = if self.shop_domain.starts_with("http://") || self.shop_domain.starts_with("https://") {
      self.shop_domain.trim_end_matches('/').to_string()
    } else {
      format!("https://{}", self.shop_domain)
    };
    format!("{}/admin/api/{}/graphql.json", base, self.api_version)
  }
}

#[derive(Debug, Clone)]
pub struct AdminClient {
  http: Client,
  endpoint: String,
  access_token: String,
}

impl AdminClient {
  pub fn new(credentials: &AdminCredentials) -> Self {
    Self::with_client(Client::new(), credentials)
  }

  pub fn with_client(http: Client, credentials: &AdminCredentials) -> Self {
    Self {
      http,
      endpoint: credentials.graphql_endpoint(),
      access_token: credentials.access_token.clone(),
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl AdminGraphql for AdminClient {
  #[instrument(name = "AdminClient::execute", skip_all, fields(operation = request.operation_name), err(Display))]
  async fn execute(&self, request: GraphqlRequest) -> RelayResult<JsonValue> {
    let response = self
      .http
      .post(&self.endpoint)
      .header("X-Shopify-Access-Token", &self.access_token)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(RelayError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
      });
    }

    let mut body: JsonValue = response.json().await?;
    debug!(operation = request.operation_name, "GraphQL response received.");

    if let Some(errors) = body.get("errors").filter(|e| !is_empty_json(e)) {
      error!(operation = request.operation_name, errors = %errors, "GraphQL errors.");
      return Err(RelayError::Graphql(errors.to_string()));
    }

    match body.get_mut("data").map(JsonValue::take) {
      Some(data) if !data.is_null() => Ok(data),
      _ => Err(RelayError::UnexpectedResponse(format!(
        "{} response has no data",
        request.operation_name
      ))),
    }
  }
}

fn is_empty_json(value: &JsonValue) -> bool {
  match value {
    JsonValue::Null => true,
    JsonValue::Array(items) => items.is_empty(),
    _ => false,
  }
}

/// Downloads result files with a plain, unauthenticated GET.
#[derive(Debug, Clone, Default)]
pub struct HttpResultFiles {
  http: Client,
}

impl HttpResultFiles {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ResultFileSource for HttpResultFiles {
  #[instrument(name = "HttpResultFiles::fetch", skip(self), err(Display))]
  async fn fetch(&self, url: &str) -> RelayResult<String> {
    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(RelayError::Download {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
      });
    }
    Ok(response.text().await?)
  }
}
