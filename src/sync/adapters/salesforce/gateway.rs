//! `reqwest`-backed CRM gateway speaking the Salesforce REST API.

use super::soql;
use crate::sync::{
    domain::{CrmRecord, RecordId},
    ports::{CrmGateway, CrmGatewayError, CrmGatewayResult, CrmObject, RecordQuery},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-request timeout for CRM calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Metadata member Salesforce attaches to every returned record.
const ATTRIBUTES_FIELD: &str = "attributes";

fn default_api_version() -> String {
    "59.0".to_owned()
}

/// Session details for an already authenticated Salesforce org.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalesforceConnection {
    /// Org base URL, e.g. `https://example.my.salesforce.com`.
    pub instance_url: String,
    /// OAuth access token or session id.
    pub access_token: String,
    /// REST API version without the leading `v`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Whether the org is a sandbox.
    ///
    /// The session is already authenticated against `instance_url`, which
    /// selects the org. This flag only labels the run in logs and is not
    /// checked against the URL.
    #[serde(default)]
    pub sandbox: bool,
}

impl SalesforceConnection {
    /// Returns the environment label for logs.
    #[must_use]
    pub const fn environment(&self) -> &'static str {
        if self.sandbox { "sandbox" } else { "production" }
    }
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    records: Vec<CrmRecord>,
    #[serde(rename = "nextRecordsUrl", default)]
    next_records_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// CRM gateway for one Salesforce org.
#[derive(Clone)]
pub struct SalesforceGateway {
    client: Client,
    instance_url: String,
    api_version: String,
    access_token: String,
}

impl std::fmt::Debug for SalesforceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceGateway")
            .field("instance_url", &self.instance_url)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SalesforceGateway {
    /// Creates a gateway for the given session.
    ///
    /// # Errors
    ///
    /// Returns [`CrmGatewayError::Transport`] when the HTTP client cannot be
    /// initialised.
    pub fn new(connection: &SalesforceConnection) -> CrmGatewayResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CrmGatewayError::transport)?;
        Ok(Self {
            client,
            instance_url: connection.instance_url.trim_end_matches('/').to_owned(),
            api_version: connection.api_version.trim_start_matches('v').to_owned(),
            access_token: connection.access_token.clone(),
        })
    }

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}/{path}",
            self.instance_url, self.api_version
        )
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> CrmGatewayResult<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(CrmGatewayError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
            return Err(CrmGatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| CrmGatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CrmGateway for SalesforceGateway {
    #[instrument(level = "debug", skip(self, query), fields(object = %query.object()))]
    async fn query(&self, query: &RecordQuery) -> CrmGatewayResult<Vec<CrmRecord>> {
        let statement = soql::render(query);
        debug!(soql = %statement, "running CRM query");

        let mut page: QueryPage = self
            .send_json(
                self.client
                    .get(self.data_url("query/"))
                    .query(&[("q", statement.as_str())]),
            )
            .await?;

        let mut records = Vec::new();
        loop {
            records.extend(page.records.into_iter().map(|mut record| {
                record.remove(ATTRIBUTES_FIELD);
                record
            }));
            let Some(next) = page.next_records_url else {
                break;
            };
            page = self
                .send_json(self.client.get(format!("{}{next}", self.instance_url)))
                .await?;
        }
        Ok(records)
    }

    #[instrument(level = "debug", skip(self, record), fields(object = %object))]
    async fn create(&self, object: CrmObject, record: &CrmRecord) -> CrmGatewayResult<RecordId> {
        let url = self.data_url(&format!("sobjects/{}/", object.as_str()));
        let response: CreateResponse = self
            .send_json(self.client.post(url).json(record))
            .await?;

        if !response.success {
            let errors = serde_json::Value::Array(response.errors);
            return Err(CrmGatewayError::Rejected {
                status: 200,
                message: errors.to_string(),
            });
        }

        let id = response
            .id
            .ok_or_else(|| CrmGatewayError::Decode("create response has no id".to_owned()))?;
        RecordId::new(id).map_err(|err| CrmGatewayError::Decode(err.to_string()))
    }
}
