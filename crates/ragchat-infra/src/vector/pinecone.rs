//! Pinecone data-plane client.
//!
//! Implements `VectorIndex` from `ragchat-core` over the Pinecone REST API.
//! Documents carry their text in metadata under the configured `text_key`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ragchat_core::retrieval::index::VectorIndex;
use ragchat_types::config::RetrievalSettings;
use ragchat_types::error::RetrievalError;
use ragchat_types::retrieval::{ScoredDocument, VectorRecord};

pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

pub struct PineconeIndex {
    http: reqwest::Client,
    api_key: SecretString,
    host: String,
    namespace: Option<String>,
    text_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: usize,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

fn build_http() -> Result<reqwest::Client, RetrievalError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| RetrievalError::Config(format!("failed to build HTTP client: {e}")))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

impl PineconeIndex {
    pub fn new(
        api_key: SecretString,
        host: &str,
        namespace: Option<String>,
        text_key: String,
    ) -> Result<Self, RetrievalError> {
        Ok(Self {
            http: build_http()?,
            api_key,
            host: normalize_host(host),
            namespace: namespace.filter(|ns| !ns.is_empty()),
            text_key,
        })
    }

    /// Connect using configured settings, looking up the index host through
    /// the control plane when `index_host` is empty.
    pub async fn connect(settings: &RetrievalSettings) -> Result<Self, RetrievalError> {
        let api_key = SecretString::from(settings.pinecone_api_key.clone());
        let host = if settings.index_host.is_empty() {
            describe_index_host(&api_key, CONTROL_PLANE_URL, &settings.index_name).await?
        } else {
            settings.index_host.clone()
        };

        tracing::debug!(index = %settings.index_name, host = %host, "Connecting to Pinecone index");
        Self::new(
            api_key,
            &host,
            Some(settings.namespace.clone()),
            settings.text_key.clone(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn post<B: Serialize + ?Sized, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RetrievalError> {
        let response = self
            .http
            .post(format!("{}{path}", self.host))
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| RetrievalError::Index(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Index(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| RetrievalError::Index(format!("failed to parse response: {e}")))
    }
}

/// Look up the data-plane host of `index_name`.
pub async fn describe_index_host(
    api_key: &SecretString,
    control_plane_url: &str,
    index_name: &str,
) -> Result<String, RetrievalError> {
    if index_name.is_empty() {
        return Err(RetrievalError::Config("INDEX_NAME is not set".to_string()));
    }

    let response = build_http()?
        .get(format!(
            "{}/indexes/{index_name}",
            control_plane_url.trim_end_matches('/')
        ))
        .header("Api-Key", api_key.expose_secret())
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await
        .map_err(|e| RetrievalError::Index(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RetrievalError::Index(format!(
            "failed to describe index {index_name}: HTTP {status}: {body}"
        )));
    }

    let described: DescribeIndexResponse = response
        .json()
        .await
        .map_err(|e| RetrievalError::Index(format!("failed to parse response: {e}")))?;
    Ok(normalize_host(&described.host))
}

impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let response: QueryResponse = self
            .post(
                "/query",
                &QueryRequest {
                    vector,
                    top_k,
                    include_metadata: true,
                    namespace: self.namespace.as_deref(),
                },
            )
            .await?;

        let mut documents = Vec::with_capacity(response.matches.len());
        for m in response.matches {
            let text = m
                .metadata
                .as_ref()
                .and_then(|md| md.get(&self.text_key))
                .and_then(Value::as_str);
            match text {
                Some(text) => documents.push(ScoredDocument {
                    id: m.id,
                    score: m.score,
                    text: text.to_string(),
                }),
                None => tracing::warn!(
                    id = %m.id,
                    text_key = %self.text_key,
                    "Match has no text metadata, skipping"
                ),
            }
        }
        Ok(documents)
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, RetrievalError> {
        if records.is_empty() {
            return Ok(0);
        }
        let response: UpsertResponse = self
            .post(
                "/vectors/upsert",
                &UpsertRequest {
                    vectors: records,
                    namespace: self.namespace.as_deref(),
                },
            )
            .await?;
        Ok(response.upserted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    fn index(host: &str, namespace: Option<&str>) -> PineconeIndex {
        PineconeIndex::new(
            SecretString::from("pc-test".to_string()),
            host,
            namespace.map(str::to_string),
            "text".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_host_gets_scheme() {
        assert_eq!(
            index("my-index-abc.svc.pinecone.io", None).host(),
            "https://my-index-abc.svc.pinecone.io"
        );
        assert_eq!(index("http://localhost:5080/", None).host(), "http://localhost:5080");
    }

    #[tokio::test]
    async fn test_query_reads_text_metadata() {
        let (base, server) = serve_once(
            200,
            r#"{"matches": [
                {"id": "a-0", "score": 0.92, "metadata": {"text": "alpha", "source": "a.md"}},
                {"id": "b-0", "score": 0.80, "metadata": {"source": "b.md"}},
                {"id": "c-1", "score": 0.75, "metadata": {"text": "gamma"}}
            ]}"#,
        )
        .await;

        let docs = index(&base, Some("docs")).query(&[0.1, 0.2], 3).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a-0");
        assert_eq!(docs[0].text, "alpha");
        assert_eq!(docs[1].text, "gamma");

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /query HTTP/1.1");
        assert_eq!(request.header("api-key"), Some("pc-test"));
        assert_eq!(request.header("x-pinecone-api-version"), Some(API_VERSION));
        let body = request.body_json();
        assert_eq!(body["topK"], 3);
        assert_eq!(body["includeMetadata"], true);
        assert_eq!(body["namespace"], "docs");
    }

    #[tokio::test]
    async fn test_query_omits_empty_namespace() {
        let (base, server) = serve_once(200, r#"{"matches": []}"#).await;
        let docs = index(&base, Some("")).query(&[0.5], 4).await.unwrap();
        assert!(docs.is_empty());

        let body = server.await.unwrap().body_json();
        assert!(body.get("namespace").is_none());
    }

    #[tokio::test]
    async fn test_upsert_returns_count() {
        let (base, server) = serve_once(200, r#"{"upsertedCount": 2}"#).await;
        let records = vec![
            VectorRecord::with_text("doc-0", vec![1.0], "text", "one", "doc.md"),
            VectorRecord::with_text("doc-1", vec![2.0], "text", "two", "doc.md"),
        ];

        let count = index(&base, None).upsert(&records).await.unwrap();
        assert_eq!(count, 2);

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /vectors/upsert HTTP/1.1");
        let body = request.body_json();
        assert_eq!(body["vectors"][1]["id"], "doc-1");
        assert_eq!(body["vectors"][0]["metadata"]["text"], "one");
    }

    #[tokio::test]
    async fn test_query_http_error() {
        let (base, _server) = serve_once(401, r#"{"message": "bad key"}"#).await;
        let err = index(&base, None).query(&[0.1], 1).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Index(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn test_describe_index_host() {
        let (base, server) = serve_once(
            200,
            r#"{"name": "docs", "host": "docs-xyz.svc.pinecone.io", "dimension": 1536}"#,
        )
        .await;

        let host = describe_index_host(&SecretString::from("pc-test".to_string()), &base, "docs")
            .await
            .unwrap();
        assert_eq!(host, "https://docs-xyz.svc.pinecone.io");

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "GET /indexes/docs HTTP/1.1");
    }
}
