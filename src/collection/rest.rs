//! REST backend: one HTTP verb per collection operation
//!
//! `GET <endpoint>` lists, `POST <endpoint>` creates, `PUT <endpoint>/<id>`
//! updates and `DELETE <endpoint>/<id>` deletes. There is no retry and no
//! concurrency token; a failure is reported once and the caller keeps its
//! previous state.

use crate::config::{ApiConfig, TokenProvider};
use crate::error::{ConsoleError, ConsoleResult};
use crate::records::{Record, RecordId, RecordSchema};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct RestBackend {
    client: Client,
    endpoint: String,
    token: TokenProvider,
}

impl RestBackend {
    pub fn new(endpoint: String, api: &ApiConfig) -> ConsoleResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|source| ConsoleError::Http {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: api.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.token.resolve() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and return the parsed JSON body (`None` when empty)
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Map<String, Value>>,
        module: &str,
    ) -> ConsoleResult<Option<Value>> {
        debug!(%method, url, "sending request");
        let mut builder = self.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| ConsoleError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ConsoleError::Http {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            warn!(%method, url, status = status.as_u16(), "request rejected");
            return Err(ConsoleError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ConsoleError::Decode {
                module: module.to_string(),
                message: format!("invalid JSON from {}: {}", url, e),
            })
    }

    /// GET the collection; accepts a bare array or an object with a `data` array
    pub async fn fetch_all(&self, schema: &RecordSchema) -> ConsoleResult<Vec<Record>> {
        let body = self
            .send(Method::GET, &self.endpoint, None, &schema.name)
            .await?
            .unwrap_or(Value::Array(Vec::new()));

        let rows = match body {
            Value::Array(rows) => rows,
            Value::Object(mut object) => match object.remove("data") {
                Some(Value::Array(rows)) => rows,
                _ => {
                    return Err(ConsoleError::Decode {
                        module: schema.name.clone(),
                        message: "expected a JSON array of records".to_string(),
                    });
                }
            },
            _ => {
                return Err(ConsoleError::Decode {
                    module: schema.name.clone(),
                    message: "expected a JSON array of records".to_string(),
                });
            }
        };

        let (records, skipped) = schema.decode_all(&rows);
        if skipped > 0 {
            warn!(module = %schema.name, skipped, "skipped undecodable records");
        }
        Ok(records)
    }

    /// POST a new record; `with_id` sends the client-assigned id
    ///
    /// Returns the server's version of the record when the response has one.
    pub async fn insert(
        &self,
        schema: &RecordSchema,
        record: &Record,
        with_id: bool,
    ) -> ConsoleResult<Option<Record>> {
        let body = if with_id {
            schema.encode(record)
        } else {
            schema.encode_fields(record)
        };
        let response = self
            .send(Method::POST, &self.endpoint, Some(&body), &schema.name)
            .await?;
        Ok(decode_single(schema, response))
    }

    /// PUT the full merged record
    pub async fn replace(&self, schema: &RecordSchema, record: &Record) -> ConsoleResult<Option<Record>> {
        let url = self.record_url(record.id);
        let body = schema.encode(record);
        let response = self.send(Method::PUT, &url, Some(&body), &schema.name).await?;
        Ok(decode_single(schema, response))
    }

    pub async fn remove(&self, schema: &RecordSchema, id: RecordId) -> ConsoleResult<()> {
        let url = self.record_url(id);
        self.send(Method::DELETE, &url, None, &schema.name).await?;
        Ok(())
    }
}

/// Decode a single-record response, unwrapping a `data` envelope
///
/// The result holds only the fields the response actually sent, so callers
/// overlay it onto their own copy of the record.
fn decode_single(schema: &RecordSchema, body: Option<Value>) -> Option<Record> {
    let object = match body? {
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                object.insert("data".to_string(), other);
                object
            }
            None => object,
        },
        _ => return None,
    };

    match schema.decode(&object) {
        Ok((mut record, issues)) => {
            for issue in &issues {
                warn!(module = %schema.name, id = %record.id, %issue, "lenient decode");
            }
            // Acknowledgements like {"id": 1, "message": "ok"} carry no fields
            record.fields.retain(|name, _| object.contains_key(name));
            Some(record)
        }
        Err(e) => {
            debug!(module = %schema.name, error = %e, "response carries no record");
            None
        }
    }
}
