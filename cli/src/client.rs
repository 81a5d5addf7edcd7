//! # HTTP JSON-RPC Client
//!
//! A reqwest-backed [`Transport`] for Tempo nodes: raw transaction broadcast
//! (async and sync variants), remote signing, nonce and block queries, and
//! batched requests. Supports HTTP basic auth and a per-request timeout.

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use tempo_protocol::config::{
    DEFAULT_RPC_TIMEOUT, METHOD_SEND_RAW_TRANSACTION, METHOD_SEND_RAW_TRANSACTION_SYNC,
    METHOD_SIGN_TRANSACTION,
};
use tempo_protocol::rpc::{
    self, BatchRequest, RpcClientError, RpcRequest, RpcResponse, Transport,
};

/// Consuming builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    url: String,
    auth: Option<(String, String)>,
    timeout: Duration,
}

impl HttpClientBuilder {
    /// Enables HTTP basic auth on every request.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Overrides the request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, RpcClientError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| RpcClientError::Request {
                url: self.url.clone(),
                reason: err.to_string(),
            })?;

        Ok(HttpClient {
            url: self.url,
            auth: self.auth,
            client,
        })
    }
}

/// JSON-RPC client for a single Tempo endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    url: String,
    auth: Option<(String, String)>,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn builder(url: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder {
            url: url.into(),
            auth: None,
            timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and returns the raw response, RPC error included.
    pub async fn send_request(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<RpcResponse, RpcClientError> {
        let request = RpcRequest::new(1, method, params);
        tracing::debug!(url = %self.url, method, "sending JSON-RPC request");
        self.post(&request).await
    }

    /// Broadcasts a raw `0x76…` transaction and returns its hash.
    pub async fn send_raw_transaction(&self, raw_tx: &str) -> Result<String, RpcClientError> {
        self.send_raw_transaction_with_method(METHOD_SEND_RAW_TRANSACTION, raw_tx)
            .await
    }

    /// Broadcasts a raw transaction and waits for the node to include it.
    pub async fn send_raw_transaction_sync(&self, raw_tx: &str) -> Result<String, RpcClientError> {
        self.send_raw_transaction_with_method(METHOD_SEND_RAW_TRANSACTION_SYNC, raw_tx)
            .await
    }

    /// Broadcasts a raw transaction through an arbitrary method.
    pub async fn send_raw_transaction_with_method(
        &self,
        method: &str,
        raw_tx: &str,
    ) -> Result<String, RpcClientError> {
        let result = self
            .call(method, vec![Value::String(raw_tx.to_string())])
            .await?;
        expect_string(method, result)
    }

    /// Asks the node to sign a transaction object without broadcasting it.
    ///
    /// Nodes answer either `{"raw": "0x…", "tx": {…}}` or the raw hex string
    /// directly; both are accepted.
    pub async fn sign_transaction(&self, tx: Value) -> Result<String, RpcClientError> {
        let method = METHOD_SIGN_TRANSACTION;
        match self.call(method, vec![tx]).await? {
            Value::String(raw) => Ok(raw),
            Value::Object(mut fields) => match fields.remove("raw") {
                Some(Value::String(raw)) => Ok(raw),
                _ => Err(RpcClientError::UnexpectedResult {
                    method: method.to_string(),
                    result: Value::Object(fields),
                }),
            },
            other => Err(RpcClientError::UnexpectedResult {
                method: method.to_string(),
                result: other,
            }),
        }
    }

    /// Pending nonce of `address`.
    pub async fn get_transaction_count(&self, address: Address) -> Result<u64, RpcClientError> {
        rpc::pending_nonce(self, address).await
    }

    /// Latest block number. Doubles as a liveness probe.
    pub async fn block_number(&self) -> Result<u64, RpcClientError> {
        rpc::block_number(self).await
    }

    /// Sends every request of `batch` in one HTTP round trip. An empty batch
    /// returns immediately without touching the network.
    pub async fn send_batch(
        &self,
        batch: &BatchRequest,
    ) -> Result<Vec<RpcResponse>, RpcClientError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(url = %self.url, size = batch.len(), "sending JSON-RPC batch");
        self.post(batch.requests()).await
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcClientError> {
        self.send_request(method, params)
            .await?
            .into_result()
            .map_err(|source| RpcClientError::Rpc {
                method: method.to_string(),
                source,
            })
    }

    async fn post<B, R>(&self, body: &B) -> Result<R, RpcClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(&self.url).json(body);
        if let Some((username, password)) = &self.auth {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(|err| self.request_error(err))?;
        let status = response.status();
        let text = response.text().await.map_err(|err| self.request_error(err))?;

        if status != StatusCode::OK {
            tracing::warn!(url = %self.url, status = status.as_u16(), "JSON-RPC endpoint returned an HTTP error");
            return Err(RpcClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn request_error(&self, err: reqwest::Error) -> RpcClientError {
        RpcClientError::Request {
            url: self.url.clone(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn submit(&self, raw_tx: &str) -> Result<String, RpcClientError> {
        self.send_raw_transaction(raw_tx).await
    }

    async fn query(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcClientError> {
        self.call(method, params).await
    }
}

fn expect_string(method: &str, result: Value) -> Result<String, RpcClientError> {
    match result {
        Value::String(text) => Ok(text),
        other => Err(RpcClientError::UnexpectedResult {
            method: method.to_string(),
            result: other,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
