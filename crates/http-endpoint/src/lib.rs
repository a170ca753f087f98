//! An endpoint that exchanges chat messages with a remote HTTP server.
//!
//! Every message is posted as one JSON document. The server is expected to
//! answer with a JSON object carrying the reply text in one of a few
//! accepted fields (see [`HttpEndpointConfigBuilder::with_reply_fields`]).

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::sync::Arc;

use chat_widget_protocol::{
    Endpoint, EndpointError, ErrorKind, ExchangeRequest, ExchangeResponse,
};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;

pub use config::{
    DEFAULT_REPLY_FIELDS, HttpEndpointConfig, HttpEndpointConfigBuilder,
};

/// Error type for [`HttpEndpoint`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() || err.is_request()
        {
            ErrorKind::Connectivity
        } else if let Some(status) = err.status() {
            classify_status(status)
        } else {
            ErrorKind::Other
        };
        Self::new(format!("{err}"), kind)
    }

    fn from_status(status: StatusCode) -> Self {
        Self::new(format!("HTTP error: {status}"), classify_status(status))
    }
}

impl EndpointError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

fn classify_status(status: StatusCode) -> ErrorKind {
    if status == StatusCode::NOT_FOUND {
        ErrorKind::NotFound
    } else if status.is_server_error() {
        ErrorKind::ServerError
    } else {
        ErrorKind::Other
    }
}

/// HTTP chat endpoint.
#[derive(Clone, Debug)]
pub struct HttpEndpoint {
    client: Client,
    config: Arc<HttpEndpointConfig>,
}

impl HttpEndpoint {
    /// Creates a new `HttpEndpoint` with the given configuration.
    #[inline]
    pub fn new(config: HttpEndpointConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Creates an endpoint with the same settings and connection pool,
    /// but posting to another URL.
    pub fn with_url<S: Into<String>>(&self, url: S) -> Self {
        let config = HttpEndpointConfig {
            url: url.into(),
            ..(*self.config).clone()
        };
        Self {
            client: self.client.clone(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this endpoint.
    #[inline]
    pub fn config(&self) -> &HttpEndpointConfig {
        &self.config
    }
}

impl Endpoint for HttpEndpoint {
    type Error = Error;

    fn send_request(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(req);
        let mut builder = self
            .client
            .post(&self.config.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let resp_fut = builder.json(&body).send();
        let config = Arc::clone(&self.config);

        async move {
            let resp = resp_fut.await.map_err(Error::from_transport)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(Error::from_status(status));
            }

            let text = resp.text().await.map_err(Error::from_transport)?;
            let body: Value = match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(err) => {
                    debug!("response body is not JSON: {err}");
                    return Ok(ExchangeResponse::default());
                }
            };
            let reply = proto::extract_reply(&body, &config.reply_fields);
            if reply.is_none() {
                debug!("no accepted reply field in response: {body}");
            }
            Ok(ExchangeResponse { reply })
        }
    }
}
