use std::fmt::Debug;

/// Reply fields accepted by default, in priority order.
pub const DEFAULT_REPLY_FIELDS: [&str; 3] = ["response", "message", "reply"];

/// Builder for [`HttpEndpointConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpEndpointConfigBuilder {
    url: String,
    reply_fields: Option<Vec<String>>,
    headers: Vec<(String, String)>,
}

impl HttpEndpointConfigBuilder {
    /// Creates a builder targeting the given URL.
    #[inline]
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            reply_fields: None,
            headers: vec![],
        }
    }

    /// Sets the response fields that may carry the reply text. The first
    /// populated one wins.
    #[inline]
    pub fn with_reply_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reply_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a static header sent along with every request.
    #[inline]
    pub fn with_header<K: Into<String>, V: Into<String>>(
        mut self,
        name: K,
        value: V,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpEndpointConfig {
        let reply_fields = self
            .reply_fields
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_REPLY_FIELDS.iter().map(|f| f.to_string()).collect()
            });
        HttpEndpointConfig {
            url: self.url,
            reply_fields,
            headers: self.headers,
        }
    }
}

impl Debug for HttpEndpointConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEndpointConfigBuilder")
            .field("url", &self.url)
            .field("reply_fields", &self.reply_fields)
            .field("headers", &RedactedHeaders(&self.headers))
            .finish()
    }
}

/// Configuration for [`crate::HttpEndpoint`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpEndpointConfig {
    pub(crate) url: String,
    pub(crate) reply_fields: Vec<String>,
    pub(crate) headers: Vec<(String, String)>,
}

impl HttpEndpointConfig {
    /// Returns the URL requests are posted to.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the accepted reply fields in priority order.
    #[inline]
    pub fn reply_fields(&self) -> &[String] {
        &self.reply_fields
    }
}

impl Debug for HttpEndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEndpointConfig")
            .field("url", &self.url)
            .field("reply_fields", &self.reply_fields)
            .field("headers", &RedactedHeaders(&self.headers))
            .finish()
    }
}

// Header values may hold site keys, only names are printed.
struct RedactedHeaders<'a>(&'a [(String, String)]);

impl Debug for RedactedHeaders<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, _)| (name, "<deducted>")))
            .finish()
    }
}
