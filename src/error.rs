use std::{error::Error as StdError, fmt};

use http::{HeaderMap, StatusCode, Uri};

/// A `Result` alias where the `Err` case is `follow_redirect::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// A boxed error type that can be used for dynamic error handling.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The Errors that may occur while building the next request of a redirect chain.
///
/// Errors returned by the inner service are never wrapped in this type; they are
/// handed back to the caller unchanged.
///
/// Note: Errors may include the full URI of the request whose hop failed. If the
/// URI contains sensitive information (e.g. an API key as a query parameter), be
/// sure to remove it ([`without_uri`](Error::without_uri))
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    uri: Option<Uri>,
    response: Option<Snapshot>,
}

/// Status and headers of the last good response seen before the failure.
struct Snapshot {
    status: StatusCode,
    headers: HeaderMap,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
                uri: None,
                response: None,
            }),
        }
    }

    pub(crate) fn invalid_input<E: Into<BoxError>>(e: E) -> Error {
        Error::new(Kind::InvalidInput, Some(e))
    }

    pub(crate) fn malformed_target<E: Into<BoxError>>(e: E) -> Error {
        Error::new(Kind::MalformedTarget, Some(e))
    }

    pub(crate) fn with_response<B>(mut self, response: &http::Response<B>) -> Self {
        self.inner.response = Some(Snapshot {
            status: response.status(),
            headers: response.headers().clone(),
        });
        self
    }
}

impl Error {
    /// Returns the URI of the request whose redirect could not be followed.
    pub fn uri(&self) -> Option<&Uri> {
        self.inner.uri.as_ref()
    }

    /// Add a uri related to this error (overwriting any existing)
    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.inner.uri = Some(uri);
        self
    }

    /// Strip the related uri from this error (if, for example, it contains
    /// sensitive information)
    pub fn without_uri(mut self) -> Self {
        self.inner.uri = None;
        self
    }

    /// Returns true if the request or the redirect response could not be used
    /// to build the next hop.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.inner.kind, Kind::InvalidInput)
    }

    /// Returns true if the `Location` header could not be parsed as a URL.
    pub fn is_malformed_target(&self) -> bool {
        matches!(self.inner.kind, Kind::MalformedTarget)
    }

    /// Returns the status code of the redirect response that could not be followed.
    pub fn status(&self) -> Option<StatusCode> {
        self.inner.response.as_ref().map(|r| r.status)
    }

    /// Returns the headers of the redirect response that could not be followed.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.inner.response.as_ref().map(|r| &r.headers)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("follow_redirect::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref uri) = self.inner.uri {
            builder.field("uri", uri);
        }

        if let Some(ref response) = self.inner.response {
            builder.field("status", &response.status);
        }

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner.kind {
            Kind::InvalidInput => f.write_str("invalid redirect input")?,
            Kind::MalformedTarget => f.write_str("malformed redirect target")?,
        };

        if let Some(uri) = &self.inner.uri {
            write!(f, " for uri ({})", uri)?;
        }

        if let Some(e) = &self.inner.source {
            write!(f, ": {e}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    InvalidInput,
    MalformedTarget,
}

#[derive(Debug)]
pub(crate) struct MissingLocation;

impl fmt::Display for MissingLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("response has no usable Location header")
    }
}

impl StdError for MissingLocation {}

#[derive(Debug)]
pub(crate) struct RelativeRequestUri;

impl fmt::Display for RelativeRequestUri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("request URI has no scheme or authority")
    }
}

impl StdError for RelativeRequestUri {}
