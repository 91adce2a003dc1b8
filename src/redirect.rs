//! Redirect Handling
//!
//! By default, a [`FollowRedirect`] service follows every redirect response it
//! sees, up to a maximum redirect chain of 5 hops. To customize this behavior, a
//! `redirect::Policy` can be passed to the layer, or to a single call through
//! [`FollowRedirect::call_with_policy`].
//!
//! [`FollowRedirect`]: crate::layer::redirect::FollowRedirect
//! [`FollowRedirect::call_with_policy`]: crate::layer::redirect::FollowRedirect::call_with_policy

use std::{fmt, sync::Arc};

use http::{HeaderMap, Method, StatusCode, Uri};

/// Number of hops followed when no maximum, or a maximum below one, is configured.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Upper bound on the number of hops, whatever the configured maximum.
pub const ABSOLUTE_MAX_REDIRECTS: usize = 20;

/// A type that controls the policy on how to handle the following of redirects.
///
/// A policy pairs an optional predicate, deciding per hop whether a redirect
/// should be followed, with the maximum number of hops in one chain.
///
/// - `limited` adjusts the allowed maximum redirect hops in a chain.
/// - `custom` installs a predicate consulted before every hop.
///
/// Once built a policy is immutable, and cloning it is cheap.
#[derive(Clone)]
pub struct Policy {
    should_redirect: Option<Arc<dyn Fn(&Attempt<'_>) -> bool + Send + Sync + 'static>>,
    max_redirects: i32,
}

/// A type that holds information on the request and the redirect response
/// of one hop in a redirect chain.
#[derive(Debug)]
pub struct Attempt<'a> {
    pub(crate) method: &'a Method,
    pub(crate) uri: &'a Uri,
    pub(crate) request_headers: &'a HeaderMap,
    pub(crate) status: StatusCode,
    pub(crate) response_headers: &'a HeaderMap,
    pub(crate) location: &'a str,
    pub(crate) hops: usize,
}

impl Policy {
    /// Create a `Policy` that follows every redirect, up to the default maximum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `Policy` with a maximum number of redirects.
    ///
    /// Values below one fall back to [`DEFAULT_MAX_REDIRECTS`], values above
    /// [`ABSOLUTE_MAX_REDIRECTS`] are capped to it. Reaching the maximum is not an
    /// error: the last redirect response is returned as-is.
    pub fn limited(max: i32) -> Self {
        Self {
            should_redirect: None,
            max_redirects: max,
        }
    }

    /// Create a custom `Policy` using the passed predicate.
    ///
    /// The predicate is only consulted for redirect responses that are still
    /// within the hop budget; returning `false` stops the chain and hands the
    /// redirect response back to the caller. Responses that are not redirects,
    /// and redirects past the limit, never reach it, so a predicate with side
    /// effects sees fewer calls than there are responses in the chain.
    ///
    /// # Example
    ///
    /// ```rust
    /// use follow_redirect::redirect::Policy;
    ///
    /// // never leave example.com
    /// let policy = Policy::custom(|attempt| {
    ///     attempt.location().starts_with('/')
    ///         || attempt.location().starts_with("https://example.com/")
    /// });
    /// assert_eq!(policy.max_redirects(), 5);
    /// ```
    pub fn custom<T>(predicate: T) -> Self
    where
        T: Fn(&Attempt<'_>) -> bool + Send + Sync + 'static,
    {
        Self::default().with_should_redirect(predicate)
    }

    /// Replace the maximum number of redirects, keeping the predicate.
    pub fn with_max_redirects(mut self, max: i32) -> Self {
        self.max_redirects = max;
        self
    }

    /// Replace the predicate, keeping the maximum number of redirects.
    pub fn with_should_redirect<T>(mut self, predicate: T) -> Self
    where
        T: Fn(&Attempt<'_>) -> bool + Send + Sync + 'static,
    {
        self.should_redirect = Some(Arc::new(predicate));
        self
    }

    /// Returns the effective maximum number of hops, clamped to
    /// `1..=ABSOLUTE_MAX_REDIRECTS`.
    pub fn max_redirects(&self) -> usize {
        if self.max_redirects < 1 {
            DEFAULT_MAX_REDIRECTS
        } else {
            (self.max_redirects as usize).min(ABSOLUTE_MAX_REDIRECTS)
        }
    }

    /// Apply this policy's predicate to an [`Attempt`].
    ///
    /// A policy without a predicate always redirects.
    pub fn should_redirect(&self, attempt: &Attempt<'_>) -> bool {
        match self.should_redirect {
            Some(ref predicate) => predicate(attempt),
            None => true,
        }
    }
}

impl Default for Policy {
    fn default() -> Policy {
        Policy::limited(DEFAULT_MAX_REDIRECTS as i32)
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = if self.should_redirect.is_some() {
            "Custom"
        } else {
            "Always"
        };
        f.debug_struct("Policy")
            .field("kind", &format_args!("{kind}"))
            .field("max_redirects", &self.max_redirects())
            .finish()
    }
}

impl<'a> Attempt<'a> {
    /// Get the method of the request that received the redirect.
    pub fn method(&self) -> &'a Method {
        self.method
    }

    /// Get the URI of the request that received the redirect.
    pub fn uri(&self) -> &'a Uri {
        self.uri
    }

    /// Get the headers of the request that received the redirect.
    pub fn request_headers(&self) -> &'a HeaderMap {
        self.request_headers
    }

    /// Get the type of redirect.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers of the redirect response.
    pub fn response_headers(&self) -> &'a HeaderMap {
        self.response_headers
    }

    /// Get the raw, unresolved `Location` value of the redirect response.
    pub fn location(&self) -> &'a str {
        self.location
    }

    /// Get the number of redirects already followed in this chain.
    pub fn hops(&self) -> usize {
        self.hops
    }
}
