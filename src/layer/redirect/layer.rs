use std::{
    mem,
    task::{Context, Poll},
};

use http::{Request, Response};
use http_body::Body;
use tower::Layer;
use tower_service::Service;

use super::{future::ResponseFuture, BodyRepr, CloneBody, Cloneable};
use crate::{error::Error, redirect::Policy};

/// [`Layer`] for retrying requests with a [`Service`] to follow redirection responses.
///
/// The policy given here is the default of every [`FollowRedirect`] it builds.
/// `C` is the [`CloneBody`] strategy used to replay request bodies.
#[derive(Clone, Debug, Default)]
pub struct FollowRedirectLayer<C = Cloneable> {
    policy: Policy,
    cloner: C,
}

impl FollowRedirectLayer {
    /// Create a new [`FollowRedirectLayer`] with the default redirection [`Policy`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`FollowRedirectLayer`] with the given redirection [`Policy`].
    pub fn with_policy(policy: Policy) -> Self {
        FollowRedirectLayer {
            policy,
            cloner: Cloneable,
        }
    }
}

impl<C> FollowRedirectLayer<C> {
    /// Replace the strategy used to replay request bodies.
    pub fn body_cloner<T>(self, cloner: T) -> FollowRedirectLayer<T> {
        FollowRedirectLayer {
            policy: self.policy,
            cloner,
        }
    }
}

impl<S, C> Layer<S> for FollowRedirectLayer<C>
where
    S: Clone,
    C: Clone,
{
    type Service = FollowRedirect<S, C>;

    #[inline(always)]
    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirect {
            inner,
            policy: self.policy.clone(),
            cloner: self.cloner.clone(),
        }
    }
}

/// Middleware that retries requests with a [`Service`] to follow redirection responses.
///
/// The service only holds its default [`Policy`]; the hop counter and the policy
/// resolved for a call live in the [`ResponseFuture`] of that call, so concurrent
/// calls never share redirect state.
#[derive(Clone, Debug)]
pub struct FollowRedirect<S, C = Cloneable> {
    inner: S,
    policy: Policy,
    cloner: C,
}

impl<S> FollowRedirect<S> {
    /// Create a new [`FollowRedirect`] with the default redirection [`Policy`].
    pub fn new(inner: S) -> Self {
        Self::with_policy(inner, Policy::default())
    }

    /// Create a new [`FollowRedirect`] with the given redirection [`Policy`].
    pub fn with_policy(inner: S, policy: Policy) -> Self {
        FollowRedirect {
            inner,
            policy,
            cloner: Cloneable,
        }
    }
}

impl<S, C> FollowRedirect<S, C> {
    /// Replace the strategy used to replay request bodies.
    pub fn body_cloner<T>(self, cloner: T) -> FollowRedirect<S, T> {
        FollowRedirect {
            inner: self.inner,
            policy: self.policy,
            cloner,
        }
    }

    /// Returns the default policy of this service.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Consumes `self`, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Send a request, following redirects with `policy` instead of the default
    /// policy of this service when it is `Some`.
    ///
    /// The same readiness rules as [`Service::call`] apply: [`Service::poll_ready`]
    /// must have returned `Ready(Ok(()))` before this is called.
    pub fn call_with_policy<ReqBody, ResBody>(
        &mut self,
        req: Request<ReqBody>,
        policy: Option<Policy>,
    ) -> ResponseFuture<S, ReqBody, C>
    where
        S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
        S::Error: From<Error>,
        C: CloneBody<ReqBody> + Clone,
        ReqBody: Body + Default,
    {
        let service = self.inner.clone();
        let mut service = mem::replace(&mut self.inner, service);
        let policy = policy.unwrap_or_else(|| self.policy.clone());

        let mut body = BodyRepr::None;
        body.try_clone_from(req.body(), &self.cloner);

        let (parts, req_body) = req.into_parts();
        let future = service.call(Request::from_parts(parts.clone(), req_body));
        ResponseFuture::new(future, service, policy, self.cloner.clone(), parts, body)
    }
}

impl<ReqBody, ResBody, S, C> Service<Request<ReqBody>> for FollowRedirect<S, C>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    S::Error: From<Error>,
    C: CloneBody<ReqBody> + Clone,
    ReqBody: Body + Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = ResponseFuture<S, ReqBody, C>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    #[inline]
    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        self.call_with_policy(req, None)
    }
}
