use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{ready, Context, Poll},
};

use futures_util::future::Either;
use http::{request::Parts, Request, Response, StatusCode};
use http_body::Body;
use pin_project_lite::pin_project;
use tower::util::Oneshot;
use tower_service::Service;

use super::{
    classify::{self, is_redirect},
    rebuild::next_parts,
    BodyRepr, CloneBody, RequestUri,
};
use crate::{
    error::Error,
    redirect::{Attempt, Policy},
};

pin_project! {
    /// Response future for [`FollowRedirect`][super::FollowRedirect].
    ///
    /// Drives one redirect chain: every time the inner service answers with a
    /// redirect that may be followed, the next request is built and sent, until a
    /// response ends the chain or the inner service fails.
    pub struct ResponseFuture<S, B, C>
    where
        S: Service<Request<B>>,
    {
        #[pin]
        future: Either<S::Future, Oneshot<S, Request<B>>>,
        service: S,
        policy: Policy,
        cloner: C,
        parts: Parts,
        body: BodyRepr<B>,
        hops: usize,
    }
}

impl<S, B, C> ResponseFuture<S, B, C>
where
    S: Service<Request<B>>,
{
    pub(super) fn new(
        future: S::Future,
        service: S,
        policy: Policy,
        cloner: C,
        parts: Parts,
        body: BodyRepr<B>,
    ) -> Self {
        ResponseFuture {
            future: Either::Left(future),
            service,
            policy,
            cloner,
            parts,
            body,
            hops: 0,
        }
    }
}

impl<S, ReqBody, ResBody, C> Future for ResponseFuture<S, ReqBody, C>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    S::Error: From<Error>,
    C: CloneBody<ReqBody>,
    ReqBody: Body + Default,
{
    type Output = Result<Response<ResBody>, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            let mut res = match ready!(this.future.as_mut().poll(cx)) {
                Ok(res) => res,
                Err(err) => {
                    if *this.hops > 0 {
                        log::debug!(
                            "redirect chain aborted after {} hop(s), request to {} failed",
                            this.hops,
                            this.parts.uri
                        );
                    }
                    return Poll::Ready(Err(err));
                }
            };

            if !should_follow(this.policy, this.parts, &res, *this.hops) {
                res.extensions_mut()
                    .insert(RequestUri(this.parts.uri.clone()));
                return Poll::Ready(Ok(res));
            }

            if res.status() == StatusCode::SEE_OTHER {
                *this.body = BodyRepr::Empty;
            }
            let body = match this.body.take() {
                Some(body) => body,
                None => {
                    log::debug!(
                        "request body for {} cannot be replayed, returning {} response",
                        this.parts.uri,
                        res.status()
                    );
                    res.extensions_mut()
                        .insert(RequestUri(this.parts.uri.clone()));
                    return Poll::Ready(Ok(res));
                }
            };

            let next = match next_parts(this.parts, &res) {
                Ok(next) => next,
                Err(err) => {
                    log::debug!("cannot follow {} redirect: {}", res.status(), err);
                    return Poll::Ready(Err(err.into()));
                }
            };

            *this.hops += 1;
            log::debug!(
                "following {} redirect {}/{}: {} -> {}",
                res.status(),
                this.hops,
                this.policy.max_redirects(),
                this.parts.uri,
                next.uri
            );

            this.body.try_clone_from(&body, this.cloner);
            *this.parts = next;
            let req = Request::from_parts(this.parts.clone(), body);
            this.future
                .set(Either::Right(Oneshot::new(this.service.clone(), req)));
        }
    }
}

fn should_follow<R>(policy: &Policy, req: &Parts, res: &Response<R>, hops: usize) -> bool {
    if !is_redirect(res) {
        return false;
    }

    let max = policy.max_redirects();
    if hops >= max {
        log::debug!(
            "redirect limit of {} reached, returning {} response for {}",
            max,
            res.status(),
            req.uri
        );
        return false;
    }

    let attempt = Attempt {
        method: &req.method,
        uri: &req.uri,
        request_headers: &req.headers,
        status: res.status(),
        response_headers: res.headers(),
        location: classify::location(res).unwrap_or_default(),
        hops,
    };
    if !policy.should_redirect(&attempt) {
        log::trace!("policy declined {} redirect from {}", res.status(), req.uri);
        return false;
    }

    true
}

impl<S, B, C> fmt::Debug for ResponseFuture<S, B, C>
where
    S: Service<Request<B>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFuture")
            .field("uri", &self.parts.uri)
            .field("policy", &self.policy)
            .field("hops", &self.hops)
            .finish()
    }
}
