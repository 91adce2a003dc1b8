//! Middleware for following redirections.
//!
//! # Overview
//!
//! The [`FollowRedirect`] middleware retries requests with the inner [`Service`] to follow HTTP
//! redirections.
//!
//! Each hop is built from the request of the previous hop: the middleware copies that
//! request, points it at the resolved `Location`, and applies the credential and method
//! rules described on [`build_next`].
//!
//! Request bodies are [`http_body::Body`]s. A body whose size hint is exactly zero is
//! replaced by its `Default` on every hop, as is the body of a `303 See Other` hop. Any
//! other body is copied by the [`CloneBody`] strategy of the middleware before it is sent.
//! [`Cloneable`], the default, replays every `Clone` body. A body the strategy cannot copy
//! is sent once. When a `301`, `302`, `307` or `308` would need it again, the chain stops
//! and that redirect response is returned to the caller.
//!
//! Errors of the inner service are returned unchanged and stop the chain. Reaching the
//! hop limit of the [`Policy`] is not an error: the last redirect response is returned
//! to the caller.
//!
//! [`Service`]: tower_service::Service
//! [`Policy`]: crate::redirect::Policy

mod classify;
mod future;
mod layer;
mod rebuild;

use std::mem;

use http::Uri;
use http_body::Body;

pub use self::{
    classify::{is_redirect, is_redirect_opt},
    future::ResponseFuture,
    layer::{FollowRedirect, FollowRedirectLayer},
    rebuild::build_next,
};

/// Response [`Extensions`][http::Extensions] value that represents the effective request URI of
/// a response returned by a [`FollowRedirect`] middleware.
///
/// The value differs from the original request's effective URI if the middleware has followed
/// redirections.
#[derive(Clone, Debug)]
pub struct RequestUri(pub Uri);

/// Strategy for copying a request body so that it can be sent again on the next
/// hop of a redirect chain.
pub trait CloneBody<B> {
    /// Returns a copy of `body`, or `None` if it cannot be replayed.
    fn clone_body(&self, body: &B) -> Option<B>;
}

/// [`CloneBody`] strategy that replays any `Clone` body.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cloneable;

impl<B: Clone> CloneBody<B> for Cloneable {
    #[inline]
    fn clone_body(&self, body: &B) -> Option<B> {
        Some(body.clone())
    }
}

/// [`CloneBody`] strategy that never copies a body.
///
/// Only empty bodies are replayed, which lets streaming bodies that cannot be
/// cloned go through the middleware.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyOnly;

impl<B> CloneBody<B> for EmptyOnly {
    #[inline]
    fn clone_body(&self, _body: &B) -> Option<B> {
        None
    }
}

enum BodyRepr<B> {
    Some(B),
    Empty,
    None,
}

impl<B> BodyRepr<B>
where
    B: Body + Default,
{
    fn take(&mut self) -> Option<B> {
        match mem::replace(self, BodyRepr::None) {
            BodyRepr::Some(body) => Some(body),
            BodyRepr::Empty => {
                *self = BodyRepr::Empty;
                Some(B::default())
            }
            BodyRepr::None => None,
        }
    }

    fn try_clone_from<C>(&mut self, body: &B, cloner: &C)
    where
        C: CloneBody<B>,
    {
        match self {
            BodyRepr::Some(_) | BodyRepr::Empty => {}
            BodyRepr::None => {
                if body.size_hint().exact() == Some(0) {
                    *self = BodyRepr::Some(B::default());
                } else if let Some(cloned) = cloner.clone_body(body) {
                    *self = BodyRepr::Some(cloned);
                }
            }
        }
    }
}
