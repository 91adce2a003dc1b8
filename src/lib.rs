#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(warnings))]

//! # follow-redirect
//!
//! The `follow-redirect` crate provides a [`tower`] middleware that follows HTTP
//! redirects on behalf of an inner service.
//!
//! The middleware does no I/O of its own. It hands every request to the inner
//! service and, when the answer is a redirect it may follow, builds the request
//! for the next hop and sends that one too:
//!
//! - `301`, `302`, `303`, `307` and `308` responses with a `Location` header are
//!   followed, nothing else is.
//! - A path-absolute `Location` (`/path`) is resolved against the scheme and host
//!   of the request that received it.
//! - The `Authorization` header is dropped whenever a hop changes scheme or host.
//! - `303 See Other` turns the next request into a bodiless `GET`; the other codes
//!   keep the method and body. A body that cannot be copied for the next hop
//!   ends the chain at that redirect.
//! - A chain is bounded by [`redirect::Policy::max_redirects`] (5 by default, 20 at
//!   most). Reaching the bound returns the last redirect response as-is.
//!
//! ## Following redirects
//!
//! ```rust
//! # async fn run() -> Result<(), follow_redirect::BoxError> {
//! use follow_redirect::{layer::redirect::FollowRedirectLayer, redirect::Policy};
//! use http::{Request, Response};
//! use tower::{service_fn, ServiceBuilder, ServiceExt};
//!
//! let transport = service_fn(|req: Request<String>| async move {
//!     let res = if req.uri().path() == "/old" {
//!         Response::builder()
//!             .status(301)
//!             .header("location", "/new")
//!             .body(String::new())?
//!     } else {
//!         Response::new(format!("you reached {}", req.uri()))
//!     };
//!     Ok::<_, follow_redirect::BoxError>(res)
//! });
//!
//! let client = ServiceBuilder::new()
//!     .layer(FollowRedirectLayer::with_policy(Policy::limited(3)))
//!     .service(transport);
//!
//! let res = client
//!     .oneshot(Request::get("https://example.com/old").body(String::new())?)
//!     .await?;
//! assert_eq!(res.body(), "you reached https://example.com/new");
//! # Ok(())
//! # }
//! ```
//!
//! ## Per-call policies
//!
//! [`FollowRedirect::call_with_policy`] overrides the layer's policy for a single
//! call; see the [`redirect`] module for what a [`Policy`][redirect::Policy] can
//! express.
//!
//! [`FollowRedirect::call_with_policy`]: layer::redirect::FollowRedirect::call_with_policy

pub use http;

pub use self::error::{BoxError, Error, Result};

mod error;
pub mod layer;
pub mod redirect;
