use std::{
    future::{ready, Ready},
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use bytes::Bytes;
use follow_redirect::BoxError;
use http::{HeaderMap, Method, Request, Response, Uri};
use tower::Service;

use super::body::Recorded;

/// What the pipeline received for one hop.
#[derive(Clone, Debug)]
pub struct Seen {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Handler = dyn Fn(&Request<()>) -> Result<Response<Bytes>, BoxError> + Send + Sync;

/// An in-memory stand-in for the transport: answers every request with `func`
/// and records what it was sent.
#[derive(Clone)]
pub struct Pipeline {
    handler: Arc<Handler>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Pipeline {
    #[allow(unused)]
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

pub fn pipeline<F>(func: F) -> Pipeline
where
    F: Fn(&Request<()>) -> Result<Response<Bytes>, BoxError> + Send + Sync + 'static,
{
    Pipeline {
        handler: Arc::new(func),
        seen: Arc::new(Mutex::new(Vec::new())),
    }
}

impl<B: Recorded> Service<Request<B>> for Pipeline {
    type Response = Response<Bytes>;
    type Error = BoxError;
    type Future = Ready<Result<Response<Bytes>, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let (parts, body) = req.into_parts();
        self.seen.lock().unwrap().push(Seen {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            body: body.recorded(),
        });
        ready((self.handler)(&Request::from_parts(parts, ())))
    }
}

#[allow(unused)]
pub fn redirect(status: u16, location: &str) -> Result<Response<Bytes>, BoxError> {
    Ok(Response::builder()
        .status(status)
        .header(http::header::LOCATION, location)
        .header(http::header::SERVER, "test-redirect")
        .body(Bytes::new())?)
}

#[allow(unused)]
pub fn ok(body: &'static str) -> Result<Response<Bytes>, BoxError> {
    Ok(Response::builder()
        .header(http::header::SERVER, "test-dst")
        .body(Bytes::from_static(body.as_bytes()))?)
}
