use http::{
    header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
    request::Parts,
    Method, Request, Response, StatusCode, Uri,
};
use url::Url;

use super::classify;
use crate::error::{Error, MissingLocation, RelativeRequestUri, Result};

/// Build the request for the next hop of a redirect chain.
///
/// The target is read from the response's `Location` header. A path-absolute
/// location (`/path`) is resolved against the scheme and authority of `req`,
/// any other value is parsed as a URL, relative references being joined onto
/// the URI of `req`.
///
/// The returned request is a copy of `req` pointed at the new target, with two
/// rules applied:
///
/// - when the target's scheme, host or port differs from the one of `req`, the
///   `Authorization` header is dropped;
/// - on `303 See Other` the method becomes `GET`, the body is cleared and the
///   `Content-Type` and `Content-Length` headers are dropped. Other redirect
///   codes keep the method and body untouched.
///
/// `req` itself is never modified.
pub fn build_next<B, R>(req: &Request<B>, res: &Response<R>) -> Result<Request<B>>
where
    B: Clone + Default,
{
    let parts = next_parts(&head_of(req), res)?;
    let body = if res.status() == StatusCode::SEE_OTHER {
        B::default()
    } else {
        req.body().clone()
    };
    Ok(Request::from_parts(parts, body))
}

/// Apply the redirect rules of [`build_next`] to the head of a request.
///
/// The caller decides what body goes with the returned head; on `303 See Other`
/// it must be empty.
pub(crate) fn next_parts<R>(previous: &Parts, res: &Response<R>) -> Result<Parts> {
    let location = classify::location(res).ok_or_else(|| {
        Error::invalid_input(MissingLocation)
            .with_uri(previous.uri.clone())
            .with_response(res)
    })?;

    let target = resolve(location, &previous.uri)
        .map_err(|err| err.with_uri(previous.uri.clone()).with_response(res))?;

    let mut next = previous.clone();

    if !same_origin(&target, &previous.uri) {
        next.headers.remove(AUTHORIZATION);
    }

    if res.status() == StatusCode::SEE_OTHER {
        next.method = Method::GET;
        next.headers.remove(CONTENT_TYPE);
        next.headers.remove(CONTENT_LENGTH);
    }

    next.uri = Uri::try_from(target.as_str()).map_err(|err| {
        Error::malformed_target(err)
            .with_uri(previous.uri.clone())
            .with_response(res)
    })?;
    Ok(next)
}

fn head_of<B>(req: &Request<B>) -> Parts {
    let mut head = Request::new(());
    *head.method_mut() = req.method().clone();
    *head.uri_mut() = req.uri().clone();
    *head.version_mut() = req.version();
    *head.headers_mut() = req.headers().clone();
    *head.extensions_mut() = req.extensions().clone();
    head.into_parts().0
}

fn resolve(location: &str, base: &Uri) -> Result<Url> {
    let url = if location.starts_with('/') {
        let origin = origin(base)?;
        Url::parse(&format!("{origin}{location}"))
    } else {
        match Url::parse(location) {
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                origin(base)?;
                Url::parse(&base.to_string()).and_then(|base| base.join(location))
            }
            parsed => parsed,
        }
    };

    let mut url = url.map_err(Error::malformed_target)?;
    url.set_fragment(None);
    Ok(url)
}

/// `scheme://host[:port]` of an absolute request URI, without userinfo.
fn origin(uri: &Uri) -> Result<String> {
    match (uri.scheme_str(), uri.host()) {
        (Some(scheme), Some(host)) => Ok(match uri.port_u16() {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        }),
        _ => Err(Error::invalid_input(RelativeRequestUri)),
    }
}

/// Both sides are compared in their `url` normal form, so equivalent spellings
/// of a host (`[0:0::1]` and `[::1]`, `127.1` and `127.0.0.1`) or an explicit
/// default port count as the same origin. A request URI that is not an
/// absolute URL never matches.
fn same_origin(next: &Url, previous: &Uri) -> bool {
    match Url::parse(&previous.to_string()) {
        Ok(previous) => {
            next.scheme() == previous.scheme()
                && next.host_str() == previous.host_str()
                && next.port_or_known_default() == previous.port_or_known_default()
        }
        Err(_) => false,
    }
}
