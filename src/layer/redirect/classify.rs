use http::{header::LOCATION, Response, StatusCode};

/// Returns the `Location` value of a response, if present, non-empty and made of
/// visible ASCII.
pub(crate) fn location<B>(res: &Response<B>) -> Option<&str> {
    res.headers()
        .get(LOCATION)
        .and_then(|loc| loc.to_str().ok())
        .filter(|loc| !loc.is_empty())
}

/// Returns `true` if the response is a redirect this middleware may follow.
///
/// Only `301`, `302`, `303`, `307` and `308` responses carrying a non-empty
/// `Location` header qualify. Other `3xx` codes, such as `300` or `304`, are
/// never followed, whatever their headers.
pub fn is_redirect<B>(res: &Response<B>) -> bool {
    matches!(
        res.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) && location(res).is_some()
}

/// Like [`is_redirect`], treating a missing response as "not a redirect".
pub fn is_redirect_opt<B>(res: Option<&Response<B>>) -> bool {
    res.is_some_and(is_redirect)
}
