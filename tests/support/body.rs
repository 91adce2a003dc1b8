use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};

/// Request bodies the pipeline can record without polling them.
pub trait Recorded {
    fn recorded(&self) -> Bytes;
}

impl Recorded for String {
    fn recorded(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

/// A body that can only be read once and is not `Clone`, like a stream coming
/// off a socket.
#[derive(Debug, Default)]
pub struct OnceBody(Option<Bytes>);

impl OnceBody {
    #[allow(unused)]
    pub fn new(data: &'static str) -> Self {
        OnceBody(Some(Bytes::from_static(data.as_bytes())))
    }

    #[allow(unused)]
    pub fn copy(&self) -> Self {
        OnceBody(self.0.clone())
    }
}

impl Recorded for OnceBody {
    fn recorded(&self) -> Bytes {
        self.0.clone().unwrap_or_default()
    }
}

impl Body for OnceBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.0.take().map(|data| Ok(Frame::data(data))))
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.0.as_ref().map_or(0, |data| data.len() as u64))
    }
}
