use bytes::{Buf, BufMut, Bytes, BytesMut};
use http_body_util::BodyExt;

use crate::errors::Rejection;

/// Accumulate a request body frame by frame, enforcing a cumulative byte
/// ceiling.
///
/// The ceiling is a hard cap: it is checked against `accumulated + incoming`
/// before each chunk is buffered, so a single oversized final chunk cannot
/// slip through. The accumulator is owned by this call, never shared across
/// in-flight requests.
pub async fn read_bounded<B>(mut body: B, ceiling: usize) -> Result<Bytes, Rejection>
where
    B: hyper::body::Body + Unpin,
{
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        // A mid-stream transport failure, distinct from a body that arrives
        // whole but does not parse
        let frame = frame.map_err(|_| Rejection::BodyRead)?;
        let Ok(chunk) = frame.into_data() else {
            // Trailers carry no body bytes
            continue;
        };
        if buf.len() + chunk.remaining() > ceiling {
            return Err(Rejection::BodyTooLarge);
        }
        buf.put(chunk);
    }
    Ok(buf.freeze())
}
