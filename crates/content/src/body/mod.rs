//! Text body handling.
//!
//! A [`TextBody`] owns a string payload and serializes it with a [`Charset`](crate::Charset)
//! as soon as it is created. The encoded bytes are then exposed in two ways:
//!
//! - [`TextBody::as_byte_stream`] hands out a [`ByteStream`], which is both a tokio
//!   reader and an `http_body::Body`, so it can be plugged into a connection
//!   writer as it is.
//! - [`TextBody::copy_to`] writes the bytes straight into any `AsyncWrite` sink.
//!
//! Bodies never change after construction, so they can be shared freely
//! between tasks and the streams they hand out are always identical.

mod byte_stream;
mod text_body;

pub use byte_stream::ByteStream;
pub use text_body::TextBody;
pub use text_body::TextBodyBuilder;
