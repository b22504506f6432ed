//! String backed HTTP message bodies
//!
//! This crate provides [`TextBody`], an immutable HTTP entity body built from a
//! string. The string is encoded with a [`Charset`] and described to the
//! receiver by a [`MediaTypeHeader`] such as `text/plain; charset=utf-8`.
//!
//! # Features
//!
//! - UTF-8 by default, plus US-ASCII, ISO-8859-1, UTF-16 and every legacy
//!   encoding known to `encoding_rs`
//! - Content-type synthesis that mirrors what receivers expect
//! - A byte stream view implementing both `tokio::io::AsyncRead` and
//!   `http_body::Body`
//! - Asynchronous copy into any `tokio::io::AsyncWrite`, optionally cancellable
//!
//! # Example
//!
//! ```no_run
//! use micro_content::{Charset, TextBody};
//! use tokio::io::AsyncWriteExt;
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let body = TextBody::with_media_type("\u{4f1a}\u{5458}", Some(Charset::Utf8), Some("application/custom"))
//!         .expect("media type should be valid");
//!     info!(content_type = %body.content_type().unwrap(), "sending body");
//!
//!     let mut stdout = tokio::io::stdout();
//!     body.copy_to(&mut stdout).await?;
//!     stdout.shutdown().await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`charset`]: character encodings and their canonical names
//! - [`header`]: the structured content-type value
//! - [`body`]: the text body, its builder and the byte stream view
//!
//! ## Error Handling
//!
//! All fallible operations return [`ContentError`]. The plain
//! [`TextBody::copy_to`] returns `std::io::Error` so that failures of the sink
//! reach the caller untouched.

pub mod body;
pub mod charset;
pub mod header;

mod error;
mod utils;

pub use body::ByteStream;
pub use body::TextBody;
pub use body::TextBodyBuilder;
pub use charset::Charset;
pub use charset::WhatwgEncoding;
pub use error::ContentError;
pub use header::MediaTypeHeader;
