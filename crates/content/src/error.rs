use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("text body requires a payload")]
    MissingPayload,

    #[error("media type and content-type header value are mutually exclusive")]
    ConflictingContentType,

    #[error("invalid media type: {reason}")]
    InvalidMediaType { reason: String },

    #[error("unknown charset: {label}")]
    UnknownCharset { label: String },

    #[error("copy cancelled")]
    Cancelled,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ContentError {
    pub fn invalid_media_type<S: ToString>(str: S) -> Self {
        Self::InvalidMediaType { reason: str.to_string() }
    }

    pub fn unknown_charset<S: ToString>(str: S) -> Self {
        Self::UnknownCharset { label: str.to_string() }
    }
}
