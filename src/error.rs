//! Error taxonomy shared by the ranked-index core and the HTTP adapter.

use std::fmt;

/// Errors raised by [`crate::ranked_index::RankedIndex`], [`crate::primary_index::PrimaryIndex`]
/// and [`crate::store::UserStore`], plus the handful of request-level errors the
/// HTTP adapter needs to render a plaintext body for.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// No record exists for the given `uid`.
    UnknownUid(u32),
    /// A record already exists for the given `uid`.
    DuplicateUid(u32),
    /// A `(score, uid)` pair already exists in a ranked index.
    DuplicatePair(u32, u32),
    /// No matching `(score, uid)` pair in a ranked index.
    NotFound(u32, u32),
    /// The `/put` body's JSON object had the wrong fields, or the wrong field order.
    MalformedRequest,
    /// A field was present but not decodable as the expected integer type.
    BadParam,
    /// An I/O failure on the client socket; the connection is dropped, no response is sent.
    TransportError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownUid(uid) => write!(f, "User {} doesn't exist.", uid),
            Error::DuplicateUid(uid) => write!(f, "uid {} already present", uid),
            Error::DuplicatePair(score, uid) => {
                write!(f, "pair ({}, {}) already present", score, uid)
            }
            Error::NotFound(score, uid) => write!(f, "pair ({}, {}) not found", score, uid),
            Error::MalformedRequest => write!(f, "malformed request"),
            Error::BadParam => write!(f, "bad parameter"),
            Error::TransportError(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
