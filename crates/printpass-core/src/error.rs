//! Error types for the G-code analysis layer.
//!
//! The registry and settings crates define their own error enums; the
//! binary joins them with `anyhow`.

use thiserror::Error;

/// G-Code error type
///
/// Represents failures while pulling embedded data out of a G-code file.
/// The public analysis operations never surface these to callers; they log
/// them and degrade to an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GcodeError {
    /// QOI buffer is too short or does not start with the `qoif` magic
    #[error("Invalid QOI header: {reason}")]
    InvalidQoiHeader {
        /// Why the header was rejected.
        reason: String,
    },

    /// QOI header declares a channel count other than 3 or 4
    #[error("Unsupported QOI channel count: {channels}")]
    UnsupportedChannels {
        /// The channel byte from the header.
        channels: u8,
    },

    /// QOI header declares more pixels than the decoder accepts
    #[error("QOI image too large: {width}x{height}")]
    ImageTooLarge {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// QOI header disagrees with the size declared on the thumbnail block
    #[error("QOI header is {width}x{height} but the block declares {declared_width}x{declared_height}")]
    DimensionMismatch {
        /// Width on the `thumbnail_QOI begin` line.
        declared_width: u64,
        /// Height on the `thumbnail_QOI begin` line.
        declared_height: u64,
        /// Width in the QOI header.
        width: u32,
        /// Height in the QOI header.
        height: u32,
    },

    /// Embedded base64 payload could not be decoded
    #[error("Invalid base64 payload: {reason}")]
    InvalidPayload {
        /// The decoder's message.
        reason: String,
    },

    /// Job identifier cannot be used as a file name
    #[error("Invalid job id: {job_id:?}")]
    InvalidJobId {
        /// The rejected identifier.
        job_id: String,
    },

    /// Preview image could not be encoded or written
    #[error("Thumbnail write failed: {reason}")]
    ThumbnailWrite {
        /// The reason the write failed.
        reason: String,
    },
}
