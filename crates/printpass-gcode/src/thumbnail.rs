//! Preview thumbnail extraction
//!
//! Slicers embed preview images as base64 text inside G-code comments.
//! Two block styles are recognised:
//!
//! ```text
//! ; thumbnail_QOI begin 16x16 476
//! ; cW9pZgAAABAAAAAQBAA...
//! ; thumbnail_QOI end
//!
//! ; thumbnail begin 16x16 1200
//! ; iVBORw0KGgoAAAANSUhEUgAA...
//! ; thumbnail end
//! ```
//!
//! QOI blocks take precedence; the largest one is decoded and re-encoded as
//! PNG. Plain PNG blocks are only consulted when no QOI block exists, and
//! their payload is written out as-is.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use image::ImageFormat;
use printpass_core::GcodeError;
use regex::Regex;
use tracing::{debug, warn};

use crate::qoi::{decode_qoi, QoiHeader, QoiImage};

/// Default directory previews are written to
pub const DEFAULT_PREVIEW_DIR: &str = "/app/gcode_previews";

/// Default URL path previews are served under
pub const DEFAULT_PREVIEW_URL_PREFIX: &str = "/gcode_previews";

/// Standard alphabet, lenient about non-zero bits in the final character
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Where extracted previews go and how they are addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Directory the `<jobid>.png` file is written to
    pub output_dir: PathBuf,
    /// URL path prefix of the returned preview link
    pub url_prefix: String,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_PREVIEW_DIR),
            url_prefix: DEFAULT_PREVIEW_URL_PREFIX.to_string(),
        }
    }
}

impl ThumbnailOptions {
    /// Options writing into `output_dir` with the default URL prefix
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the URL prefix
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// File the preview for `job_id` is written to
    pub fn preview_path(&self, job_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", job_id))
    }

    /// URL the preview for `job_id` is served under
    pub fn preview_url(&self, job_id: &str) -> String {
        format!("{}/{}.png", self.url_prefix.trim_end_matches('/'), job_id)
    }
}

/// An embedded QOI thumbnail block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QoiThumbnailBlock<'a> {
    /// Width declared in the block header
    pub width: u64,
    /// Height declared in the block header
    pub height: u64,
    payload: &'a str,
}

impl QoiThumbnailBlock<'_> {
    /// Declared pixel area
    pub fn area(&self) -> u64 {
        self.width.saturating_mul(self.height)
    }

    /// Base64 text with comment markers and line breaks removed
    pub fn base64_payload(&self) -> String {
        self.payload
            .replace("; ", "")
            .replace(['\r', '\n'], "")
    }

    /// Decode the payload into an image
    ///
    /// The QOI header must describe the size declared on the block's
    /// `begin` line; it is checked before any pixel memory is allocated.
    ///
    /// # Errors
    /// Returns [`GcodeError::InvalidPayload`] for bad base64,
    /// [`GcodeError::DimensionMismatch`] when the header disagrees with the
    /// block, and the QOI header errors of [`decode_qoi`].
    pub fn decode(&self) -> Result<QoiImage, GcodeError> {
        let bytes = LENIENT_BASE64
            .decode(self.base64_payload())
            .map_err(|e| GcodeError::InvalidPayload {
                reason: e.to_string(),
            })?;

        let header = QoiHeader::parse(&bytes)?;
        if u64::from(header.width) != self.width || u64::from(header.height) != self.height {
            return Err(GcodeError::DimensionMismatch {
                declared_width: self.width,
                declared_height: self.height,
                width: header.width,
                height: header.height,
            });
        }
        decode_qoi(&bytes)
    }
}

fn qoi_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"; thumbnail_QOI begin (\d+)x(\d+) \d+\r?\n((?:; [A-Za-z0-9+/=]+\r?\n)+); thumbnail_QOI end",
        )
        .expect("invalid QOI block regex")
    })
}

fn png_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?ims)^\s*;?\s*thumbnail\s+begin.*?thumbnail\s+end")
            .expect("invalid PNG block regex")
    })
}

fn png_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)^.*?thumbnail\s+begin[^\n\r;]*[;\n\r\s]+")
            .expect("invalid PNG header regex")
    })
}

fn png_trailer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)thumbnail\s+end.*$").expect("invalid PNG trailer regex"))
}

/// Find every QOI thumbnail block, in file order
pub fn find_qoi_blocks(content: &str) -> Vec<QoiThumbnailBlock<'_>> {
    qoi_block_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let width = caps[1].parse().ok()?;
            let height = caps[2].parse().ok()?;
            let payload = caps.get(3)?.as_str();
            Some(QoiThumbnailBlock {
                width,
                height,
                payload,
            })
        })
        .collect()
}

/// Pick the block with the largest area; the first one wins a tie
pub fn select_largest<'b, 'a>(
    blocks: &'b [QoiThumbnailBlock<'a>],
) -> Option<&'b QoiThumbnailBlock<'a>> {
    blocks.iter().fold(None, |best, block| match best {
        Some(current) if block.area() <= current.area() => Some(current),
        _ => Some(block),
    })
}

/// Decode the first plain PNG thumbnail block, if any
///
/// # Errors
/// Returns [`GcodeError::InvalidPayload`] when the block's base64 does not decode.
pub fn find_png_thumbnail(content: &str) -> Result<Option<Vec<u8>>, GcodeError> {
    let Some(block) = png_block_regex().find(content) else {
        return Ok(None);
    };

    let body = png_header_regex().replacen(block.as_str(), 1, "");
    let body = png_trailer_regex().replacen(&body, 1, "");
    let mut cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();

    let missing = cleaned.len() % 4;
    if missing != 0 {
        cleaned.extend(std::iter::repeat('=').take(4 - missing));
    }

    LENIENT_BASE64
        .decode(cleaned)
        .map(Some)
        .map_err(|e| GcodeError::InvalidPayload {
            reason: e.to_string(),
        })
}

fn validate_job_id(job_id: &str) -> Result<(), GcodeError> {
    let unsafe_name = job_id.is_empty()
        || job_id.contains(['/', '\\', '\0'])
        || job_id.contains("..");
    if unsafe_name {
        return Err(GcodeError::InvalidJobId {
            job_id: job_id.to_string(),
        });
    }
    Ok(())
}

fn prepare_output(options: &ThumbnailOptions, job_id: &str) -> Result<PathBuf, GcodeError> {
    validate_job_id(job_id)?;
    fs::create_dir_all(&options.output_dir).map_err(|e| GcodeError::ThumbnailWrite {
        reason: format!("{}: {}", options.output_dir.display(), e),
    })?;
    Ok(options.preview_path(job_id))
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> GcodeError {
    GcodeError::ThumbnailWrite {
        reason: format!("{}: {}", path.display(), e),
    }
}

/// Extract the best preview image and write it as `<jobid>.png`
///
/// Returns the preview URL, or `Ok(None)` when the file carries no thumbnail.
///
/// # Errors
/// Any decode or write failure. A file with QOI blocks that fail to decode
/// does not fall back to PNG blocks.
pub fn try_extract_thumbnail(
    content: &str,
    options: &ThumbnailOptions,
    job_id: &str,
) -> Result<Option<String>, GcodeError> {
    let blocks = find_qoi_blocks(content);
    if let Some(best) = select_largest(&blocks) {
        debug!(
            count = blocks.len(),
            width = best.width,
            height = best.height,
            "Found QOI thumbnails, decoding the largest"
        );
        let image = best.decode()?;
        let path = prepare_output(options, job_id)?;
        image
            .to_dynamic_image()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| write_error(&path, e))?;

        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            truncated = image.is_truncated(),
            "QOI thumbnail written as PNG"
        );
        return Ok(Some(options.preview_url(job_id)));
    }

    if let Some(bytes) = find_png_thumbnail(content)? {
        debug!("No QOI thumbnail, using embedded PNG block");
        let path = prepare_output(options, job_id)?;
        fs::write(&path, bytes).map_err(|e| write_error(&path, e))?;

        debug!(path = %path.display(), "PNG thumbnail written");
        return Ok(Some(options.preview_url(job_id)));
    }

    debug!("No thumbnails of any type found");
    Ok(None)
}

/// Extract the best preview image, degrading every failure to `None`
///
/// See [`try_extract_thumbnail`]; errors are logged, never returned.
pub fn extract_thumbnail(
    content: &str,
    options: &ThumbnailOptions,
    job_id: &str,
) -> Option<String> {
    match try_extract_thumbnail(content, options, job_id) {
        Ok(url) => url,
        Err(e) => {
            warn!(job_id, error = %e, "Thumbnail extraction failed");
            None
        }
    }
}
