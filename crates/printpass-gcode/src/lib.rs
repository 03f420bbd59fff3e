//! # PrintPass G-code
//!
//! Extracts what the digital product passport needs from a sliced G-code
//! file: the embedded preview thumbnail (QOI or PNG), the slicer's summary
//! comments, and a per-part split of the job by bounding-box volume.

pub mod analysis;
pub mod file_io;
pub mod metadata;
pub mod parts;
pub mod qoi;
pub mod thumbnail;

pub use analysis::{analyze_file, analyze_gcode, GcodeAnalysis};
pub use file_io::{decode_gcode_lossy, read_gcode_file};
pub use metadata::{
    parse_comment_pairs, parse_duration_to_seconds, parse_slicer_metadata, SlicerMetadata,
};
pub use parts::{
    analyze_per_part_volume, scan_part_bounds, BoundingBox, PartBounds, PartShare,
    PerPartAnalysis,
};
pub use qoi::{decode_qoi, Channels, Pixel, QoiHeader, QoiImage};
pub use thumbnail::{
    extract_thumbnail, find_png_thumbnail, find_qoi_blocks, select_largest,
    try_extract_thumbnail, QoiThumbnailBlock, ThumbnailOptions,
};
