//! QOI ("Quite OK Image") decoder
//!
//! Slicers such as PrusaSlicer embed their preview thumbnails in G-code as
//! base64 encoded QOI images. This module decodes such a buffer into a pixel
//! grid that can be handed to the `image` crate.
//!
//! The decoder never reads past the end of its input. A stream that ends
//! before the declared pixel count has been produced is completed by
//! repeating the last decoded colour, and the result is flagged as
//! truncated.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use printpass_core::GcodeError;
use tracing::debug;

/// File magic at the start of every QOI buffer
pub const QOI_MAGIC: [u8; 4] = *b"qoif";

/// Size of the fixed header in bytes
pub const QOI_HEADER_SIZE: usize = 14;

/// Largest image (in pixels) the decoder accepts, 4096 x 4096
///
/// Slicer previews are a few hundred pixels wide. The cap bounds what a
/// corrupt header can make the decoder allocate.
pub const QOI_PIXELS_MAX: u64 = 4096 * 4096;

const QOI_OP_INDEX: u8 = 0x00;
const QOI_OP_DIFF: u8 = 0x40;
const QOI_OP_LUMA: u8 = 0x80;
const QOI_OP_RGB: u8 = 0xfe;
const QOI_OP_RGBA: u8 = 0xff;
const QOI_MASK_2: u8 = 0xc0;

/// Number of colour channels declared by the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// 8-bit red, green, blue
    Rgb,
    /// 8-bit red, green, blue, alpha
    Rgba,
}

impl Channels {
    /// Channel count as stored in the header
    pub fn count(self) -> u8 {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// Parsed QOI header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QoiHeader {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    /// Colorspace byte; informational only
    pub colorspace: u8,
}

impl QoiHeader {
    /// Parse and validate the 14-byte header at the start of `data`
    ///
    /// # Errors
    /// Returns [`GcodeError`] when the buffer is too short, the magic does not
    /// match, a dimension is zero, the channel count is not 3 or 4, or the
    /// image would exceed [`QOI_PIXELS_MAX`].
    pub fn parse(data: &[u8]) -> Result<Self, GcodeError> {
        if data.len() < QOI_HEADER_SIZE {
            return Err(GcodeError::InvalidQoiHeader {
                reason: format!("buffer holds {} bytes", data.len()),
            });
        }
        if data[0..4] != QOI_MAGIC {
            return Err(GcodeError::InvalidQoiHeader {
                reason: "missing qoif magic".to_string(),
            });
        }

        let width = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let height = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        let channels = match data[12] {
            3 => Channels::Rgb,
            4 => Channels::Rgba,
            other => return Err(GcodeError::UnsupportedChannels { channels: other }),
        };

        if width == 0 || height == 0 {
            return Err(GcodeError::InvalidQoiHeader {
                reason: format!("empty image {}x{}", width, height),
            });
        }
        if u64::from(width) * u64::from(height) > QOI_PIXELS_MAX {
            return Err(GcodeError::ImageTooLarge { width, height });
        }

        Ok(Self {
            width,
            height,
            channels,
            colorspace: data[13],
        })
    }

    /// Number of pixels the image holds
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A single RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Create a pixel from its components
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Slot in the 64-entry colour cache
    pub fn hash_index(self) -> usize {
        (usize::from(self.r) * 3
            + usize::from(self.g) * 5
            + usize::from(self.b) * 7
            + usize::from(self.a) * 11)
            % 64
    }
}

/// Decoded QOI image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QoiImage {
    header: QoiHeader,
    pixels: Vec<Pixel>,
    truncated: bool,
}

impl QoiImage {
    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn channels(&self) -> Channels {
        self.header.channels
    }

    pub fn header(&self) -> &QoiHeader {
        &self.header
    }

    /// Pixels in row-major order; always `width * height` entries
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Whether the stream ended early and the tail was padded
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Convert into an `image` buffer with the header's channel layout
    pub fn to_dynamic_image(&self) -> DynamicImage {
        let width = self.header.width;
        let at = |x: u32, y: u32| self.pixels[y as usize * width as usize + x as usize];

        match self.header.channels {
            Channels::Rgb => DynamicImage::ImageRgb8(RgbImage::from_fn(
                width,
                self.header.height,
                |x, y| {
                    let p = at(x, y);
                    Rgb([p.r, p.g, p.b])
                },
            )),
            Channels::Rgba => DynamicImage::ImageRgba8(RgbaImage::from_fn(
                width,
                self.header.height,
                |x, y| {
                    let p = at(x, y);
                    Rgba([p.r, p.g, p.b, p.a])
                },
            )),
        }
    }
}

/// Decode a QOI buffer
///
/// Opcodes are consumed until `width * height` pixels have been produced;
/// trailing bytes such as the end marker are ignored. When the opcode stream
/// runs out first the remaining pixels repeat the last decoded colour.
///
/// # Errors
/// Only header problems are reported, see [`QoiHeader::parse`].
pub fn decode_qoi(data: &[u8]) -> Result<QoiImage, GcodeError> {
    let header = QoiHeader::parse(data)?;
    let total = header.pixel_count();

    let mut pixels = Vec::with_capacity(total);
    let mut cache = [Pixel::default(); 64];
    let mut px = Pixel::new(0, 0, 0, 255);
    let mut run = 0usize;
    let mut pos = QOI_HEADER_SIZE;
    let mut truncated = false;

    while pixels.len() < total {
        if run > 0 {
            run -= 1;
        } else {
            let Some(&op) = data.get(pos) else {
                truncated = true;
                break;
            };
            let operand_len = match op {
                QOI_OP_RGB => 3,
                QOI_OP_RGBA => 4,
                _ if op & QOI_MASK_2 == QOI_OP_LUMA => 1,
                _ => 0,
            };
            let Some(args) = data.get(pos + 1..pos + 1 + operand_len) else {
                truncated = true;
                break;
            };
            pos += 1 + operand_len;

            match op {
                QOI_OP_RGB => {
                    px.r = args[0];
                    px.g = args[1];
                    px.b = args[2];
                }
                QOI_OP_RGBA => {
                    px = Pixel::new(args[0], args[1], args[2], args[3]);
                }
                _ => match op & QOI_MASK_2 {
                    QOI_OP_INDEX => px = cache[usize::from(op)],
                    QOI_OP_DIFF => {
                        px.r = px.r.wrapping_add((op >> 4) & 0x03).wrapping_sub(2);
                        px.g = px.g.wrapping_add((op >> 2) & 0x03).wrapping_sub(2);
                        px.b = px.b.wrapping_add(op & 0x03).wrapping_sub(2);
                    }
                    QOI_OP_LUMA => {
                        let vg = (op & 0x3f).wrapping_sub(32);
                        let second = args[0];
                        px.r = px
                            .r
                            .wrapping_add(vg)
                            .wrapping_sub(8)
                            .wrapping_add(second >> 4);
                        px.g = px.g.wrapping_add(vg);
                        px.b = px
                            .b
                            .wrapping_add(vg)
                            .wrapping_sub(8)
                            .wrapping_add(second & 0x0f);
                    }
                    // QOI_OP_RUN: this pixel plus `run` repeats
                    _ => run = usize::from(op & 0x3f),
                },
            }
        }

        pixels.push(px);
        cache[px.hash_index()] = px;
    }

    if truncated {
        debug!(
            decoded = pixels.len(),
            expected = total,
            "QOI stream ended early, padding with last colour"
        );
        pixels.resize(total, px);
    }

    Ok(QoiImage {
        header,
        pixels,
        truncated,
    })
}
