// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Container framer (C6): the outer chunked file structure (`QOIR` header,
//! `QPIX` pixel payload, `QEND` terminator) plus the encode/decode entry
//! points that tie the whole codec together.
//!
//! ```text
//! [QOIR chunk: tag | u64le length (=8) | u24le width, u8 pixfmt | u24le height, u8 reserved]
//! [0+ unknown chunks: tag | u64le length | length bytes]  (skipped)
//! [QPIX chunk: tag | u64le length | concatenated tiles]
//! [QEND chunk: tag | u64le length (=0)]
//! ```

use crate::alloc::{Allocator, DefaultAllocator};
use crate::byteio::{peek_u32le, peek_u64le, poke_u32le, poke_u64le};
use crate::error::{QoirError, Result};
use crate::lz4;
use crate::opcode::TS;
use crate::pixfmt::{PixelConfiguration, PixelFormat, MAX_DIMENSION};
use crate::swizzle::{copy_4, rgb_from_rgba, rgba_from_rgb};
use crate::tile;

const QOIR_TAG: u32 = 0x5249_4F51; // "QOIR" le.
const QPIX_TAG: u32 = 0x5849_5051; // "QPIX" le.
const QEND_TAG: u32 = 0x444E_4551; // "QEND" le.

const HEADER_CHUNK_LEN: usize = 20; // 4 (tag) + 8 (u64le length) + 8 (payload).
const CHUNK_HEADER_LEN: usize = 12; // 4 (tag) + 8 (u64le length).
/// The smallest possible well-formed container: header + empty `QPIX` + `QEND`.
pub const MIN_CONTAINER_LEN: usize = HEADER_CHUNK_LEN + CHUNK_HEADER_LEN + CHUNK_HEADER_LEN;

/// A source or destination pixel buffer: a pixel configuration plus dense,
/// tightly-packed pixel bytes (`stride == bytes_per_pixel * width`).
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// The buffer's pixel format, width and height.
    pub pixcfg: PixelConfiguration,
    /// Tightly-packed pixel bytes: `bytes_per_pixel * width * height` of them.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// The buffer's row stride in bytes, `bytes_per_pixel * width`.
    pub fn stride(&self) -> usize {
        self.pixcfg.pixfmt.bytes_per_pixel() * self.pixcfg.width as usize
    }
}

/// Options accepted by [`encode`]. `Default`s to the platform heap allocator.
pub struct EncodeOptions {
    /// The allocator used for the returned, caller-owned encoded bytes.
    pub allocator: Box<dyn Allocator>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { allocator: Box::new(DefaultAllocator) }
    }
}

/// Options accepted by [`decode`]. `Default`s to the platform heap allocator
/// and a destination pixel format of `RgbaNonpremul`.
pub struct DecodeOptions {
    /// The allocator used for the returned, caller-owned pixel buffer.
    pub allocator: Box<dyn Allocator>,
    /// The pixel format `decode` should produce. Only [`PixelFormat::Rgb`]
    /// and [`PixelFormat::RgbaNonpremul`] are accepted; a BGRA-family
    /// destination returns [`QoirError::UnsupportedPixfmt`] rather than
    /// panicking, leaving room to extend the swizzler table later without
    /// a breaking change.
    pub pixfmt: PixelFormat,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions { allocator: Box::new(DefaultAllocator), pixfmt: PixelFormat::RgbaNonpremul }
    }
}

fn validate_boundary_pixfmt(pixfmt: PixelFormat) -> Result<usize> {
    match pixfmt {
        PixelFormat::Rgb => Ok(3),
        PixelFormat::RgbaNonpremul => Ok(4),
        _ => Err(QoirError::UnsupportedPixfmt),
    }
}

/// The maximum (inclusive) number of bytes [`encode`] may write for a source
/// image of `width x height` pixels: tile count times the per-tile worst case
/// (prefix + raw literal form), plus 44 bytes of outer framing, plus the
/// one-time slack between a tile's raw size and its LZ4-compressed worst case
/// (since a tile may transiently grow past `4 * TS * TS` bytes while being
/// LZ4-compressed before the orchestrator picks the smallest candidate).
pub fn encode_worst_case_dst_len(width: u32, height: u32) -> Result<usize> {
    let (tiles_x, tiles_y) = tile::tile_grid(width as usize, height as usize);
    let tile_count = (tiles_x as u64) * (tiles_y as u64);
    let tile_worst_case: u64 = 4 + (4 * TS * TS) as u64;
    let lz4_slack = lz4::encode_worst_case_dst_len(4 * TS * TS)
        .map_err(QoirError::from)?
        .saturating_sub(4 * TS * TS) as u64;
    let total = tile_count
        .checked_mul(tile_worst_case)
        .and_then(|n| n.checked_add(MIN_CONTAINER_LEN as u64))
        .and_then(|n| n.checked_add(lz4_slack))
        .ok_or(QoirError::UnsupportedPixbufDimensions)?;
    usize::try_from(total).map_err(|_| QoirError::UnsupportedPixbufDimensions)
}

fn write_header(out: &mut [u8], pixfmt_raw: u8, width: u32, height: u32) {
    poke_u32le(&mut out[0..4], QOIR_TAG);
    poke_u64le(&mut out[4..12], 8);
    poke_u32le(&mut out[12..16], width & MAX_DIMENSION);
    out[15] = pixfmt_raw;
    poke_u32le(&mut out[16..20], height & MAX_DIMENSION);
}

/// Encodes `src` into a complete container, returning the caller-owned bytes.
///
/// Fails with [`QoirError::UnsupportedPixfmt`] if `src.pixcfg.pixfmt` is not
/// [`PixelFormat::Rgb`] or [`PixelFormat::RgbaNonpremul`], with
/// [`QoirError::UnsupportedPixbuf`] if `src.data`'s length does not match
/// `src.stride() * height`, with [`QoirError::UnsupportedPixbufDimensions`]
/// if either dimension exceeds [`MAX_DIMENSION`] or the output size would
/// overflow, and with [`QoirError::OutOfMemory`] if the allocator fails.
pub fn encode(src: &PixelBuffer, options: &EncodeOptions) -> Result<Vec<u8>> {
    let num_channels = validate_boundary_pixfmt(src.pixcfg.pixfmt)?;
    let width = src.pixcfg.width;
    let height = src.pixcfg.height;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(QoirError::UnsupportedPixbufDimensions);
    }
    let stride = num_channels * width as usize;
    let expected_len = stride.checked_mul(height as usize).ok_or(QoirError::UnsupportedPixbufDimensions)?;
    if src.data.len() != expected_len {
        return Err(QoirError::UnsupportedPixbuf);
    }

    let mut qpix_payload = Vec::new();
    if width > 0 && height > 0 {
        let mut dense = vec![0u8; width as usize * height as usize * 4];
        if num_channels == 4 {
            copy_4(&mut dense, width as usize * 4, &src.data, stride, width as usize, height as usize);
        } else {
            rgba_from_rgb(&mut dense, width as usize * 4, &src.data, stride, width as usize, height as usize);
        }
        tile::encode_image(&dense, width as usize, height as usize, &mut qpix_payload)?;
    }

    let pixfmt_raw = if num_channels == 3 { PixelFormat::Bgrx.to_raw() } else { PixelFormat::BgraNonpremul.to_raw() };
    let total_len = HEADER_CHUNK_LEN + CHUNK_HEADER_LEN + qpix_payload.len() + CHUNK_HEADER_LEN;
    let mut dst = options.allocator.allocate(total_len).ok_or(QoirError::OutOfMemory)?;

    write_header(&mut dst[0..HEADER_CHUNK_LEN], pixfmt_raw, width, height);

    let qpix_start = HEADER_CHUNK_LEN;
    poke_u32le(&mut dst[qpix_start..qpix_start + 4], QPIX_TAG);
    poke_u64le(&mut dst[qpix_start + 4..qpix_start + 12], qpix_payload.len() as u64);
    dst[qpix_start + CHUNK_HEADER_LEN..qpix_start + CHUNK_HEADER_LEN + qpix_payload.len()]
        .copy_from_slice(&qpix_payload);

    let qend_start = qpix_start + CHUNK_HEADER_LEN + qpix_payload.len();
    poke_u32le(&mut dst[qend_start..qend_start + 4], QEND_TAG);
    poke_u64le(&mut dst[qend_start + 4..qend_start + 12], 0);
    debug_assert_eq!(qend_start + CHUNK_HEADER_LEN, total_len);

    Ok(dst)
}

/// A cheap, header-only peek at a container's pixel configuration: reads
/// only the first 20 bytes, performing no tile decode.
pub fn decode_pixel_configuration(src: &[u8]) -> Result<PixelConfiguration> {
    if src.len() < HEADER_CHUNK_LEN || peek_u32le(&src[0..4]) != QOIR_TAG {
        return Err(QoirError::InvalidData);
    }
    let header_payload_len = peek_u64le(&src[4..12]);
    if header_payload_len != 8 {
        return Err(QoirError::InvalidData);
    }
    let header0 = peek_u32le(&src[12..16]);
    let width = header0 & MAX_DIMENSION;
    let pixfmt = PixelFormat::from_raw(((header0 >> 24) & 0x0F) as u8)?;
    if !pixfmt.is_file_representable() {
        return Err(QoirError::InvalidData);
    }
    let header1 = peek_u32le(&src[16..20]);
    let height = header1 & MAX_DIMENSION;
    Ok(PixelConfiguration { pixfmt, width, height })
}

/// Decodes a complete container `src` into a caller-owned [`PixelBuffer`].
///
/// Fails with [`QoirError::InvalidData`] on any malformed framing (bad
/// magic, missing or duplicate `QPIX`, a `QEND` that is not the final 12
/// bytes, truncated chunk lengths), with [`QoirError::UnsupportedTileFormat`]
/// if a tile prefix's format tag exceeds 3, with
/// [`QoirError::UnsupportedPixfmt`] if `options.pixfmt` is not
/// [`PixelFormat::Rgb`] or [`PixelFormat::RgbaNonpremul`], and with
/// [`QoirError::OutOfMemory`] if the allocator fails.
pub fn decode(src: &[u8], options: &DecodeOptions) -> Result<PixelBuffer> {
    let dst_num_channels = validate_boundary_pixfmt(options.pixfmt)?;
    if src.len() < MIN_CONTAINER_LEN || peek_u32le(&src[0..4]) != QOIR_TAG {
        return Err(QoirError::InvalidData);
    }
    let header_payload_len = peek_u64le(&src[4..12]) as usize;
    if header_payload_len != 8 || header_payload_len > src.len() - 12 {
        return Err(QoirError::InvalidData);
    }
    let header0 = peek_u32le(&src[12..16]);
    let width = header0 & MAX_DIMENSION;
    let src_pixfmt = PixelFormat::from_raw(((header0 >> 24) & 0x0F) as u8)?;
    if !src_pixfmt.is_file_representable() {
        return Err(QoirError::InvalidData);
    }
    let header1 = peek_u32le(&src[16..20]);
    let height = header1 & MAX_DIMENSION;

    let dst_stride = dst_num_channels.checked_mul(width as usize).ok_or(QoirError::UnsupportedPixbufDimensions)?;
    let dst_len = dst_stride.checked_mul(height as usize).ok_or(QoirError::UnsupportedPixbufDimensions)?;

    let mut body = &src[HEADER_CHUNK_LEN..];
    let mut seen_qpix = false;
    let mut dense: Option<Vec<u8>> = None;

    loop {
        if body.len() < CHUNK_HEADER_LEN {
            return Err(QoirError::InvalidData);
        }
        let chunk_tag = peek_u32le(&body[0..4]);
        let payload_len = peek_u64le(&body[4..12]);
        body = &body[CHUNK_HEADER_LEN..];

        if chunk_tag == QOIR_TAG {
            return Err(QoirError::InvalidData);
        }
        if chunk_tag == QEND_TAG {
            if payload_len != 0 || !body.is_empty() {
                return Err(QoirError::InvalidData);
            }
            break;
        }

        let payload_len = usize::try_from(payload_len).map_err(|_| QoirError::InvalidData)?;
        if payload_len > body.len() || (body.len() - payload_len) < CHUNK_HEADER_LEN {
            return Err(QoirError::InvalidData);
        }

        if chunk_tag == QPIX_TAG {
            if seen_qpix {
                return Err(QoirError::InvalidData);
            }
            seen_qpix = true;
            if width == 0 || height == 0 {
                if payload_len != 0 {
                    return Err(QoirError::InvalidData);
                }
            } else {
                dense = Some(tile::decode_image(&body[..payload_len], width as usize, height as usize)?);
            }
        }
        // Unknown chunk tags are skipped; their declared length must still
        // leave room for at least the trailing QEND chunk, checked above.

        body = &body[payload_len..];
    }

    if !seen_qpix {
        return Err(QoirError::InvalidData);
    }

    let mut dst = options.allocator.allocate(dst_len).ok_or(QoirError::OutOfMemory)?;
    if let Some(dense) = dense {
        match options.pixfmt {
            PixelFormat::RgbaNonpremul => {
                copy_4(&mut dst, dst_stride, &dense, width as usize * 4, width as usize, height as usize);
            }
            PixelFormat::Rgb => {
                rgb_from_rgba(&mut dst, dst_stride, &dense, width as usize * 4, width as usize, height as usize);
            }
            _ => unreachable!("validate_boundary_pixfmt already rejected other formats"),
        }
    }

    Ok(PixelBuffer { pixcfg: PixelConfiguration { pixfmt: options.pixfmt, width, height }, data: dst })
}
