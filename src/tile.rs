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

//! Tile orchestrator (C5): partitions an image into `TS x TS` tiles, picks
//! one of four per-tile payload formats, and drives the swizzler, opcode
//! codec and LZ4 codec to produce (or consume) the concatenated tile stream
//! that makes up a `QPIX` chunk's payload.
//!
//! Decode is stateless across tiles — the color cache resets inside
//! [`crate::opcode::decode_tile`] for every tile — so a caller may decode
//! disjoint bands of tile rows independently and in parallel; this module
//! only ever processes one call's worth of tiles but places no hidden state
//! across calls that would prevent that.

use crate::byteio::{peek_u32le, poke_u32le};
use crate::error::{QoirError, Result};
use crate::lz4;
use crate::opcode::{self, TS};
use crate::swizzle::copy_4;

#[cfg(feature = "debug-logging")]
use log::debug;

/// Per-tile payload format, in ascending tag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFormat {
    Literals = 0,
    Opcodes = 1,
    Lz4Literals = 2,
    Lz4Opcodes = 3,
}

impl TileFormat {
    fn from_tag(tag: u32) -> Result<Self> {
        match tag {
            0 => Ok(TileFormat::Literals),
            1 => Ok(TileFormat::Opcodes),
            2 => Ok(TileFormat::Lz4Literals),
            3 => Ok(TileFormat::Lz4Opcodes),
            _ => Err(QoirError::UnsupportedTileFormat),
        }
    }
}

const RESERVED_BIT_GUARD_LEN: u32 = (4 * TS * TS) as u32;

fn encode_prefix(len: u32, tag: TileFormat) -> u32 {
    debug_assert!(len <= 0x00FF_FFFF);
    (len & 0x00FF_FFFF) | ((tag as u32) << 24)
}

/// Splits a 32-bit tile prefix into `(payload length, format)`.
///
/// Per the design's own guard: bit 31 is unconstrained while `len <= 4 * TS *
/// TS`, and must be zero once `len` exceeds that bound.
fn decode_prefix(prefix: u32) -> Result<(u32, TileFormat)> {
    let len = prefix & 0x00FF_FFFF;
    let tag = (prefix >> 24) & 0x7F;
    if len > RESERVED_BIT_GUARD_LEN && (prefix & 0x8000_0000) != 0 {
        return Err(QoirError::InvalidData);
    }
    Ok((len, TileFormat::from_tag(tag)?))
}

/// Number of tiles along each axis for an image of `width x height` pixels.
pub fn tile_grid(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(TS), height.div_ceil(TS))
}

/// Pixel dimensions of the tile at grid coordinate `(tx, ty)`.
fn tile_dims(width: usize, height: usize, tx: usize, ty: usize) -> (usize, usize) {
    let tw = if (tx + 1) * TS <= width { TS } else { width - tx * TS };
    let th = if (ty + 1) * TS <= height { TS } else { height - ty * TS };
    (tw, th)
}

/// Reusable scratch for one `encode_image` call, sized to the worst case for
/// a single tile so no per-tile allocation is needed.
struct EncodeScratch {
    opcodes: Vec<u8>,
    literals: Vec<u8>,
    lz4_out: Vec<u8>,
}

impl EncodeScratch {
    fn new() -> Result<Self> {
        let opcode_cap = 5 * TS * TS + 64;
        Ok(EncodeScratch {
            opcodes: vec![0u8; opcode_cap],
            literals: vec![0u8; 4 * TS * TS],
            lz4_out: vec![0u8; lz4::encode_worst_case_dst_len(opcode_cap)?],
        })
    }
}

struct DecodeScratch {
    opcodes: Vec<u8>,
    literals: Vec<u8>,
}

impl DecodeScratch {
    fn new() -> Self {
        DecodeScratch {
            // 8 bytes of trailing padding so the opcode decoder can safely
            // read ahead near the end of the stream without a bounds check
            // on every single opcode byte.
            opcodes: vec![0u8; 4 * TS * TS + 8],
            literals: vec![0u8; 4 * TS * TS],
        }
    }
}

fn emit(out: &mut Vec<u8>, tag: TileFormat, payload: &[u8]) {
    let mut prefix_bytes = [0u8; 4];
    poke_u32le(&mut prefix_bytes, encode_prefix(payload.len() as u32, tag));
    out.extend_from_slice(&prefix_bytes);
    out.extend_from_slice(payload);
}

/// Encodes a dense RGBA image (`width * height * 4` bytes, tightly packed)
/// into the concatenated per-tile records that form a `QPIX` payload.
pub fn encode_image(pixels: &[u8], width: usize, height: usize, out: &mut Vec<u8>) -> Result<()> {
    debug_assert_eq!(pixels.len(), width * height * 4);
    if width == 0 || height == 0 {
        return Ok(());
    }
    let mut scratch = EncodeScratch::new()?;
    let (tiles_x, tiles_y) = tile_grid(width, height);
    let stride = width * 4;

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let (tw, th) = tile_dims(width, height, tx, ty);
            let literals = &mut scratch.literals[..tw * th * 4];
            let src_off = (ty * TS) * stride + (tx * TS) * 4;
            copy_4(literals, tw * 4, &pixels[src_off..], stride, tw, th);

            let op_len = opcode::encode_tile(literals, tw, th, &mut scratch.opcodes);
            let raw_len = tw * th * 4;

            if op_len >= raw_len {
                let lz4_hit = lz4::encode(&mut scratch.lz4_out, literals)
                    .ok()
                    .filter(|&n| n < op_len);
                match lz4_hit {
                    Some(n) => {
                        #[cfg(feature = "debug-logging")]
                        debug!("tile ({tx},{ty}): lz4-literals, {n} bytes");
                        emit(out, TileFormat::Lz4Literals, &scratch.lz4_out[..n]);
                    }
                    None => {
                        #[cfg(feature = "debug-logging")]
                        debug!("tile ({tx},{ty}): literals, {raw_len} bytes");
                        emit(out, TileFormat::Literals, literals);
                    }
                }
            } else {
                let opcodes = &scratch.opcodes[..op_len];
                let lz4_hit = lz4::encode(&mut scratch.lz4_out, opcodes)
                    .ok()
                    .filter(|&n| n < op_len);
                match lz4_hit {
                    Some(n) => {
                        #[cfg(feature = "debug-logging")]
                        debug!("tile ({tx},{ty}): lz4-opcodes, {n} bytes");
                        emit(out, TileFormat::Lz4Opcodes, &scratch.lz4_out[..n]);
                    }
                    None => {
                        #[cfg(feature = "debug-logging")]
                        debug!("tile ({tx},{ty}): opcodes, {op_len} bytes");
                        emit(out, TileFormat::Opcodes, opcodes);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Decodes a `QPIX` payload into a dense `width * height * 4` RGBA buffer.
pub fn decode_image(payload: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let mut pixels = vec![0u8; width * height * 4];
    if width == 0 || height == 0 {
        return Ok(pixels);
    }
    let mut scratch = DecodeScratch::new();
    let (tiles_x, tiles_y) = tile_grid(width, height);
    let stride = width * 4;
    let mut pos = 0usize;

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let (tw, th) = tile_dims(width, height, tx, ty);
            if pos + 4 > payload.len() {
                return Err(QoirError::InvalidData);
            }
            let prefix = peek_u32le(&payload[pos..]);
            let (len, fmt) = decode_prefix(prefix)?;
            pos += 4;
            let len = len as usize;
            if len > payload.len() - pos {
                return Err(QoirError::InvalidData);
            }
            let raw_len = tw * th * 4;
            let body = &payload[pos..pos + len];
            pos += len;

            let literals = &mut scratch.literals[..raw_len];
            match fmt {
                TileFormat::Literals => {
                    if len != raw_len {
                        return Err(QoirError::InvalidData);
                    }
                    literals.copy_from_slice(body);
                }
                TileFormat::Lz4Literals => {
                    let n = lz4::decode(literals, body).map_err(QoirError::from)?;
                    if n != raw_len {
                        return Err(QoirError::InvalidData);
                    }
                }
                TileFormat::Opcodes => {
                    if len > 4 * TS * TS {
                        return Err(QoirError::InvalidData);
                    }
                    let opcodes = &mut scratch.opcodes[..len + 8];
                    opcodes[..len].copy_from_slice(body);
                    opcodes[len..].fill(0);
                    opcode::decode_tile(opcodes, len, tw, th, literals)?;
                }
                TileFormat::Lz4Opcodes => {
                    if len > 4 * TS * TS {
                        return Err(QoirError::InvalidData);
                    }
                    let op_cap = 4 * TS * TS + 8;
                    let n = lz4::decode(&mut scratch.opcodes[..op_cap], body).map_err(QoirError::from)?;
                    if n > 4 * TS * TS {
                        return Err(QoirError::InvalidData);
                    }
                    scratch.opcodes[n..n + 8].fill(0);
                    opcode::decode_tile(&scratch.opcodes[..n + 8], n, tw, th, literals)?;
                }
            }

            let dst_off = (ty * TS) * stride + (tx * TS) * 4;
            copy_4(&mut pixels[dst_off..], stride, &scratch.literals[..raw_len], tw * 4, tw, th);
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut payload = Vec::new();
        encode_image(pixels, width, height, &mut payload).unwrap();
        let decoded = decode_image(&payload, width, height).unwrap();
        assert_eq!(decoded, pixels);
        payload
    }

    #[test]
    fn single_pixel_rgb_produces_opcodes_tag() {
        // Deltas of 17, 34, 51 against a (0,0,0) predictor are too large for
        // RGB2 or LUMA but fit RGB7 (+-64): a 3-byte opcode.
        let pixels = [0x11, 0x22, 0x33, 0xFF];
        let payload = round_trip(&pixels, 1, 1);
        assert_eq!(payload.len(), 4 + 3);
        assert_eq!(peek_u32le(&payload), 0x01_00_00_03);
        assert_eq!(payload[4] & 0b111, 0b011); // RGB7
    }

    #[test]
    fn solid_tile_collapses_to_opcodes() {
        let mut pixels = Vec::new();
        for _ in 0..16 {
            pixels.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        }
        let payload = round_trip(&pixels, 4, 4);
        let (_len, fmt) = decode_prefix(peek_u32le(&payload)).unwrap();
        assert_eq!(fmt, TileFormat::Opcodes);
    }

    #[test]
    fn multi_tile_image_round_trips() {
        let width = 200;
        let height = 130;
        let mut pixels = vec![0u8; width * height * 4];
        for (i, px) in pixels.chunks_mut(4).enumerate() {
            px[0] = (i % 251) as u8;
            px[1] = (i / 7 % 251) as u8;
            px[2] = (i / 13 % 251) as u8;
            px[3] = 0xFF;
        }
        round_trip(&pixels, width, height);
    }

    #[test]
    fn zero_dimension_round_trips_to_empty_payload() {
        let payload = round_trip(&[], 0, 7);
        assert!(payload.is_empty());
    }

    #[test]
    fn decode_rejects_tile_format_tag_above_three() {
        let mut prefix = [0u8; 4];
        poke_u32le(&mut prefix, encode_prefix(0, TileFormat::Literals) | (7 << 24));
        let err = decode_image(&prefix, 1, 1).unwrap_err();
        assert_eq!(err, QoirError::UnsupportedTileFormat);
    }

    #[test]
    fn decode_rejects_truncated_length_claim() {
        let mut prefix = [0u8; 4];
        poke_u32le(&mut prefix, encode_prefix(100, TileFormat::Literals));
        let err = decode_image(&prefix, 1, 1).unwrap_err();
        assert_eq!(err, QoirError::InvalidData);
    }
}
