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

//! # qoir
//!
//! A fast, lossless tile-based codec for 24-bit RGB and 32-bit RGBA raster
//! images.
//!
//! The container frames a header, a compressed pixel payload and a
//! terminator (`QOIR` / `QPIX` / `QEND` chunks, see [`container`]). The
//! pixel payload is partitioned into fixed-size square tiles, each encoded
//! independently as a QOI-derived predicted-residual opcode stream
//! ([`opcode`]), an LZ4 block ([`lz4`]), or raw literals — whichever is
//! smallest ([`tile`]).
//!
//! ## Quick start
//!
//! ```
//! use qoir::{encode, decode, EncodeOptions, DecodeOptions, PixelBuffer, PixelConfiguration, PixelFormat};
//!
//! let pixcfg = PixelConfiguration { pixfmt: PixelFormat::Rgb, width: 2, height: 2 };
//! let src = PixelBuffer { pixcfg, data: vec![0u8; 2 * 2 * 3] };
//!
//! let bytes = encode(&src, &EncodeOptions::default()).unwrap();
//! let decoded = decode(&bytes, &DecodeOptions { pixfmt: PixelFormat::Rgb, ..Default::default() }).unwrap();
//! assert_eq!(decoded.data, src.data);
//! ```
//!
//! ## Scope
//!
//! This crate implements the tile codec, the LZ4 block codec, and the tile
//! orchestrator and container framer that tie them together. It does not
//! include a PNG reader/writer, a viewer, or a `qoirconv`-style CLI — those
//! are external collaborators that would invoke this crate's `encode`/
//! `decode` entry points.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alloc;
pub mod byteio;
pub mod container;
pub mod error;
pub mod lz4;
pub mod opcode;
pub mod pixfmt;
pub mod swizzle;
pub mod tile;

pub use alloc::{Allocator, DefaultAllocator};
pub use container::{decode, decode_pixel_configuration, encode, encode_worst_case_dst_len, DecodeOptions, EncodeOptions, PixelBuffer};
pub use error::{Lz4Error, QoirError, Result};
pub use opcode::TS;
pub use pixfmt::{PixelConfiguration, PixelFormat, MAX_DIMENSION};
