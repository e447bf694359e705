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

//! Error types for the codec.

use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, QoirError>;

/// Errors raised by encode/decode and the container framer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QoirError {
    /// A required argument was missing or self-contradictory (e.g. a null
    /// buffer where one was mandatory).
    #[error("#qoir: invalid argument")]
    InvalidArgument,

    /// The input bytes were not a well-formed container, LZ4 block, or
    /// opcode stream.
    #[error("#qoir: invalid data")]
    InvalidData,

    /// An allocator hook returned `None`.
    #[error("#qoir: out of memory")]
    OutOfMemory,

    /// The source pixel buffer's stride did not match `bytes_per_pixel * width`.
    #[error("#qoir: unsupported pixbuf")]
    UnsupportedPixbuf,

    /// Width or height exceeded 0x00FF_FFFF, or the overall byte count
    /// overflowed.
    #[error("#qoir: unsupported pixbuf dimensions")]
    UnsupportedPixbufDimensions,

    /// The requested pixel format is not `Rgb` or `RgbaNonpremul` at an
    /// encode/decode boundary.
    #[error("#qoir: unsupported pixfmt")]
    UnsupportedPixfmt,

    /// A tile prefix's format tag was greater than 3.
    #[error("#qoir: unsupported tile format")]
    UnsupportedTileFormat,

    /// An LZ4-specific failure; see [`Lz4Error`].
    #[error(transparent)]
    Lz4(#[from] Lz4Error),
}

/// Errors raised by the standalone LZ4 block codec ([`crate::lz4`]).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Lz4Error {
    /// The destination buffer could not hold the decompressed (or
    /// worst-case compressed) output.
    #[error("#qoir/lz4: dst is too short")]
    DstIsTooShort,

    /// The source buffer's length exceeded the implementation's bound
    /// (`0x00FF_FFFF` for decode, `0x7E00_0000` for encode).
    #[error("#qoir/lz4: src is too long")]
    SrcIsTooLong,

    /// A token, extension byte, or back-reference in the source was
    /// malformed.
    #[error("#qoir/lz4: invalid data")]
    InvalidData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_stable_strings() {
        assert_eq!(QoirError::InvalidArgument.to_string(), "#qoir: invalid argument");
        assert_eq!(QoirError::InvalidData.to_string(), "#qoir: invalid data");
        assert_eq!(QoirError::OutOfMemory.to_string(), "#qoir: out of memory");
        assert_eq!(QoirError::UnsupportedPixbuf.to_string(), "#qoir: unsupported pixbuf");
        assert_eq!(
            QoirError::UnsupportedPixbufDimensions.to_string(),
            "#qoir: unsupported pixbuf dimensions"
        );
        assert_eq!(QoirError::UnsupportedPixfmt.to_string(), "#qoir: unsupported pixfmt");
        assert_eq!(
            QoirError::UnsupportedTileFormat.to_string(),
            "#qoir: unsupported tile format"
        );
        assert_eq!(
            QoirError::from(Lz4Error::DstIsTooShort).to_string(),
            "#qoir/lz4: dst is too short"
        );
        assert_eq!(Lz4Error::SrcIsTooLong.to_string(), "#qoir/lz4: src is too long");
        assert_eq!(Lz4Error::InvalidData.to_string(), "#qoir/lz4: invalid data");
    }
}
