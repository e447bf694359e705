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

//! Little-endian 32/64-bit peek/poke over byte slices.
//!
//! These are unchecked: callers are responsible for bounds. On every target
//! `u32::from_le_bytes`/`to_le_bytes` compile to a single unaligned load or
//! store, so there is no need for the `memcpy`-based fast path the format's
//! reference implementation uses on MSVC.

#[inline]
pub fn peek_u32le(b: &[u8]) -> u32 {
    u32::from_le_bytes(b[0..4].try_into().unwrap())
}

#[inline]
pub fn peek_u64le(b: &[u8]) -> u64 {
    u64::from_le_bytes(b[0..8].try_into().unwrap())
}

#[inline]
pub fn poke_u32le(b: &mut [u8], v: u32) {
    b[0..4].copy_from_slice(&v.to_le_bytes());
}

#[inline]
pub fn poke_u64le(b: &mut [u8], v: u64) {
    b[0..8].copy_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_u32() {
        let mut buf = [0u8; 4];
        poke_u32le(&mut buf, 0x11223344);
        assert_eq!(peek_u32le(&buf), 0x11223344);
        assert_eq!(buf, [0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn round_trips_u64() {
        let mut buf = [0u8; 8];
        poke_u64le(&mut buf, 0x0102030405060708);
        assert_eq!(peek_u64le(&buf), 0x0102030405060708);
        assert_eq!(buf, [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn peek_ignores_trailing_bytes() {
        let buf = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x00];
        assert_eq!(peek_u32le(&buf), 0xDDCCBBAA);
    }
}
