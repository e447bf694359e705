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

//! Pixel swizzlers (C2): rectangular copies between packings.
//!
//! Every swizzler here walks `height` rows of `width` pixels, each row
//! addressed independently via its own stride, and none support overlapping
//! src/dst regions.

/// Straight 4-byte-per-pixel copy.
pub fn copy_4(dst: &mut [u8], dst_stride: usize, src: &[u8], src_stride: usize, width: usize, height: usize) {
    for row in 0..height {
        let s = &src[row * src_stride..row * src_stride + width * 4];
        let d = &mut dst[row * dst_stride..row * dst_stride + width * 4];
        d.copy_from_slice(s);
    }
}

/// Drop the 4th (alpha) byte of every pixel: RGBA source to RGB destination.
pub fn rgb_from_rgba(dst: &mut [u8], dst_stride: usize, src: &[u8], src_stride: usize, width: usize, height: usize) {
    for row in 0..height {
        let s = &src[row * src_stride..row * src_stride + width * 4];
        let d = &mut dst[row * dst_stride..row * dst_stride + width * 3];
        for x in 0..width {
            d[x * 3..x * 3 + 3].copy_from_slice(&s[x * 4..x * 4 + 3]);
        }
    }
}

/// Insert alpha = 0xFF as the 4th byte of every pixel: RGB source to RGBA
/// destination.
pub fn rgba_from_rgb(dst: &mut [u8], dst_stride: usize, src: &[u8], src_stride: usize, width: usize, height: usize) {
    for row in 0..height {
        let s = &src[row * src_stride..row * src_stride + width * 3];
        let d = &mut dst[row * dst_stride..row * dst_stride + width * 4];
        for x in 0..width {
            d[x * 4..x * 4 + 3].copy_from_slice(&s[x * 3..x * 3 + 3]);
            d[x * 4 + 3] = 0xFF;
        }
    }
}
