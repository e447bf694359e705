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

//! Test Fixture Generator
//!
//! Generates deterministic RGBA test images used as inputs for the
//! integration tests under `tests/`. These fixtures are identical on every
//! platform (no randomness), so the round-trip assertions that consume them
//! never depend on build environment.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_fixture
//! ```
//!
//! # Generated Files
//!
//! - `tests/fixtures/frame_64x64.rgba` (16,384 bytes)
//!   - 64x64 image with 4 quadrants, smaller than one tile on both axes:
//!     - Top-left: red horizontal gradient
//!     - Top-right: green vertical gradient
//!     - Bottom-left: solid blue (collapses to one `RUNL` opcode stream)
//!     - Bottom-right: checkerboard (exercises run/non-run alternation)
//!
//! - `tests/fixtures/frame_128x128.rgba` (65,536 bytes)
//!   - Exactly one tile on each axis (`TS = 128`), a diagonal gradient.
//!
//! - `tests/fixtures/frame_130x130.rgba` (67,600 bytes)
//!   - One pixel more than a multiple of 128 on each axis, so every tile in
//!     the right column and bottom row is a short (2-pixel-wide/tall) tile.

fn write_fixture(name: &str, pixels: &[u8]) {
    std::fs::create_dir_all("tests/fixtures").unwrap();
    let path = format!("tests/fixtures/{name}");
    std::fs::write(&path, pixels).unwrap();
    println!("Generated {path} ({} bytes)", pixels.len());
}

fn main() {
    let mut quadrants = Vec::with_capacity(64 * 64 * 4);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let (r, g, b, a) = if x < 32 && y < 32 {
                ((x * 8) as u8, 0, 0, 255)
            } else if x >= 32 && y < 32 {
                (0, (y * 8) as u8, 0, 255)
            } else if x < 32 && y >= 32 {
                (0, 0, 200, 255)
            } else if (x + y) % 2 == 0 {
                (255, 255, 255, 255)
            } else {
                (0, 0, 0, 255)
            };
            quadrants.extend_from_slice(&[r, g, b, a]);
        }
    }
    write_fixture("frame_64x64.rgba", &quadrants);

    let mut one_tile = Vec::with_capacity(128 * 128 * 4);
    for y in 0..128u32 {
        for x in 0..128u32 {
            one_tile.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    write_fixture("frame_128x128.rgba", &one_tile);

    let mut short_tiles = Vec::with_capacity(130 * 130 * 4);
    for y in 0..130u32 {
        for x in 0..130u32 {
            let r = ((x * 255) / 130) as u8;
            let g = ((y * 255) / 130) as u8;
            short_tiles.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    write_fixture("frame_130x130.rgba", &short_tiles);
}
