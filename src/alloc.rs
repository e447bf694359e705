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

//! Allocator injection for the buffers `encode`/`decode` hand back to callers.
//!
//! The reference implementation threads a `(malloc_func, free_func, context)`
//! triple through its options structs rather than reaching for a global
//! allocator. The typed equivalent is a trait, passed by reference through
//! [`crate::EncodeOptions`]/[`crate::DecodeOptions`] — never stored in global
//! state, so callers can substitute an arena or pool allocator per call.

/// Allocates the destination buffers `encode`/`decode` hand back to callers.
///
/// `allocate` returns `None` on failure, surfaced by callers as
/// [`crate::error::QoirError::OutOfMemory`]. The default, platform-heap
/// implementation never fails in practice, but still returns `Option` so the
/// contract holds for custom allocators (e.g. arena or pool allocators) that
/// can run out of room.
pub trait Allocator {
    /// Returns a zeroed buffer of exactly `len` bytes, or `None` on failure.
    fn allocate(&self, len: usize) -> Option<Vec<u8>>;
}

/// Wraps the platform's global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAllocator;

impl Allocator for DefaultAllocator {
    fn allocate(&self, len: usize) -> Option<Vec<u8>> {
        Some(vec![0u8; len])
    }
}
