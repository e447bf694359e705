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

//! A self-contained LZ4 block compressor/decompressor (C3).
//!
//! This is the raw LZ4 *block* format (no frame header, no end marker): see
//! <https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md>. It is used
//! both as a second-stage wrapper around opcode streams and directly on raw
//! pixel literals.

use crate::byteio::peek_u32le;
use crate::error::Lz4Error;

/// Maximum source length accepted by [`decode`].
pub const BLOCK_DECODE_MAX_INCL_SRC_LEN: usize = 0x00FF_FFFF;
/// Maximum source length accepted by [`encode`] / [`encode_worst_case_dst_len`].
pub const BLOCK_ENCODE_MAX_INCL_SRC_LEN: usize = 0x7E00_0000;

const HASH_TABLE_BITS: u32 = 12;
const HASH_TABLE_SIZE: usize = 1 << HASH_TABLE_BITS;

#[inline]
fn hash(x: u32) -> usize {
    // 2654435761 is Knuth's multiplicative hash constant.
    ((x.wrapping_mul(2654435761)) >> (32 - HASH_TABLE_BITS)) as usize
}

/// Decompresses an LZ4 block `src` into `dst`, returning the number of bytes
/// written.
///
/// Fails with [`Lz4Error::SrcIsTooLong`] if `src.len() >
/// BLOCK_DECODE_MAX_INCL_SRC_LEN`, with [`Lz4Error::DstIsTooShort`] if `dst`
/// cannot hold the decompressed output, and with [`Lz4Error::InvalidData`] on
/// truncated tokens/extension bytes, a zero back-reference offset, or a
/// back-reference pointing before the start of `dst`.
pub fn decode(dst: &mut [u8], src: &[u8]) -> Result<usize, Lz4Error> {
    if src.len() > BLOCK_DECODE_MAX_INCL_SRC_LEN {
        return Err(Lz4Error::SrcIsTooLong);
    }
    if src.is_empty() {
        // An empty block decompresses to nothing. The generic token loop
        // below cannot express this: every non-terminal sequence needs a
        // match part, and the final sequence is only recognized as such by
        // running out of source *after* copying a nonempty literal.
        return Ok(0);
    }

    let mut sp = 0usize; // read cursor into src
    let mut dp = 0usize; // write cursor into dst
    let src_len = src.len();
    let dst_len = dst.len();

    while sp < src_len {
        let token = src[sp] as u32;
        sp += 1;

        let mut literal_len = token >> 4;
        if literal_len > 0 {
            if literal_len == 15 {
                loop {
                    if sp >= src_len {
                        return Err(Lz4Error::InvalidData);
                    }
                    let s = src[sp] as u32;
                    sp += 1;
                    literal_len += s;
                    if s != 255 {
                        break;
                    }
                }
            }
            let literal_len = literal_len as usize;
            if literal_len > src_len - sp {
                return Err(Lz4Error::InvalidData);
            } else if literal_len > dst_len - dp {
                return Err(Lz4Error::DstIsTooShort);
            }
            dst[dp..dp + literal_len].copy_from_slice(&src[sp..sp + literal_len]);
            dp += literal_len;
            sp += literal_len;
            if sp == src_len {
                return Ok(dp);
            }
        }

        if src_len - sp < 2 {
            return Err(Lz4Error::InvalidData);
        }
        let copy_off = (src[sp] as usize) | ((src[sp + 1] as usize) << 8);
        sp += 2;
        if copy_off == 0 || copy_off > dp {
            return Err(Lz4Error::InvalidData);
        }

        let mut copy_len = (token & 15) + 4;
        if copy_len == 19 {
            loop {
                if sp >= src_len {
                    return Err(Lz4Error::InvalidData);
                }
                let s = src[sp] as u32;
                sp += 1;
                copy_len += s;
                if s != 255 {
                    break;
                }
            }
        }
        let copy_len = copy_len as usize;

        if dst_len - dp < copy_len {
            return Err(Lz4Error::DstIsTooShort);
        }
        let mut from = dp - copy_off;
        for _ in 0..copy_len {
            dst[dp] = dst[from];
            dp += 1;
            from += 1;
        }
    }

    Err(Lz4Error::InvalidData)
}

/// Returns the maximum (inclusive) number of bytes [`encode`] may write for
/// a source of length `src_len`.
pub fn encode_worst_case_dst_len(src_len: usize) -> Result<usize, Lz4Error> {
    if src_len > BLOCK_ENCODE_MAX_INCL_SRC_LEN {
        return Err(Lz4Error::SrcIsTooLong);
    }
    Ok(src_len + (src_len / 255) + 16)
}

#[inline]
fn longest_common_prefix(p: &[u8], q: &[u8], max_len: usize) -> usize {
    let mut n = max_len.min(p.len()).min(q.len());
    let mut i = 0;
    while n >= 4 && peek_u32le(&p[i..]) == peek_u32le(&q[i..]) {
        i += 4;
        n -= 4;
    }
    while n > 0 && p[i] == q[i] {
        i += 1;
        n -= 1;
    }
    i
}

/// Pushes a brand-new token byte (plus 0xFF-extension bytes if `len >= 15`)
/// encoding `len` in the high nibble.
fn push_new_token(out: &mut Vec<u8>, len: usize) {
    if len < 15 {
        out.push((len as u8) << 4);
    } else {
        out.push(0xF0);
        let mut n = len - 15;
        while n >= 255 {
            out.push(0xFF);
            n -= 255;
        }
        out.push(n as u8);
    }
}

/// ORs `len` into the low nibble of the token byte at `out[token_index]`,
/// appending 0xFF-extension bytes after it if `len >= 15`.
fn or_match_length(out: &mut Vec<u8>, token_index: usize, len: usize) {
    if len < 15 {
        out[token_index] |= len as u8;
    } else {
        out[token_index] |= 0x0F;
        let mut n = len - 15;
        while n >= 255 {
            out.push(0xFF);
            n -= 255;
        }
        out.push(n as u8);
    }
}

/// Compresses `src` into `dst`, returning the number of bytes written.
///
/// Fails with [`Lz4Error::DstIsTooShort`] if `dst.len() <
/// encode_worst_case_dst_len(src.len())`, even when the realized compression
/// would have fit. The output is not required to be bit-identical to any
/// other LZ4 implementation, only decodable by a conforming one.
pub fn encode(dst: &mut [u8], src: &[u8]) -> Result<usize, Lz4Error> {
    let worst_case = encode_worst_case_dst_len(src.len())?;
    if dst.len() < worst_case {
        return Err(Lz4Error::DstIsTooShort);
    }
    if src.is_empty() {
        return Ok(0);
    }

    let src_len = src.len();
    let mut out = Vec::with_capacity(worst_case);
    let mut sp = 0usize;
    let mut literal_start = 0usize;

    if src_len > 12 {
        let match_limit_idx = src_len - 5;
        let final_literals_limit = src_len - 11;
        let mut hash_table = vec![0u32; HASH_TABLE_SIZE];

        'outer: loop {
            let mut step: usize = 1;
            let mut step_counter: usize = 1 << 6;
            let mut cand_sp = sp + 1;

            let (found_sp, found_match) = loop {
                if cand_sp > final_literals_limit {
                    break 'outer;
                }
                let h = hash(peek_u32le(&src[cand_sp..]));
                let candidate = hash_table[h] as usize;
                hash_table[h] = cand_sp as u32;
                if (cand_sp - candidate) <= 0xFFFF && peek_u32le(&src[cand_sp..]) == peek_u32le(&src[candidate..]) {
                    break (cand_sp, candidate);
                }
                cand_sp += step;
                step = step_counter >> 6;
                step_counter += 1;
            };
            sp = found_sp;
            let mut match_cur = found_match;

            while sp > literal_start && match_cur > 0 && src[sp - 1] == src[match_cur - 1] {
                sp -= 1;
                match_cur -= 1;
            }

            let literal_len = sp - literal_start;
            let mut token_index = out.len();
            push_new_token(&mut out, literal_len);
            out.extend_from_slice(&src[literal_start..sp]);

            loop {
                let copy_off = sp - match_cur;
                out.push((copy_off & 0xFF) as u8);
                out.push(((copy_off >> 8) & 0xFF) as u8);
                let max_len = match_limit_idx.saturating_sub(sp + 4);
                let adj_copy_len = longest_common_prefix(&src[sp + 4..], &src[match_cur + 4..], max_len);
                or_match_length(&mut out, token_index, adj_copy_len);
                sp += 4 + adj_copy_len;
                literal_start = sp;
                if sp >= final_literals_limit {
                    break 'outer;
                }

                hash_table[hash(peek_u32le(&src[sp - 2..]))] = (sp - 2) as u32;

                let hkey = hash(peek_u32le(&src[sp..]));
                let old_offset = hash_table[hkey] as usize;
                let new_offset = sp;
                hash_table[hkey] = new_offset as u32;
                match_cur = old_offset;
                if (new_offset - old_offset) > 0xFFFF || peek_u32le(&src[sp..]) != peek_u32le(&src[match_cur..]) {
                    break;
                }
                token_index = out.len();
                out.push(0);
            }
        }
    }

    let final_literal_len = src_len - literal_start;
    push_new_token(&mut out, final_literal_len);
    out.extend_from_slice(&src[literal_start..literal_start + final_literal_len]);

    dst[..out.len()].copy_from_slice(&out);
    Ok(out.len())
}
