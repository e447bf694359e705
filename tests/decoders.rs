//! Black-box conformance tests against the public `encode`/`decode` entry
//! points: concrete end-to-end scenarios and boundary behaviors, built from
//! hand-assembled byte sequences rather than through the encoder, so a
//! regression in one direction can't mask a mirror-image bug in the other.

use qoir::{
    decode, decode_pixel_configuration, encode, DecodeOptions, EncodeOptions, PixelBuffer, PixelConfiguration,
    PixelFormat, QoirError,
};

fn poke_u32le(buf: &mut [u8], v: u32) {
    buf[0..4].copy_from_slice(&v.to_le_bytes());
}

fn poke_u64le(buf: &mut [u8], v: u64) {
    buf[0..8].copy_from_slice(&v.to_le_bytes());
}

/// Hand-assembles a minimal one-chunk-of-tiles container: `QOIR` header,
/// `QPIX` with `qpix_payload`, then `QEND`.
fn assemble_container(pixfmt_raw: u8, width: u32, height: u32, qpix_payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 20 + 12 + qpix_payload.len() + 12];
    poke_u32le(&mut out[0..4], 0x5249_4F51);
    poke_u64le(&mut out[4..12], 8);
    poke_u32le(&mut out[12..16], width);
    out[15] = pixfmt_raw;
    poke_u32le(&mut out[16..20], height);

    poke_u32le(&mut out[20..24], 0x5849_5051);
    poke_u64le(&mut out[24..32], qpix_payload.len() as u64);
    out[32..32 + qpix_payload.len()].copy_from_slice(qpix_payload);

    let qend = 32 + qpix_payload.len();
    poke_u32le(&mut out[qend..qend + 4], 0x444E_4551);
    poke_u64le(&mut out[qend + 4..qend + 12], 0);
    out
}

#[test]
fn single_pixel_rgb_encodes_to_an_rgb7_opcode() {
    // (0x11, 0x22, 0x33) against a (0,0,0,255) predictor has deltas of 17,
    // 34, 51: too large for RGB2 (+-2) or LUMA (G +-32, R-G/B-G +-8), but all
    // fit RGB7's +-64, so this is a 3-byte opcode.
    let src = PixelBuffer {
        pixcfg: PixelConfiguration { pixfmt: PixelFormat::Rgb, width: 1, height: 1 },
        data: vec![0x11, 0x22, 0x33],
    };
    let bytes = encode(&src, &EncodeOptions::default()).unwrap();
    assert_eq!(bytes.len(), 44 + 4 + 3);

    let tile_prefix = u32::from_le_bytes(bytes[32..36].try_into().unwrap());
    assert_eq!(tile_prefix, 0x01_00_00_03);

    let decoded = decode(&bytes, &DecodeOptions { pixfmt: PixelFormat::Rgb, ..Default::default() }).unwrap();
    assert_eq!(decoded.data, src.data);
}

#[test]
fn four_by_four_solid_rgba_is_one_rgba8_then_a_run() {
    let mut data = Vec::new();
    for _ in 0..16 {
        data.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    }
    let src = PixelBuffer { pixcfg: PixelConfiguration { pixfmt: PixelFormat::RgbaNonpremul, width: 4, height: 4 }, data };
    let bytes = encode(&src, &EncodeOptions::default()).unwrap();

    let tile_prefix = u32::from_le_bytes(bytes[32..36].try_into().unwrap());
    let format_tag = tile_prefix >> 24;
    let len = tile_prefix & 0x00FF_FFFF;
    assert_eq!(format_tag, 1, "format tag must be Opcodes, not LZ4-Opcodes, for this tiny payload");
    assert_eq!(len, 5 + 1);
    assert_eq!(bytes[36], 0xEF); // RGBA8

    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.data, src.data);
}

#[test]
fn qpix_length_claim_past_qend_is_invalid_data() {
    let bytes = assemble_container(PixelFormat::Bgrx.to_raw(), 1, 1, &[0u8; 1]);
    // Tamper with the QPIX payload length to claim more than actually remains.
    let mut bytes = bytes;
    poke_u64le(&mut bytes[24..32], 1000);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err, QoirError::InvalidData);
}

#[test]
fn tile_format_tag_seven_is_unsupported_tile_format() {
    let mut tile_payload = vec![0u8; 4];
    poke_u32le(&mut tile_payload, 7 << 24); // length 0, format tag 7
    let bytes = assemble_container(PixelFormat::Bgrx.to_raw(), 1, 1, &tile_payload);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err, QoirError::UnsupportedTileFormat);
}

#[test]
fn zero_by_zero_dimensions_round_trip_to_minimal_container() {
    let src = PixelBuffer { pixcfg: PixelConfiguration { pixfmt: PixelFormat::Rgb, width: 0, height: 0 }, data: vec![] };
    let bytes = encode(&src, &EncodeOptions::default()).unwrap();
    assert_eq!(bytes.len(), 44);
    let decoded = decode(&bytes, &DecodeOptions { pixfmt: PixelFormat::Rgb, ..Default::default() }).unwrap();
    assert!(decoded.data.is_empty());
}

#[test]
fn max_dimension_on_one_axis_with_zero_on_the_other_succeeds() {
    let src = PixelBuffer {
        pixcfg: PixelConfiguration { pixfmt: PixelFormat::Rgb, width: 0x00FF_FFFF, height: 0 },
        data: vec![],
    };
    let bytes = encode(&src, &EncodeOptions::default()).unwrap();
    let decoded = decode(&bytes, &DecodeOptions { pixfmt: PixelFormat::Rgb, ..Default::default() }).unwrap();
    assert_eq!(decoded.pixcfg.width, 0x00FF_FFFF);
    assert!(decoded.data.is_empty());
}

#[test]
fn one_past_max_dimension_is_unsupported_pixbuf_dimensions() {
    let src = PixelBuffer {
        pixcfg: PixelConfiguration { pixfmt: PixelFormat::Rgb, width: 0x0100_0000, height: 1 },
        data: vec![0u8; 3],
    };
    let err = encode(&src, &EncodeOptions::default()).unwrap_err();
    assert_eq!(err, QoirError::UnsupportedPixbufDimensions);
}

#[test]
fn decode_pixel_configuration_does_not_require_the_full_container() {
    let src = PixelBuffer {
        pixcfg: PixelConfiguration { pixfmt: PixelFormat::RgbaNonpremul, width: 200, height: 130 },
        data: vec![0u8; 200 * 130 * 4],
    };
    let bytes = encode(&src, &EncodeOptions::default()).unwrap();
    let cfg = decode_pixel_configuration(&bytes[..20]).unwrap();
    assert_eq!(cfg.width, 200);
    assert_eq!(cfg.height, 130);
    assert_eq!(cfg.pixfmt, PixelFormat::BgraNonpremul);
}

#[test]
fn unknown_chunk_between_header_and_qpix_is_skipped() {
    let mut out = Vec::new();

    // QOIR header: 1x1 Bgrx.
    out.extend_from_slice(&0x5249_4F51u32.to_le_bytes());
    out.extend_from_slice(&8u64.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out[15] = PixelFormat::Bgrx.to_raw();
    out.extend_from_slice(&1u32.to_le_bytes());
    assert_eq!(out.len(), 20);

    // An unrecognized "EXTR" chunk with 6 bytes of payload, skipped on decode.
    out.extend_from_slice(&0x5258_5445u32.to_le_bytes());
    out.extend_from_slice(&6u64.to_le_bytes());
    out.extend_from_slice(&[0xAAu8; 6]);

    // QPIX: one opaque pixel as a Literals tile (format tag 0, 4 raw RGBA bytes).
    let payload = [0x10u8, 0x20, 0x30, 0xFF];
    out.extend_from_slice(&0x5849_5051u32.to_le_bytes());
    out.extend_from_slice(&((4 + payload.len()) as u64).to_le_bytes());
    let prefix = payload.len() as u32; // format tag 0 (Literals) in the top byte.
    out.extend_from_slice(&prefix.to_le_bytes());
    out.extend_from_slice(&payload);

    out.extend_from_slice(&0x444E_4551u32.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());

    let decoded = decode(&out, &DecodeOptions { pixfmt: PixelFormat::Rgb, ..Default::default() }).unwrap();
    assert_eq!(decoded.data, vec![0x10, 0x20, 0x30]);
}
