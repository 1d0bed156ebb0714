use super::*;

/// Pack bytes the way scalac writes them, for comparison.
fn encode(bytes: &[u8]) -> String {
    let mut chars = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &b in bytes {
        acc |= (b as u32) << bits;
        bits += 8;
        while bits >= 7 {
            chars.push(acc & 0x7F);
            acc >>= 7;
            bits -= 7;
        }
    }
    if bits > 0 {
        chars.push(acc & 0x7F);
    }
    chars
        .into_iter()
        .map(|v| if v == 0x7F { '\0' } else { char::from_u32(v + 1).unwrap() })
        .collect()
}

#[test]
fn unpacks_seven_bit_groups() {
    let payload = [0x05, 0x00, 0xFF, 0x10, 0x7F, 0x80, 0x01];
    let decoded = decode_scala_signature_bytes(&encode(&payload)).unwrap();
    // 7 bytes are 56 bits, exactly 8 characters with nothing left over.
    assert_eq!(decoded, payload);
}

#[test]
fn nul_character_stands_for_0x7f() {
    assert_eq!(decode_scala_signature_bytes("\0\u{1}").unwrap(), vec![0x7F]);
    assert_eq!(decode_scala_signature_bytes("\u{1}\u{1}").unwrap(), vec![0x00]);
}

#[test]
fn leftover_bits_are_dropped() {
    assert_eq!(decode_scala_signature_bytes("\u{2}\u{1}").unwrap(), vec![0x01]);
    // A lone character carries only 7 bits, not a whole byte.
    assert!(decode_scala_signature_bytes("\u{2}").unwrap().is_empty());
    for len in 1..=9 {
        let payload: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
        let encoded = encode(&payload);
        let decoded = decode_scala_signature_bytes(&encoded).unwrap();
        assert_eq!(decoded.len(), encoded.chars().count() * 7 / 8);
        assert_eq!(decoded, payload);
    }
}

#[test]
fn empty_signature_is_empty_payload() {
    assert!(decode_scala_signature_bytes("").unwrap().is_empty());
}

#[test]
fn rejects_wide_characters() {
    assert!(matches!(
        decode_scala_signature_bytes("a\u{e9}"),
        Err(PickleError::Malformed(_))
    ));
}
