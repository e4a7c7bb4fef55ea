//! ASCII hex digit helpers, shared by the device loop and the host encoder.

/// Returns the value of an ASCII hex digit, or `None` for any other byte.
/// Both cases are accepted.
pub fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Returns the lowercase ASCII digit for the low nibble of `val`. The high
/// nibble is ignored.
pub fn to_hex(val: u8) -> u8 {
    match val & 0xf {
        d @ 0..=9 => b'0' + d,
        d => b'a' + d - 10,
    }
}

#[test]
fn digits_round_trip() {
    for d in 0..16u8 {
        assert_eq!(from_hex(to_hex(d)), Some(d));
    }
    assert_eq!(from_hex(b'A'), Some(10));
    assert_eq!(from_hex(b'F'), Some(15));
    assert_eq!(from_hex(b'g'), None);
    assert_eq!(from_hex(b'@'), None);
    assert_eq!(from_hex(0), None);
}

#[test]
fn to_hex_ignores_the_high_nibble() {
    assert_eq!(to_hex(0xab), b'b');
    assert_eq!(to_hex(0x04), b'4');
    assert_eq!(to_hex(0xf0), b'0');
}
