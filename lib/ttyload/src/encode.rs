//! Turns a binary image into the loader's wire format.

use std::io;
use std::io::{Read, Write};

use hexload::hex;

/// Image bytes per line of output. Line breaks are whitespace to the loader;
/// they only keep a captured transfer readable.
const BYTES_PER_LINE: u64 = 32;

/// Encodes `input` onto `out` as one loader session: an optional address-set
/// command, the image as hex pairs, and optionally the terminating zero
/// byte. Returns the number of image bytes encoded.
pub fn encode<R: Read, W: Write>(
    input: R,
    out: &mut W,
    address: Option<u32>,
    run: bool,
) -> io::Result<u64> {
    if let Some(addr) = address {
        out.write_all(b"@")?;
        for shift in (0..8).rev() {
            out.write_all(&[hex::to_hex((addr >> (shift * 4)) as u8)])?;
        }
        out.write_all(b"\n")?;
    }

    let mut sent = 0u64;
    for byte in input.bytes() {
        let byte = byte?;
        out.write_all(&[hex::to_hex(byte >> 4), hex::to_hex(byte)])?;
        sent += 1;
        if sent % BYTES_PER_LINE == 0 {
            out.write_all(b"\n")?;
        }
    }
    if sent % BYTES_PER_LINE != 0 {
        out.write_all(b"\n")?;
    }

    if run {
        out.write_all(&[0])?;
    }

    out.flush()?;
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_address_then_pairs() {
        let image: &[u8] = &[0x41, 0x42, 0xff];
        let mut wire = Vec::new();

        let sent = encode(image, &mut wire, Some(0x0001_0000), false).unwrap();

        assert_eq!(sent, 3);
        assert_eq!(wire, b"@00010000\n4142ff\n".to_vec());
    }

    #[test]
    fn run_byte_follows_the_image() {
        let image: &[u8] = &[0xde, 0xad];
        let mut wire = Vec::new();

        encode(image, &mut wire, None, true).unwrap();

        assert_eq!(wire, b"dead\n\0".to_vec());
    }

    #[test]
    fn long_images_break_into_lines() {
        let image = vec![0u8; (BYTES_PER_LINE * 2 + 1) as usize];
        let mut wire = Vec::new();

        encode(&image[..], &mut wire, None, false).unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text
            .lines()
            .all(|line| line.len() <= (BYTES_PER_LINE * 2) as usize));
    }
}
