//! Internet checksum and big-endian field access shared by the wire views.

/// One's-complement checksum over `header`, checksum field included.
///
/// A header whose checksum field is already correct sums to `0xffff`, so the
/// result is zero. With the field zeroed the result is the value to store.
pub fn ipv4_checksum(header: &[u8]) -> u16 {
    let mut sum = 0u32;
    let mut words = header.chunks_exact(2);
    for word in words.by_ref() {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u32::from(*last) << 8;
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

pub fn be16_at(bytes: &[u8], offset: usize) -> Option<u16> {
    let field = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([field[0], field[1]]))
}

pub fn be32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let field = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([field[0], field[1], field[2], field[3]]))
}

pub fn put_be16(bytes: &mut [u8], offset: usize, value: u16) -> Option<()> {
    let field = bytes.get_mut(offset..offset.checked_add(2)?)?;
    field.copy_from_slice(&value.to_be_bytes());
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Vec<u8> {
        vec![
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ]
    }

    #[test]
    fn computes_known_checksum() {
        // Worked example from the Wikipedia IPv4 checksum article.
        assert_eq!(ipv4_checksum(&sample_header()), 0xb861);
    }

    #[test]
    fn checksummed_header_verifies_to_zero() {
        let mut header = sample_header();
        let sum = ipv4_checksum(&header);
        put_be16(&mut header, 10, sum).expect("checksum field in range");
        assert_eq!(ipv4_checksum(&header), 0);

        header[8] = 0x3f;
        assert_ne!(ipv4_checksum(&header), 0);
    }

    #[test]
    fn odd_length_pads_last_byte() {
        assert_eq!(ipv4_checksum(&[0x12]), !0x1200);
    }

    #[test]
    fn field_access_is_bounds_checked() {
        let mut bytes = [0u8; 6];
        assert_eq!(put_be16(&mut bytes, 2, 0xdead), Some(()));
        assert_eq!(put_be16(&mut bytes, 4, 0xbeef), Some(()));
        assert_eq!(be32_at(&bytes, 2), Some(0xdead_beef));
        assert_eq!(be16_at(&bytes, 0), Some(0));
        assert_eq!(be16_at(&bytes, 5), None);
        assert_eq!(put_be16(&mut bytes, usize::MAX, 1), None);
        assert_eq!(be32_at(&bytes, 3), None);
    }
}
