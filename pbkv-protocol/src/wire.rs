//! Minimal protobuf wire primitives.
//!
//! Payloads use the protobuf wire format with proto2 presence semantics: an
//! unset optional field writes no bytes at all. This module implements just
//! enough of the format for the pbkv message schemas; unknown fields are
//! skippable so newer servers remain decodable.

/// Wire type for varint fields (uint32, bool).
pub const WIRE_VARINT: u8 = 0;
/// Wire type for length-delimited fields (bytes, strings, embedded messages).
pub const WIRE_LEN: u8 = 2;

/// Writes a base-128 varint.
pub fn write_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Reads a base-128 varint, advancing the cursor.
pub fn read_varint(buf: &mut &[u8]) -> Option<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let (&byte, rest) = buf.split_first()?;
        *buf = rest;

        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Some(result);
        }
        shift += 7;
        if shift >= 64 {
            // varint longer than 10 bytes
            return None;
        }
    }
}

/// Writes a field tag.
pub fn write_tag(field: u32, wire_type: u8, buf: &mut Vec<u8>) {
    write_varint(((field as u64) << 3) | (wire_type as u64), buf);
}

/// Reads a field tag, returning `(field_number, wire_type)`.
pub fn read_tag(buf: &mut &[u8]) -> Option<(u32, u8)> {
    let tag = read_varint(buf)?;
    Some(((tag >> 3) as u32, (tag & 0x07) as u8))
}

/// Writes a length-delimited bytes field.
pub fn write_bytes(field: u32, data: &[u8], buf: &mut Vec<u8>) {
    write_tag(field, WIRE_LEN, buf);
    write_varint(data.len() as u64, buf);
    buf.extend_from_slice(data);
}

/// Writes a string field (identical to bytes on the wire).
pub fn write_string(field: u32, s: &str, buf: &mut Vec<u8>) {
    write_bytes(field, s.as_bytes(), buf);
}

/// Writes a uint32 varint field.
pub fn write_uint32(field: u32, value: u32, buf: &mut Vec<u8>) {
    write_tag(field, WIRE_VARINT, buf);
    write_varint(value as u64, buf);
}

/// Writes a bool varint field.
pub fn write_bool(field: u32, value: bool, buf: &mut Vec<u8>) {
    write_tag(field, WIRE_VARINT, buf);
    write_varint(value as u64, buf);
}

/// Writes an embedded message field.
pub fn write_message(field: u32, message: &[u8], buf: &mut Vec<u8>) {
    write_bytes(field, message, buf);
}

/// Reads the body of a length-delimited field, advancing the cursor.
pub fn read_len_delimited<'a>(buf: &mut &'a [u8]) -> Option<&'a [u8]> {
    let len = read_varint(buf)? as usize;
    if buf.len() < len {
        return None;
    }
    let (data, rest) = buf.split_at(len);
    *buf = rest;
    Some(data)
}

/// Skips one field body based on its wire type.
pub fn skip_field(wire_type: u8, buf: &mut &[u8]) -> Option<()> {
    match wire_type {
        WIRE_VARINT => {
            read_varint(buf)?;
        }
        WIRE_LEN => {
            read_len_delimited(buf)?;
        }
        1 => {
            // 64-bit fixed
            if buf.len() < 8 {
                return None;
            }
            *buf = &buf[8..];
        }
        5 => {
            // 32-bit fixed
            if buf.len() < 4 {
                return None;
            }
            *buf = &buf[4..];
        }
        _ => return None,
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_varint_roundtrip() {
        for &value in &[0u64, 1, 127, 128, 300, 16383, 16384, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            write_varint(value, &mut buf);

            let mut slice = &buf[..];
            assert_eq!(read_varint(&mut slice), Some(value));
            assert!(slice.is_empty());
        }
    }

    #[test]
    fn test_read_varint_empty() {
        let mut buf: &[u8] = &[];
        assert!(read_varint(&mut buf).is_none());
    }

    #[test]
    fn test_read_varint_overlong() {
        let mut buf: &[u8] = &[0x80; 11];
        assert!(read_varint(&mut buf).is_none());
    }

    #[test]
    fn test_tag_roundtrip() {
        for (field, wire_type) in [(1, WIRE_VARINT), (2, WIRE_LEN), (9, WIRE_LEN), (100, 0)] {
            let mut buf = Vec::new();
            write_tag(field, wire_type, &mut buf);

            let mut slice = &buf[..];
            assert_eq!(read_tag(&mut slice), Some((field, wire_type)));
        }
    }

    #[test]
    fn test_len_delimited_roundtrip() {
        let mut buf = Vec::new();
        write_bytes(1, b"hello", &mut buf);

        let mut slice = &buf[..];
        let (field, wire_type) = read_tag(&mut slice).unwrap();
        assert_eq!((field, wire_type), (1, WIRE_LEN));
        assert_eq!(read_len_delimited(&mut slice), Some(&b"hello"[..]));
        assert!(slice.is_empty());
    }

    #[test]
    fn test_len_delimited_truncated() {
        let mut buf = Vec::new();
        write_varint(10, &mut buf);
        buf.extend_from_slice(b"short");

        let mut slice = &buf[..];
        assert!(read_len_delimited(&mut slice).is_none());
    }

    #[test]
    fn test_skip_field() {
        let mut buf = Vec::new();
        write_varint(12345, &mut buf);
        let mut slice = &buf[..];
        assert!(skip_field(WIRE_VARINT, &mut slice).is_some());
        assert!(slice.is_empty());

        let mut buf = Vec::new();
        write_varint(3, &mut buf);
        buf.extend_from_slice(b"abc");
        let mut slice = &buf[..];
        assert!(skip_field(WIRE_LEN, &mut slice).is_some());
        assert!(slice.is_empty());

        let buf = [0u8; 8];
        let mut slice = &buf[..];
        assert!(skip_field(1, &mut slice).is_some());
        assert_eq!(slice.len(), 0);

        let mut slice = &buf[..4];
        assert!(skip_field(5, &mut slice).is_some());
        assert!(slice.is_empty());
    }

    #[test]
    fn test_skip_field_unknown_wire_type() {
        let buf = [0u8; 8];
        let mut slice = &buf[..];
        assert!(skip_field(7, &mut slice).is_none());
    }

    proptest! {
        #[test]
        fn prop_varint_roundtrip(value in any::<u64>()) {
            let mut buf = Vec::new();
            write_varint(value, &mut buf);
            let mut slice = &buf[..];
            prop_assert_eq!(read_varint(&mut slice), Some(value));
            prop_assert!(slice.is_empty());
        }

        #[test]
        fn prop_bytes_field_roundtrip(field in 1u32..1000, data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut buf = Vec::new();
            write_bytes(field, &data, &mut buf);
            let mut slice = &buf[..];
            let (f, w) = read_tag(&mut slice).unwrap();
            prop_assert_eq!(f, field);
            prop_assert_eq!(w, WIRE_LEN);
            prop_assert_eq!(read_len_delimited(&mut slice).unwrap(), &data[..]);
        }
    }
}
