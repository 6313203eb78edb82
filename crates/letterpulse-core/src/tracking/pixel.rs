//! Open tracking pixel

/// A 1x1 transparent GIF, served for every open tracking request
///
/// Mail clients render this invisibly inside the email body. The bytes are
/// a minimal GIF89a with a single transparent pixel.
pub const TRACKING_PIXEL: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // GIF89a
    0x01, 0x00, 0x01, 0x00, // 1x1 logical screen
    0x80, 0x00, 0x00, // global color table, 2 entries
    0x00, 0x00, 0x00, // color 0: black
    0xFF, 0xFF, 0xFF, // color 1: white
    0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, // graphic control, transparent index 0
    0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x02, 0x44, 0x01, 0x00, // image data
    0x3B, // trailer
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_valid_gif() {
        assert_eq!(&TRACKING_PIXEL[..6], b"GIF89a");
        assert_eq!(TRACKING_PIXEL.len(), 43);
        assert_eq!(*TRACKING_PIXEL.last().unwrap(), 0x3B);
    }
}
