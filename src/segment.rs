//! Data segments and their encoding modes.

use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::version::Version;

/// The set of all legal characters in alphanumeric mode,
/// where each character value maps to the index in the string.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Largest character or bit count representable by a native signed 32-bit size.
const MAX_NATIVE_LEN: usize = i32::MAX as usize;

/// A segment of character/binary/control data in a QR Code symbol.
///
/// Instances of this struct are immutable. The mid-level way to create a segment is to take
/// the payload data and call a factory function such as [`QrSegment::make_numeric`]. The
/// low-level way is to take a bit buffer and call [`QrSegment::new`] with appropriate values.
///
/// This segment struct imposes no length restrictions, but QR Codes have restrictions.
/// Even in the most favorable conditions, a QR Code can only hold 7089 characters of data.
/// Any segment longer than this is meaningless for the purpose of generating QR Codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrSegment {
    mode: QrSegmentMode,
    /// Characters for text modes, bytes for byte mode, 0 for ECI.
    numchars: usize,
    /// Encoded payload, excluding the mode indicator and character count field.
    data: Vec<bool>,
}

impl QrSegment {
    /// Returns a segment representing the given binary data encoded in byte mode.
    ///
    /// Any text string can be converted to UTF-8 bytes and encoded as a byte mode segment.
    ///
    /// Fails with [`QrError::SegmentTooLong`] for more than `i32::MAX / 8` bytes, the most
    /// whose bit length still fits an `i32`.
    pub fn make_bytes(data: &[u8]) -> Result<Self> {
        if data.len() > MAX_NATIVE_LEN / 8 {
            return Err(QrError::SegmentTooLong);
        }
        let mut bb = BitBuffer::with_capacity(data.len() * 8);
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        Ok(QrSegment::new(QrSegmentMode::Byte, data.len(), bb.0))
    }

    /// Returns a segment representing the given string of decimal digits encoded in numeric mode.
    ///
    /// Fails with [`QrError::InvalidNumeric`] if the string contains non-digit characters.
    pub fn make_numeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(text.len() * 3 + (text.len() + 2) / 3);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            if !b.is_ascii_digit() {
                return Err(QrError::InvalidNumeric);
            }
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 or 2 digits remaining
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(QrSegment::new(QrSegmentMode::Numeric, text.len(), bb.0))
    }

    /// Returns a segment representing the given text string encoded in alphanumeric mode.
    ///
    /// The characters allowed are: 0 to 9, A to Z (uppercase only), space,
    /// dollar, percent, asterisk, plus, hyphen, period, slash, colon.
    pub fn make_alphanumeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(text.len() * 5 + (text.len() + 1) / 2);
        let mut accumdata: u32 = 0;
        let mut accumcount: u32 = 0;
        for c in text.chars() {
            let i = alphanumeric_index(c).ok_or(QrError::InvalidAlphanumeric { ch: c })?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 character remaining
            bb.append_bits(accumdata, 6);
        }
        // Every accepted character is ASCII, so bytes == chars.
        Ok(QrSegment::new(QrSegmentMode::Alphanumeric, text.len(), bb.0))
    }

    /// Returns a list of zero or one segment to represent the given Unicode text string.
    ///
    /// Picks the densest single mode that covers the whole string (numeric, then
    /// alphanumeric, then UTF-8 bytes). No mode switching is attempted.
    pub fn make_segments(text: &str) -> Result<Vec<Self>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let seg = if QrSegment::is_numeric(text) {
            QrSegment::make_numeric(text)?
        } else if QrSegment::is_alphanumeric(text) {
            QrSegment::make_alphanumeric(text)?
        } else {
            QrSegment::make_bytes(text.as_bytes())?
        };
        Ok(vec![seg])
    }

    /// Returns a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    pub fn make_eci(assignval: u32) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(24);
        if assignval < (1 << 7) {
            bb.append_bits(assignval, 8);
        } else if assignval < (1 << 14) {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return Err(QrError::EciOutOfRange(assignval));
        }
        Ok(QrSegment::new(QrSegmentMode::Eci, 0, bb.0))
    }

    /// Creates a new QR Code segment with the given attributes and data.
    ///
    /// The character count (numchars) must agree with the mode and
    /// the bit buffer length, but the constraint isn't checked.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<bool>) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Calculates and returns the number of bits needed to encode the given
    /// segments at the given version. The result is `None` if a segment has too many
    /// characters to fit its length field, or the total bits exceeds `i32::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            // ccbits can be as large as 16, but usize can be as small as 16
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        (result <= MAX_NATIVE_LEN).then_some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .find(c)
        .and_then(|i| u32::try_from(i).ok())
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// Returns an unsigned 4-bit integer value (range 0 to 15)
    /// representing the mode indicator bits for this mode object.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Returns the bit width of the character count field for a segment in this mode
    /// in a QR Code at the given version number. The result is in the range [0, 16].
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[ver.tier()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn longest_byte_segment_bit_length_fits_i32() {
        let max_bytes = MAX_NATIVE_LEN / 8;
        assert_eq!(max_bytes, 268_435_455);
        assert!(i32::try_from(max_bytes * 8).is_ok());
        assert!(i32::try_from((max_bytes + 1) * 8).is_err());
    }

    #[test]
    fn test_is_numeric() {
        assert!(QrSegment::is_numeric("1234567890"));
        assert!(!QrSegment::is_numeric("1234abc"));
        assert!(!QrSegment::is_numeric("١٢٣"));
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(QrSegment::is_alphanumeric("HELLO WORLD"));
        assert!(!QrSegment::is_alphanumeric("Hello World"));
        assert!(!QrSegment::is_alphanumeric("hello"));
    }

    #[test]
    fn numeric_bit_lengths() {
        for (text, bits) in [("1", 4), ("12", 7), ("123", 10), ("1234", 14), ("", 0)] {
            let seg = QrSegment::make_numeric(text).unwrap();
            assert_eq!(seg.data().len(), bits, "{text}");
            assert_eq!(seg.num_chars(), text.len());
            assert_eq!(seg.mode(), QrSegmentMode::Numeric);
        }
    }

    #[test]
    fn numeric_values() {
        let seg = QrSegment::make_numeric("01234567").unwrap();
        let mut expected = BitBuffer::new();
        expected.append_bits(12, 10);
        expected.append_bits(345, 10);
        expected.append_bits(67, 7);
        assert_eq!(seg.data(), expected.0.as_slice());
    }

    #[test]
    fn numeric_rejects_letters() {
        assert_eq!(QrSegment::make_numeric("12a"), Err(QrError::InvalidNumeric));
    }

    #[test]
    fn alphanumeric_pairs() {
        let seg = QrSegment::make_alphanumeric("AC-42").unwrap();
        let mut expected = BitBuffer::new();
        expected.append_bits(10 * 45 + 12, 11);
        expected.append_bits(41 * 45 + 4, 11);
        expected.append_bits(2, 6);
        assert_eq!(seg.data(), expected.0.as_slice());
        assert_eq!(seg.num_chars(), 5);
    }

    #[test]
    fn alphanumeric_rejects_lowercase() {
        assert_eq!(
            QrSegment::make_alphanumeric("ABc"),
            Err(QrError::InvalidAlphanumeric { ch: 'c' })
        );
    }

    #[test]
    fn bytes_segment() {
        let seg = QrSegment::make_bytes(&[0xA5, 0x01]).unwrap();
        assert_eq!(seg.num_chars(), 2);
        assert_eq!(seg.data().len(), 16);
        assert!(seg.data()[0] && !seg.data()[1]);
    }

    #[test]
    fn make_segments_picks_mode() {
        assert!(QrSegment::make_segments("").unwrap().is_empty());
        let mode = |t: &str| QrSegment::make_segments(t).unwrap()[0].mode();
        assert_eq!(mode("0123"), QrSegmentMode::Numeric);
        assert_eq!(mode("HELLO 123"), QrSegmentMode::Alphanumeric);
        assert_eq!(mode("Hello"), QrSegmentMode::Byte);
        let seg = &QrSegment::make_segments("héllo").unwrap()[0];
        assert_eq!(seg.num_chars(), 6);
    }

    #[test]
    fn eci_widths() {
        assert_eq!(QrSegment::make_eci(26).unwrap().data().len(), 8);
        assert_eq!(QrSegment::make_eci(127).unwrap().data().len(), 8);
        assert_eq!(QrSegment::make_eci(128).unwrap().data().len(), 16);
        assert_eq!(QrSegment::make_eci(16383).unwrap().data().len(), 16);
        assert_eq!(QrSegment::make_eci(16384).unwrap().data().len(), 24);
        assert_eq!(QrSegment::make_eci(999_999).unwrap().data().len(), 24);
        assert_eq!(QrSegment::make_eci(1_000_000), Err(QrError::EciOutOfRange(1_000_000)));
        let seg = QrSegment::make_eci(200).unwrap();
        assert_eq!(&seg.data()[..2], &[true, false]);
        assert_eq!(seg.num_chars(), 0);
    }

    #[test]
    fn char_count_bits_per_tier() {
        use QrSegmentMode::*;
        assert_eq!(Numeric.num_char_count_bits(v(1)), 10);
        assert_eq!(Numeric.num_char_count_bits(v(10)), 12);
        assert_eq!(Numeric.num_char_count_bits(v(27)), 14);
        assert_eq!(Alphanumeric.num_char_count_bits(v(9)), 9);
        assert_eq!(Alphanumeric.num_char_count_bits(v(26)), 11);
        assert_eq!(Alphanumeric.num_char_count_bits(v(40)), 13);
        assert_eq!(Byte.num_char_count_bits(v(1)), 8);
        assert_eq!(Byte.num_char_count_bits(v(10)), 16);
        assert_eq!(Kanji.num_char_count_bits(v(27)), 12);
        assert_eq!(Eci.num_char_count_bits(v(40)), 0);
    }

    #[test]
    fn total_bits() {
        let segs = [
            QrSegment::make_eci(26).unwrap(),
            QrSegment::make_alphanumeric("HELLO").unwrap(),
        ];
        // ECI: 4 + 0 + 8, alphanumeric: 4 + 9 + 11 + 11 + 6
        assert_eq!(QrSegment::get_total_bits(&segs, v(1)), Some(12 + 41));
        assert_eq!(QrSegment::get_total_bits(&[], v(1)), Some(0));
    }

    #[test]
    fn total_bits_rejects_overlong_count() {
        let seg = QrSegment::new(QrSegmentMode::Byte, 256, vec![false; 256 * 8]);
        assert_eq!(QrSegment::get_total_bits(std::slice::from_ref(&seg), v(9)), None);
        assert_eq!(
            QrSegment::get_total_bits(std::slice::from_ref(&seg), v(10)),
            Some(4 + 16 + 2048)
        );
        let seg = QrSegment::new(QrSegmentMode::Numeric, 1023, Vec::new());
        assert!(QrSegment::get_total_bits(std::slice::from_ref(&seg), v(1)).is_some());
        let seg = QrSegment::new(QrSegmentMode::Numeric, 1024, Vec::new());
        assert!(QrSegment::get_total_bits(std::slice::from_ref(&seg), v(1)).is_none());
    }
}
