//! QR code encoding functionality.
//!
//! This module provides the core logic for encoding data into QR codes, supporting the QR Code Model
//! 2 specification: versions 1 to 40, all four error correction levels, automatic or forced masks.

use core::fmt;

use crate::bits::{get_bit, BitBuffer};
use crate::error::{QrError, Result};
use crate::options::EncodeOptions;
use crate::reed_solomon::ReedSolomonGenerator;
use crate::segment::QrSegment;
use crate::version::{
    alignment_pattern_positions, ecc_codewords_per_block, num_data_codewords,
    num_error_correction_blocks, num_raw_data_modules, Mask, QrCodeEcc, Version,
};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Build [`QrSegment`]s and call [`QrCode::encode_segments_advanced`].
/// - Low-level: Supply the data codewords yourself to [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrforge::qrcode::QrCode;
/// use qrforge::version::QrCodeEcc;
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct QrCode {
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    /// The error correction level used in this QR Code.
    errorcorrectionlevel: QrCodeEcc,

    /// The index of the mask pattern used in this QR Code, in the range 0 to 7.
    mask: Mask,

    /// The modules of this QR Code (false = light, true = dark), indexed by `y * size + x`.
    /// Immutable after constructor finishes. Accessed through get_module().
    modules: Vec<bool>,

    /// Indicates function modules that are not subjected to masking.
    /// Emptied once the constructor finishes.
    isfunction: Vec<bool>,
}

impl QrCode {
    /// Returns a QR Code representing the given Unicode text string at the given error correction level.
    ///
    /// As a conservative upper bound, this function is guaranteed to succeed for strings that have
    /// 2953 or fewer UTF-8 code units (not Unicode code points) if the low error correction level is
    /// used. The smallest possible QR Code version is automatically chosen for the output. The ECC
    /// level of the result may be higher than the `ecl` argument if it can be done without
    /// increasing the version.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text)?;
        QrCode::encode_segments(&segs, ecl)
    }

    /// Returns a QR Code representing the given binary data at the given error correction level.
    ///
    /// This function always encodes using the binary segment mode, not any text mode. The maximum
    /// number of bytes allowed is 2953.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self> {
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)?];
        QrCode::encode_segments(&segs, ecl)
    }

    /// Returns a QR Code representing the given segments at the given error correction level.
    ///
    /// This function allows the user to create a custom sequence of segments that switches
    /// between modes (such as alphanumeric and byte) to encode text in less space.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self> {
        QrCode::encode_segments_with(segs, ecl, &EncodeOptions::default())
    }

    /// Same as [`QrCode::encode_segments_advanced`], with the search parameters bundled.
    pub fn encode_segments_with(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self> {
        QrCode::encode_segments_advanced(
            segs,
            ecl,
            options.min_version,
            options.max_version,
            options.mask,
            options.boost_ecl,
        )
    }

    /// Returns a QR Code representing the given segments with the given encoding parameters.
    ///
    /// The smallest possible QR Code version within the given range is automatically
    /// chosen for the output. If `boostecl` is `true`, the ECC level may be higher than the
    /// `ecl` argument if it can be done without increasing the version. The `mask` can be
    /// `None` for automatic selection (slower) or a fixed pattern.
    ///
    /// # Errors
    ///
    /// [`QrError::DataOverCapacity`] if the segments don't fit any version of the range,
    /// [`QrError::SegmentTooLong`] if a segment can't be represented at all.
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self> {
        let (datacodewords, ecl, version) =
            QrCode::encode_segments_to_codewords(segs, ecl, minversion, maxversion, boostecl)?;
        QrCode::encode_codewords(version, ecl, &datacodewords, mask)
    }

    /// Returns an intermediate state representing the given segments
    /// with the given encoding parameters being encoded into codewords.
    ///
    /// The result holds the padded data codewords, the (possibly boosted) ECC level,
    /// and the chosen version.
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        boostecl: bool,
    ) -> Result<(Vec<u8>, QrCodeEcc, Version)> {
        if minversion > maxversion {
            return Err(QrError::InvalidVersionRange {
                min: minversion.value(),
                max: maxversion.value(),
            });
        }

        // Find the minimal version number to use
        let mut fit: Option<(Version, usize)> = None;
        let mut last: (Option<usize>, usize) = (None, 0);
        for version in minversion.through(maxversion) {
            let datacapacitybits: usize = num_data_codewords(version, ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            if let Some(n) = dataused.filter(|&n| n <= datacapacitybits) {
                fit = Some((version, n));
                break;
            }
            last = (dataused, datacapacitybits);
        }
        let (version, datausedbits) = match (fit, last) {
            (Some(found), _) => found,
            (None, (None, _)) => return Err(QrError::SegmentTooLong),
            (None, (Some(used), capacity)) => {
                return Err(QrError::DataOverCapacity { used, capacity })
            }
        };

        // Increase the error correction level while the data still fits in the current version number
        if boostecl {
            for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
                if newecl > ecl && datausedbits <= num_data_codewords(version, newecl) * 8 {
                    ecl = newecl;
                }
            }
        }

        // Concatenate all segments to create the data bit string
        let datacapacitybits: usize = num_data_codewords(version, ecl) * 8;
        let mut bb = BitBuffer::with_capacity(datacapacitybits);
        for seg in segs {
            bb.append_bits(seg.mode().mode_bits(), 4);
            let numchars = u32::try_from(seg.num_chars()).map_err(|_| QrError::SegmentTooLong)?;
            bb.append_bits(numchars, seg.mode().num_char_count_bits(version));
            bb.extend(seg.data().iter().copied());
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xEC, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        Ok((bb.to_bytes(), ecl, version))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// A mid-level API is the [`QrCode::encode_segments_advanced`] function.
    pub fn encode_codewords(
        ver: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        msk: Option<Mask>,
    ) -> Result<Self> {
        let mut result = QrCode::unmasked(ver, ecl, datacodewords)?;

        let msk: Mask = match msk {
            Some(m) => m,
            None => result.choose_mask(),
        };
        result.mask = msk;
        result.apply_mask(msk); // Apply the final choice of mask
        result.draw_format_bits(msk); // Overwrite old format bits

        result.isfunction = Vec::new();
        Ok(result)
    }

    /// Draws function patterns and codewords, leaving masking to the caller.
    fn unmasked(ver: Version, ecl: QrCodeEcc, datacodewords: &[u8]) -> Result<Self> {
        let expected = num_data_codewords(ver, ecl);
        if datacodewords.len() != expected {
            return Err(QrError::InvalidCodewordCount {
                expected,
                actual: datacodewords.len(),
            });
        }
        let size = ver.size() as usize;
        let mut result = Self {
            version: ver,
            size: size as i32,
            errorcorrectionlevel: ecl,
            mask: Mask::default(),
            modules: vec![false; size * size], // Initially all light
            isfunction: vec![false; size * size],
        };

        // Compute ECC, draw modules
        result.draw_function_patterns();
        let allcodewords: Vec<u8> = result.add_ecc_and_interleave(datacodewords)?;
        result.draw_codewords(&allcodewords);
        Ok(result)
    }

    /// Tries every mask and returns the one with the lowest penalty. Leaves the grid unmasked.
    fn choose_mask(&mut self) -> Mask {
        let mut best = (i32::MAX, Mask::default());
        for msk in Mask::all() {
            self.apply_mask(msk);
            self.draw_format_bits(msk);
            let penalty: i32 = self.get_penalty_score();
            if penalty < best.0 {
                best = (penalty, msk);
            }
            self.apply_mask(msk); // Undoes the mask due to XOR
        }
        best.1
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module (pixel) at the given coordinates,
    /// which is `false` for light or `true` for dark.
    ///
    /// The top left corner has the coordinates (x=0, y=0). If the given
    /// coordinates are out of bounds, then `false` (light) is returned.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y) && self.module(x, y)
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[(y * self.size + x) as usize]
    }

    fn module_mut(&mut self, x: i32, y: i32) -> &mut bool {
        &mut self.modules[(y * self.size + x) as usize]
    }

    /*---- Private helper methods for constructor: Drawing function modules ----*/

    fn draw_function_patterns(&mut self) {
        // Draw horizontal and vertical timing patterns
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Draw 3 finder patterns (all corners except bottom right; overwrites some timing modules)
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Draw numerous alignment patterns
        let alignpatpos: Vec<i32> = alignment_pattern_positions(self.version);
        let numalign: usize = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                // Don't draw on the three finder corners
                let corner = (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0);
                if !corner {
                    self.draw_alignment_pattern(pos0, pos1);
                }
            }
        }

        // Draw configuration data
        self.draw_format_bits(Mask::default()); // Dummy mask value; overwritten later in the constructor
        self.draw_version();
    }

    /// Draws two copies of the format bits (with its own error correction code)
    /// based on the given mask and this object's error correction level field.
    fn draw_format_bits(&mut self, mask: Mask) {
        // Calculate error correction code and pack bits
        let bits: u32 = {
            // errcorrlvl is uint2, mask is uint3
            let data = u32::from((self.errorcorrectionlevel.format_bits() << 3) | mask.value());
            let mut rem: u32 = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ 0x5412 // uint15
        };
        debug_assert_eq!(bits >> 15, 0);

        // Draw first copy
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i as u8));
        }

        // Draw second copy
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    /// Draws two copies of the version bits (with its own error correction code),
    /// based on this object's version field, iff 7 <= version <= 40.
    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }

        // Calculate error correction code and pack bits
        let bits: u32 = {
            let data = u32::from(self.version.value()); // uint6, in the range [7, 40]
            let mut rem: u32 = data;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
            }
            (data << 12) | rem // uint18
        };
        debug_assert_eq!(bits >> 18, 0);

        // Draw two copies
        for i in 0u8..18 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + i32::from(i % 3);
            let b: i32 = i32::from(i / 3);
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Draws a 9*9 finder pattern including the border separator,
    /// with the center module at (x, y). Modules can be out of bounds.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs()); // Chebyshev/infinity norm
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// Draws a 5*5 alignment pattern, with the center module
    /// at (x, y). All modules must be in bounds.
    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Sets the color of a module and marks it as a function module.
    /// Only used by the constructor. Coordinates must be in bounds.
    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        *self.module_mut(x, y) = isdark;
        self.isfunction[(y * self.size + x) as usize] = true;
    }

    /*---- Private helper methods for constructor: Codewords and masking ----*/

    /// Returns a new byte string representing the given data with the appropriate error correction
    /// codewords appended to it, based on this object's version and error correction level.
    fn add_ecc_and_interleave(&self, data: &[u8]) -> Result<Vec<u8>> {
        let ver: Version = self.version;
        let ecl: QrCodeEcc = self.errorcorrectionlevel;
        debug_assert_eq!(data.len(), num_data_codewords(ver, ecl));

        // Calculate parameter numbers
        let numblocks: usize = num_error_correction_blocks(ver, ecl);
        let blockecclen: usize = ecc_codewords_per_block(ver, ecl);
        let rawcodewords: usize = num_raw_data_modules(ver) / 8;
        let numshortblocks: usize = numblocks - rawcodewords % numblocks;
        let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;
        let rs = ReedSolomonGenerator::cached(blockecclen)?;

        // Split data into blocks, calculate ECC, and interleave straight into place.
        // Data codeword j of block i goes to j*numblocks+i; the extra codeword of each
        // long block forms a final row holding only long blocks.
        let mut result = vec![0u8; rawcodewords];
        let mut rest: &[u8] = data;
        for i in 0..numblocks {
            let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
            let (dat, tail) = rest.split_at(datlen);
            let mut k: usize = i;
            for (j, &b) in dat.iter().enumerate() {
                if j == shortblockdatalen {
                    k -= numshortblocks;
                }
                result[k] = b;
                k += numblocks;
            }
            for (j, b) in rs.remainder(dat).into_iter().enumerate() {
                result[data.len() + i + j * numblocks] = b;
            }
            rest = tail;
        }
        debug_assert!(rest.is_empty());
        Ok(result)
    }

    /// Draws the given sequence of 8-bit codewords (data and error correction) onto the entire
    /// data area of this QR Code. Function modules need to be marked off before this is called.
    fn draw_codewords(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), num_raw_data_modules(self.version) / 8);

        let mut i: usize = 0; // Bit index into the data
        // Do the funny zigzag scan
        let mut right: i32 = self.size - 1;
        while right >= 1 {
            // Index of right column in each column pair
            if right == 6 {
                right = 5;
            }
            for vert in 0..self.size {
                for j in 0..2 {
                    let x: i32 = right - j;
                    let upward: bool = (right + 1) & 2 == 0;
                    let y: i32 = if upward { self.size - 1 - vert } else { vert };
                    if !self.isfunction[(y * self.size + x) as usize] && i < data.len() * 8 {
                        *self.module_mut(x, y) =
                            get_bit(u32::from(data[i >> 3]), 7 - ((i & 7) as u8));
                        i += 1;
                    }
                    // Remainder bits (0 to 7) stay light, as the constructor left them
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    /// XORs the codeword modules in this QR Code with the given mask pattern.
    /// The function modules must be marked and the codeword bits must be drawn
    /// before masking. Calling this twice with the same mask is a no-op.
    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = (y * self.size + x) as usize;
                self.modules[idx] ^= mask.inverts(x, y) & !self.isfunction[idx];
            }
        }
    }

    /// Calculates and returns the penalty score based on state of this QR Code's current modules.
    /// This is used by the automatic mask choice algorithm to find the mask pattern that yields the lowest score.
    fn get_penalty_score(&self) -> i32 {
        let size: i32 = self.size;
        let mut result: i32 = 0;

        // Adjacent modules in row/column having same color, and finder-like patterns
        for y in 0..size {
            result += line_penalty(size, (0..size).map(|x| self.module(x, y)));
        }
        for x in 0..size {
            result += line_penalty(size, (0..size).map(|y| self.module(x, y)));
        }

        // 2*2 blocks of modules having same color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = self.module(x, y);
                if color == self.module(x + 1, y)
                    && color == self.module(x, y + 1)
                    && color == self.module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules
        let dark: i32 = self.modules.iter().copied().map(i32::from).sum();
        result += balance_penalty(dark, size * size);
        debug_assert!((0..=2568888).contains(&result));
        result
    }
}

impl fmt::Debug for QrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrCode")
            .field("version", &self.version.value())
            .field("size", &self.size)
            .field("errorcorrectionlevel", &self.errorcorrectionlevel)
            .field("mask", &self.mask.value())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for QrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::helper::to_text(self, 4))
    }
}

/// N1 and N3 penalties for one row or column of modules.
fn line_penalty(size: i32, line: impl Iterator<Item = bool>) -> i32 {
    let mut result: i32 = 0;
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for color in line {
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                result += PENALTY_N1;
            } else if runlen > 5 {
                result += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                result += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
}

/// N4 penalty: 10 points for every full 5% step away from an even dark/light split.
fn balance_penalty(dark: i32, total: i32) -> i32 {
    // Compute the smallest integer k >= 0 such that (45-5k)% <= dark/total <= (55+5k)%
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    debug_assert!((0..=9).contains(&k));
    k * PENALTY_N4
}

/// Run-length history of one line, used to spot 1:1:3:1:1 finder-like patterns.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0i32; 7],
        }
    }

    /// Pushes the given value to the front and drops the last value.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Can only be called immediately after a light run is added, and returns either 0, 1, or 2.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    /// Must be called at the end of a line (row or column) of modules.
    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

// For use in get_penalty_score(), when evaluating which mask is best.
const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;
