//! Tuning knobs for [`QrCode::encode_segments_with`](crate::qrcode::QrCode::encode_segments_with).

use crate::version::{Mask, Version};

/// Parameters of the version/level/mask search, other than the requested ECC level.
///
/// The default searches all versions, picks the mask automatically and boosts the
/// error correction level whenever that does not grow the symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub min_version: Version,
    pub max_version: Version,
    /// `None` selects the mask with the lowest penalty score.
    pub mask: Option<Mask>,
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn with_version_range(mut self, min: Version, max: Version) -> Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }
}
