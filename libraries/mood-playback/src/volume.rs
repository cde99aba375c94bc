//! Volume level
//!
//! The widget takes a plain 0-100 level, so no gain curve is applied here.

/// Volume level, always within 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    level: u8,
}

impl Volume {
    /// Upper bound of the level range
    pub const MAX: u8 = 100;

    /// Create a volume, clamping out-of-range input
    pub fn new(level: i32) -> Self {
        Self {
            level: Self::clamp(level),
        }
    }

    /// Set volume level, clamping to 0-100
    pub fn set_level(&mut self, level: i32) {
        self.level = Self::clamp(level);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Parse a stored preference value
    ///
    /// Reads the leading integer and ignores whatever follows it, so `"55.5"`
    /// and `"55px"` are both 55. Values without a leading integer yield
    /// `None`; out-of-range values are clamped.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim_start();
        let sign_len = usize::from(value.starts_with(['+', '-']));
        let digits_len = value[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len() - sign_len);
        if digits_len == 0 {
            return None;
        }

        let negative = value.starts_with('-');
        // Only overflow can fail here
        let parsed = value[..sign_len + digits_len]
            .parse::<i64>()
            .unwrap_or(if negative { i64::MIN } else { i64::MAX });
        let level = parsed.clamp(0, i64::from(Self::MAX));
        Some(Self::new(level as i32))
    }

    fn clamp(level: i32) -> u8 {
        level.clamp(0, i32::from(Self::MAX)) as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(70)
    }
}
