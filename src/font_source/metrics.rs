//! Font metrics and measurement data
//!
//! Music fonts measure everything in staff spaces, one quarter of the em.

use norad::Font;

/// Units per em assumed when fontinfo.plist does not set one
pub const DEFAULT_UNITS_PER_EM: f64 = 1000.0;

/// Font metrics for spacing and positioning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::with_units_per_em(DEFAULT_UNITS_PER_EM)
    }
}

impl FontMetrics {
    pub fn with_units_per_em(units_per_em: f64) -> Self {
        Self { units_per_em }
    }

    /// Extract metrics from a UFO; a missing or zero em falls back to the default
    pub fn from_ufo(ufo: &Font) -> Self {
        let units_per_em = ufo
            .font_info
            .units_per_em
            .map(|v| v.as_f64())
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_UNITS_PER_EM);
        Self::with_units_per_em(units_per_em)
    }

    /// Engraving unit: a quarter of the em
    pub fn staff_space(&self) -> f64 {
        self.units_per_em / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use norad::fontinfo::NonNegativeIntegerOrFloat;

    #[test]
    fn staff_space_is_quarter_em() {
        assert_eq!(FontMetrics::with_units_per_em(1000.0).staff_space(), 250.0);
        assert_eq!(FontMetrics::with_units_per_em(2048.0).staff_space(), 512.0);
    }

    #[test]
    fn missing_units_per_em_falls_back() {
        let font = Font::new();
        let metrics = FontMetrics::from_ufo(&font);
        assert_eq!(metrics.units_per_em, DEFAULT_UNITS_PER_EM);
    }

    #[test]
    fn units_per_em_comes_from_fontinfo() {
        let mut font = Font::new();
        font.font_info.units_per_em = NonNegativeIntegerOrFloat::new(2048.0);
        assert_eq!(FontMetrics::from_ufo(&font).staff_space(), 512.0);

        font.font_info.units_per_em = NonNegativeIntegerOrFloat::new(1000.5);
        assert_eq!(FontMetrics::from_ufo(&font).units_per_em, 1000.5);
    }

    #[test]
    fn zero_units_per_em_falls_back() {
        let mut font = Font::new();
        font.font_info.units_per_em = NonNegativeIntegerOrFloat::new(0.0);
        assert_eq!(FontMetrics::from_ufo(&font), FontMetrics::default());
    }
}
