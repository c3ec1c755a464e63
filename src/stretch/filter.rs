use std::f32::consts::PI;

use clap::builder::PossibleValue;
use clap::ValueEnum;

/// Reconstruction filters available for resampling. The set is closed, so an
/// unsupported filter kind is unrepresentable rather than a runtime error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Nearest,
    Bilinear,
    Bicubic,
    Antialias,
}

impl ValueEnum for FilterKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Nearest, Self::Bilinear, Self::Bicubic, Self::Antialias]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Nearest => Some(PossibleValue::new("Nearest")),
            Self::Bilinear => Some(PossibleValue::new("Bilinear")),
            Self::Bicubic => Some(PossibleValue::new("Bicubic")),
            Self::Antialias => Some(PossibleValue::new("Antialias")),
        }
    }
}

impl FilterKind {
    /// Support radius of the filter. Weights are zero at and beyond this
    /// distance from the center.
    pub fn support(&self) -> f32 {
        match self {
            Self::Nearest => 0.5,
            Self::Bilinear => 1.0,
            Self::Bicubic => 2.0,
            Self::Antialias => 3.0,
        }
    }

    /// Filter weight at offset `x` in filter native coordinates.
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Self::Nearest => nearest_filter(x),
            Self::Bilinear => bilinear_filter(x),
            Self::Bicubic => bicubic_filter(x),
            Self::Antialias => antialias_filter(x),
        }
    }
}

fn sinc_filter(x: f32) -> f32 {
    if x == 0.0 {
        return 1.0;
    }
    let x = x * PI;
    x.sin() / x
}

/// Lanczos windowed sinc, truncated at three lobes.
fn antialias_filter(x: f32) -> f32 {
    if (-3.0..3.0).contains(&x) {
        return sinc_filter(x) * sinc_filter(x / 3.0);
    }
    0.0
}

fn nearest_filter(x: f32) -> f32 {
    if (-0.5..0.5).contains(&x) {
        return 1.0;
    }
    0.0
}

fn bilinear_filter(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 {
        return 1.0 - x;
    }
    0.0
}

/// Bicubic convolution with a = -0.5 (Catmull-Rom like).
fn bicubic_filter(x: f32) -> f32 {
    const A: f32 = -0.5;
    let x = x.abs();
    if x < 1.0 {
        return ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0;
    }
    if x < 2.0 {
        return (((x - 5.0) * x + 8.0) * x - 4.0) * A;
    }
    0.0
}

#[cfg(test)]
mod test {
    use super::FilterKind;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn nearest_is_a_box_around_zero() {
        let filter = FilterKind::Nearest;
        assert_eq!(filter.weight(0.0), 1.0);
        assert_eq!(filter.weight(-0.5), 1.0, "left edge is inside the box");
        assert_eq!(filter.weight(0.5), 0.0, "right edge is outside the box");
        assert_eq!(filter.weight(0.49), 1.0);
        assert_eq!(filter.weight(1.0), 0.0);
    }

    #[test]
    fn bilinear_is_a_triangle() {
        let filter = FilterKind::Bilinear;
        assert_eq!(filter.weight(0.0), 1.0);
        assert_eq!(filter.weight(0.25), 0.75);
        assert_eq!(filter.weight(-0.25), 0.75);
        assert_eq!(filter.weight(1.0), 0.0);
        assert_eq!(filter.weight(-1.5), 0.0);
    }

    #[test]
    fn bicubic_interpolates_at_integer_offsets() {
        let filter = FilterKind::Bicubic;
        assert_eq!(filter.weight(0.0), 1.0);
        assert!(filter.weight(1.0).abs() < TOLERANCE, "zero crossing at 1");
        assert!(filter.weight(-2.0).abs() < TOLERANCE, "zero at the support edge");
        assert!(filter.weight(2.5).abs() < TOLERANCE, "zero beyond the support");
        assert!(
            filter.weight(1.5) < 0.0,
            "bicubic must have a negative lobe between 1 and 2"
        );
    }

    #[test]
    fn antialias_is_a_windowed_sinc() {
        let filter = FilterKind::Antialias;
        assert_eq!(filter.weight(0.0), 1.0);
        for offset in [1.0_f32, 2.0, -1.0, -2.0] {
            assert!(
                filter.weight(offset).abs() < TOLERANCE,
                "sinc must cross zero at integer offset {}",
                offset
            );
        }
        assert_eq!(filter.weight(3.0), 0.0, "weight is zero outside the window");
        assert_eq!(filter.weight(-3.5), 0.0);
        assert!(
            filter.weight(1.5) < 0.0,
            "lanczos must have a negative first side lobe"
        );
    }

    #[test]
    fn support_radii_match_the_filter_definitions() {
        assert_eq!(FilterKind::Nearest.support(), 0.5);
        assert_eq!(FilterKind::Bilinear.support(), 1.0);
        assert_eq!(FilterKind::Bicubic.support(), 2.0);
        assert_eq!(FilterKind::Antialias.support(), 3.0);
    }
}
