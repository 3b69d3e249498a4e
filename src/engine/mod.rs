//! Frame-level media helpers shared by the libav adapters

use ffmpeg_next::format::Pixel;
use ffmpeg_next::Rational;

use crate::domain::model::ChromaLayout;

pub mod crop;
pub mod rotate;

pub use crop::{crop_planes, SquareCropper, WORKING_FORMAT};
pub use rotate::{rotate_planes, rotation_from_display_matrix};

/// Encoder pixel format for a chroma layout
pub fn pixel_format_for(chroma: ChromaLayout) -> Pixel {
    match chroma {
        ChromaLayout::Yuv420 => Pixel::YUV420P,
        ChromaLayout::Yuv444 => Pixel::YUV444P,
    }
}

/// Value of a rational, or `None` when it is zero, negative or undefined
pub fn positive_rational(value: Rational) -> Option<f64> {
    if value.numerator() > 0 && value.denominator() > 0 {
        Some(f64::from(value))
    } else {
        None
    }
}

/// Convert a timestamp in `time_base` units to seconds
pub fn timestamp_seconds(timestamp: i64, time_base: Rational) -> f64 {
    timestamp as f64 * f64::from(time_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_for() {
        assert_eq!(pixel_format_for(ChromaLayout::Yuv420), Pixel::YUV420P);
        assert_eq!(pixel_format_for(ChromaLayout::Yuv444), Pixel::YUV444P);
    }

    #[test]
    fn test_positive_rational() {
        assert_eq!(positive_rational(Rational::new(30, 1)), Some(30.0));
        assert_eq!(positive_rational(Rational::new(0, 1)), None);
        assert_eq!(positive_rational(Rational::new(0, 0)), None);
        let ntsc = positive_rational(Rational::new(30000, 1001)).unwrap();
        assert!((ntsc - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_timestamp_seconds() {
        assert_eq!(timestamp_seconds(90_000, Rational::new(1, 90_000)), 1.0);
        assert_eq!(timestamp_seconds(45, Rational::new(1, 30)), 1.5);
    }
}
