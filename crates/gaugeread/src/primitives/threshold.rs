//! Fixed-level binarization via `imageproc`.

use image::GrayImage;
use imageproc::contrast::ThresholdType;

use super::Binarizer;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdBinarizer;

impl Binarizer for ThresholdBinarizer {
    fn threshold(&self, gray: &GrayImage, level: u8, inverse: bool) -> GrayImage {
        let kind = if inverse {
            ThresholdType::BinaryInverted
        } else {
            ThresholdType::Binary
        };
        imageproc::contrast::threshold(gray, level, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn two_tone() -> GrayImage {
        GrayImage::from_fn(4, 1, |x, _| Luma([[30, 100, 200, 250][x as usize]]))
    }

    #[test]
    fn inverse_marks_dark_pixels_as_foreground() {
        let out = ThresholdBinarizer.threshold(&two_tone(), 175, true);
        let row: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert_eq!(row, vec![255, 255, 0, 0]);
    }

    #[test]
    fn direct_marks_bright_pixels_as_foreground() {
        let out = ThresholdBinarizer.threshold(&two_tone(), 175, false);
        let row: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert_eq!(row, vec![0, 0, 255, 255]);
    }
}
