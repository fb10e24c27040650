//! Outer contour extraction via `imageproc` border following.

use image::GrayImage;
use imageproc::contours::BorderType;

use super::{Contour, ContourExtractor};
use crate::geometry::Point;

/// Keeps only top-level outer borders: holes and anything nested inside
/// another shape are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct OuterContourExtractor;

impl ContourExtractor for OuterContourExtractor {
    fn find_contours(&self, binary: &GrayImage) -> Vec<Contour> {
        imageproc::contours::find_contours::<i32>(binary)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| {
                let points = c
                    .points
                    .iter()
                    .map(|p| Point::new(p.x as f64, p.y as f64))
                    .collect();
                Contour::from_points(points)
            })
            .collect()
    }
}

/// Area enclosed by a closed polygon (shoelace formula, absolute value).
///
/// Fewer than three points enclose nothing.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill_rect(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, v: u8) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, Luma([v]));
            }
        }
    }

    #[test]
    fn shoelace_of_triangle() {
        let tri = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        ];
        assert_eq!(polygon_area(&tri), 6.0);
        assert_eq!(polygon_area(&tri[..2]), 0.0);
    }

    #[test]
    fn filled_square_yields_one_outer_contour() {
        let mut img = GrayImage::new(12, 12);
        fill_rect(&mut img, 2, 2, 6, 6, 255);
        let contours = OuterContourExtractor.find_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area, 16.0);
        let c = contours[0].centroid().expect("non-empty contour");
        assert!((c.x - 4.0).abs() < 0.5 && (c.y - 4.0).abs() < 0.5);
    }

    #[test]
    fn holes_and_nested_shapes_are_dropped() {
        let mut img = GrayImage::new(30, 30);
        // Square ring with a separate blob inside the hole.
        fill_rect(&mut img, 2, 2, 26, 26, 255);
        fill_rect(&mut img, 5, 5, 23, 23, 0);
        fill_rect(&mut img, 12, 12, 15, 15, 255);
        let contours = OuterContourExtractor.find_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area, 24.0 * 24.0);
    }

    #[test]
    fn separate_blobs_each_get_a_contour() {
        let mut img = GrayImage::new(30, 12);
        fill_rect(&mut img, 2, 2, 4, 4, 255);
        fill_rect(&mut img, 20, 3, 25, 8, 255);
        let mut areas: Vec<f64> = OuterContourExtractor
            .find_contours(&img)
            .iter()
            .map(|c| c.area)
            .collect();
        areas.sort_by(|a, b| a.partial_cmp(b).expect("finite areas"));
        assert_eq!(areas, vec![4.0, 25.0]);
    }
}
