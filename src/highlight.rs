//! Marks the extracted line on the source image

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::text_matching::{Detection, Point, clean_text};

pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Outline width in pixels
pub const HIGHLIGHT_THICKNESS: i32 = 3;

/// Detections whose normalized text contains `target_line`
///
/// Not only the selected detection: every fragment carrying the same text is
/// returned.
pub fn highlighted_lines<'a>(
    target_line: &'a str,
    all_lines: &'a [Detection],
) -> impl Iterator<Item = &'a Detection> + 'a {
    all_lines
        .iter()
        .filter(move |line| !target_line.is_empty() && clean_text(&line.text).contains(target_line))
}

/// Copy of `image` with a green outline around every line containing the target
pub fn draw_highlight(
    image: &RgbImage,
    target_line: Option<&str>,
    all_lines: &[Detection],
) -> RgbImage {
    let mut output = image.clone();

    let Some(target) = target_line else {
        return output;
    };

    for line in highlighted_lines(target, all_lines) {
        if line.bounding_region.len() < 2 {
            log::debug!("Skipping '{}': no usable bounding region", line.text);
            continue;
        }
        draw_polygon_outline(&mut output, &line.bounding_region);
    }

    output
}

fn draw_polygon_outline(canvas: &mut RgbImage, points: &[Point]) {
    let half = HIGHLIGHT_THICKNESS / 2;
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        for dx in -half..=half {
            for dy in -half..=half {
                let (ox, oy) = (dx as f32, dy as f32);
                draw_line_segment_mut(
                    canvas,
                    (start[0].value() as f32 + ox, start[1].value() as f32 + oy),
                    (end[0].value() as f32 + ox, end[1].value() as f32 + oy),
                    HIGHLIGHT_COLOR,
                );
            }
        }
    }
}
