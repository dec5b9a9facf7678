//! Rasterizer: paints a marker list into RGBA pixel buffers.

use image::{Rgba, RgbaImage};

use super::{Layer, Marker, Paint};
use crate::model::Color;

/// Paint both layers and composite the translucent one over the opaque one.
pub(super) fn rasterize(
    markers: &[Marker],
    width: u32,
    height: u32,
    background: Color,
    foreground: Color,
) -> RgbaImage {
    let mut opaque = RgbaImage::from_pixel(width, height, background.to_rgba());
    let mut translucent = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for marker in markers {
        let target = match marker.layer {
            Layer::Opaque => &mut opaque,
            Layer::Translucent => &mut translucent,
        };
        match marker.paint {
            Paint::Fill { alpha } => {
                fill_circle(target, marker.center, marker.radius, foreground.with_alpha(alpha));
            }
            Paint::Ring { width } => {
                ring(target, marker.center, marker.radius, width, foreground, background);
            }
        }
    }

    image::imageops::overlay(&mut opaque, &translucent, 0, 0);
    opaque
}

/// Pixel-centre bounding box of a circle, clamped to the canvas.
fn bounds(img: &RgbaImage, center: (f64, f64), radius: f64) -> (u32, u32, u32, u32) {
    let clamp = |v: f64, max: u32| v.max(0.0).min(max as f64) as u32;
    (
        clamp((center.0 - radius).floor(), img.width()),
        clamp((center.1 - radius).floor(), img.height()),
        clamp((center.0 + radius).ceil() + 1.0, img.width()),
        clamp((center.1 + radius).ceil() + 1.0, img.height()),
    )
}

fn distance(x: u32, y: u32, center: (f64, f64)) -> f64 {
    let dx = x as f64 + 0.5 - center.0;
    let dy = y as f64 + 0.5 - center.1;
    (dx * dx + dy * dy).sqrt()
}

/// Set every pixel inside the circle to `color` (no blending within a layer).
fn fill_circle(img: &mut RgbaImage, center: (f64, f64), radius: f64, color: Color) {
    let (x0, y0, x1, y1) = bounds(img, center, radius);
    let px = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            if distance(x, y, center) <= radius {
                img.put_pixel(x, y, px);
            }
        }
    }
}

/// Outline of `stroke` drawn inward from `radius`, interior filled with `fill`.
fn ring(
    img: &mut RgbaImage,
    center: (f64, f64),
    radius: f64,
    stroke_width: f64,
    stroke: Color,
    fill: Color,
) {
    let (x0, y0, x1, y1) = bounds(img, center, radius);
    let inner = radius - stroke_width;
    for y in y0..y1 {
        for x in x0..x1 {
            let d = distance(x, y, center);
            if d > radius {
                continue;
            }
            let px = if d > inner { stroke } else { fill };
            img.put_pixel(x, y, px.to_rgba());
        }
    }
}
