//! Chord diagram renderer: lays out the key wheel and chord wheel for one
//! chord and draws them as a raster frame or as SVG.
//!
//! Layout and drawing are separate: [`layout_diagram`] turns music-theory
//! values into a [`Diagram`] (positions already reduced onto their wheels),
//! and [`Diagram::markers`] turns that into a flat draw list that both the
//! rasterizer and the SVG builder consume.

mod constants;
mod geometry;
mod raster;
mod svg_builder;

use image::RgbaImage;

use crate::model::{Accidental, ChordEntry, Color, Degree};
use crate::theory;
use constants::*;
use svg_builder::SvgBuilder;

pub use geometry::{polar_point, WheelGeometry};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// The laid-out diagram for one chord.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub width: u32,
    pub height: u32,
    pub geometry: WheelGeometry,
    /// Key-wheel slot (0..12) of each scale degree
    pub scale_positions: [u8; 7],
    /// Chord-wheel slot (0..7) of the bass note
    pub bass_position: u8,
    /// One entry per tone of the chord shape, in shape order
    pub tones: Vec<ChordTone>,
}

/// A chord tone placed on the chord wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordTone {
    pub degree: Degree,
    /// Chord-wheel slot (0..7)
    pub position: u8,
    pub weight: u8,
}

/// Which of the two compositing layers a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Opaque,
    Translucent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Solid disc in the foreground colour at this alpha
    Fill { alpha: u8 },
    /// Foreground outline of this width, background interior
    Ring { width: f64 },
}

/// One circle of the draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub layer: Layer,
    pub center: (f64, f64),
    pub radius: f64,
    pub paint: Paint,
}

/// Lay out both wheels for one chord.
pub fn layout_diagram(
    key: i32,
    bass: Degree,
    shape: &[Degree],
    accidentals: &[Accidental],
    width: u32,
    height: u32,
    geometry: WheelGeometry,
) -> Diagram {
    let raw_scale = theory::scale_positions(key, accidentals);
    let mut scale_positions = [0u8; 7];
    for (slot, raw) in scale_positions.iter_mut().zip(raw_scale) {
        *slot = raw.rem_euclid(KEY_WHEEL_STEPS) as u8;
    }

    let bass_position = theory::bass_position(key, bass).rem_euclid(CHORD_WHEEL_STEPS) as u8;

    let weights = theory::calc_weights(shape);
    let tones = shape
        .iter()
        .zip(theory::tone_positions(key, bass, shape))
        .zip(weights)
        .map(|((&degree, raw), weight)| ChordTone {
            degree,
            position: raw.rem_euclid(CHORD_WHEEL_STEPS) as u8,
            weight,
        })
        .collect();

    Diagram {
        width,
        height,
        geometry,
        scale_positions,
        bass_position,
        tones,
    }
}

impl Diagram {
    /// Flat draw list, in painting order within each layer.
    ///
    /// Opaque layer: seven scale dots, then the bass ring.
    /// Translucent layer: twelve faint key-wheel dots, then one weighted dot
    /// per chord tone.
    pub fn markers(&self) -> Vec<Marker> {
        let g = &self.geometry;
        let key_center = g.key_center(self.width, self.height);
        let chord_center = g.chord_center(self.width, self.height);
        let key_slot = |p: f64| polar_point(key_center, g.key_radius, p / KEY_WHEEL_STEPS as f64);
        let chord_slot =
            |p: f64| polar_point(chord_center, g.chord_radius, p / CHORD_WHEEL_STEPS as f64);

        let mut markers = Vec::with_capacity(KEY_WHEEL_STEPS as usize + 8 + self.tones.len());

        for i in 0..KEY_WHEEL_STEPS {
            markers.push(Marker {
                layer: Layer::Translucent,
                center: key_slot(i as f64),
                radius: g.dot_radius,
                paint: Paint::Fill { alpha: FAINT_ALPHA },
            });
        }

        for &p in &self.scale_positions {
            markers.push(Marker {
                layer: Layer::Opaque,
                center: key_slot(p as f64),
                radius: g.dot_radius,
                paint: Paint::Fill { alpha: 255 },
            });
        }

        markers.push(Marker {
            layer: Layer::Opaque,
            center: chord_slot(self.bass_position as f64),
            radius: g.ring_radius,
            paint: Paint::Ring { width: g.ring_width },
        });

        for tone in &self.tones {
            markers.push(Marker {
                layer: Layer::Translucent,
                center: chord_slot(tone.position as f64),
                radius: g.dot_radius,
                paint: Paint::Fill {
                    alpha: theory::weight_alpha(tone.weight),
                },
            });
        }

        markers
    }
}

/// Draw a diagram into an RGBA frame.
pub fn render_diagram(diagram: &Diagram, background: Color, foreground: Color) -> RgbaImage {
    raster::rasterize(
        &diagram.markers(),
        diagram.width,
        diagram.height,
        background,
        foreground,
    )
}

/// Draw a diagram as a standalone SVG document.
pub fn render_diagram_to_svg(diagram: &Diagram, background: Color, foreground: Color) -> String {
    let width = diagram.width as f64;
    let height = diagram.height as f64;
    let markers = diagram.markers();

    let mut svg = SvgBuilder::new(width, height);
    svg.rect(0.0, 0.0, width, height, background);

    for (layer, class) in [(Layer::Opaque, "opaque"), (Layer::Translucent, "translucent")] {
        svg.open_group(class);
        for m in markers.iter().filter(|m| m.layer == layer) {
            match m.paint {
                Paint::Fill { alpha } => {
                    svg.circle(m.center.0, m.center.1, m.radius, foreground.with_alpha(alpha));
                }
                Paint::Ring { width } => {
                    svg.ring(m.center.0, m.center.1, m.radius, width, foreground, background);
                }
            }
        }
        svg.close_group();
    }

    svg.build()
}

/// Lay out and rasterize one chord entry in the given key.
pub fn render_chord(
    chord: &ChordEntry,
    key: i32,
    width: u32,
    height: u32,
    geometry: WheelGeometry,
    background: Color,
    foreground: Color,
) -> RgbaImage {
    let diagram = layout_diagram(
        key,
        chord.bass,
        &chord.shape,
        &chord.accidentals,
        width,
        height,
        geometry,
    );
    render_diagram(&diagram, background, foreground)
}
