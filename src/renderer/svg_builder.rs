//! SVG builder: accumulates SVG elements and produces the final string.

use crate::model::Color;

pub(super) struct SvgBuilder {
    pub(super) elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Color) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"{}/>"#,
            x,
            y,
            w,
            h,
            fill.hex(),
            opacity_attr("fill-opacity", fill)
        ));
    }

    pub(super) fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Color) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"{}/>"#,
            cx,
            cy,
            r,
            fill.hex(),
            opacity_attr("fill-opacity", fill)
        ));
    }

    /// A ring whose stroke lies inside `r`, like the raster version.
    pub(super) fn ring(&mut self, cx: f64, cy: f64, r: f64, stroke_width: f64, stroke: Color, fill: Color) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"{}/>"#,
            cx,
            cy,
            r - stroke_width / 2.0,
            fill.hex(),
            stroke.hex(),
            stroke_width,
            opacity_attr("stroke-opacity", stroke)
        ));
    }

    pub(super) fn open_group(&mut self, class: &str) {
        self.elements.push(format!(r#"<g class="{}">"#, class));
    }

    pub(super) fn close_group(&mut self) {
        self.elements.push("</g>".to_string());
    }
}

fn opacity_attr(name: &str, color: Color) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" {}="{:.3}""#, name, color.opacity())
    }
}
