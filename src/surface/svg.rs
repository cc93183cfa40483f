use super::Surface;
use crate::heatmap::Rgb;
use std::fmt;

/// Records drawing operations as SVG elements, keeping the exact coordinates
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SvgSurface {
    width: f32,
    height: f32,
    background: Option<Rgb>,
    elements: Vec<String>,
}

impl SvgSurface {
    pub(crate) fn new(width: f32) -> SvgSurface {
        SvgSurface {
            width,
            height: 0.0,
            background: None,
            elements: Vec::new(),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Surface for SvgSurface {
    fn measure_clip_width(&self) -> f32 {
        self.width
    }

    fn draw_rect(&mut self, x: f32, y: f32, size: f32, color: Rgb) {
        self.elements.push(format!(
            r#"<rect x="{x}" y="{y}" width="{size}" height="{size}" fill="{color}"/>"#
        ));
        self.height = self.height.max(y + size);
    }

    fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Rgb, font_size: f32) {
        self.elements.push(format!(
            r#"<text x="{x}" y="{baseline_y}" font-size="{font_size}" fill="{color}">{}</text>"#,
            escape(text)
        ));
        self.height = self.height.max(baseline_y);
    }

    fn clear(&mut self, color: Option<Rgb>) {
        self.elements.clear();
        self.height = 0.0;
        self.background = color;
    }
}

impl fmt::Display for SvgSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let height = self.height.ceil();
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{height}" viewBox="0 0 {} {height}">"#,
            self.width, self.width
        )?;
        if let Some(color) = self.background {
            writeln!(f, r#"<rect width="100%" height="100%" fill="{color}"/>"#)?;
        }
        for elem in &self.elements {
            writeln!(f, "{elem}")?;
        }
        writeln!(f, "</svg>")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
