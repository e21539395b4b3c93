use foundation::Rgb;
use scene::components::{Drawable2D, Drawable3D};

/// How a single reading marker is drawn. Fill color comes from the severity band.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MarkerStyle {
    /// Screen-space circle with a contrasting outline.
    Map {
        drawable: Drawable2D,
        stroke_color: Rgb,
        fill_opacity: f32,
    },
    /// Solid core sphere wrapped in a faint wireframe halo.
    Globe { core: Drawable3D, halo: Drawable3D },
}

impl MarkerStyle {
    pub fn map_default() -> Self {
        MarkerStyle::Map {
            drawable: Drawable2D::circle(10.0).with_stroke(1.0),
            stroke_color: Rgb::WHITE,
            fill_opacity: 0.8,
        }
    }

    pub fn globe_default() -> Self {
        MarkerStyle::Globe {
            core: Drawable3D::sphere(0.02, 0.8),
            halo: Drawable3D::wire_sphere(0.03, 0.3),
        }
    }

    /// Primary fill as `[r, g, b, a]` for a marker of `color`.
    pub fn fill_rgba(&self, color: Rgb) -> [f32; 4] {
        match self {
            MarkerStyle::Map { fill_opacity, .. } => color.to_rgba_f32(*fill_opacity),
            MarkerStyle::Globe { core, .. } => color.to_rgba_f32(core.opacity),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub marker: MarkerStyle,
}

impl LayerStyle {
    pub const fn new(visible: bool, marker: MarkerStyle) -> Self {
        Self { visible, marker }
    }
}
