#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape2D {
    /// Screen-space circle; radius in pixels, independent of zoom.
    Circle { radius_px: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable2D {
    pub shape: Shape2D,
    pub stroke_weight_px: f64,
}

impl Drawable2D {
    pub fn circle(radius_px: f64) -> Self {
        Self {
            shape: Shape2D::Circle { radius_px },
            stroke_weight_px: 0.0,
        }
    }

    pub fn with_stroke(mut self, weight_px: f64) -> Self {
        self.stroke_weight_px = weight_px;
        self
    }
}
