#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    Sphere { radius: f64 },
    WireSphere { radius: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub opacity: f32,
}

impl Drawable3D {
    pub fn sphere(radius: f64, opacity: f32) -> Self {
        Self {
            shape: Shape3D::Sphere { radius },
            opacity,
        }
    }

    pub fn wire_sphere(radius: f64, opacity: f32) -> Self {
        Self {
            shape: Shape3D::WireSphere { radius },
            opacity,
        }
    }

    pub fn radius(&self) -> f64 {
        match self.shape {
            Shape3D::Sphere { radius } | Shape3D::WireSphere { radius } => radius,
        }
    }
}
