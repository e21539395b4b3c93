pub mod drawable2d;
pub mod drawable3d;

pub use drawable2d::*;
pub use drawable3d::*;
