pub mod layer;
pub mod legend;
pub mod readings;
pub mod severity;
pub mod summary;
pub mod symbology;

pub use layer::*;
pub use severity::*;
