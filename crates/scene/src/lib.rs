pub mod components;
pub mod point;
pub mod reading;

pub use point::*;
pub use reading::*;
