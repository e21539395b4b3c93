pub mod export;
pub mod feed;
pub mod scale_config;

pub use export::*;
pub use feed::*;
pub use scale_config::*;
