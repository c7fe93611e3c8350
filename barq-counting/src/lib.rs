pub mod barcode_counting;
pub mod classify;
pub mod consts;
pub mod counts;
pub mod files;
pub mod match_engine;

// re-exports
pub use barcode_counting::*;
pub use classify::*;
pub use counts::*;
pub use files::*;
pub use match_engine::*;
