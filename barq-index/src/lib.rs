pub mod index;
pub mod library;

// re-exports
pub use index::*;
pub use library::*;
