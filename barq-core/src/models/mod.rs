pub mod barcode;

// re-export for cleaner imports
pub use self::barcode::BarcodeRecord;
