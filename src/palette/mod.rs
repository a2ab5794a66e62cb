//! Indexed color tables and packed-color conversions.

/// Palette table type and color packing helpers.
pub mod table;
