//! Image asset lookup
//!
//! Champion portraits, splash art and trait/augment/item icons are stored on
//! disk by the asset download job. This module turns the many shapes of
//! upstream identifiers into filename stems ([`normalizer`]) and reads the
//! matching files ([`resolver`]).

pub mod normalizer;
pub mod resolver;

pub use normalizer::{normalize_key, AssetType, UnknownAssetType};
pub use resolver::{AssetFile, AssetResolver, ImageExtension, UnsupportedExtension};
