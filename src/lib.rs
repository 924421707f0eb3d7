//! Data-serving backend for the TFT companion app
//!
//! Serves reference data (items, traits, roles), collects feedback and
//! screen views, and resolves image requests against an on-disk asset tree.

pub mod assets;
pub mod config;
pub mod database;
pub mod errors;
pub mod image_assets;
pub mod models;
pub mod repositories;
pub mod utils;
pub mod web;
