//! Web handlers module
//!
//! HTTP request handlers organized by domain. Handlers stay thin: they
//! validate the request, call one repository or the asset resolver, and
//! map the result onto the shared response envelope.

pub mod feedback;
pub mod health;
pub mod images;
pub mod items;
pub mod roles;
pub mod screen_tracking;
pub mod traits;
