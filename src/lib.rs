//! n9res - Bundle static resource provider
//!
//! Serves CSS, JS and image resources packaged in a bundle under a fixed
//! namespace, memoizing resolved handles and answering conditional
//! requests against the bundle's last-modified time.

pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod resources;
pub mod ui;

pub use error::{ResourceError, ResourceResult};
