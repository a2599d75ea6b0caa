//! External system integrations for termport.
//!
//! - [`taxonomy`] - storage traits and the backend factory
//! - [`json`] - JSON snapshot backend
//! - [`postgresql`] - CMS database backend
//! - [`files`] - `public://` file area
//! - [`messenger`] - user-facing notifications
//!
//! Adapters isolate external dependencies behind traits so the jobs in
//! [`crate::core`] can be tested against in-memory implementations.

pub mod files;
pub mod json;
pub mod messenger;
pub mod postgresql;
pub mod taxonomy;
