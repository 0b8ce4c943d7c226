//! Core utilities and types for the vkcereal generator.
//!
//! This crate provides the pieces every other vkcereal crate leans on:
//! staged file output, the reproducible banner, and the fixed notices
//! placed at the top of generated files.

mod banner;
mod file;
mod templates;

// Reproducible provenance
pub use banner::{banner_command, banner_command_in};
// File operations
pub use file::{PendingFile, StagedFile};
// Notices
pub use templates::{COPYRIGHT_HEADER, autogenerated_header, autogenerated_mk_header};
