//! Generation orchestrator for the vkcereal Vulkan source generator.
//!
//! A driver walks the Vulkan registry and reports every entity as an event.
//! The [`Orchestrator`] records each one in the [`TypeRegistry`], then fans it
//! out to a fixed set of [`Emitter`]s that append C++ to named [`Module`]s.
//! Feature guards are opened and closed in every module at once, and nothing
//! reaches disk until the whole file succeeded.
//!
//! # Module Organization
//!
//! - [`registry`] - Entity registry with alias resolution
//! - [`module`] - Header/implementation buffer pairs and their output files
//! - [`scope`] - Feature guard nesting
//! - [`emitter`] - The plugin trait emitters implement
//! - [`orchestrator`] - Event handling and the file lifecycle
//! - [`testing`] - Test utilities (feature-gated)

// Suppress false positive warnings from miette derive macro
#![allow(unused_assignments)]

pub mod build_description;
pub mod code_builder;
pub mod config;
pub mod context;
pub mod emitter;
pub mod error;
pub mod module;
pub mod orchestrator;
pub mod output;
pub mod registry;
pub mod scope;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use build_description::BuildDescription;
pub use code_builder::CodeBuilder;
pub use config::{ConfigBuilder, GeneratorConfig};
pub use context::{EmitContext, ModuleWriter};
pub use emitter::Emitter;
pub use error::{Error, Result};
pub use module::{BuildFragment, Module, ModuleId, ModuleSpec, ModuleState};
pub use orchestrator::{Event, FileState, GenOptions, Orchestrator};
pub use output::{GeneratedOutput, WriteStats};
pub use registry::{ArrayLength, Category, EntityInfo, EntityKind, Entry, Field, TypeRegistry};
pub use scope::{CLOSE_MARKER, FeatureScope, open_marker};
