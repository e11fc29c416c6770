//! g8gen generates projects from giter8-style templates.
//! Template file names and contents carry `$field$` placeholders with optional filter
//! pipelines; g8gen resolves them against collected field values and writes the result.

/// Command-line interface module for the g8gen application
pub mod cli;

/// Parameter defaults (`default.properties`) and generation options
pub mod config;

/// Common constants: directory layout, metadata file and system field names
pub mod constants;

/// Error types and handling for the g8gen application
pub mod error;

/// Field values driving a generation run
pub mod fields;

/// Named string filters usable in placeholders
pub mod filters;

/// Project generation and scaffold expansion
pub mod generator;

/// Template location and directory layout
pub mod loader;

/// Logger initialization
pub mod logger;

/// Per-entry rendering and writing
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder rendering engine
pub mod renderer;

/// Raw copy of scaffold trees
pub mod scaffold;

/// Lazy template directory traversal
pub mod source;

/// Placeholder dialect parsing
pub mod transcoder;

/// Verbatim pattern matching
/// Files matching these patterns are copied without rendering
pub mod verbatim;
