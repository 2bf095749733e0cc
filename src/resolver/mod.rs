//! The entrypoint dependency resolver.
//!
//! Pipeline: classify the entrypoint, extract the commands a script invokes,
//! resolve each name to an absolute path, and collect the shared libraries
//! those binaries load. The terminal artifact is a [`manifest::ResolutionManifest`].

pub mod aggregate;
pub mod classify;
pub mod extract;
pub mod manifest;
pub mod probe;
