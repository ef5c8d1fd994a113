// Wayfarer shared type definitions
// Each submodule defines plain data used across the session core.

pub mod bookmark;
pub mod download;
pub mod errors;
pub mod history;
pub mod settings;
pub mod tab;
