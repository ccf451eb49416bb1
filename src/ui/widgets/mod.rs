// src/ui/widgets/mod.rs

pub mod analysis_view; // Section list and details of a finished scan.
pub mod disclaimer_popup; // Authorized-use disclaimer shown at startup.
pub mod footer; // Key hints for the current state.
pub mod input; // Target URL field.
pub mod summary; // Score and issue counts.
