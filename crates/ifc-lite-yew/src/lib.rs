//! IFC-Lite Yew UI Components
//!
//! This crate provides the web UI for the IFC-Lite viewer using Yew framework.

pub mod components;
pub mod state;
pub mod bridge;
pub mod utils;

// Re-exports
pub use components::*;
pub use state::{ViewerState, ViewerAction, Tool, use_viewer_state};
pub use bridge::*;
