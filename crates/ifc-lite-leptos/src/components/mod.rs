//! UI Components for the IFC-Lite viewer

mod hierarchy_panel;
mod properties_panel;
mod status_bar;
mod toolbar;
mod viewport;
mod viewer_layout;

pub use hierarchy_panel::HierarchyPanel;
pub use properties_panel::PropertiesPanel;
pub use status_bar::StatusBar;
pub use toolbar::Toolbar;
pub use viewport::Viewport;
pub use viewer_layout::{App, ViewerLayout};
