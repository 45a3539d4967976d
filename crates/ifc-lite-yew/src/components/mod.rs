//! Yew UI Components for IFC-Lite Viewer

mod hierarchy_panel;
mod properties_panel;
mod status_bar;
mod toolbar;
mod viewer_layout;
mod viewport;

pub use hierarchy_panel::HierarchyPanel;
pub use properties_panel::PropertiesPanel;
pub use status_bar::StatusBar;
pub use toolbar::{parse_and_process_ifc, Toolbar};
pub use viewer_layout::ViewerLayout;
pub use viewport::Viewport;
