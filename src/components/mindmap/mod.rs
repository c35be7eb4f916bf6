//! Mindmap editor component.
//!
//! Renders an editable hierarchical mindmap on an HTML canvas with:
//! - Deterministic tiered tree layout with per-node manual offsets
//! - Pan, zoom, node dragging and subtree collapse
//! - Sidebar details and editing for the selected node
//! - JSON import/export that preserves manual offsets
//!
//! # Example
//!
//! ```ignore
//! use mindmap_canvas::{MindmapEditor, sample_tree};
//!
//! view! { <MindmapEditor tree=sample_tree() /> }
//! ```

mod component;
pub mod document;
pub mod error;
pub mod interaction;
pub mod layout;
mod render;
pub mod state;
pub mod theme;
pub mod types;
pub mod view;

pub use component::MindmapEditor;
pub use error::{MindmapError, Result};
pub use state::{MindmapState, sample_tree};
pub use theme::Theme;
pub use types::{Node, NodeFields, Offset, OffsetMap, Tree};
