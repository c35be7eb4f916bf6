//! mindmap-canvas: Interactive mindmap editor rendered to an HTML canvas.
//!
//! This crate provides a WASM-based mindmap editor with a tiered tree layout,
//! drag-to-adjust node offsets, pan/zoom, collapsible subtrees, node editing
//! and JSON import/export.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::mindmap::{
	MindmapEditor, MindmapError, Node, OffsetMap, Tree, document::import_document, sample_tree,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mindmap: logging initialized");
}

/// Load the initial document from a script element with id="mindmap-data".
/// Expected format: the same JSON the editor exports.
fn load_mindmap_data() -> Option<(Tree, OffsetMap)> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("mindmap-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match import_document(&json_text) {
		Ok((tree, offsets)) => {
			info!("mindmap: loaded {} nodes from page", tree.len());
			Some((tree, offsets))
		}
		Err(e) => {
			warn!("mindmap: failed to parse embedded document: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the document from the DOM, falling back to the built-in sample.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (tree, offsets) = load_mindmap_data().unwrap_or_else(|| (sample_tree(), OffsetMap::default()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Mindmap" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-mindmap">
			<MindmapEditor tree=tree offsets=offsets />
		</div>
	}
}
