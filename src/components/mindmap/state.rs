//! Session state and the mutation pipeline.
//!
//! [`MindmapState`] owns everything one editing session needs: the tree,
//! collapse set, manual offsets, view transform, gesture state, selection and
//! the current layout. Every accepted mutation is applied whole and followed
//! by a full relayout; rejected mutations leave the session untouched and
//! leave a user-facing notice behind.

use log::{debug, info, warn};

use super::document::{self, EXPORT_FILE_NAME};
use super::error::{MindmapError, Result};
use super::interaction::{self, Click, Interaction, WheelInput};
use super::layout::{self, Layout, LayoutConfig, PositionedNode};
use super::types::{CollapseSet, Node, NodeFields, OffsetMap, ROOT_ID, Tree};
use super::view::{ViewConfig, ViewTransform};

/// Maximum description length shown in the hover tooltip.
const TOOLTIP_EXCERPT_CHARS: usize = 100;

/// Built-in mindmap shown when no document is supplied.
pub fn sample_tree() -> Tree {
	let leaf = |id: &str, title: &str, summary: &str, description: &str| {
		let mut node = Node::new(id, title).with_summary(summary);
		node.description = Some(description.into());
		node
	};
	let branch = |id: &str, title: &str, summary: &str, description: &str, children: Vec<Node>| {
		leaf(id, title, summary, description).with_children(children)
	};

	Tree::new(branch(
		ROOT_ID,
		"Modern Web Development",
		"Complete ecosystem of web technologies",
		"Comprehensive overview of modern web development including frontend frameworks, backend technologies, databases, and deployment strategies.",
		vec![
			branch(
				"frontend",
				"Frontend Development",
				"Client-side technologies",
				"Frontend development focuses on creating user interfaces and experiences.",
				vec![
					leaf("react", "React", "Component-based UI library", "React is a JavaScript library for building user interfaces."),
					leaf("vue", "Vue.js", "Progressive framework", "Vue.js is an approachable framework for building web interfaces."),
				],
			),
			branch(
				"backend",
				"Backend Development",
				"Server-side logic",
				"Backend development handles server-side operations and business logic.",
				vec![
					leaf("nodejs", "Node.js", "JavaScript runtime", "Node.js enables JavaScript execution on servers."),
					leaf("python", "Python", "Versatile language", "Python offers frameworks like Django and Flask."),
				],
			),
			branch(
				"devops",
				"DevOps",
				"Infrastructure & CI/CD",
				"DevOps practices streamline development and operations.",
				vec![leaf("docker", "Docker", "Containerization", "Docker packages applications into containers.")],
			),
		],
	))
}

/// Sidebar view of the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedDetails {
	/// Id of the selected node.
	pub id: String,
	/// Card headline.
	pub title: String,
	/// One-line summary.
	pub summary: String,
	pub description: Option<String>,
	pub notes: Option<String>,
	/// Root = 0.
	pub depth: usize,
	/// Whether its children are hidden.
	pub collapsed: bool,
	/// Root nodes cannot be deleted.
	pub is_root: bool,
	/// `(id, title)` of each child, in order.
	pub children: Vec<(String, String)>,
}

/// Hover tooltip content and its screen anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub title: String,
	pub summary: String,
	/// Leading characters of the description.
	pub excerpt: Option<String>,
	/// Screen position of the card's top-right corner.
	pub x: f64,
	pub y: f64,
}

/// One editing session.
pub struct MindmapState {
	tree: Tree,
	collapsed: CollapseSet,
	offsets: OffsetMap,
	view: ViewTransform,
	interaction: Interaction,
	selected: Option<String>,
	editing: Option<String>,
	notice: Option<String>,
	layout: Layout,
	/// Card geometry used for layout and hit testing.
	pub layout_config: LayoutConfig,
	/// Zoom limits and pointer tolerances.
	pub view_config: ViewConfig,
	/// Container size in screen pixels.
	pub width: f64,
	pub height: f64,
	next_id: u64,
}

impl MindmapState {
	/// Session over `tree` with default layout and view settings.
	pub fn new(tree: Tree, offsets: OffsetMap, width: f64, height: f64) -> Self {
		Self::with_config(
			tree,
			offsets,
			width,
			height,
			LayoutConfig::default(),
			ViewConfig::default(),
		)
	}

	/// Session with explicit layout and view settings. Orphaned offsets are dropped.
	pub fn with_config(
		tree: Tree,
		mut offsets: OffsetMap,
		width: f64,
		height: f64,
		layout_config: LayoutConfig,
		view_config: ViewConfig,
	) -> Self {
		offsets.prune(&tree);
		let mut view = ViewTransform::new(&view_config);
		view.reset(width, &view_config);
		let mut state = Self {
			tree,
			collapsed: CollapseSet::default(),
			offsets,
			view,
			interaction: Interaction::default(),
			selected: None,
			editing: None,
			notice: None,
			layout: Layout::default(),
			layout_config,
			view_config,
			width,
			height,
			next_id: 1,
		};
		state.relayout();
		state
	}

	/// Current document.
	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	/// Layout of the current state, recomputed after every change.
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Collapsed node ids.
	pub fn collapsed(&self) -> &CollapseSet {
		&self.collapsed
	}

	/// Manual offsets of dragged nodes.
	pub fn offsets(&self) -> &OffsetMap {
		&self.offsets
	}

	/// Current pan and zoom.
	pub fn view(&self) -> &ViewTransform {
		&self.view
	}

	/// Gesture and hover state.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Node shown in the sidebar.
	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Node under the pointer.
	pub fn hovered_id(&self) -> Option<&str> {
		self.interaction.hovered()
	}

	/// Node whose edit form is open.
	pub fn editing(&self) -> Option<&str> {
		self.editing.as_deref()
	}

	/// Last error message for the user, if not yet dismissed.
	pub fn notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	/// Clear the current notice.
	pub fn dismiss_notice(&mut self) {
		self.notice = None;
	}

	/// Surface a failure that happened outside the session (browser I/O).
	pub fn notify(&mut self, message: impl Into<String>) {
		let message = message.into();
		warn!("mindmap: {}", message);
		self.notice = Some(message);
	}

	fn relayout(&mut self) {
		self.layout = layout::layout(
			&self.tree,
			&self.collapsed,
			&self.offsets,
			&self.layout_config,
		);
	}

	/// Record an error for the user and hand it back to the caller.
	fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
		if let Err(e) = &result {
			warn!("mindmap: {}", e);
			self.notice = Some(e.to_string());
		}
		result
	}

	/// Swap in a new tree and drop state that referred to removed nodes.
	fn commit(&mut self, tree: Tree) {
		self.tree = tree;
		self.offsets.prune(&self.tree);
		self.collapsed.prune(&self.tree);
		let live = |id: &Option<String>, tree: &Tree| id.as_deref().is_some_and(|i| tree.contains(i));
		if !live(&self.selected, &self.tree) {
			self.selected = None;
		}
		if !live(&self.editing, &self.tree) {
			self.editing = None;
		}
		if self
			.interaction
			.hovered()
			.is_some_and(|id| !self.tree.contains(id))
		{
			self.interaction.set_hover(None);
		}
		self.relayout();
	}

	/// Replace the whole document, clearing all per-document view state.
	fn replace_document(&mut self, tree: Tree, offsets: OffsetMap) {
		self.tree = tree;
		self.offsets = offsets;
		self.collapsed.clear();
		self.selected = None;
		self.editing = None;
		self.interaction.cancel();
		self.view.reset(self.width, &self.view_config);
		self.relayout();
		info!("mindmap: loaded document with {} nodes", self.tree.len());
	}

	/// Fresh id from a monotonically increasing counter, skipping taken ids.
	fn next_node_id(&mut self) -> String {
		loop {
			let id = format!("node-{}", self.next_id);
			self.next_id += 1;
			if !self.tree.contains(&id) {
				return id;
			}
		}
	}

	/// Append a new child under `parent_id` and return its id.
	pub fn add_child(&mut self, parent_id: &str, title: &str, summary: &str) -> Result<String> {
		let id = self.next_node_id();
		let node = Node::new(id.clone(), title).with_summary(summary);
		let result = self.tree.insert_child(parent_id, node);
		let next = self.guard(result)?;
		self.commit(next);
		debug!("mindmap: added '{}' under '{}'", id, parent_id);
		Ok(id)
	}

	/// Remove `node_id` and its subtree. The root is refused.
	pub fn delete_node(&mut self, node_id: &str) -> Result<()> {
		let result = self.tree.delete_node(node_id);
		let next = self.guard(result)?;
		self.commit(next);
		debug!("mindmap: deleted '{}'", node_id);
		Ok(())
	}

	/// Replace the text fields of `node_id`.
	pub fn update_node(&mut self, node_id: &str, fields: NodeFields) -> Result<()> {
		let result = self.tree.update_node(node_id, &fields.normalized());
		let next = self.guard(result)?;
		self.commit(next);
		debug!("mindmap: updated '{}'", node_id);
		Ok(())
	}

	/// Flip the collapse state of `node_id`. Returns whether it is now collapsed.
	pub fn toggle_collapse(&mut self, node_id: &str) -> Result<bool> {
		if !self.tree.contains(node_id) {
			return self.guard(Err(MindmapError::not_found(node_id)));
		}
		let now = self.collapsed.toggle(node_id);
		self.relayout();
		debug!("mindmap: '{}' collapsed={}", node_id, now);
		Ok(now)
	}

	/// Select `node_id`, closing an edit form open on another node.
	pub fn select(&mut self, node_id: &str) -> Result<()> {
		if !self.tree.contains(node_id) {
			return self.guard(Err(MindmapError::not_found(node_id)));
		}
		if self.editing.as_deref() != Some(node_id) {
			self.editing = None;
		}
		self.selected = Some(node_id.to_string());
		Ok(())
	}

	/// Close the sidebar.
	pub fn clear_selection(&mut self) {
		self.selected = None;
		self.editing = None;
	}

	/// Start editing `node_id`, returning its current fields as the draft.
	pub fn begin_edit(&mut self, node_id: &str) -> Result<NodeFields> {
		let fields = match self.tree.find(node_id) {
			Some(node) => NodeFields::from_node(node),
			None => return self.guard(Err(MindmapError::not_found(node_id))),
		};
		self.editing = Some(node_id.to_string());
		Ok(fields)
	}

	/// Discard the edit draft.
	pub fn cancel_edit(&mut self) {
		self.editing = None;
	}

	/// Apply the draft to the node being edited.
	pub fn save_edit(&mut self, fields: NodeFields) -> Result<()> {
		let Some(id) = self.editing.clone() else {
			return self.guard(Err(MindmapError::InvalidOperation(
				"no node is being edited".into(),
			)));
		};
		self.update_node(&id, fields)?;
		self.editing = None;
		Ok(())
	}

	/// Sidebar content for the selected node.
	pub fn selected_details(&self) -> Option<SelectedDetails> {
		let id = self.selected.as_deref()?;
		let mut found = None;
		self.tree.walk(|node, depth| {
			if node.id == id {
				found = Some((node, depth));
			}
		});
		let (node, depth) = found?;
		Some(SelectedDetails {
			id: node.id.clone(),
			title: node.title.clone(),
			summary: node.summary.clone(),
			description: node.description.clone(),
			notes: node.notes.clone(),
			depth,
			collapsed: self.collapsed.contains(&node.id),
			is_root: node.id == self.tree.root().id,
			children: node
				.children
				.iter()
				.map(|c| (c.id.clone(), c.title.clone()))
				.collect(),
		})
	}

	/// Tooltip for the hovered node, anchored next to its card.
	pub fn tooltip(&self) -> Option<Tooltip> {
		let node: &PositionedNode = self.layout.node(self.interaction.hovered()?)?;
		let half_w = self.layout_config.node_width / 2.0;
		let half_h = self.layout_config.node_height / 2.0;
		let (x, y) = self.view.world_to_screen(node.x + half_w, node.y - half_h);
		Some(Tooltip {
			title: node.title.clone(),
			summary: node.summary.clone(),
			excerpt: node
				.description
				.as_ref()
				.map(|d| d.chars().take(TOOLTIP_EXCERPT_CHARS).collect()),
			x,
			y,
		})
	}

	fn target_at(&self, sx: f64, sy: f64) -> Option<interaction::HitTarget> {
		let (wx, wy) = self.view.screen_to_world(sx, sy);
		interaction::hit_test(
			&self.layout,
			&self.layout_config,
			&self.view_config,
			wx,
			wy,
		)
	}

	/// Pointer pressed at screen `(sx, sy)`.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let target = self.target_at(sx, sy);
		self.interaction.pointer_down(target, sx, sy, &self.view);
	}

	/// Feed a pointer move. Returns whether anything visible changed.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
		let dragging = self.interaction.dragged().is_some();
		let moved = self.interaction.pointer_move(
			sx,
			sy,
			&mut self.view,
			&mut self.offsets,
			&self.view_config,
		);
		if moved && dragging {
			self.relayout();
		}
		let hovered = self
			.target_at(sx, sy)
			.map(|t| t.node_id().to_string());
		let hover_changed = self.interaction.set_hover(hovered);
		moved || hover_changed
	}

	/// Pointer released. A press that stayed put selects or toggles.
	pub fn pointer_up(&mut self) {
		match self.interaction.pointer_up() {
			Some(Click::Select(id)) => {
				let _ = self.select(&id);
			}
			Some(Click::ToggleCollapse(id)) => {
				let _ = self.toggle_collapse(&id);
			}
			None => {}
		}
	}

	/// Pointer left the canvas: end the gesture and clear hover.
	pub fn pointer_leave(&mut self) {
		self.interaction.cancel();
	}

	/// Wheel scroll: pan, or zoom around the pointer with the modifier held.
	pub fn wheel(&mut self, input: WheelInput) {
		self.interaction
			.wheel(input, &mut self.view, &self.view_config);
	}

	/// Toolbar zoom in.
	pub fn zoom_in(&mut self) {
		self.view.zoom_in(&self.view_config);
	}

	/// Toolbar zoom out.
	pub fn zoom_out(&mut self) {
		self.view.zoom_out(&self.view_config);
	}

	/// Default zoom with the root at the top-center.
	pub fn reset_view(&mut self) {
		self.view.reset(self.width, &self.view_config);
	}

	/// Container resized: remember the size and re-anchor the view.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.reset_view();
	}

	/// Replace the document with an imported one. On failure nothing changes.
	pub fn import_json(&mut self, json: &str) -> Result<()> {
		let result = document::import_document(json);
		let (tree, offsets) = self.guard(result)?;
		self.replace_document(tree, offsets);
		Ok(())
	}

	/// Serialize the document with current offsets as `(file name, json)`.
	pub fn export_json(&mut self) -> Result<(&'static str, String)> {
		let result = document::export_json(&self.tree, &self.offsets);
		let json = self.guard(result)?;
		info!("mindmap: exported {} nodes", self.tree.len());
		Ok((EXPORT_FILE_NAME, json))
	}

	/// Accept a tree produced by the generative collaborator.
	pub fn apply_generated(&mut self, json: &str) -> Result<()> {
		let result = document::accept_generated(json);
		let tree = self.guard(result)?;
		self.replace_document(tree, OffsetMap::default());
		Ok(())
	}
}
