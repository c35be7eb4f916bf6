//! Depth/sibling tiling layout.
//!
//! Converts a [`Tree`] into absolute world coordinates. Each level sits a
//! fixed `level_gap` below its parent, and the visible children of a parent
//! form one contiguous block centered under it.
//!
//! Manual offsets are added after the formulaic position is computed, and
//! children are placed relative to the parent's *formulaic* anchor. Dragging
//! a parent therefore moves only the parent; descendants keep their own
//! independent offsets.

use super::types::{CollapseSet, Node, OffsetMap, Tree};

/// Geometry of node cards and the gaps between them, in world units.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Card width.
	pub node_width: f64,
	/// Card height.
	pub node_height: f64,
	/// Vertical distance between consecutive depth levels.
	pub level_gap: f64,
	/// Horizontal gap between adjacent siblings.
	pub sibling_gap: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 200.0,
			node_height: 80.0,
			level_gap: 180.0,
			sibling_gap: 60.0,
		}
	}
}

impl LayoutConfig {
	/// Horizontal distance between the centers of adjacent siblings.
	pub fn sibling_pitch(&self) -> f64 {
		self.node_width + self.sibling_gap
	}
}

/// A node annotated with its position for one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// Id of the source node.
	pub id: String,
	/// Copied from the node.
	pub title: String,
	pub summary: String,
	pub description: Option<String>,
	pub notes: Option<String>,
	/// Number of children in the tree, visible or not.
	pub child_count: usize,
	/// World-space center, offset included.
	pub x: f64,
	pub y: f64,
	/// Root = 0.
	pub depth: usize,
	/// Whether the node was in the collapse set at layout time.
	pub collapsed: bool,
}

impl PositionedNode {
	fn from_node(node: &Node, x: f64, y: f64, depth: usize, collapsed: bool) -> Self {
		Self {
			id: node.id.clone(),
			title: node.title.clone(),
			summary: node.summary.clone(),
			description: node.description.clone(),
			notes: node.notes.clone(),
			child_count: node.children.len(),
			x,
			y,
			depth,
			collapsed,
		}
	}

	/// Whether the node has children, collapsed or not.
	pub fn has_children(&self) -> bool {
		self.child_count > 0
	}
}

/// A parent→child connection, as indices into [`Layout::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Index of the parent.
	pub from: usize,
	/// Index of the child.
	pub to: usize,
}

/// Output of one layout pass. Recomputed from scratch after every mutation.
#[derive(Clone, Debug, Default)]
pub struct Layout {
	/// Visible nodes in pre-order.
	pub nodes: Vec<PositionedNode>,
	/// One per parent and visible child.
	pub edges: Vec<Edge>,
}

impl Layout {
	/// Positioned node with `id`, if visible.
	pub fn node(&self, id: &str) -> Option<&PositionedNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Parent and child of `edge`.
	pub fn endpoints(&self, edge: Edge) -> (&PositionedNode, &PositionedNode) {
		(&self.nodes[edge.from], &self.nodes[edge.to])
	}

	/// Edges as `(parent id, child id)` pairs.
	pub fn edge_ids(&self) -> impl Iterator<Item = (&str, &str)> {
		self.edges.iter().map(|&e| {
			let (from, to) = self.endpoints(e);
			(from.id.as_str(), to.id.as_str())
		})
	}
}

/// Lay out `tree`, hiding descendants of collapsed nodes and applying offsets.
pub fn layout(
	tree: &Tree,
	collapsed: &CollapseSet,
	offsets: &OffsetMap,
	config: &LayoutConfig,
) -> Layout {
	let mut out = Layout::default();
	place(tree.root(), 0, (0.0, 0.0), None, collapsed, offsets, config, &mut out);
	out
}

#[allow(clippy::too_many_arguments)]
fn place(
	node: &Node,
	depth: usize,
	anchor: (f64, f64),
	parent: Option<usize>,
	collapsed: &CollapseSet,
	offsets: &OffsetMap,
	config: &LayoutConfig,
	out: &mut Layout,
) {
	let is_collapsed = collapsed.contains(&node.id);
	let offset = offsets.get(&node.id);
	let idx = out.nodes.len();
	out.nodes.push(PositionedNode::from_node(
		node,
		anchor.0 + offset.dx,
		anchor.1 + offset.dy,
		depth,
		is_collapsed,
	));
	if let Some(parent) = parent {
		out.edges.push(Edge {
			from: parent,
			to: idx,
		});
	}

	if is_collapsed || node.children.is_empty() {
		return;
	}

	let count = node.children.len() as f64;
	let total_width = count * config.node_width + (count - 1.0) * config.sibling_gap;
	let start_x = anchor.0 - total_width / 2.0;
	let y = anchor.1 + config.level_gap;

	for (i, child) in node.children.iter().enumerate() {
		let x = start_x + i as f64 * config.sibling_pitch() + config.node_width / 2.0;
		place(
			child,
			depth + 1,
			(x, y),
			Some(idx),
			collapsed,
			offsets,
			config,
			out,
		);
	}
}
