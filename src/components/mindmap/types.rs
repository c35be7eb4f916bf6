//! Mindmap document model and the tree-store mutations.
//!
//! The tree is an owned hierarchy: each node's `children` vector is the only
//! reference to those children, so every non-root node has exactly one
//! parent. Mutations never touch the receiver; they return a fresh [`Tree`]
//! on success, which lets the session swap state in atomically.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::{MindmapError, Result};

/// Id carried by the root of a freshly created mindmap.
pub const ROOT_ID: &str = "root";

/// A single entry in the mindmap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier across the whole tree. Never reused.
	pub id: String,
	/// Headline shown on the node card.
	pub title: String,
	/// One-line summary shown under the title.
	#[serde(default)]
	pub summary: String,
	/// Longer free text shown in the sidebar and tooltip.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Private notes, only visible in the sidebar.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Ordered children. Sibling order is display order.
	#[serde(default)]
	pub children: Vec<Node>,
}

impl Node {
	/// Leaf node with empty summary and no optional fields.
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			..Default::default()
		}
	}

	/// Builder-style summary setter.
	pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
		self.summary = summary.into();
		self
	}

	/// Builder-style children setter, replacing any existing ones.
	pub fn with_children(mut self, children: Vec<Node>) -> Self {
		self.children = children;
		self
	}

	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	fn find(&self, id: &str) -> Option<&Node> {
		if self.id == id {
			return Some(self);
		}
		self.children.iter().find_map(|c| c.find(id))
	}

	fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
		if self.id == id {
			return Some(self);
		}
		self.children.iter_mut().find_map(|c| c.find_mut(id))
	}

	/// Detach the subtree with `id` from wherever it sits below `self`.
	fn remove_descendant(&mut self, id: &str) -> Option<Node> {
		if let Some(pos) = self.children.iter().position(|c| c.id == id) {
			return Some(self.children.remove(pos));
		}
		self.children
			.iter_mut()
			.find_map(|c| c.remove_descendant(id))
	}

	fn walk<'a>(&'a self, depth: usize, f: &mut impl FnMut(&'a Node, usize)) {
		f(self, depth);
		for child in &self.children {
			child.walk(depth + 1, f);
		}
	}
}

/// The editable text fields of a node, used by `update_node` and the edit form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFields {
	/// New title.
	pub title: String,
	/// New summary.
	pub summary: String,
	/// New description; `None` removes it.
	pub description: Option<String>,
	/// New notes; `None` removes them.
	pub notes: Option<String>,
}

impl NodeFields {
	/// Copy the current text fields of `node`.
	pub fn from_node(node: &Node) -> Self {
		Self {
			title: node.title.clone(),
			summary: node.summary.clone(),
			description: node.description.clone(),
			notes: node.notes.clone(),
		}
	}

	/// Turn blank optional fields into `None`, as form inputs produce `""`.
	pub fn normalized(mut self) -> Self {
		let blank = |s: &Option<String>| s.as_deref().is_some_and(|v| v.trim().is_empty());
		if blank(&self.description) {
			self.description = None;
		}
		if blank(&self.notes) {
			self.notes = None;
		}
		self
	}
}

/// A complete mindmap rooted at a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
	root: Node,
}

impl Tree {
	/// Wrap `root` as a tree. Ids below it are trusted to be unique.
	pub fn new(root: Node) -> Self {
		Self { root }
	}

	/// The root node.
	pub fn root(&self) -> &Node {
		&self.root
	}

	/// Look up a node anywhere in the tree by id.
	pub fn find(&self, id: &str) -> Option<&Node> {
		self.root.find(id)
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &str) -> bool {
		self.find(id).is_some()
	}

	/// Number of nodes in the tree, root included.
	pub fn len(&self) -> usize {
		let mut n = 0;
		self.walk(|_, _| n += 1);
		n
	}

	/// Pre-order traversal with depth (root = 0).
	pub fn walk<'a>(&'a self, mut f: impl FnMut(&'a Node, usize)) {
		self.root.walk(0, &mut f);
	}

	/// Every id in the tree.
	pub fn ids(&self) -> HashSet<&str> {
		let mut ids = HashSet::new();
		self.walk(|n, _| {
			ids.insert(n.id.as_str());
		});
		ids
	}

	/// Append `node` as the last child of `parent_id`.
	///
	/// Id uniqueness of `node` is the caller's responsibility.
	pub fn insert_child(&self, parent_id: &str, node: Node) -> Result<Tree> {
		let mut next = self.clone();
		let parent = next
			.root
			.find_mut(parent_id)
			.ok_or_else(|| MindmapError::not_found(parent_id))?;
		parent.children.push(node);
		Ok(next)
	}

	/// Remove the subtree rooted at `node_id`. The root cannot be deleted.
	pub fn delete_node(&self, node_id: &str) -> Result<Tree> {
		if node_id == self.root.id {
			return Err(MindmapError::InvalidOperation(
				"the root node cannot be deleted".into(),
			));
		}
		let mut next = self.clone();
		next.root
			.remove_descendant(node_id)
			.ok_or_else(|| MindmapError::not_found(node_id))?;
		Ok(next)
	}

	/// Replace the text fields of `node_id`. Children are untouched.
	pub fn update_node(&self, node_id: &str, fields: &NodeFields) -> Result<Tree> {
		let mut next = self.clone();
		let node = next
			.root
			.find_mut(node_id)
			.ok_or_else(|| MindmapError::not_found(node_id))?;
		node.title = fields.title.clone();
		node.summary = fields.summary.clone();
		node.description = fields.description.clone();
		node.notes = fields.notes.clone();
		Ok(next)
	}
}

/// Ids of nodes whose children are hidden from layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseSet(HashSet<String>);

impl CollapseSet {
	/// Whether `id` is collapsed.
	pub fn contains(&self, id: &str) -> bool {
		self.0.contains(id)
	}

	/// Flip membership of `id`. Returns whether it is now collapsed.
	///
	/// Legal for leaves too; it simply has no visible effect.
	pub fn toggle(&mut self, id: &str) -> bool {
		if self.0.remove(id) {
			false
		} else {
			self.0.insert(id.to_string());
			true
		}
	}

	/// Expand everything.
	pub fn clear(&mut self) {
		self.0.clear();
	}

	/// Whether no node is collapsed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Drop ids that no longer exist in `tree`.
	pub fn prune(&mut self, tree: &Tree) {
		let ids = tree.ids();
		self.0.retain(|id| ids.contains(id.as_str()));
	}
}

/// Manual displacement applied on top of a node's computed position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
	/// Horizontal displacement in world units.
	pub dx: f64,
	/// Vertical displacement in world units.
	pub dy: f64,
}

impl Offset {
	/// No displacement.
	pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

	/// Offset by `(dx, dy)`.
	pub fn new(dx: f64, dy: f64) -> Self {
		Self { dx, dy }
	}

	/// Whether both components are exactly zero.
	pub fn is_zero(&self) -> bool {
		self.dx == 0.0 && self.dy == 0.0
	}
}

/// Per-node manual offsets, keyed by node id.
///
/// Zero offsets are never stored, so "no entry" and `{0, 0}` are the same
/// state and map equality is meaningful.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetMap(HashMap<String, Offset>);

impl OffsetMap {
	/// Offset of `id`, zero when it has none.
	pub fn get(&self, id: &str) -> Offset {
		self.0.get(id).copied().unwrap_or_default()
	}

	/// Replace the offset of `id`. Setting zero removes the entry.
	pub fn set(&mut self, id: impl Into<String>, offset: Offset) {
		let id = id.into();
		if offset.is_zero() {
			self.0.remove(&id);
		} else {
			self.0.insert(id, offset);
		}
	}

	/// Accumulate a world-space delta into the entry for `id`.
	pub fn nudge(&mut self, id: &str, dx: f64, dy: f64) {
		let current = self.get(id);
		self.set(id, Offset::new(current.dx + dx, current.dy + dy));
	}

	/// Whether every node sits at its computed position.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Drop offsets of nodes that are no longer in `tree`.
	pub fn prune(&mut self, tree: &Tree) {
		let ids = tree.ids();
		self.0.retain(|id, _| ids.contains(id.as_str()));
	}
}
