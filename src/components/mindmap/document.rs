//! JSON import/export of mindmaps with their manual layout offsets.
//!
//! The exported document is the node tree with a `manualOffset: {dx, dy}`
//! on every node, so a file carries everything needed to restore both the
//! content and the hand-tuned layout. On import the offsets are split back
//! out into an [`OffsetMap`]; they never become part of a [`Node`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{MindmapError, Result};
use super::types::{Node, Offset, OffsetMap, Tree};

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "mindmap-data.json";

/// A node as stored in an exported file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
	/// Unique node id.
	pub id: String,
	/// Card headline.
	pub title: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Optional on import; always written on export.
	#[serde(default)]
	pub manual_offset: Offset,
	/// Defaults to empty on import.
	#[serde(default)]
	pub children: Vec<DocumentNode>,
}

impl DocumentNode {
	fn from_node(node: &Node, offsets: &OffsetMap) -> Self {
		Self {
			id: node.id.clone(),
			title: node.title.clone(),
			summary: node.summary.clone(),
			description: node.description.clone(),
			notes: node.notes.clone(),
			manual_offset: offsets.get(&node.id),
			children: node
				.children
				.iter()
				.map(|c| Self::from_node(c, offsets))
				.collect(),
		}
	}

	/// Split into a plain node, moving offsets into `offsets`.
	fn into_node(self, offsets: &mut OffsetMap) -> Node {
		offsets.set(self.id.clone(), self.manual_offset);
		Node {
			children: self
				.children
				.into_iter()
				.map(|c| c.into_node(offsets))
				.collect(),
			id: self.id,
			title: self.title,
			summary: self.summary,
			description: self.description,
			notes: self.notes,
		}
	}

	fn collect_duplicate_id<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Option<&'a str> {
		if !seen.insert(self.id.as_str()) {
			return Some(self.id.as_str());
		}
		self.children
			.iter()
			.find_map(|c| c.collect_duplicate_id(seen))
	}
}

/// Merge `tree` with its current offsets into an exportable document.
///
/// Offsets keyed by ids that are not in the tree are dropped.
pub fn export_document(tree: &Tree, offsets: &OffsetMap) -> DocumentNode {
	DocumentNode::from_node(tree.root(), offsets)
}

/// Pretty-printed JSON of [`export_document`].
pub fn export_json(tree: &Tree, offsets: &OffsetMap) -> Result<String> {
	Ok(serde_json::to_string_pretty(&export_document(tree, offsets))?)
}

/// Parse an exported (or hand-written) document.
///
/// The top level must be an object with string `id` and `title`. Missing
/// `children` and `manualOffset` default to empty. Nothing is returned on
/// failure, so callers keep their previous tree.
pub fn import_document(json: &str) -> Result<(Tree, OffsetMap)> {
	let value: Value = serde_json::from_str(json)?;
	import_value(value)
}

/// [`import_document`] for already-parsed JSON.
pub fn import_value(value: Value) -> Result<(Tree, OffsetMap)> {
	require_string(&value, "id")?;
	require_string(&value, "title")?;

	let doc: DocumentNode = serde_json::from_value(value)?;
	if let Some(dup) = doc.collect_duplicate_id(&mut HashSet::new()) {
		return Err(MindmapError::InvalidFormat(format!(
			"duplicate node id '{dup}'"
		)));
	}

	let mut offsets = OffsetMap::default();
	let root = doc.into_node(&mut offsets);
	Ok((Tree::new(root), offsets))
}

/// Validate content returned by the generative collaborator.
///
/// Same shape as an import, except `children` must be present. Every failure
/// is reported as [`MindmapError::ExternalFailure`].
pub fn accept_generated(json: &str) -> Result<Tree> {
	let external = |e: MindmapError| MindmapError::ExternalFailure(e.to_string());

	let value: Value = serde_json::from_str(json)
		.map_err(MindmapError::from)
		.map_err(external)?;
	if !value.get("children").is_some_and(Value::is_array) {
		return Err(MindmapError::ExternalFailure(
			"missing 'children' array".into(),
		));
	}
	let (tree, _) = import_value(value).map_err(external)?;
	Ok(tree)
}

fn require_string(value: &Value, field: &str) -> Result<()> {
	match value.get(field) {
		Some(Value::String(_)) => Ok(()),
		Some(_) => Err(MindmapError::InvalidFormat(format!(
			"'{field}' must be a string"
		))),
		None => Err(MindmapError::InvalidFormat(format!(
			"missing '{field}' field"
		))),
	}
}
