//! Error kinds surfaced by mindmap operations.
//!
//! Every variant is recoverable: the session reports it to the user and keeps
//! its previous state.

use thiserror::Error;

/// Errors produced by tree mutations, import/export and generated content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindmapError {
	/// A mutation referenced a node id that is not in the tree.
	#[error("node '{id}' not found")]
	NotFound {
		/// The id that was looked up.
		id: String,
	},

	/// The operation is structurally forbidden (e.g. deleting the root).
	#[error("invalid operation: {0}")]
	InvalidOperation(String),

	/// An imported document is not JSON or lacks the minimum node shape.
	#[error("invalid document: {0}")]
	InvalidFormat(String),

	/// Content returned by the generative collaborator was unusable.
	#[error("generated content rejected: {0}")]
	ExternalFailure(String),
}

impl MindmapError {
	/// Shorthand for [`MindmapError::NotFound`].
	pub fn not_found(id: impl Into<String>) -> Self {
		Self::NotFound { id: id.into() }
	}
}

impl From<serde_json::Error> for MindmapError {
	fn from(e: serde_json::Error) -> Self {
		Self::InvalidFormat(e.to_string())
	}
}

/// Result alias for mindmap operations.
pub type Result<T> = std::result::Result<T, MindmapError>;
