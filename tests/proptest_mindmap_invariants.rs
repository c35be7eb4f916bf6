//! Property-based invariant tests for the tree store, layout and documents.
//!
//! These hold for any tree, collapse set and offset map:
//!
//! 1. Layout places exactly the nodes without a collapsed ancestor.
//! 2. Collapsing a node hides exactly its descendants, from nodes and edges.
//! 3. Siblings are strictly increasing and evenly spaced in array order.
//! 4. Toggling collapse twice restores the set.
//! 5. Export followed by import restores tree and offsets.
//! 6. Inserting then deleting a child restores the tree.
//! 7. A node drag adds `(sx/s, sy/s)` to its offset at any pan.

// Integration test crate only needs a subset of the lib deps.
#![allow(unused_crate_dependencies)]

use std::collections::HashSet;

use mindmap_canvas::components::mindmap::document::{export_json, import_document};
use mindmap_canvas::components::mindmap::interaction::{HitTarget, Interaction};
use mindmap_canvas::components::mindmap::layout::{LayoutConfig, layout};
use mindmap_canvas::components::mindmap::types::{
	CollapseSet, Node, Offset, OffsetMap, ROOT_ID, Tree,
};
use mindmap_canvas::components::mindmap::view::{ViewConfig, ViewTransform};
use proptest::prelude::*;

// ── Generators ──────────────────────────────────────────────────────────

/// Tree shape without content; ids are assigned afterwards so they stay unique.
#[derive(Clone, Debug)]
struct Shape(Vec<Shape>);

fn shape_strategy() -> impl Strategy<Value = Shape> {
	Just(Shape(Vec::new())).prop_recursive(4, 48, 5, |inner| {
		prop::collection::vec(inner, 0..5).prop_map(Shape)
	})
}

fn build(shape: &Shape, next: &mut usize) -> Node {
	let n = *next;
	*next += 1;
	let id = if n == 0 {
		ROOT_ID.to_string()
	} else {
		format!("node-{n}")
	};
	let mut node = Node::new(id, format!("Title {n}")).with_summary(format!("summary {n}"));
	if n % 2 == 0 {
		node.description = Some(format!("description of {n}"));
	}
	if n % 3 == 0 {
		node.notes = Some(format!("notes for {n}"));
	}
	node.children = shape.0.iter().map(|c| build(c, next)).collect();
	node
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
	shape_strategy().prop_map(|shape| Tree::new(build(&shape, &mut 0)))
}

fn preorder_ids(tree: &Tree) -> Vec<String> {
	let mut ids = Vec::new();
	tree.walk(|n, _| ids.push(n.id.clone()));
	ids
}

/// Quarter units so every value survives a JSON round trip exactly.
fn coord_strategy() -> impl Strategy<Value = f64> {
	(-4000i32..4000).prop_map(|v| v as f64 / 4.0)
}

/// A tree plus a collapse set and offset map keyed by its own ids.
fn session_strategy() -> impl Strategy<Value = (Tree, CollapseSet, OffsetMap)> {
	tree_strategy()
		.prop_flat_map(|tree| {
			let n = preorder_ids(&tree).len();
			(
				Just(tree),
				prop::collection::vec(prop::bool::weighted(0.25), n),
				prop::collection::vec(prop::option::of((coord_strategy(), coord_strategy())), n),
			)
		})
		.prop_map(|(tree, flags, offs)| {
			let mut collapsed = CollapseSet::default();
			let mut offsets = OffsetMap::default();
			for ((id, flag), off) in preorder_ids(&tree).iter().zip(flags).zip(offs) {
				if flag {
					collapsed.toggle(id);
				}
				if let Some((dx, dy)) = off {
					offsets.set(id.as_str(), Offset::new(dx, dy));
				}
			}
			(tree, collapsed, offsets)
		})
}

/// A tree and the pre-order index of one of its nodes.
fn tree_and_pick() -> impl Strategy<Value = (Tree, usize)> {
	tree_strategy().prop_flat_map(|tree| {
		let n = preorder_ids(&tree).len();
		(Just(tree), 0..n)
	})
}

/// Ids of nodes with no collapsed ancestor.
fn expected_visible(node: &Node, collapsed: &CollapseSet, out: &mut HashSet<String>) {
	out.insert(node.id.clone());
	if collapsed.contains(&node.id) {
		return;
	}
	for child in &node.children {
		expected_visible(child, collapsed, out);
	}
}

fn descendants(node: &Node, out: &mut HashSet<String>) {
	for child in &node.children {
		out.insert(child.id.clone());
		descendants(child, out);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Layout places exactly the visible nodes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn layout_places_every_visible_node_once((tree, collapsed, offsets) in session_strategy()) {
		let out = layout(&tree, &collapsed, &offsets, &LayoutConfig::default());

		let mut expected = HashSet::new();
		expected_visible(tree.root(), &collapsed, &mut expected);
		let placed: HashSet<String> = out.nodes.iter().map(|n| n.id.clone()).collect();
		prop_assert_eq!(out.nodes.len(), placed.len(), "a node was placed twice");
		prop_assert_eq!(&placed, &expected);

		for positioned in &out.nodes {
			let node = tree.find(&positioned.id).unwrap();
			prop_assert_eq!(positioned.collapsed, collapsed.contains(&node.id));
			for child in &node.children {
				prop_assert_eq!(
					out.node(&child.id).is_some(),
					!collapsed.contains(&node.id),
					"child {} of {}", child.id, node.id
				);
			}
		}
	}
}

proptest! {
	#[test]
	fn layout_without_collapse_covers_whole_tree(tree in tree_strategy()) {
		let out = layout(&tree, &CollapseSet::default(), &OffsetMap::default(), &LayoutConfig::default());
		prop_assert_eq!(out.nodes.len(), tree.len());
		prop_assert_eq!(out.edges.len(), tree.len() - 1);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Collapsing hides exactly the subtree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn collapse_hides_exactly_descendants((tree, pick) in tree_and_pick()) {
		let id = preorder_ids(&tree)[pick].clone();
		let config = LayoutConfig::default();
		let full = layout(&tree, &CollapseSet::default(), &OffsetMap::default(), &config);
		let mut collapsed = CollapseSet::default();
		collapsed.toggle(&id);
		let folded = layout(&tree, &collapsed, &OffsetMap::default(), &config);

		let mut hidden = HashSet::new();
		descendants(tree.find(&id).unwrap(), &mut hidden);
		let before: HashSet<&str> = full.nodes.iter().map(|n| n.id.as_str()).collect();
		let after: HashSet<&str> = folded.nodes.iter().map(|n| n.id.as_str()).collect();
		let removed: HashSet<String> = before.difference(&after).map(|s| s.to_string()).collect();

		prop_assert_eq!(&removed, &hidden);
		prop_assert!(after.contains(id.as_str()));
		prop_assert!(folded.node(&id).unwrap().collapsed);
		for (from, to) in folded.edge_ids() {
			prop_assert!(!hidden.contains(from) && !hidden.contains(to));
		}
		prop_assert_eq!(folded.edges.len(), folded.nodes.len() - 1);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Sibling spacing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn siblings_evenly_spaced_in_array_order(tree in tree_strategy()) {
		let config = LayoutConfig::default();
		let out = layout(&tree, &CollapseSet::default(), &OffsetMap::default(), &config);
		let mut parents = Vec::new();
		tree.walk(|n, _| parents.push(n));

		for parent in parents {
			let p = out.node(&parent.id).unwrap();
			let xs: Vec<f64> = parent
				.children
				.iter()
				.map(|c| out.node(&c.id).unwrap().x)
				.collect();
			for pair in xs.windows(2) {
				prop_assert!(pair[1] > pair[0]);
				prop_assert!((pair[1] - pair[0] - config.sibling_pitch()).abs() < 1e-6);
			}
			for child in &parent.children {
				let c = out.node(&child.id).unwrap();
				prop_assert!((c.y - p.y - config.level_gap).abs() < 1e-6);
			}
			if let (Some(first), Some(last)) = (xs.first(), xs.last()) {
				prop_assert!(((first + last) / 2.0 - p.x).abs() < 1e-6, "block not centered under {}", parent.id);
			}
		}
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Collapse toggle is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn toggle_twice_restores_collapse_set((tree, collapsed, _) in session_strategy(), pick in any::<prop::sample::Index>()) {
		let ids = preorder_ids(&tree);
		let id = &ids[pick.index(ids.len())];
		let mut set = collapsed.clone();
		let first = set.toggle(id);
		let second = set.toggle(id);
		prop_assert_ne!(first, second);
		prop_assert_eq!(set, collapsed);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Document round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn export_then_import_is_identity((tree, _, offsets) in session_strategy()) {
		let json = export_json(&tree, &offsets).unwrap();
		let (back_tree, back_offsets) = import_document(&json).unwrap();
		prop_assert_eq!(back_tree, tree);
		prop_assert_eq!(back_offsets, offsets);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Insert then delete
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn insert_then_delete_restores_tree((tree, pick) in tree_and_pick()) {
		let parent = preorder_ids(&tree)[pick].clone();
		let restored = tree
			.insert_child(&parent, Node::new("fresh", "Fresh"))
			.and_then(|t| {
				assert!(t.contains("fresh"));
				t.delete_node("fresh")
			})
			.unwrap();
		prop_assert_eq!(restored, tree);
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Drag deltas are zoom-corrected and pan-independent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn drag_offset_is_screen_delta_over_scale(
		pan_x in -2000.0f64..2000.0,
		pan_y in -2000.0f64..2000.0,
		scale in 0.2f64..3.0,
		press in (-800.0f64..800.0, -800.0f64..800.0),
		delta in (-400.0f64..400.0, -400.0f64..400.0),
	) {
		let config = ViewConfig::default();
		prop_assume!(delta.0.hypot(delta.1) > config.click_threshold);

		let mut view = ViewTransform { pan_x, pan_y, scale };
		let mut offsets = OffsetMap::default();
		let mut ix = Interaction::default();
		ix.pointer_down(Some(HitTarget::Node("n".into())), press.0, press.1, &view);
		ix.pointer_move(press.0 + delta.0, press.1 + delta.1, &mut view, &mut offsets, &config);
		prop_assert_eq!(ix.pointer_up(), None);

		let o = offsets.get("n");
		prop_assert!((o.dx - delta.0 / scale).abs() < 1e-9);
		prop_assert!((o.dy - delta.1 / scale).abs() < 1e-9);
		prop_assert_eq!((view.pan_x, view.pan_y, view.scale), (pan_x, pan_y, scale));
	}
}
