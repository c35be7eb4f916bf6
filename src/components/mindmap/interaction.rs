//! Pointer and wheel gesture state machine.
//!
//! A single pointer stream drives three mutually exclusive gestures:
//! nothing ([`Gesture::Idle`]), panning the canvas, or dragging one node.
//! Node drags accumulate into the offset map in world units; canvas pans
//! write the view transform directly. A press that never travels past the
//! click threshold is reported back as a [`Click`] on release.

use super::layout::{Layout, LayoutConfig};
use super::types::OffsetMap;
use super::view::{ViewConfig, ViewTransform};

/// What lies under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
	/// The node card body.
	Node(String),
	/// The expand/collapse disc hanging below a parent node.
	CollapseToggle(String),
}

impl HitTarget {
	/// Id of the node owning the surface.
	pub fn node_id(&self) -> &str {
		match self {
			HitTarget::Node(id) | HitTarget::CollapseToggle(id) => id,
		}
	}
}

/// The active pointer gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Canvas pan. `anchor` is `pointer - pan` at press time.
	PanningCanvas { anchor_x: f64, anchor_y: f64 },
	/// Node drag. Tracks the last pointer position for delta computation.
	DraggingNode {
		id: String,
		on_toggle: bool,
		press_x: f64,
		press_y: f64,
		last_x: f64,
		last_y: f64,
		/// Set once the pointer leaves the click tolerance; never cleared.
		moved: bool,
	},
}

/// Outcome of a press/release pair that did not move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
	/// Open the node in the sidebar.
	Select(String),
	/// Flip the node's collapse state.
	ToggleCollapse(String),
}

/// One wheel event in screen space.
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelInput {
	/// Horizontal scroll, in pixels.
	pub delta_x: f64,
	/// Vertical scroll, in pixels. Positive scrolls down.
	pub delta_y: f64,
	/// Pointer position, used as the zoom anchor.
	pub x: f64,
	pub y: f64,
	/// Precision-zoom modifier (Ctrl/Meta) held.
	pub zoom: bool,
}

/// Gesture state plus the hover reference.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	gesture: Gesture,
	hovered: Option<String>,
}

impl Interaction {
	/// Active gesture.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Node under the pointer.
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// Whether no gesture is in progress.
	pub fn is_idle(&self) -> bool {
		self.gesture == Gesture::Idle
	}

	/// The node being dragged, if any.
	pub fn dragged(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::DraggingNode { id, .. } => Some(id),
			_ => None,
		}
	}

	/// Start a gesture. A press on any node surface never starts a pan.
	pub fn pointer_down(&mut self, target: Option<HitTarget>, sx: f64, sy: f64, view: &ViewTransform) {
		self.gesture = match target {
			Some(target) => Gesture::DraggingNode {
				on_toggle: matches!(target, HitTarget::CollapseToggle(_)),
				id: target.node_id().to_string(),
				press_x: sx,
				press_y: sy,
				last_x: sx,
				last_y: sy,
				moved: false,
			},
			None => Gesture::PanningCanvas {
				anchor_x: sx - view.pan_x,
				anchor_y: sy - view.pan_y,
			},
		};
	}

	/// Advance the active gesture. Returns whether view or offsets changed.
	pub fn pointer_move(
		&mut self,
		sx: f64,
		sy: f64,
		view: &mut ViewTransform,
		offsets: &mut OffsetMap,
		config: &ViewConfig,
	) -> bool {
		match &mut self.gesture {
			Gesture::Idle => false,
			Gesture::PanningCanvas { anchor_x, anchor_y } => {
				view.set_pan(sx - *anchor_x, sy - *anchor_y);
				true
			}
			Gesture::DraggingNode {
				id,
				press_x,
				press_y,
				last_x,
				last_y,
				moved,
				..
			} => {
				// Inside the click tolerance nothing moves yet; the first move
				// past it applies the whole distance since the press.
				let (from_x, from_y) = if *moved {
					(*last_x, *last_y)
				} else if (sx - *press_x).hypot(sy - *press_y) > config.click_threshold {
					*moved = true;
					(*press_x, *press_y)
				} else {
					return false;
				};
				let (dx, dy) = view.screen_delta_to_world(sx - from_x, sy - from_y);
				offsets.nudge(id, dx, dy);
				*last_x = sx;
				*last_y = sy;
				true
			}
		}
	}

	/// End the gesture. A node press that stayed put becomes a click.
	pub fn pointer_up(&mut self) -> Option<Click> {
		match std::mem::take(&mut self.gesture) {
			Gesture::DraggingNode {
				id,
				on_toggle,
				moved: false,
				..
			} => Some(if on_toggle {
				Click::ToggleCollapse(id)
			} else {
				Click::Select(id)
			}),
			_ => None,
		}
	}

	/// Abort any gesture without producing a click (pointer left the canvas).
	pub fn cancel(&mut self) {
		self.gesture = Gesture::Idle;
		self.hovered = None;
	}

	/// Precision wheel zooms around the pointer; a plain wheel pans both axes.
	/// A precision event with no vertical travel is ignored.
	pub fn wheel(&mut self, input: WheelInput, view: &mut ViewTransform, config: &ViewConfig) {
		if input.zoom {
			if input.delta_y == 0.0 {
				return;
			}
			let factor = if input.delta_y > 0.0 {
				config.wheel_zoom_out
			} else {
				config.wheel_zoom_in
			};
			view.zoom_at(factor, input.x, input.y, config);
		} else {
			view.pan_by(-input.delta_x, -input.delta_y);
		}
	}

	/// Update the hover reference. Returns whether it changed.
	pub fn set_hover(&mut self, id: Option<String>) -> bool {
		if self.hovered == id {
			return false;
		}
		self.hovered = id;
		true
	}
}

/// Resolve the world-space point to the topmost node surface under it.
pub fn hit_test(
	layout: &Layout,
	layout_config: &LayoutConfig,
	view_config: &ViewConfig,
	wx: f64,
	wy: f64,
) -> Option<HitTarget> {
	let (half_w, half_h) = (layout_config.node_width / 2.0, layout_config.node_height / 2.0);
	// Later nodes are drawn on top, so search back to front.
	for node in layout.nodes.iter().rev() {
		if node.has_children() {
			let (tx, ty) = (node.x, node.y + half_h);
			if (wx - tx).hypot(wy - ty) <= view_config.toggle_radius {
				return Some(HitTarget::CollapseToggle(node.id.clone()));
			}
		}
		if (wx - node.x).abs() <= half_w && (wy - node.y).abs() <= half_h {
			return Some(HitTarget::Node(node.id.clone()));
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::layout::layout;
	use crate::components::mindmap::types::{CollapseSet, Node, Offset, ROOT_ID, Tree};

	const EPS: f64 = 1e-9;

	fn view(pan_x: f64, pan_y: f64, scale: f64) -> ViewTransform {
		ViewTransform {
			pan_x,
			pan_y,
			scale,
		}
	}

	fn node(id: &str) -> Option<HitTarget> {
		Some(HitTarget::Node(id.into()))
	}

	#[test]
	fn press_on_node_starts_drag_not_pan() {
		let mut ix = Interaction::default();
		let mut v = view(10.0, 20.0, 1.0);
		let mut offsets = OffsetMap::default();
		ix.pointer_down(node("a"), 100.0, 100.0, &v);
		assert_eq!(ix.dragged(), Some("a"));

		ix.pointer_move(140.0, 130.0, &mut v, &mut offsets, &ViewConfig::default());
		assert_eq!((v.pan_x, v.pan_y), (10.0, 20.0));
		assert_eq!(offsets.get("a"), Offset::new(40.0, 30.0));
	}

	#[test]
	fn drag_delta_is_divided_by_scale_regardless_of_pan() {
		let config = ViewConfig::default();
		for (pan_x, pan_y) in [(0.0, 0.0), (-500.0, 320.0), (1234.5, -77.0)] {
			let mut ix = Interaction::default();
			let mut v = view(pan_x, pan_y, 2.5);
			let mut offsets = OffsetMap::default();
			ix.pointer_down(node("n"), 50.0, 60.0, &v);
			ix.pointer_move(75.0, 40.0, &mut v, &mut offsets, &config);
			let o = offsets.get("n");
			assert!((o.dx - 25.0 / 2.5).abs() < EPS);
			assert!((o.dy + 20.0 / 2.5).abs() < EPS);
		}
	}

	#[test]
	fn drag_accumulates_deltas_onto_existing_offset() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(0.0, 0.0, 0.5);
		let mut offsets = OffsetMap::default();
		offsets.set("n", Offset::new(100.0, 0.0));

		ix.pointer_down(node("n"), 0.0, 0.0, &v);
		ix.pointer_move(10.0, 0.0, &mut v, &mut offsets, &config);
		ix.pointer_move(15.0, 5.0, &mut v, &mut offsets, &config);
		ix.pointer_up();

		assert_eq!(offsets.get("n"), Offset::new(130.0, 10.0));
	}

	#[test]
	fn canvas_pan_tracks_pointer_absolutely() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(300.0, 100.0, 0.8);
		let mut offsets = OffsetMap::default();

		ix.pointer_down(None, 50.0, 50.0, &v);
		assert!(matches!(ix.gesture(), Gesture::PanningCanvas { .. }));
		ix.pointer_move(80.0, 20.0, &mut v, &mut offsets, &config);
		ix.pointer_move(90.0, 10.0, &mut v, &mut offsets, &config);
		assert_eq!((v.pan_x, v.pan_y), (340.0, 60.0));
		assert!(offsets.is_empty());
		assert_eq!(ix.pointer_up(), None);
		assert!(ix.is_idle());
	}

	#[test]
	fn pure_click_selects_node() {
		let mut ix = Interaction::default();
		let v = view(0.0, 0.0, 1.0);
		ix.pointer_down(node("a"), 5.0, 5.0, &v);
		assert_eq!(ix.pointer_up(), Some(Click::Select("a".into())));
		assert!(ix.is_idle());
	}

	#[test]
	fn jitter_within_threshold_still_clicks() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(0.0, 0.0, 1.0);
		let mut offsets = OffsetMap::default();
		ix.pointer_down(node("a"), 5.0, 5.0, &v);
		assert!(!ix.pointer_move(6.0, 6.0, &mut v, &mut offsets, &config));
		assert_eq!(ix.pointer_up(), Some(Click::Select("a".into())));
		assert!(offsets.is_empty());
	}

	#[test]
	fn leaving_tolerance_applies_distance_since_press() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(0.0, 0.0, 0.5);
		let mut offsets = OffsetMap::default();
		ix.pointer_down(node("a"), 0.0, 0.0, &v);
		ix.pointer_move(2.0, 1.0, &mut v, &mut offsets, &config);
		assert!(offsets.is_empty());
		ix.pointer_move(10.0, 4.0, &mut v, &mut offsets, &config);
		assert_eq!(offsets.get("a"), Offset::new(20.0, 8.0));
		ix.pointer_move(12.0, 4.0, &mut v, &mut offsets, &config);
		assert_eq!(offsets.get("a"), Offset::new(24.0, 8.0));
		assert_eq!(ix.pointer_up(), None);
	}

	#[test]
	fn real_drag_does_not_click() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(0.0, 0.0, 1.0);
		let mut offsets = OffsetMap::default();
		ix.pointer_down(node("a"), 0.0, 0.0, &v);
		ix.pointer_move(40.0, 0.0, &mut v, &mut offsets, &config);
		// Coming back to the press point does not turn it into a click.
		ix.pointer_move(0.0, 0.0, &mut v, &mut offsets, &config);
		assert_eq!(ix.pointer_up(), None);
	}

	#[test]
	fn click_on_toggle_reports_toggle() {
		let mut ix = Interaction::default();
		let v = view(0.0, 0.0, 1.0);
		ix.pointer_down(Some(HitTarget::CollapseToggle("p".into())), 1.0, 1.0, &v);
		assert_eq!(ix.pointer_up(), Some(Click::ToggleCollapse("p".into())));
	}

	#[test]
	fn cancel_ends_gesture_and_hover() {
		let mut ix = Interaction::default();
		let v = view(0.0, 0.0, 1.0);
		ix.set_hover(Some("a".into()));
		ix.pointer_down(node("a"), 0.0, 0.0, &v);
		ix.cancel();
		assert!(ix.is_idle());
		assert_eq!(ix.hovered(), None);
		assert_eq!(ix.pointer_up(), None);
	}

	#[test]
	fn plain_wheel_pans_and_precision_wheel_zooms() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(100.0, 100.0, 1.0);

		ix.wheel(
			WheelInput {
				delta_x: 12.0,
				delta_y: 30.0,
				..Default::default()
			},
			&mut v,
			&config,
		);
		assert_eq!((v.pan_x, v.pan_y, v.scale), (88.0, 70.0, 1.0));

		ix.wheel(
			WheelInput {
				delta_y: -3.0,
				x: 88.0,
				y: 70.0,
				zoom: true,
				..Default::default()
			},
			&mut v,
			&config,
		);
		assert!((v.scale - 1.1).abs() < EPS);
		// Zoom anchored at the pan origin leaves pan unchanged.
		assert!((v.pan_x - 88.0).abs() < EPS);

		ix.wheel(
			WheelInput {
				delta_y: 3.0,
				zoom: true,
				..Default::default()
			},
			&mut v,
			&config,
		);
		assert!((v.scale - 1.1 * 0.9).abs() < EPS);
	}

	#[test]
	fn precision_wheel_without_vertical_delta_does_nothing() {
		let config = ViewConfig::default();
		let mut ix = Interaction::default();
		let mut v = view(40.0, 60.0, 0.8);
		ix.wheel(
			WheelInput {
				delta_x: 30.0,
				x: 10.0,
				y: 10.0,
				zoom: true,
				..Default::default()
			},
			&mut v,
			&config,
		);
		assert_eq!(v, view(40.0, 60.0, 0.8));
	}

	#[test]
	fn hover_reports_changes_only() {
		let mut ix = Interaction::default();
		assert!(ix.set_hover(Some("a".into())));
		assert!(!ix.set_hover(Some("a".into())));
		assert!(ix.set_hover(None));
	}

	#[test]
	fn hit_test_resolves_cards_toggles_and_background() {
		let tree = Tree::new(Node::new(ROOT_ID, "R").with_children(vec![Node::new("a", "A")]));
		let lc = LayoutConfig::default();
		let vc = ViewConfig::default();
		let out = layout(&tree, &CollapseSet::default(), &OffsetMap::default(), &lc);

		assert_eq!(hit_test(&out, &lc, &vc, 0.0, 0.0), node(ROOT_ID));
		assert_eq!(hit_test(&out, &lc, &vc, 99.0, -39.0), node(ROOT_ID));
		// Toggle disc straddles the bottom edge of the root card.
		assert_eq!(
			hit_test(&out, &lc, &vc, 0.0, 50.0),
			Some(HitTarget::CollapseToggle(ROOT_ID.into()))
		);
		// The leaf has no toggle.
		assert_eq!(hit_test(&out, &lc, &vc, 0.0, 180.0 + 50.0), None);
		assert_eq!(hit_test(&out, &lc, &vc, 0.0, 180.0), node("a"));
		assert_eq!(hit_test(&out, &lc, &vc, 500.0, 500.0), None);
	}
}
