//! Pan/zoom view transform.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the coordinate system the layout produces. The root
//!   sits at the origin and distances are in layout units.
//! - **Screen-space**: pixel coordinates relative to the canvas' top-left.
//!
//! The mapping is `screen = world * scale + pan`. Pointer deltas must go
//! through [`ViewTransform::screen_delta_to_world`] so dragging feels the same
//! at any zoom level.

/// Zoom limits, button/wheel factors and pointer tolerances.
#[derive(Clone, Debug)]
pub struct ViewConfig {
	/// Scale restored by `reset`.
	pub default_scale: f64,
	/// Lower zoom clamp.
	pub min_scale: f64,
	/// Upper zoom clamp.
	pub max_scale: f64,
	/// Factor applied by the zoom-in button.
	pub zoom_in_factor: f64,
	/// Factor applied by the zoom-out button.
	pub zoom_out_factor: f64,
	/// Factor for one precision-wheel notch towards the user (zoom in).
	pub wheel_zoom_in: f64,
	/// Factor for one precision-wheel notch away from the user (zoom out).
	pub wheel_zoom_out: f64,
	/// Screen distance from the top edge to the root after `reset`.
	pub top_margin: f64,
	/// Radius of the collapse toggle disc, in world units.
	pub toggle_radius: f64,
	/// Screen pixels a pointer may travel and still count as a click.
	pub click_threshold: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			default_scale: 0.8,
			min_scale: 0.2,
			max_scale: 3.0,
			zoom_in_factor: 1.2,
			zoom_out_factor: 0.8,
			wheel_zoom_in: 1.1,
			wheel_zoom_out: 0.9,
			top_margin: 100.0,
			toggle_radius: 14.0,
			click_threshold: 3.0,
		}
	}
}

/// Pan and zoom transform applied to the whole mindmap.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Screen position of the world origin.
	pub pan_x: f64,
	pub pan_y: f64,
	/// Zoom factor, always within `[min_scale, max_scale]`.
	pub scale: f64,
}

impl ViewTransform {
	/// Transform at the default scale with no pan.
	pub fn new(config: &ViewConfig) -> Self {
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			scale: config.default_scale,
		}
	}

	/// Zoom in by the button factor.
	pub fn zoom_in(&mut self, config: &ViewConfig) {
		self.zoom_by(config.zoom_in_factor, config);
	}

	/// Zoom out by the button factor.
	pub fn zoom_out(&mut self, config: &ViewConfig) {
		self.zoom_by(config.zoom_out_factor, config);
	}

	/// Multiply the scale by `factor`, clamped. Pan is left alone.
	pub fn zoom_by(&mut self, factor: f64, config: &ViewConfig) {
		self.scale = (self.scale * factor).clamp(config.min_scale, config.max_scale);
	}

	/// Zoom by `factor` keeping the world point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64, config: &ViewConfig) {
		let new_scale = (self.scale * factor).clamp(config.min_scale, config.max_scale);
		let ratio = new_scale / self.scale;
		self.pan_x = sx - (sx - self.pan_x) * ratio;
		self.pan_y = sy - (sy - self.pan_y) * ratio;
		self.scale = new_scale;
	}

	/// Shift the view. The canvas is unbounded so no clamping applies.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.pan_x += dx;
		self.pan_y += dy;
	}

	/// Place the world origin at screen `(x, y)`.
	pub fn set_pan(&mut self, x: f64, y: f64) {
		self.pan_x = x;
		self.pan_y = y;
	}

	/// Restore the default scale and put the root at the top-center of a
	/// container `width` pixels wide. Pass the width measured at reset time.
	pub fn reset(&mut self, width: f64, config: &ViewConfig) {
		self.scale = config.default_scale;
		self.pan_x = width / 2.0;
		self.pan_y = config.top_margin;
	}

	/// Map a world point to screen pixels.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.scale + self.pan_x, wy * self.scale + self.pan_y)
	}

	/// Map a screen pixel to world coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.pan_x) / self.scale,
			(sy - self.pan_y) / self.scale,
		)
	}

	/// Convert a screen-space movement into world units. Pan does not matter.
	pub fn screen_delta_to_world(&self, dx: f64, dy: f64) -> (f64, f64) {
		(dx / self.scale, dy / self.scale)
	}
}
