//! Visual theming for the mindmap canvas.
//!
//! Colors, stroke widths and card styling consumed by the renderer. Nothing
//! here affects layout or hit testing.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// CSS color string, `#rrggbb` when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Card fill per depth level, cycled for deep trees.
#[derive(Clone, Debug)]
pub struct DepthPalette {
	/// Fill for depth 0, 1, 2 and so on.
	pub colors: Vec<Color>,
}

impl DepthPalette {
	/// Lavender root with pastel levels below it (default)
	pub fn pastel() -> Self {
		Self {
			colors: vec![
				Color::rgb(117, 117, 200), // Lavender
				Color::rgb(227, 242, 255), // Ice blue
				Color::rgb(243, 255, 227), // Mint cream
				Color::rgb(253, 228, 249), // Blush
				Color::rgb(255, 238, 235), // Peach
			],
		}
	}

	/// Fill for `depth`.
	pub fn get(&self, depth: usize) -> Color {
		self.colors[depth % self.colors.len()]
	}
}

/// Node card style.
#[derive(Clone, Debug)]
pub struct CardStyle {
	/// Rounded corner radius in world units.
	pub corner_radius: f64,
	pub title_color: Color,
	pub summary_color: Color,
	/// Canvas font for titles.
	pub title_font: &'static str,
	/// Canvas font for summaries.
	pub summary_font: &'static str,
	/// Characters shown before the title is ellipsized.
	pub title_max_chars: usize,
	pub summary_max_chars: usize,
	pub shadow_color: Color,
	pub shadow_blur: f64,
	/// Dash pattern (dash, gap) for the outline of collapsed cards.
	pub collapsed_dash: (f64, f64),
}

/// Edge style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Default stroke color.
	pub color: Color,
	/// Color for edges touching the selected node.
	pub highlight_color: Color,
	/// Default stroke width.
	pub width: f64,
	pub highlight_width: f64,
	/// Global alpha applied to all edges.
	pub alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind everything.
	pub background: Color,
	/// Outline for selected/hovered cards and the collapse toggle.
	pub accent: Color,
	pub accent_width: f64,
	/// Node cards.
	pub card: CardStyle,
	/// Parent-child connectors.
	pub edge: EdgeStyle,
	/// Card fill per depth.
	pub palette: DepthPalette,
}

impl Theme {
	/// Soft lavender theme (default)
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(227, 227, 255),
			accent: Color::rgb(117, 117, 200),
			accent_width: 3.0,
			card: CardStyle {
				corner_radius: 16.0,
				title_color: Color::rgb(45, 45, 45),
				summary_color: Color::rgb(102, 102, 102),
				title_font: "600 16px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif",
				summary_font: "12px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif",
				title_max_chars: 20,
				summary_max_chars: 24,
				shadow_color: Color::rgba(0, 0, 0, 0.1),
				shadow_blur: 8.0,
				collapsed_dash: (6.0, 4.0),
			},
			edge: EdgeStyle {
				color: Color::rgb(208, 208, 208),
				highlight_color: Color::rgb(117, 117, 200),
				width: 2.0,
				highlight_width: 3.0,
				alpha: 0.6,
			},
			palette: DepthPalette::pastel(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

/// Shorten `text` to at most `max` characters, ending with `...` when cut.
pub fn ellipsize(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_string();
	}
	if max < 3 {
		return text.chars().take(max).collect();
	}
	let kept: String = text.chars().take(max - 3).collect();
	format!("{kept}...")
}
