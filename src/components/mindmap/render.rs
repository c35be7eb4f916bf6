//! Canvas rendering for the mindmap.
//!
//! Draws in two passes under the view transform so cards sit above edges:
//! 1. Background (screen space)
//! 2. Edges, then cards with their labels and collapse toggles (world space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{LayoutConfig, PositionedNode};
use super::state::MindmapState;
use super::theme::{Theme, ellipsize};

/// Renders the complete mindmap to the canvas.
pub fn render(state: &MindmapState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let view = state.view();
	ctx.save();
	let _ = ctx.translate(view.pan_x, view.pan_y);
	let _ = ctx.scale(view.scale, view.scale);

	draw_edges(state, ctx, theme);
	for node in &state.layout().nodes {
		draw_node(state, ctx, theme, node);
	}

	ctx.restore();
}

fn draw_edges(state: &MindmapState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let layout = state.layout();
	let half_h = state.layout_config.node_height / 2.0;
	let selected = state.selected_id();

	ctx.set_global_alpha(theme.edge.alpha);
	for &edge in &layout.edges {
		let (from, to) = layout.endpoints(edge);
		let touches_selected = selected.is_some_and(|id| id == from.id || id == to.id);
		let (color, width) = if touches_selected {
			(theme.edge.highlight_color, theme.edge.highlight_width)
		} else {
			(theme.edge.color, theme.edge.width)
		};
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(from.x, from.y + half_h);
		ctx.line_to(to.x, to.y - half_h);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(
	state: &MindmapState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &PositionedNode,
) {
	let config = &state.layout_config;
	let is_selected = state.selected_id() == Some(node.id.as_str());
	let is_hovered = state.hovered_id() == Some(node.id.as_str());
	let card = &theme.card;

	let fill = theme.palette.get(node.depth);
	let fill = if is_hovered { fill.lighten(0.15) } else { fill };

	ctx.save();
	ctx.set_shadow_color(&card.shadow_color.to_css());
	ctx.set_shadow_blur(card.shadow_blur);
	ctx.set_shadow_offset_y(2.0);
	card_path(ctx, config, node, card.corner_radius);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	ctx.restore();

	if is_selected || is_hovered {
		card_path(ctx, config, node, card.corner_radius);
		ctx.set_stroke_style_str(&theme.accent.to_css());
		ctx.set_line_width(theme.accent_width);
		ctx.stroke();
	} else if node.collapsed && node.has_children() {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(card.collapsed_dash.0),
			&JsValue::from_f64(card.collapsed_dash.1),
		));
		card_path(ctx, config, node, card.corner_radius);
		ctx.set_stroke_style_str(&theme.accent.with_alpha(0.6).to_css());
		ctx.set_line_width(1.5);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(&card.title_color.to_css());
	ctx.set_font(card.title_font);
	let _ = ctx.fill_text(
		&ellipsize(&node.title, card.title_max_chars),
		node.x,
		node.y - 8.0,
	);
	ctx.set_fill_style_str(&card.summary_color.to_css());
	ctx.set_font(card.summary_font);
	let _ = ctx.fill_text(
		&ellipsize(&node.summary, card.summary_max_chars),
		node.x,
		node.y + 12.0,
	);

	if node.has_children() {
		draw_toggle(state, ctx, theme, node);
	}
}

fn draw_toggle(
	state: &MindmapState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &PositionedNode,
) {
	let (cx, cy) = (node.x, node.y + state.layout_config.node_height / 2.0);
	let r = state.view_config.toggle_radius;

	ctx.begin_path();
	let _ = ctx.arc(cx, cy, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#ffffff");
	ctx.fill();
	ctx.set_stroke_style_str(&theme.accent.to_css());
	ctx.set_line_width(2.0);
	ctx.stroke();

	// Draw the glyph as strokes so it stays centered regardless of font.
	let arm = r * 0.45;
	ctx.begin_path();
	ctx.move_to(cx - arm, cy);
	ctx.line_to(cx + arm, cy);
	if node.collapsed {
		ctx.move_to(cx, cy - arm);
		ctx.line_to(cx, cy + arm);
	}
	ctx.set_line_width(2.5);
	ctx.stroke();
}

/// Rounded-rectangle path for a card centered on the node.
fn card_path(ctx: &CanvasRenderingContext2d, config: &LayoutConfig, node: &PositionedNode, radius: f64) {
	let (w, h) = (config.node_width, config.node_height);
	let (left, top) = (node.x - w / 2.0, node.y - h / 2.0);
	let (right, bottom) = (left + w, top + h);
	let r = radius.min(w / 2.0).min(h / 2.0);

	ctx.begin_path();
	ctx.move_to(left + r, top);
	let _ = ctx.arc_to(right, top, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, left, bottom, r);
	let _ = ctx.arc_to(left, bottom, left, top, r);
	let _ = ctx.arc_to(left, top, right, top, r);
	ctx.close_path();
}
