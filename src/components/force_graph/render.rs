use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::CanvasState;
use crate::graph::{GraphEngine, InteractionState, Vec2};

const PANEL_WIDTH: f64 = 300.0;
const LINE_HEIGHT: f64 = 16.0;
const RANK_ROWS: usize = 12;

fn degree_color(t: f32) -> &'static str {
	if t < 0.33 {
		"rgb(173, 216, 230)"
	} else if t < 0.66 {
		"rgb(255, 165, 0)"
	} else {
		"rgb(255, 0, 0)"
	}
}

fn screen(view: &InteractionState, world: Vec2) -> (f64, f64) {
	let p = view.world_to_screen(world);
	(p.x as f64, p.y as f64)
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_edges(&state.engine, ctx);
	draw_nodes(&state.engine, ctx);
	draw_summary(state, ctx);
}

fn draw_edges(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let (graph, view) = (engine.graph(), engine.interaction());
	let arrow_size = 8.0;
	ctx.set_font("11px sans-serif");

	for edge in graph.edges() {
		let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = (screen(view, from.position), screen(view, to.position));
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (from.radius as f64, to.radius as f64);

		ctx.set_stroke_style_str("rgba(0, 0, 0, 0.8)");
		ctx.set_line_width(1.5);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();

		ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !edge.label.is_empty() {
			ctx.set_fill_style_str("#000000");
			let _ = ctx.fill_text(&edge.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0);
		}
	}
}

fn draw_nodes(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let (graph, view) = (engine.graph(), engine.interaction());
	ctx.set_font("12px sans-serif");

	for node in graph.nodes() {
		let (x, y) = screen(view, node.position);
		let radius = node.radius as f64;
		let color = if node.interaction.selected {
			"rgb(100, 200, 100)"
		} else {
			degree_color(graph.normalized_degree(node.id))
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();
		if view.hovered() == Some(node.id) && !node.interaction.selected {
			ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
			ctx.fill();
		}
		ctx.set_stroke_style_str("#000000");
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_fill_style_str("#000000");
		let half = ctx
			.measure_text(&node.label)
			.map(|m| m.width() / 2.0)
			.unwrap_or(0.0);
		let _ = ctx.fill_text(&node.label, x - half, y + 4.0);
	}
}

fn draw_summary(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let engine = &state.engine;
	let graph = engine.graph();
	let left = state.width - PANEL_WIDTH;

	ctx.set_fill_style_str("rgba(245, 245, 245, 0.95)");
	ctx.fill_rect(left, 0.0, PANEL_WIDTH, state.height);
	ctx.set_fill_style_str("#000000");

	let mut lines: Vec<String> = Vec::new();
	let summary = engine.summary();
	lines.push("Graph Summary".into());
	lines.push(format!("Number of Nodes: {}", summary.nodes));
	lines.push(format!("Number of Edges: {}", summary.edges));
	lines.push(String::new());

	if let Some(selected) = engine.selected().and_then(|id| graph.node(id)) {
		lines.push(format!("Selected: {}", selected.label));
		lines.push(format!("Connections: {}", selected.connection_count));
		for edge in graph.incident_edges(selected.id) {
			let other = if edge.from == selected.id { edge.to } else { edge.from };
			if let Some(other) = graph.node(other) {
				lines.push(format!("  {} via '{}'", other.label, edge.label));
			}
		}
		lines.push(String::new());
		lines.push(format!("Link Prediction for '{}'", selected.label));
		let predictions = engine.selected_predictions();
		if predictions.is_empty() {
			lines.push("  No potential links found.".into());
		}
		for p in predictions {
			if let Some(node) = graph.node(p.candidate) {
				lines.push(format!("  {}  {:.2}  {}", node.label, p.score, p.strength));
			}
		}
		lines.push(String::new());
	}

	lines.push("Page Rank".into());
	match engine.centrality() {
		Some(table) if !table.is_empty() => {
			for score in table.ranked().into_iter().take(RANK_ROWS) {
				if let Some(node) = graph.node(score.node) {
					lines.push(format!("  {}  {:.5}  {}", node.label, score.score, score.tier));
				}
			}
		}
		_ => lines.push("  No data to calculate Page Rank.".into()),
	}

	ctx.set_font("12px sans-serif");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, left + 10.0, 20.0 + i as f64 * LINE_HEIGHT);
	}
}
