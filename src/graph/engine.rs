//! The owned engine object: one graph plus its layout, interaction and
//! analytics state, driven a tick at a time.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::centrality::{self, CentralityTable, DegreeCentrality, NodeScore, RiskEntry};
use super::interaction::InteractionState;
use super::layout::{self, LayoutParams, SpawnArea};
use super::model::{Graph, RadiusRange};
use super::prediction::{self, Prediction};
use super::types::{NodeId, Triple, Vec2};

/// Everything tunable about an engine instance.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
	/// Force simulation parameters.
	pub layout: LayoutParams,
	/// Node radius bounds.
	pub radius: RadiusRange,
	/// Area fresh positions are drawn from.
	pub spawn: SpawnArea,
	/// Seed for position scattering.
	pub seed: u64,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			layout: LayoutParams::default(),
			radius: RadiusRange::default(),
			spawn: SpawnArea::default(),
			seed: 0x5eed,
		}
	}
}

/// Node and edge counts for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphSummary {
	/// Number of nodes.
	pub nodes: usize,
	/// Number of edges.
	pub edges: usize,
}

/// Owns one graph together with its layout and interaction state.
///
/// All mutation goes through `&mut self`, one tick at a time. The pointer
/// methods are the only path that moves a dragged node; [`tick`](Self::tick)
/// and [`step`](Self::step) only move free ones.
pub struct GraphEngine {
	config: EngineConfig,
	graph: Graph,
	interaction: InteractionState,
	centrality: Option<CentralityTable>,
	rng: StdRng,
	generation: u32,
}

impl GraphEngine {
	/// Create an engine with an empty graph.
	pub fn new(config: EngineConfig) -> Self {
		Self {
			config,
			graph: Graph::default(),
			interaction: InteractionState::default(),
			centrality: None,
			rng: StdRng::seed_from_u64(config.seed),
			generation: 0,
		}
	}

	/// Discard the current graph and build a new one from `triples`.
	///
	/// Handles from the previous graph stop resolving.
	pub fn load(&mut self, triples: &[Triple]) {
		self.generation = self.generation.wrapping_add(1);
		self.graph = Graph::build_with(triples, self.config.radius, self.generation);
		layout::scatter(&mut self.graph, &self.config.spawn, &mut self.rng);
		self.interaction.forget();
		self.centrality = None;
	}

	/// Engine configuration.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// The loaded graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// View and gesture state.
	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	/// Node and edge counts.
	pub fn summary(&self) -> GraphSummary {
		GraphSummary {
			nodes: self.graph.node_count(),
			edges: self.graph.edge_count(),
		}
	}

	/// Advance the layout by the configured fixed time step.
	pub fn tick(&mut self) {
		self.step(self.config.layout.time_step);
	}

	/// Advance the layout by `dt`.
	pub fn step(&mut self, dt: f32) {
		layout::step(&mut self.graph, &self.config.layout, dt);
	}

	/// Recompute PageRank for every node and keep the result.
	pub fn compute_centrality(&mut self) -> &CentralityTable {
		self.centrality.insert(centrality::page_rank(&self.graph))
	}

	/// Most recently computed PageRank table.
	pub fn centrality(&self) -> Option<&CentralityTable> {
		self.centrality.as_ref()
	}

	/// Degree centrality for all nodes.
	pub fn degree_centrality(&self) -> Vec<DegreeCentrality> {
		centrality::degree_centrality(&self.graph)
	}

	/// Normalised betweenness for all nodes, highest first.
	pub fn betweenness_centrality(&self) -> Vec<NodeScore> {
		centrality::betweenness_centrality(&self.graph)
	}

	/// Closeness for all nodes, highest first.
	pub fn closeness_centrality(&self) -> Vec<NodeScore> {
		centrality::closeness_centrality(&self.graph)
	}

	/// The `limit` most urgent nodes by severity, then degree.
	pub fn top_risks(&self, limit: usize) -> Vec<RiskEntry> {
		centrality::top_risks(&self.graph, limit)
	}

	/// Fresh link predictions for `node`.
	pub fn predict_links(&self, node: NodeId) -> Vec<Prediction> {
		prediction::predict_links(&self.graph, node)
	}

	/// The selected node, if any.
	pub fn selected(&self) -> Option<NodeId> {
		self.interaction.selected(&self.graph)
	}

	/// Link predictions for the selected node; empty with no selection.
	pub fn selected_predictions(&self) -> Vec<Prediction> {
		self.selected()
			.map(|id| self.predict_links(id))
			.unwrap_or_default()
	}

	/// Pointer pressed at a screen position.
	pub fn pointer_down(&mut self, screen: Vec2) -> Option<NodeId> {
		self.interaction.pointer_down(&mut self.graph, screen)
	}

	/// Pointer moved to a screen position.
	pub fn pointer_move(&mut self, screen: Vec2) {
		self.interaction.pointer_move(&mut self.graph, screen);
	}

	/// Pointer released.
	pub fn pointer_up(&mut self) {
		self.interaction.pointer_up(&mut self.graph);
	}

	/// Pointer left the drawing surface.
	pub fn pointer_leave(&mut self) {
		self.interaction.pointer_leave(&mut self.graph);
	}

	/// Wheel scrolled by `(dx, dy)` notches.
	pub fn wheel(&mut self, dx: f32, dy: f32) {
		self.interaction.wheel(dx, dy);
	}

	/// Unselect every node.
	pub fn clear_selection(&mut self) {
		debug!("selection cleared");
		self.interaction.clear_selection(&mut self.graph);
	}

	/// Scatter nodes, zero velocities, clear selection and re-centre the
	/// view without rebuilding the graph.
	pub fn reset_layout(&mut self) {
		info!("resetting layout");
		self.interaction
			.reset(&mut self.graph, &self.config.spawn, &mut self.rng);
	}
}

impl Default for GraphEngine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}
