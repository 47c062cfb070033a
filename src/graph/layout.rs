//! Force-directed layout: pairwise repulsion, edge springs, damped Euler
//! integration. Pinned nodes neither move nor get repelled.

use rand::Rng;

use super::model::Graph;
use super::types::Vec2;

/// Tuning knobs for one simulation step.
#[derive(Clone, Copy, Debug)]
pub struct LayoutParams {
	/// Numerator of the inverse-square repulsion.
	pub repulsion_strength: f32,
	/// Spring constant applied to `distance - rest_length`.
	pub spring_strength: f32,
	/// Distance at which a spring exerts no force.
	pub rest_length: f32,
	/// Velocity multiplier applied after each step; must be below 1.
	pub damping: f32,
	/// Fixed integration step used by [`GraphEngine::tick`](super::GraphEngine::tick).
	pub time_step: f32,
	/// Lower clamp on squared distance for repulsion.
	pub min_distance_sq: f32,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			repulsion_strength: 2000.0,
			spring_strength: 0.02,
			rest_length: 100.0,
			damping: 0.9,
			time_step: 0.5,
			min_distance_sq: 1.0,
		}
	}
}

/// Rectangle that fresh node positions are drawn from.
#[derive(Clone, Copy, Debug)]
pub struct SpawnArea {
	/// Top-left corner.
	pub origin: Vec2,
	/// Width and height.
	pub extent: Vec2,
}

impl Default for SpawnArea {
	fn default() -> Self {
		Self {
			origin: Vec2::new(100.0, 100.0),
			extent: Vec2::new(600.0, 400.0),
		}
	}
}

impl SpawnArea {
	/// Whether `p` lies in the half-open rectangle.
	pub fn contains(&self, p: Vec2) -> bool {
		let end = self.origin + self.extent;
		p.x >= self.origin.x && p.x < end.x && p.y >= self.origin.y && p.y < end.y
	}
}

/// Give every node a random position inside `spawn` and zero its velocity.
pub fn scatter<R: Rng>(graph: &mut Graph, spawn: &SpawnArea, rng: &mut R) {
	for node in graph.nodes_mut() {
		node.position = Vec2::new(
			spawn.origin.x + rng.gen_range(0.0..spawn.extent.x),
			spawn.origin.y + rng.gen_range(0.0..spawn.extent.y),
		);
		node.velocity = Vec2::ZERO;
	}
}

/// Advance the simulation by `dt`.
pub fn step(graph: &mut Graph, params: &LayoutParams, dt: f32) {
	let snapshot: Vec<(Vec2, bool)> = graph
		.nodes()
		.iter()
		.map(|n| (n.position, n.is_pinned()))
		.collect();
	let mut forces = vec![Vec2::ZERO; snapshot.len()];

	for i in 0..snapshot.len() {
		let (pi, pinned_i) = snapshot[i];
		if pinned_i {
			continue;
		}
		for j in (i + 1)..snapshot.len() {
			let (pj, pinned_j) = snapshot[j];
			if pinned_j {
				continue;
			}
			let delta = pi - pj;
			let dist_sq = delta.length_sq().max(params.min_distance_sq);
			let dist = dist_sq.sqrt();
			let force = delta * (params.repulsion_strength / dist_sq / dist);
			forces[i] += force;
			forces[j] -= force;
		}
	}

	for edge in graph.edges() {
		let (from, to) = (edge.from.index(), edge.to.index());
		let ((p_from, pinned_from), (p_to, pinned_to)) = (snapshot[from], snapshot[to]);
		if pinned_from && pinned_to {
			continue;
		}
		let delta = p_to - p_from;
		let dist = delta.length().max(1.0);
		let force = delta * ((dist - params.rest_length) * params.spring_strength / dist);
		if !pinned_from {
			forces[from] += force;
		}
		if !pinned_to {
			forces[to] -= force;
		}
	}

	for (node, force) in graph.nodes_mut().iter_mut().zip(forces) {
		if node.is_pinned() {
			continue;
		}
		node.velocity += force;
		node.position += node.velocity * dt;
		node.velocity *= params.damping;
	}
}

/// Sum of squared speeds; falls towards zero as the layout settles.
pub fn kinetic_energy(graph: &Graph) -> f32 {
	graph.nodes().iter().map(|n| n.velocity.length_sq()).sum()
}
