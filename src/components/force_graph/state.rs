use crate::graph::{EngineConfig, GraphEngine, Triple};

/// Browser-side wrapper around one engine and the canvas size.
pub struct CanvasState {
	pub engine: GraphEngine,
	pub width: f64,
	pub height: f64,
}

impl CanvasState {
	pub fn new(triples: &[Triple], width: f64, height: f64, seed: u64) -> Self {
		let mut engine = GraphEngine::new(EngineConfig {
			seed,
			..Default::default()
		});
		engine.load(triples);
		engine.compute_centrality();
		Self {
			engine,
			width,
			height,
		}
	}

	pub fn tick(&mut self) {
		self.engine.tick();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tick_advances_layout() {
		let triples = [Triple::new("A", "r", "B", "high"), Triple::new("B", "r", "C", "low")];
		let mut state = CanvasState::new(&triples, 800.0, 600.0, 3);
		assert!(state.engine.centrality().is_some());

		let before: Vec<_> = state.engine.graph().nodes().iter().map(|n| n.position).collect();
		state.tick();
		let after: Vec<_> = state.engine.graph().nodes().iter().map(|n| n.position).collect();
		assert_ne!(before, after);
	}
}
