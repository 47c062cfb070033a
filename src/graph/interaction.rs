//! Pointer-driven selection, dragging and view panning.
//!
//! A node is either [`DragPhase::Free`] (owned by the layout) or
//! [`DragPhase::Dragging`] (owned by the pointer). Only this module ever
//! moves a dragging node.

use log::debug;
use rand::Rng;

use super::layout::{self, SpawnArea};
use super::model::Graph;
use super::types::{NodeId, Vec2};

/// Screen units the view moves per wheel notch.
pub const WHEEL_PAN_STEP: f32 = 30.0;

/// Who currently governs a node's position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
	/// Moved by the layout simulation.
	#[default]
	Free,
	/// Held by the pointer; `grab_offset` is pointer minus node position at
	/// grab time, in world space.
	Dragging {
		/// Offset preserved for the duration of the drag.
		grab_offset: Vec2,
	},
}

/// Per-node interaction flags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeInteraction {
	/// Drag phase.
	pub phase: DragPhase,
	/// At most one node has this set.
	pub selected: bool,
}

impl NodeInteraction {
	/// Whether the node is held by the pointer.
	pub fn is_dragging(&self) -> bool {
		matches!(self.phase, DragPhase::Dragging { .. })
	}
}

#[derive(Clone, Copy, Debug, Default)]
struct PanGesture {
	pointer_start: Vec2,
	offset_start: Vec2,
}

/// View and gesture state shared across all nodes.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	view_offset: Vec2,
	pan: Option<PanGesture>,
	dragged: Option<NodeId>,
	hovered: Option<NodeId>,
}

/// First node whose disc strictly contains `world`.
pub fn hit_test(graph: &Graph, world: Vec2) -> Option<NodeId> {
	graph
		.nodes()
		.iter()
		.find(|node| (node.position - world).length() < node.radius)
		.map(|node| node.id)
}

impl InteractionState {
	/// Current pan offset applied when drawing.
	pub fn view_offset(&self) -> Vec2 {
		self.view_offset
	}

	/// Convert a pointer position to world coordinates.
	pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
		screen - self.view_offset
	}

	/// Convert a world position to screen coordinates.
	pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
		world + self.view_offset
	}

	/// Node currently held by the pointer.
	pub fn dragged(&self) -> Option<NodeId> {
		self.dragged
	}

	/// Node under the pointer while idle.
	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Whether a background pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	/// The selected node, if any.
	pub fn selected(&self, graph: &Graph) -> Option<NodeId> {
		graph
			.nodes()
			.iter()
			.find(|n| n.interaction.selected)
			.map(|n| n.id)
	}

	/// Press over a free node grabs and selects it; press elsewhere starts
	/// a pan. Returns the grabbed node.
	pub fn pointer_down(&mut self, graph: &mut Graph, screen: Vec2) -> Option<NodeId> {
		// A press without a matching release must not leave a node pinned.
		self.release_drag(graph);
		let world = self.screen_to_world(screen);
		let hit = hit_test(graph, world).filter(|&id| {
			graph
				.node(id)
				.is_some_and(|n| !n.interaction.is_dragging())
		});

		let Some(id) = hit else {
			self.pan = Some(PanGesture {
				pointer_start: screen,
				offset_start: self.view_offset,
			});
			return None;
		};

		for node in graph.nodes_mut() {
			node.interaction.selected = node.id == id;
			if node.id == id {
				node.interaction.phase = DragPhase::Dragging {
					grab_offset: world - node.position,
				};
				debug!("drag start on {:?}", node.label);
			}
		}
		self.dragged = Some(id);
		self.pan = None;
		Some(id)
	}

	/// Route a pointer move to the active gesture, or update hover.
	pub fn pointer_move(&mut self, graph: &mut Graph, screen: Vec2) {
		let world = self.screen_to_world(screen);
		if let Some(id) = self.dragged {
			if let Some(node) = graph.node_mut(id) {
				if let DragPhase::Dragging { grab_offset } = node.interaction.phase {
					node.position = world - grab_offset;
				}
			}
		} else if let Some(pan) = self.pan {
			self.view_offset = pan.offset_start + (screen - pan.pointer_start);
		} else {
			self.hovered = hit_test(graph, world);
		}
	}

	/// Release the dragged node back to the layout, velocity untouched.
	pub fn pointer_up(&mut self, graph: &mut Graph) {
		self.release_drag(graph);
		self.pan = None;
	}

	fn release_drag(&mut self, graph: &mut Graph) {
		if let Some(id) = self.dragged.take() {
			if let Some(node) = graph.node_mut(id) {
				node.interaction.phase = DragPhase::Free;
				debug!("drag end on {:?}", node.label);
			}
		}
	}

	/// Pointer left the surface: end every gesture and drop hover.
	pub fn pointer_leave(&mut self, graph: &mut Graph) {
		self.pointer_up(graph);
		self.hovered = None;
	}

	/// Scroll the view.
	pub fn wheel(&mut self, dx: f32, dy: f32) {
		self.view_offset += Vec2::new(dx, dy) * WHEEL_PAN_STEP;
	}

	/// Unselect every node.
	pub fn clear_selection(&mut self, graph: &mut Graph) {
		for node in graph.nodes_mut() {
			node.interaction.selected = false;
		}
	}

	/// Scatter all nodes, zero velocities, clear selection and re-centre the
	/// view. The graph itself is kept.
	pub fn reset<R: Rng>(&mut self, graph: &mut Graph, spawn: &SpawnArea, rng: &mut R) {
		layout::scatter(graph, spawn, rng);
		self.clear_selection(graph);
		self.view_offset = Vec2::ZERO;
		self.pan = None;
		debug!("layout reset for {} nodes", graph.node_count());
	}

	/// Forget all gesture state, used when a new graph is loaded.
	pub(crate) fn forget(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::graph::types::Triple;

	fn graph() -> (Graph, NodeId, NodeId) {
		let mut g = Graph::build(&[Triple::new("A", "r", "B", "high")]);
		let (a, b) = (g.find("A").unwrap(), g.find("B").unwrap());
		g.node_mut(a).unwrap().position = Vec2::new(100.0, 100.0);
		g.node_mut(b).unwrap().position = Vec2::new(300.0, 100.0);
		(g, a, b)
	}

	#[test]
	fn press_on_node_drags_and_selects_it() {
		let (mut g, a, b) = graph();
		g.node_mut(b).unwrap().interaction.selected = true;

		let mut state = InteractionState::default();
		assert_eq!(state.pointer_down(&mut g, Vec2::new(105.0, 98.0)), Some(a));
		assert_eq!(state.dragged(), Some(a));
		assert_eq!(state.selected(&g), Some(a));
		assert!(!g.node(b).unwrap().interaction.selected);
		assert!(g.node(a).unwrap().is_pinned());
	}

	#[test]
	fn drag_keeps_grab_offset() {
		let (mut g, a, _) = graph();
		let mut state = InteractionState::default();
		state.pointer_down(&mut g, Vec2::new(105.0, 98.0));
		state.pointer_move(&mut g, Vec2::new(205.0, 148.0));
		assert_eq!(g.node(a).unwrap().position, Vec2::new(200.0, 150.0));
	}

	#[test]
	fn release_frees_node_and_keeps_velocity() {
		let (mut g, a, _) = graph();
		g.node_mut(a).unwrap().velocity = Vec2::new(3.0, -1.0);
		let mut state = InteractionState::default();
		state.pointer_down(&mut g, Vec2::new(100.0, 100.0));
		state.pointer_up(&mut g);

		let node = g.node(a).unwrap();
		assert_eq!(node.interaction.phase, DragPhase::Free);
		assert_eq!(node.velocity, Vec2::new(3.0, -1.0));
		assert!(node.interaction.selected);
		assert_eq!(state.dragged(), None);
	}

	#[test]
	fn second_press_releases_first_node() {
		let (mut g, a, b) = graph();
		let mut state = InteractionState::default();
		assert_eq!(state.pointer_down(&mut g, Vec2::new(100.0, 100.0)), Some(a));
		assert_eq!(state.pointer_down(&mut g, Vec2::new(300.0, 100.0)), Some(b));
		assert_eq!(g.node(a).unwrap().interaction.phase, DragPhase::Free);
		assert_eq!(state.dragged(), Some(b));

		state.pointer_up(&mut g);
		assert_eq!(g.node(a).unwrap().interaction.phase, DragPhase::Free);
		assert_eq!(g.node(b).unwrap().interaction.phase, DragPhase::Free);
		assert_eq!(state.selected(&g), Some(b));
	}

	#[test]
	fn background_press_pans_view() {
		let (mut g, a, _) = graph();
		let mut state = InteractionState::default();
		assert_eq!(state.pointer_down(&mut g, Vec2::new(600.0, 600.0)), None);
		assert!(state.is_panning());
		state.pointer_move(&mut g, Vec2::new(650.0, 580.0));
		assert_eq!(state.view_offset(), Vec2::new(50.0, -20.0));
		state.pointer_up(&mut g);
		assert!(!state.is_panning());

		// Hit testing now happens in panned world space.
		assert_eq!(state.pointer_down(&mut g, Vec2::new(150.0, 80.0)), Some(a));
	}

	#[test]
	fn wheel_scrolls_view() {
		let mut state = InteractionState::default();
		state.wheel(0.0, -2.0);
		assert_eq!(state.view_offset(), Vec2::new(0.0, -60.0));
	}

	#[test]
	fn hover_tracks_pointer_when_idle() {
		let (mut g, _, b) = graph();
		let mut state = InteractionState::default();
		state.pointer_move(&mut g, Vec2::new(301.0, 101.0));
		assert_eq!(state.hovered(), Some(b));
		state.pointer_leave(&mut g);
		assert_eq!(state.hovered(), None);
	}

	#[test]
	fn reset_scatters_and_clears() {
		let (mut g, a, _) = graph();
		let mut state = InteractionState::default();
		state.wheel(1.0, 1.0);
		state.pointer_down(&mut g, Vec2::new(130.0, 130.0));
		state.pointer_up(&mut g);
		g.node_mut(a).unwrap().velocity = Vec2::new(9.0, 9.0);

		let spawn = SpawnArea::default();
		let mut rng = StdRng::seed_from_u64(7);
		state.reset(&mut g, &spawn, &mut rng);

		assert_eq!(state.view_offset(), Vec2::ZERO);
		assert_eq!(state.selected(&g), None);
		for node in g.nodes() {
			assert_eq!(node.velocity, Vec2::ZERO);
			assert!(spawn.contains(node.position));
		}
		assert_eq!(g.node_count(), 2);
	}
}
