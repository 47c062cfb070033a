//! Graph model: entity dedup, severity-weighted edges and adjacency.
//!
//! A [`Graph`] is built once from a batch of triples and never edited in
//! place afterwards. Reloading means building a fresh graph.

use std::collections::btree_set;
use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};

use super::interaction::NodeInteraction;
use super::types::{NodeId, Severity, Triple, Vec2};

/// Radius bounds for node sizing. Radius grows linearly with degree.
#[derive(Clone, Copy, Debug)]
pub struct RadiusRange {
	/// Radius of a node with no connections.
	pub min: f32,
	/// Radius of the best-connected node.
	pub max: f32,
}

impl Default for RadiusRange {
	fn default() -> Self {
		Self {
			min: 15.0,
			max: 40.0,
		}
	}
}

/// A deduplicated entity.
#[derive(Clone, Debug)]
pub struct Node {
	/// Handle of this node.
	pub id: NodeId,
	/// Entity text, exactly as it appeared in the triples.
	pub label: String,
	/// World-space position.
	pub position: Vec2,
	/// Current velocity.
	pub velocity: Vec2,
	/// Display radius, derived from degree.
	pub radius: f32,
	/// Number of distinct neighbours.
	pub connection_count: usize,
	/// Worst severity among the triples mentioning this entity.
	pub severity: Severity,
	/// Selection and drag state.
	pub interaction: NodeInteraction,
}

impl Node {
	fn new(id: NodeId, label: &str) -> Self {
		Self {
			id,
			label: label.to_owned(),
			position: Vec2::ZERO,
			velocity: Vec2::ZERO,
			radius: 0.0,
			connection_count: 0,
			severity: Severity::Unrated,
			interaction: NodeInteraction::default(),
		}
	}

	/// Whether the physics must leave this node alone.
	pub fn is_pinned(&self) -> bool {
		self.interaction.is_dragging()
	}
}

/// A relation between two distinct nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Subject end, kept for display.
	pub from: NodeId,
	/// Object end, kept for display.
	pub to: NodeId,
	/// Predicate text; may be empty.
	pub label: String,
	/// Weight derived from severity.
	pub weight: f32,
}

/// Undirected, severity-weighted entity graph.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	generation: u32,
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	neighbors: Vec<BTreeSet<NodeId>>,
	weights: HashMap<(u32, u32), f32>,
	skipped: usize,
}

fn pair_key(a: NodeId, b: NodeId) -> (u32, u32) {
	let (a, b) = (a.index() as u32, b.index() as u32);
	if a <= b { (a, b) } else { (b, a) }
}

impl Graph {
	/// Build a graph with default radius bounds.
	pub fn build(triples: &[Triple]) -> Self {
		Self::build_with(triples, RadiusRange::default(), 0)
	}

	/// Build a graph, tagging every [`NodeId`] with `generation`.
	///
	/// Triples with an empty subject or object are skipped. Self-references
	/// create the node but no edge. Repeated pairs collapse onto the first
	/// edge seen for that pair, in either orientation.
	pub fn build_with(triples: &[Triple], radius: RadiusRange, generation: u32) -> Self {
		let mut graph = Graph {
			generation,
			..Default::default()
		};
		let mut by_label: HashMap<&str, NodeId> = HashMap::new();

		for triple in triples {
			if triple.subject.is_empty() || triple.object.is_empty() {
				debug!(
					"skipping triple with missing endpoint: {:?} -[{}]-> {:?}",
					triple.subject, triple.predicate, triple.object
				);
				graph.skipped += 1;
				continue;
			}

			let from = graph.intern(&mut by_label, &triple.subject, triple.severity);
			let to = graph.intern(&mut by_label, &triple.object, triple.severity);
			if from == to {
				debug!("ignoring self-reference on {:?}", triple.subject);
				continue;
			}

			let key = pair_key(from, to);
			if graph.weights.contains_key(&key) {
				debug!(
					"collapsing duplicate edge {:?} -[{}]-> {:?}",
					triple.subject, triple.predicate, triple.object
				);
				continue;
			}

			let weight = triple.severity.weight();
			graph.weights.insert(key, weight);
			graph.neighbors[from.index()].insert(to);
			graph.neighbors[to.index()].insert(from);
			graph.edges.push(Edge {
				from,
				to,
				label: triple.predicate.clone(),
				weight,
			});
		}

		graph.size_nodes(radius);

		if graph.nodes.is_empty() {
			warn!("graph load produced no nodes ({} triples given)", triples.len());
		} else {
			info!(
				"graph loaded: {} nodes, {} edges, {} triples skipped",
				graph.nodes.len(),
				graph.edges.len(),
				graph.skipped
			);
		}
		graph
	}

	fn intern<'a>(
		&mut self,
		by_label: &mut HashMap<&'a str, NodeId>,
		label: &'a str,
		severity: Severity,
	) -> NodeId {
		let id = *by_label.entry(label).or_insert_with(|| {
			let id = NodeId::new(self.nodes.len(), self.generation);
			self.nodes.push(Node::new(id, label));
			self.neighbors.push(BTreeSet::new());
			id
		});
		let node = &mut self.nodes[id.index()];
		node.severity = node.severity.max(severity);
		id
	}

	fn size_nodes(&mut self, radius: RadiusRange) {
		for (node, neighbors) in self.nodes.iter_mut().zip(&self.neighbors) {
			node.connection_count = neighbors.len();
		}
		let max_degree = self.max_degree();
		for node in &mut self.nodes {
			let t = if max_degree > 0 {
				node.connection_count as f32 / max_degree as f32
			} else {
				0.0
			};
			node.radius = radius.min + (radius.max - radius.min) * t;
		}
	}

	fn slot(&self, id: NodeId) -> Option<usize> {
		(id.generation() == self.generation && id.index() < self.nodes.len()).then(|| id.index())
	}

	/// Whether `id` refers to a node of this graph.
	pub fn contains(&self, id: NodeId) -> bool {
		self.slot(id).is_some()
	}

	/// Load generation stamped on this graph's handles.
	pub fn generation(&self) -> u32 {
		self.generation
	}

	/// All nodes, in first-seen order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// All edges, in input order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Look up a node.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.slot(id).map(|i| &self.nodes[i])
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.slot(id).map(move |i| &mut self.nodes[i])
	}

	/// Find a node by its exact entity text.
	pub fn find(&self, label: &str) -> Option<NodeId> {
		self.nodes.iter().find(|n| n.label == label).map(|n| n.id)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Number of triples dropped for a missing endpoint during the build.
	pub fn skipped_triples(&self) -> usize {
		self.skipped
	}

	/// Neighbour set of a node.
	pub fn neighbors(&self, id: NodeId) -> Option<&BTreeSet<NodeId>> {
		self.slot(id).map(|i| &self.neighbors[i])
	}

	/// Iterate the neighbours of a node; empty for unknown handles.
	pub fn neighbor_ids(&self, id: NodeId) -> btree_set::Iter<'_, NodeId> {
		static EMPTY: BTreeSet<NodeId> = BTreeSet::new();
		self.neighbors(id).unwrap_or(&EMPTY).iter()
	}

	/// Number of distinct neighbours; 0 for unknown handles.
	pub fn degree(&self, id: NodeId) -> usize {
		self.neighbors(id).map_or(0, BTreeSet::len)
	}

	/// Highest degree in the graph.
	pub fn max_degree(&self) -> usize {
		self.neighbors.iter().map(BTreeSet::len).max().unwrap_or(0)
	}

	/// `degree / max_degree`, or 0 when the graph has no edges.
	pub fn normalized_degree(&self, id: NodeId) -> f32 {
		match self.max_degree() {
			0 => 0.0,
			max => self.degree(id) as f32 / max as f32,
		}
	}

	/// Symmetric edge weight between two nodes, if they are adjacent.
	pub fn weight(&self, a: NodeId, b: NodeId) -> Option<f32> {
		if !self.contains(a) || !self.contains(b) {
			return None;
		}
		self.weights.get(&pair_key(a, b)).copied()
	}

	/// Edges touching a node, in either orientation.
	pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
		self.edges.iter().filter(move |e| e.from == id || e.to == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Graph {
		Graph::build(&[
			Triple::new("A", "knows", "B", "high"),
			Triple::new("B", "knows", "C", "low"),
			Triple::new("A", "knows", "C", ""),
		])
	}

	#[test]
	fn builds_triangle_with_severity_weights() {
		let g = sample();
		assert_eq!(g.node_count(), 3);
		assert_eq!(g.edge_count(), 3);

		let (a, b, c) = (g.find("A").unwrap(), g.find("B").unwrap(), g.find("C").unwrap());
		assert_eq!(g.weight(a, b), Some(0.8));
		assert_eq!(g.weight(b, c), Some(0.1));
		assert_eq!(g.weight(a, c), Some(0.0));
		for id in [a, b, c] {
			assert_eq!(g.degree(id), 2);
			assert_eq!(g.node(id).unwrap().connection_count, 2);
		}
	}

	#[test]
	fn adjacency_is_symmetric() {
		let g = Graph::build(&[
			Triple::new("pump", "feeds", "valve", "medium"),
			Triple::new("valve", "drains", "tank", "high"),
			Triple::new("tank", "vents", "pump", "bogus"),
			Triple::new("sensor", "watches", "pump", "low"),
		]);
		for a in g.nodes() {
			for b in g.nodes() {
				assert_eq!(g.weight(a.id, b.id), g.weight(b.id, a.id));
				let ab = g.neighbors(a.id).unwrap().contains(&b.id);
				let ba = g.neighbors(b.id).unwrap().contains(&a.id);
				assert_eq!(ab, ba);
				assert_eq!(ab, g.weight(a.id, b.id).is_some());
			}
		}
	}

	#[test]
	fn skips_missing_endpoints() {
		let g = Graph::build(&[
			Triple::new("", "knows", "B", "high"),
			Triple::new("A", "knows", "", "high"),
			Triple::new("A", "", "B", "low"),
		]);
		assert_eq!(g.node_count(), 2);
		assert_eq!(g.edge_count(), 1);
		assert_eq!(g.skipped_triples(), 2);
		assert_eq!(g.edges()[0].label, "");
	}

	#[test]
	fn self_reference_creates_node_only() {
		let g = Graph::build(&[Triple::new("A", "is", "A", "high")]);
		assert_eq!(g.node_count(), 1);
		assert_eq!(g.edge_count(), 0);
		assert_eq!(g.degree(g.find("A").unwrap()), 0);
	}

	#[test]
	fn labels_are_not_normalised() {
		let g = Graph::build(&[
			Triple::new("Pump", "x", "pump", ""),
			Triple::new("pump ", "x", "Pump", ""),
		]);
		assert_eq!(g.node_count(), 3);
	}

	#[test]
	fn duplicate_pairs_collapse_to_first_edge() {
		let g = Graph::build(&[
			Triple::new("A", "feeds", "B", "low"),
			Triple::new("B", "cools", "A", "high"),
			Triple::new("A", "feeds", "B", "high"),
		]);
		assert_eq!(g.edge_count(), 1);
		let edge = &g.edges()[0];
		assert_eq!(edge.label, "feeds");
		assert_eq!(edge.weight, 0.1);
		assert_eq!(g.weight(edge.from, edge.to), Some(0.1));
		assert_eq!(g.degree(edge.from), 1);
	}

	#[test]
	fn radius_scales_with_degree() {
		let g = Graph::build(&[
			Triple::new("hub", "r", "a", ""),
			Triple::new("hub", "r", "b", ""),
			Triple::new("lonely", "r", "lonely", ""),
		]);
		let range = RadiusRange::default();
		assert_eq!(g.node(g.find("hub").unwrap()).unwrap().radius, range.max);
		assert_eq!(g.node(g.find("a").unwrap()).unwrap().radius, (range.min + range.max) / 2.0);
		assert_eq!(g.node(g.find("lonely").unwrap()).unwrap().radius, range.min);
	}

	#[test]
	fn edgeless_graph_uses_min_radius() {
		let g = Graph::build(&[Triple::new("solo", "r", "solo", "")]);
		assert_eq!(g.max_degree(), 0);
		assert_eq!(g.nodes()[0].radius, RadiusRange::default().min);
		assert_eq!(g.normalized_degree(g.nodes()[0].id), 0.0);
	}

	#[test]
	fn node_severity_is_worst_seen() {
		let g = Graph::build(&[
			Triple::new("ENG-12", "shows", "oil pressure", "low"),
			Triple::new("ENG-12", "shows", "overheat", "high"),
		]);
		let eng = g.node(g.find("ENG-12").unwrap()).unwrap();
		assert_eq!(eng.severity, Severity::High);
		let oil = g.node(g.find("oil pressure").unwrap()).unwrap();
		assert_eq!(oil.severity, Severity::Low);
	}

	#[test]
	fn stale_handles_resolve_to_nothing() {
		let old = Graph::build_with(&[Triple::new("A", "r", "B", "")], RadiusRange::default(), 0);
		let new = Graph::build_with(&[Triple::new("A", "r", "B", "")], RadiusRange::default(), 1);
		let stale = old.find("A").unwrap();
		assert!(!new.contains(stale));
		assert!(new.node(stale).is_none());
		assert_eq!(new.degree(stale), 0);
		assert_eq!(new.neighbor_ids(stale).count(), 0);
	}
}
