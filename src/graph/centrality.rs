//! Graph analytics: PageRank with statistical risk tiers, degree,
//! betweenness and closeness centrality, and severity-first risk ranking.
//!
//! Every function takes a [`Graph`] snapshot and recomputes from scratch.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use super::model::Graph;
use super::types::{NodeId, Severity};

/// PageRank damping factor.
pub const PAGERANK_DAMPING: f64 = 0.85;
/// Fixed PageRank sweep count. There is no convergence early-exit.
pub const PAGERANK_ITERATIONS: usize = 20;

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// Qualitative bucket for a PageRank score relative to the whole graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskTier {
	/// More than one standard deviation above the mean.
	High,
	/// Within one standard deviation of the mean.
	Medium,
	/// More than one standard deviation below the mean.
	Low,
}

impl fmt::Display for RiskTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			RiskTier::High => "High",
			RiskTier::Medium => "Medium",
			RiskTier::Low => "Low",
		})
	}
}

/// Bucket `score` against the population statistics.
pub fn classify(score: f64, mean: f64, std_dev: f64) -> RiskTier {
	if std_dev == 0.0 {
		RiskTier::Medium
	} else if score > mean + std_dev {
		RiskTier::High
	} else if score < mean - std_dev {
		RiskTier::Low
	} else {
		RiskTier::Medium
	}
}

/// PageRank result for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct CentralityScore {
	/// The node scored.
	pub node: NodeId,
	/// Final rank after all sweeps.
	pub score: f64,
	/// Tier relative to the whole score set.
	pub tier: RiskTier,
}

/// Full PageRank table with the statistics its tiers were derived from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CentralityTable {
	scores: Vec<CentralityScore>,
	mean: f64,
	std_dev: f64,
}

impl CentralityTable {
	/// Scores in node order.
	pub fn scores(&self) -> &[CentralityScore] {
		&self.scores
	}

	/// Score of one node.
	pub fn get(&self, node: NodeId) -> Option<&CentralityScore> {
		self.scores.iter().find(|s| s.node == node)
	}

	/// Population mean of all scores.
	pub fn mean(&self) -> f64 {
		self.mean
	}

	/// Population standard deviation of all scores.
	pub fn std_dev(&self) -> f64 {
		self.std_dev
	}

	/// Number of scored nodes.
	pub fn len(&self) -> usize {
		self.scores.len()
	}

	/// Whether the graph had no nodes.
	pub fn is_empty(&self) -> bool {
		self.scores.is_empty()
	}

	/// Scores sorted by rank, highest first. Ties keep node order.
	pub fn ranked(&self) -> Vec<&CentralityScore> {
		let mut ranked: Vec<_> = self.scores.iter().collect();
		ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
		ranked
	}
}

/// Power-iteration PageRank over the unweighted neighbour sets.
///
/// Each sweep starts every node at `1 - d` and pushes `d * rank / degree`
/// from every node into each of its neighbours. Isolated nodes push nothing.
pub fn page_rank(graph: &Graph) -> CentralityTable {
	let n = graph.node_count();
	if n == 0 {
		return CentralityTable::default();
	}

	let adjacency = adjacency(graph);

	let mut ranks = vec![1.0 / n as f64; n];
	for _ in 0..PAGERANK_ITERATIONS {
		let mut next = vec![1.0 - PAGERANK_DAMPING; n];
		for (i, neighbors) in adjacency.iter().enumerate() {
			if neighbors.is_empty() {
				continue;
			}
			let share = PAGERANK_DAMPING * (ranks[i] / neighbors.len() as f64);
			for &j in neighbors {
				next[j] += share;
			}
		}
		ranks = next;
	}

	let mean = ranks.iter().sum::<f64>() / n as f64;
	let variance = ranks.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n as f64;
	let std_dev = variance.sqrt();
	debug!("pagerank over {n} nodes: mean={mean:.5} std_dev={std_dev:.5}");

	let scores = graph
		.nodes()
		.iter()
		.zip(ranks)
		.map(|(node, score)| CentralityScore {
			node: node.id,
			score,
			tier: classify(score, mean, std_dev),
		})
		.collect();

	CentralityTable {
		scores,
		mean,
		std_dev,
	}
}

// ---------------------------------------------------------------------------
// Degree centrality
// ---------------------------------------------------------------------------

/// Degree centrality for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeCentrality {
	/// The node measured.
	pub node: NodeId,
	/// Number of distinct neighbours.
	pub degree: usize,
	/// `degree / (n - 1)`; 0 when the graph has fewer than two nodes.
	pub score: f64,
}

/// Degree centrality for all nodes, sorted by degree desc.
pub fn degree_centrality(graph: &Graph) -> Vec<DegreeCentrality> {
	let n = graph.node_count();
	let mut results: Vec<DegreeCentrality> = graph
		.nodes()
		.iter()
		.map(|node| {
			let degree = graph.degree(node.id);
			let score = if n > 1 {
				degree as f64 / (n - 1) as f64
			} else {
				0.0
			};
			DegreeCentrality {
				node: node.id,
				degree,
				score,
			}
		})
		.collect();
	results.sort_by(|a, b| b.degree.cmp(&a.degree));
	results
}

// ---------------------------------------------------------------------------
// Betweenness and closeness
// ---------------------------------------------------------------------------

/// A single centrality value for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeScore {
	/// The node measured.
	pub node: NodeId,
	/// Centrality value.
	pub score: f64,
}

fn adjacency(graph: &Graph) -> Vec<Vec<usize>> {
	graph
		.nodes()
		.iter()
		.map(|node| graph.neighbor_ids(node.id).map(|id| id.index()).collect())
		.collect()
}

/// Hop distances from `source`; `None` for unreachable nodes.
fn bfs_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
	let mut dist = vec![None; adjacency.len()];
	dist[source] = Some(0);
	let mut queue = VecDeque::from([source]);
	while let Some(v) = queue.pop_front() {
		let next = dist[v].map_or(0, |d| d + 1);
		for &w in &adjacency[v] {
			if dist[w].is_none() {
				dist[w] = Some(next);
				queue.push_back(w);
			}
		}
	}
	dist
}

fn betweenness_scores(adjacency: &[Vec<usize>]) -> Vec<f64> {
	let n = adjacency.len();
	let mut centrality = vec![0.0; n];

	// Brandes: one BFS per source, then back-propagate pair dependencies.
	for source in 0..n {
		let mut order = Vec::with_capacity(n);
		let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
		let mut paths = vec![0.0f64; n];
		let mut dist: Vec<Option<usize>> = vec![None; n];
		paths[source] = 1.0;
		dist[source] = Some(0);

		let mut queue = VecDeque::from([source]);
		while let Some(v) = queue.pop_front() {
			order.push(v);
			let dv = dist[v].unwrap_or(0);
			for &w in &adjacency[v] {
				if dist[w].is_none() {
					dist[w] = Some(dv + 1);
					queue.push_back(w);
				}
				if dist[w] == Some(dv + 1) {
					paths[w] += paths[v];
					preds[w].push(v);
				}
			}
		}

		let mut dependency = vec![0.0f64; n];
		while let Some(w) = order.pop() {
			for &v in &preds[w] {
				dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
			}
			if w != source {
				centrality[w] += dependency[w];
			}
		}
	}

	// Every unordered pair was counted from both ends.
	if n > 2 {
		let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
		for c in &mut centrality {
			*c *= scale;
		}
	}
	centrality
}

fn closeness_scores(adjacency: &[Vec<usize>]) -> Vec<f64> {
	let n = adjacency.len();
	(0..n)
		.map(|source| {
			let reached: Vec<usize> = bfs_distances(adjacency, source)
				.into_iter()
				.flatten()
				.collect();
			let total: usize = reached.iter().sum();
			if total == 0 || n <= 1 {
				return 0.0;
			}
			// Wasserman-Faust: scaled by the reachable share of the graph.
			let others = (reached.len() - 1) as f64;
			(others / total as f64) * (others / (n - 1) as f64)
		})
		.collect()
}

fn sorted_scores(graph: &Graph, scores: Vec<f64>) -> Vec<NodeScore> {
	let mut results: Vec<NodeScore> = graph
		.nodes()
		.iter()
		.zip(scores)
		.map(|(node, score)| NodeScore {
			node: node.id,
			score,
		})
		.collect();
	results.sort_by(|a, b| b.score.total_cmp(&a.score));
	results
}

/// Normalised shortest-path betweenness for all nodes, sorted by score desc.
///
/// Counts the share of shortest paths between other node pairs that pass
/// through each node, over the unweighted neighbour sets.
pub fn betweenness_centrality(graph: &Graph) -> Vec<NodeScore> {
	sorted_scores(graph, betweenness_scores(&adjacency(graph)))
}

/// Closeness for all nodes, sorted by score desc.
///
/// `(r - 1) / Σ dist` scaled by `(r - 1) / (n - 1)`, where `r` counts the
/// nodes reachable from the measured one (itself included). Isolated nodes
/// score 0.
pub fn closeness_centrality(graph: &Graph) -> Vec<NodeScore> {
	sorted_scores(graph, closeness_scores(&adjacency(graph)))
}

// ---------------------------------------------------------------------------
// Risk ranking
// ---------------------------------------------------------------------------

/// A node ranked by how urgently it needs attention.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskEntry {
	/// The node ranked.
	pub node: NodeId,
	/// Worst severity attached to the node.
	pub severity: Severity,
	/// Number of distinct neighbours.
	pub degree: usize,
	/// Normalised betweenness.
	pub betweenness: f64,
	/// Closeness.
	pub closeness: f64,
}

/// Nodes ordered by severity then degree, both descending, truncated to
/// `limit`.
pub fn top_risks(graph: &Graph, limit: usize) -> Vec<RiskEntry> {
	let adjacency = adjacency(graph);
	let betweenness = betweenness_scores(&adjacency);
	let closeness = closeness_scores(&adjacency);
	let mut entries: Vec<RiskEntry> = graph
		.nodes()
		.iter()
		.map(|node| RiskEntry {
			node: node.id,
			severity: node.severity,
			degree: graph.degree(node.id),
			betweenness: betweenness[node.id.index()],
			closeness: closeness[node.id.index()],
		})
		.collect();
	entries.sort_by(|a, b| {
		b.severity
			.cmp(&a.severity)
			.then_with(|| b.degree.cmp(&a.degree))
	});
	entries.truncate(limit);
	entries
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Triple;

	fn star() -> Graph {
		Graph::build(&[
			Triple::new("hub", "r", "a", ""),
			Triple::new("hub", "r", "b", ""),
			Triple::new("hub", "r", "c", ""),
			Triple::new("hub", "r", "d", ""),
		])
	}

	#[test]
	fn empty_graph_has_empty_table() {
		let table = page_rank(&Graph::default());
		assert!(table.is_empty());
	}

	#[test]
	fn isolated_node_is_medium() {
		let g = Graph::build(&[Triple::new("solo", "r", "solo", "")]);
		let table = page_rank(&g);
		assert_eq!(table.len(), 1);
		let score = &table.scores()[0];
		assert!((score.score - 0.15).abs() < 1e-12);
		assert_eq!(score.tier, RiskTier::Medium);
		assert_eq!(table.std_dev(), 0.0);
	}

	#[test]
	fn hub_ranks_high() {
		let g = star();
		let table = page_rank(&g);
		let hub = g.find("hub").unwrap();
		assert_eq!(table.get(hub).unwrap().tier, RiskTier::High);
		assert_eq!(table.ranked()[0].node, hub);
		for leaf in ["a", "b", "c", "d"] {
			let id = g.find(leaf).unwrap();
			assert_eq!(table.get(id).unwrap().tier, RiskTier::Medium);
		}
	}

	#[test]
	fn symmetric_graph_is_all_medium() {
		let g = Graph::build(&[
			Triple::new("A", "r", "B", "high"),
			Triple::new("B", "r", "C", "low"),
			Triple::new("C", "r", "A", ""),
		]);
		let table = page_rank(&g);
		assert!(table.scores().iter().all(|s| s.tier == RiskTier::Medium));
	}

	#[test]
	fn recompute_is_bit_identical() {
		let g = star();
		assert_eq!(page_rank(&g), page_rank(&g));
	}

	#[test]
	fn edge_weights_do_not_affect_rank() {
		let heavy = Graph::build(&[Triple::new("A", "r", "B", "high"), Triple::new("B", "r", "C", "high")]);
		let light = Graph::build(&[Triple::new("A", "r", "B", ""), Triple::new("B", "r", "C", "low")]);
		assert_eq!(page_rank(&heavy), page_rank(&light));
	}

	#[test]
	fn classify_thresholds() {
		assert_eq!(classify(2.1, 1.0, 1.0), RiskTier::High);
		assert_eq!(classify(2.0, 1.0, 1.0), RiskTier::Medium);
		assert_eq!(classify(0.0, 1.0, 1.0), RiskTier::Medium);
		assert_eq!(classify(-0.1, 1.0, 1.0), RiskTier::Low);
		assert_eq!(classify(99.0, 1.0, 0.0), RiskTier::Medium);
	}

	#[test]
	fn degree_centrality_hub_first() {
		let g = star();
		let results = degree_centrality(&g);
		assert_eq!(results[0].node, g.find("hub").unwrap());
		assert_eq!(results[0].degree, 4);
		assert_eq!(results[0].score, 1.0);
		assert_eq!(results[1].score, 0.25);
	}

	#[test]
	fn top_risks_orders_by_severity_then_degree() {
		let g = Graph::build(&[
			Triple::new("ENG-12", "shows", "low oil pressure", "medium"),
			Triple::new("TRANS-12", "shows", "overheat", "high"),
			Triple::new("ENG-27", "shows", "overheat", "low"),
			Triple::new("ENG-34", "reports", "normal", ""),
		]);
		let risks = top_risks(&g, 3);
		assert_eq!(risks.len(), 3);
		// "overheat" is high with two neighbours, "TRANS-12" is high with one.
		assert_eq!(risks[0].node, g.find("overheat").unwrap());
		assert_eq!(risks[1].node, g.find("TRANS-12").unwrap());
		assert_eq!(risks[2].severity, Severity::Medium);
	}

	#[test]
	fn path_middle_has_highest_betweenness() {
		let g = Graph::build(&[
			Triple::new("A", "r", "B", ""),
			Triple::new("B", "r", "C", ""),
			Triple::new("C", "r", "D", ""),
			Triple::new("D", "r", "E", ""),
		]);
		let results = betweenness_centrality(&g);
		assert_eq!(results[0].node, g.find("C").unwrap());
		// C sits on A-D, A-E, B-D, B-E: 4 of the 6 pairs not involving it.
		assert!((results[0].score - 4.0 / 6.0).abs() < 1e-12);
		let end = results.iter().find(|r| r.node == g.find("A").unwrap()).unwrap();
		assert_eq!(end.score, 0.0);
	}

	#[test]
	fn star_hub_betweenness_is_one() {
		let g = star();
		let results = betweenness_centrality(&g);
		assert_eq!(results[0].node, g.find("hub").unwrap());
		assert!((results[0].score - 1.0).abs() < 1e-12);
	}

	#[test]
	fn closeness_scales_by_reachable_share() {
		let g = Graph::build(&[
			Triple::new("A", "r", "B", ""),
			Triple::new("B", "r", "C", ""),
			Triple::new("solo", "r", "solo", ""),
		]);
		let results = closeness_centrality(&g);
		let score = |label: &str| {
			let id = g.find(label).unwrap();
			results.iter().find(|r| r.node == id).unwrap().score
		};
		// B reaches 2 others at total distance 2, out of 3 possible others.
		assert!((score("B") - 2.0 / 3.0).abs() < 1e-12);
		assert!((score("A") - (2.0 / 3.0) * (2.0 / 3.0)).abs() < 1e-12);
		assert_eq!(score("solo"), 0.0);
		assert_eq!(results[0].node, g.find("B").unwrap());
	}

	#[test]
	fn isolated_node_has_zero_closeness() {
		let g = Graph::build(&[Triple::new("solo", "r", "solo", "")]);
		assert_eq!(closeness_centrality(&g)[0].score, 0.0);
		assert_eq!(betweenness_centrality(&g)[0].score, 0.0);
	}

	#[test]
	fn top_risks_carry_path_centrality() {
		let g = star();
		let risks = top_risks(&g, 1);
		assert_eq!(risks[0].node, g.find("hub").unwrap());
		assert!((risks[0].betweenness - 1.0).abs() < 1e-12);
		assert!((risks[0].closeness - 1.0).abs() < 1e-12);
	}
}
