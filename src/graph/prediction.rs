//! Link prediction with the Adamic-Adar index over two-hop neighbourhoods.

use std::collections::HashMap;
use std::fmt;

use super::model::Graph;
use super::types::NodeId;

/// Qualitative strength of a predicted link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkStrength {
	/// Normalised score of at least 0.8.
	Strong,
	/// Normalised score of at least 0.5.
	Moderate,
	/// Anything lower.
	Weak,
}

impl LinkStrength {
	/// Label a normalised score.
	pub fn from_score(score: f64) -> Self {
		if score >= 0.8 {
			LinkStrength::Strong
		} else if score >= 0.5 {
			LinkStrength::Moderate
		} else {
			LinkStrength::Weak
		}
	}
}

impl fmt::Display for LinkStrength {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			LinkStrength::Strong => "Strong",
			LinkStrength::Moderate => "Moderate",
			LinkStrength::Weak => "Weak",
		})
	}
}

/// A candidate node the queried node may plausibly link to.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
	/// Two-hop candidate.
	pub candidate: NodeId,
	/// Score divided by the best score, so the top candidate is 1.0.
	pub score: f64,
	/// Label for `score`.
	pub strength: LinkStrength,
}

/// Rank the two-hop neighbours of `node` that it is not yet linked to.
///
/// Each shared neighbour adds `1 / ln(degree)` to a candidate, or a flat 1
/// when the candidate has degree 1. Results are sorted by score, highest
/// first; equal scores keep the order candidates were first reached in.
/// Unknown nodes and nodes without candidates yield an empty list.
pub fn predict_links(graph: &Graph, node: NodeId) -> Vec<Prediction> {
	let Some(direct) = graph.neighbors(node) else {
		return Vec::new();
	};

	let mut order: HashMap<NodeId, usize> = HashMap::new();
	let mut accumulated: Vec<(NodeId, f64)> = Vec::new();
	for &via in direct {
		for &candidate in graph.neighbor_ids(via) {
			if candidate == node || direct.contains(&candidate) {
				continue;
			}
			let degree = graph.degree(candidate);
			let contribution = if degree > 1 {
				1.0 / (degree as f64).ln()
			} else {
				1.0
			};
			let slot = *order.entry(candidate).or_insert_with(|| {
				accumulated.push((candidate, 0.0));
				accumulated.len() - 1
			});
			accumulated[slot].1 += contribution;
		}
	}

	let max = accumulated.iter().map(|&(_, s)| s).fold(0.0, f64::max);
	if max <= 0.0 {
		return Vec::new();
	}

	let mut predictions: Vec<Prediction> = accumulated
		.into_iter()
		.map(|(candidate, raw)| {
			let score = raw / max;
			Prediction {
				candidate,
				score,
				strength: LinkStrength::from_score(score),
			}
		})
		.collect();
	predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
	predictions
}
