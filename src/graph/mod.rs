//! Headless graph analytics engine.
//!
//! Triples become a [`Graph`]; a [`GraphEngine`] owns that graph and steps
//! its force layout, answers centrality and link-prediction queries, and
//! applies pointer interaction. Nothing here touches the browser.

pub mod centrality;
mod engine;
pub mod interaction;
pub mod layout;
mod model;
pub mod prediction;
mod types;

pub use centrality::{
	CentralityScore, CentralityTable, DegreeCentrality, NodeScore, RiskEntry, RiskTier,
};
pub use engine::{EngineConfig, GraphEngine, GraphSummary};
pub use interaction::{DragPhase, InteractionState, NodeInteraction};
pub use layout::{LayoutParams, SpawnArea};
pub use model::{Edge, Graph, Node, RadiusRange};
pub use prediction::{LinkStrength, Prediction};
pub use types::{NodeId, Severity, Triple, Vec2};
