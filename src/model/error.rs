//! Error types shared by the model, the controller and the strategy registry.

use thiserror::Error;

use super::NodeId;

/// Result alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Everything that can go wrong while loading the chain or driving the controller.
///
/// All variants are programming or data errors rather than runtime conditions:
/// none of them is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
	/// `select_layout` was called with an id no registered strategy carries.
	#[error("unknown layout `{0}`")]
	UnknownLayout(String),

	/// A click referenced a node that is not part of the causal model.
	#[error("unknown node `{0}`")]
	UnknownNode(NodeId),

	/// A category has no entry in the type taxonomy.
	#[error("no style registered for category `{0}`")]
	Lookup(String),

	/// Two nodes share the same id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(NodeId),

	/// A link points at a node that does not exist.
	// `source` is reserved by thiserror for the error chain.
	#[error("link `{from}` -> `{to}` references a missing node")]
	DanglingLink {
		/// Effect side of the link.
		from: NodeId,
		/// Cause side of the link.
		to: NodeId,
	},

	/// The links do not form a DAG.
	#[error("causal links form a cycle through `{0}`")]
	CyclicModel(NodeId),

	/// A strategy registry was built with no entries.
	#[error("strategy registry is empty")]
	EmptyRegistry,

	/// Two strategies were registered under the same id.
	#[error("layout `{0}` registered twice")]
	DuplicateLayout(String),
}
