//! The causal chain: nodes, links and the category taxonomy they are drawn with.
//!
//! Everything here is constant for the lifetime of the app. A [`CausalModel`] is
//! validated once when built; a [`StyledChain`] pairs it with a
//! [`TypeTaxonomy`] and resolves every node's style up front so a missing
//! category fails at load time rather than halfway through a render.

mod error;
mod reference;
mod taxonomy;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

pub use error::{DashboardError, DashboardResult};
pub use taxonomy::{CategoryStyle, TypeTaxonomy};

/// Canonical node identifier. Ids are strings everywhere.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
	/// Borrow the id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Closed set of node categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	/// A measured business indicator.
	Kpi,
	/// An operational metric.
	Operational,
	/// A non-numeric finding.
	Qualitative,
}

impl Category {
	/// Key used in data files and CSS.
	pub fn as_str(self) -> &'static str {
		match self {
			Category::Kpi => "kpi",
			Category::Operational => "operational",
			Category::Qualitative => "qualitative",
		}
	}
}

impl FromStr for Category {
	type Err = DashboardError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"kpi" => Ok(Category::Kpi),
			"operational" => Ok(Category::Operational),
			"qualitative" => Ok(Category::Qualitative),
			other => Err(DashboardError::Lookup(other.into())),
		}
	}
}

/// One finding of the root cause analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct CausalNode {
	pub id: NodeId,
	pub label: String,
	/// Pre-formatted metric, rendered verbatim.
	pub value: String,
	/// Signed magnitude, `None` for qualitative findings. Carried as metadata only.
	pub delta: Option<f64>,
	pub category: Category,
	/// Explanation shown while the node is active.
	pub detail: String,
}

impl CausalNode {
	/// Convenience constructor used by the reference data and tests.
	pub fn new(
		id: impl Into<NodeId>,
		label: impl Into<String>,
		value: impl Into<String>,
		delta: Option<f64>,
		category: Category,
		detail: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			value: value.into(),
			delta,
			category,
			detail: detail.into(),
		}
	}
}

/// Directed link: `target` is a cause of `source`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CausalLink {
	pub source: NodeId,
	pub target: NodeId,
}

impl CausalLink {
	/// Build a link from effect to cause.
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Validated, read-only causal graph.
#[derive(Clone, Debug, PartialEq)]
pub struct CausalModel {
	nodes: Vec<CausalNode>,
	links: Vec<CausalLink>,
	index: HashMap<NodeId, usize>,
}

impl CausalModel {
	/// Validate and build a model.
	///
	/// Fails on duplicate ids, categories missing from `taxonomy`, links to
	/// unknown nodes, and cycles.
	pub fn new(
		nodes: Vec<CausalNode>,
		links: Vec<CausalLink>,
		taxonomy: &TypeTaxonomy,
	) -> DashboardResult<Self> {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(DashboardError::DuplicateNode(node.id.clone()));
			}
			taxonomy.style(node.category)?;
		}

		let mut graph = DiGraph::<usize, ()>::with_capacity(nodes.len(), links.len());
		let handles: Vec<_> = (0..nodes.len()).map(|i| graph.add_node(i)).collect();
		for link in &links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&s), Some(&t)) => {
					graph.add_edge(handles[s], handles[t], ());
				}
				_ => {
					return Err(DashboardError::DanglingLink {
						from: link.source.clone(),
						to: link.target.clone(),
					});
				}
			}
		}
		if let Err(cycle) = toposort(&graph, None) {
			let at = graph[cycle.node_id()];
			return Err(DashboardError::CyclicModel(nodes[at].id.clone()));
		}

		Ok(Self {
			nodes,
			links,
			index,
		})
	}

	/// The six-node demo chain, from net margin down to the logistics shortage.
	pub fn reference() -> Self {
		reference::model()
	}

	/// Nodes in display order.
	pub fn list_nodes(&self) -> &[CausalNode] {
		&self.nodes
	}

	/// Links in declaration order.
	pub fn list_edges(&self) -> &[CausalLink] {
		&self.links
	}

	pub fn node(&self, id: &NodeId) -> Option<&CausalNode> {
		self.position(id).map(|i| &self.nodes[i])
	}

	/// Index of `id` in display order.
	pub fn position(&self, id: &NodeId) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn contains(&self, id: &NodeId) -> bool {
		self.index.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// One node with its resolved style and display position.
#[derive(Clone, Copy, Debug)]
pub struct ChainEntry<'a> {
	/// Zero-based position in display order.
	pub index: usize,
	pub node: &'a CausalNode,
	pub style: &'a CategoryStyle,
}

impl ChainEntry<'_> {
	/// One-based depth shown as "Niveau n".
	pub fn level(&self) -> usize {
		self.index + 1
	}
}

/// A model paired with its taxonomy, styles resolved once.
#[derive(Clone, Debug)]
pub struct StyledChain {
	model: Arc<CausalModel>,
	taxonomy: Arc<TypeTaxonomy>,
	styles: Vec<CategoryStyle>,
}

impl StyledChain {
	/// Resolve the style of every node; fails fast on a missing category.
	pub fn new(model: Arc<CausalModel>, taxonomy: Arc<TypeTaxonomy>) -> DashboardResult<Self> {
		let styles = model
			.list_nodes()
			.iter()
			.map(|n| taxonomy.style(n.category).cloned())
			.collect::<DashboardResult<Vec<_>>>()?;
		Ok(Self {
			model,
			taxonomy,
			styles,
		})
	}

	/// Validate `nodes` and `links` against the standard taxonomy.
	pub fn standard(nodes: Vec<CausalNode>, links: Vec<CausalLink>) -> DashboardResult<Self> {
		let taxonomy = TypeTaxonomy::standard();
		let model = CausalModel::new(nodes, links, &taxonomy)?;
		Self::new(Arc::new(model), Arc::new(taxonomy))
	}

	/// Reference model drawn with the standard taxonomy.
	pub fn reference() -> DashboardResult<Self> {
		Self::new(
			Arc::new(CausalModel::reference()),
			Arc::new(TypeTaxonomy::standard()),
		)
	}

	pub fn model(&self) -> &CausalModel {
		&self.model
	}

	pub fn taxonomy(&self) -> &TypeTaxonomy {
		&self.taxonomy
	}

	pub fn len(&self) -> usize {
		self.styles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.styles.is_empty()
	}

	/// Entries in display order.
	pub fn entries(&self) -> impl Iterator<Item = ChainEntry<'_>> {
		self.model
			.list_nodes()
			.iter()
			.zip(&self.styles)
			.enumerate()
			.map(|(index, (node, style))| ChainEntry { index, node, style })
	}

	pub fn entry(&self, index: usize) -> Option<ChainEntry<'_>> {
		let node = self.model.list_nodes().get(index)?;
		Some(ChainEntry {
			index,
			node,
			style: &self.styles[index],
		})
	}

	/// Entry for `id`, if present.
	pub fn resolve(&self, id: &NodeId) -> Option<ChainEntry<'_>> {
		self.entry(self.model.position(id)?)
	}

	/// Links as pairs of display indices, in declaration order.
	pub fn link_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.model.list_edges().iter().filter_map(|l| {
			Some((self.model.position(&l.source)?, self.model.position(&l.target)?))
		})
	}
}
