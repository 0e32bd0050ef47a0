//! Layered (Sugiyama-style) auto-layout for directed acyclic graphs.
//!
//! Phases:
//!   1. Topological ranking by longest path
//!   2. Crossing minimisation (barycenter sweeps)
//!   3. Coordinate assignment, each rank centred on the widest one
//!
//! Positions are the **top-left** corner of each node box.

use std::collections::HashMap;

use log::warn;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};
use thiserror::Error;

use super::{Point, Size};

const SWEEPS: usize = 4;

/// Why the solver could not produce a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
	#[error("nothing to lay out")]
	Empty,
	#[error("edge `{0}` -> `{1}` references an unknown node")]
	DanglingEdge(String, String),
	#[error("graph contains a cycle through `{0}`")]
	Cyclic(String),
}

/// Rank direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
	#[default]
	TopToBottom,
	LeftToRight,
}

/// Gaps between neighbours in a rank (`node`) and between ranks (`rank`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
	pub node: f64,
	pub rank: f64,
}

/// Solver parameters for one view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayeredConfig {
	pub direction: Direction,
	pub node_size: Size,
	pub spacing: Spacing,
	pub margin: f64,
}

impl Default for LayeredConfig {
	fn default() -> Self {
		Self {
			direction: Direction::TopToBottom,
			node_size: Size::new(240.0, 120.0),
			spacing: Spacing {
				node: 60.0,
				rank: 100.0,
			},
			margin: 40.0,
		}
	}
}

impl LayeredConfig {
	/// Wrap ids and edges into a request using these parameters.
	pub fn request(&self, node_ids: Vec<String>, edges: Vec<(String, String)>) -> LayoutRequest {
		LayoutRequest {
			node_ids,
			edges,
			direction: self.direction,
			node_size: self.node_size,
			spacing: self.spacing,
			margin: self.margin,
		}
	}
}

/// Abstract input of a graph layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRequest {
	pub node_ids: Vec<String>,
	pub edges: Vec<(String, String)>,
	pub direction: Direction,
	pub node_size: Size,
	pub spacing: Spacing,
	pub margin: f64,
}

/// Anything able to turn a [`LayoutRequest`] into top-left positions.
pub trait GraphLayout {
	fn layout(&self, request: &LayoutRequest) -> Result<HashMap<String, Point>, LayoutError>;
}

/// The built-in layered solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayeredLayout;

impl GraphLayout for LayeredLayout {
	fn layout(&self, request: &LayoutRequest) -> Result<HashMap<String, Point>, LayoutError> {
		if request.node_ids.is_empty() {
			return Err(LayoutError::Empty);
		}

		let mut graph = DiGraph::<usize, ()>::new();
		let mut id_to_idx = HashMap::new();
		for (i, id) in request.node_ids.iter().enumerate() {
			id_to_idx
				.entry(id.as_str())
				.or_insert_with(|| graph.add_node(i));
		}
		for (src, tgt) in &request.edges {
			match (id_to_idx.get(src.as_str()), id_to_idx.get(tgt.as_str())) {
				(Some(&s), Some(&t)) => {
					graph.add_edge(s, t, ());
				}
				_ => return Err(LayoutError::DanglingEdge(src.clone(), tgt.clone())),
			}
		}

		let order = toposort(&graph, None)
			.map_err(|c| LayoutError::Cyclic(request.node_ids[graph[c.node_id()]].clone()))?;

		let mut rank: HashMap<NodeIndex, usize> = HashMap::new();
		for &n in &order {
			let r = graph
				.neighbors_directed(n, Incoming)
				.filter_map(|p| rank.get(&p).map(|r| r + 1))
				.max()
				.unwrap_or(0);
			rank.insert(n, r);
		}

		let rank_count = rank.values().copied().max().unwrap_or(0) + 1;
		let mut layers: Vec<Vec<NodeIndex>> = vec![Vec::new(); rank_count];
		let mut by_input: Vec<NodeIndex> = graph.node_indices().collect();
		by_input.sort_by_key(|&n| graph[n]);
		for n in by_input {
			layers[rank[&n]].push(n);
		}

		minimise_crossings(&graph, &mut layers);
		Ok(assign_coordinates(request, &graph, &layers))
	}
}

fn barycenter(
	graph: &DiGraph<usize, ()>,
	node: NodeIndex,
	dir: petgraph::Direction,
	positions: &HashMap<NodeIndex, usize>,
) -> Option<f64> {
	let found: Vec<f64> = graph
		.neighbors_directed(node, dir)
		.filter_map(|nb| positions.get(&nb).map(|&p| p as f64))
		.collect();
	if found.is_empty() {
		None
	} else {
		Some(found.iter().sum::<f64>() / found.len() as f64)
	}
}

fn reorder(
	graph: &DiGraph<usize, ()>,
	layer: &mut [NodeIndex],
	reference: &[NodeIndex],
	dir: petgraph::Direction,
) {
	let positions: HashMap<NodeIndex, usize> =
		reference.iter().enumerate().map(|(i, &n)| (n, i)).collect();
	let mut keyed: Vec<(f64, usize, NodeIndex)> = layer
		.iter()
		.enumerate()
		.map(|(i, &n)| {
			let key = barycenter(graph, n, dir, &positions).unwrap_or(i as f64);
			(key, i, n)
		})
		.collect();
	keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
	for (slot, (_, _, n)) in layer.iter_mut().zip(keyed) {
		*slot = n;
	}
}

fn minimise_crossings(graph: &DiGraph<usize, ()>, layers: &mut [Vec<NodeIndex>]) {
	for _ in 0..SWEEPS {
		for i in 1..layers.len() {
			let (above, rest) = layers.split_at_mut(i);
			reorder(graph, &mut rest[0], &above[i - 1], Incoming);
		}
		for i in (0..layers.len().saturating_sub(1)).rev() {
			let (head, below) = layers.split_at_mut(i + 1);
			reorder(graph, &mut head[i], &below[0], Outgoing);
		}
	}
}

fn assign_coordinates(
	request: &LayoutRequest,
	graph: &DiGraph<usize, ()>,
	layers: &[Vec<NodeIndex>],
) -> HashMap<String, Point> {
	let Size { width, height } = request.node_size;
	let (along, across) = match request.direction {
		Direction::TopToBottom => (height, width),
		Direction::LeftToRight => (width, height),
	};
	let extent = |n: usize| n as f64 * across + n.saturating_sub(1) as f64 * request.spacing.node;
	let widest = layers.iter().map(|l| extent(l.len())).fold(0.0, f64::max);

	let mut out = HashMap::new();
	for (r, layer) in layers.iter().enumerate() {
		let rank_pos = request.margin + r as f64 * (along + request.spacing.rank);
		let start = request.margin + (widest - extent(layer.len())) / 2.0;
		for (slot, &n) in layer.iter().enumerate() {
			let cross_pos = start + slot as f64 * (across + request.spacing.node);
			let point = match request.direction {
				Direction::TopToBottom => Point::new(cross_pos, rank_pos),
				Direction::LeftToRight => Point::new(rank_pos, cross_pos),
			};
			out.insert(request.node_ids[graph[n]].clone(), point);
		}
	}
	out
}

/// Deterministic positions in input order along the rank axis.
pub fn fallback_positions(request: &LayoutRequest) -> HashMap<String, Point> {
	let Size { width, height } = request.node_size;
	request
		.node_ids
		.iter()
		.enumerate()
		.map(|(i, id)| {
			let step = i as f64;
			let point = match request.direction {
				Direction::TopToBottom => Point::new(
					request.margin,
					request.margin + step * (height + request.spacing.rank),
				),
				Direction::LeftToRight => Point::new(
					request.margin + step * (width + request.spacing.rank),
					request.margin,
				),
			};
			(id.clone(), point)
		})
		.collect()
}

/// Run `solver`, falling back to [`fallback_positions`] when it fails.
pub fn layout_or_fallback(
	solver: &dyn GraphLayout,
	request: &LayoutRequest,
) -> HashMap<String, Point> {
	match solver.layout(request) {
		Ok(positions) => positions,
		Err(e) => {
			warn!("graph layout failed ({e}), using default positions");
			fallback_positions(request)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn edges(list: &[(&str, &str)]) -> Vec<(String, String)> {
		list.iter()
			.map(|(a, b)| (a.to_string(), b.to_string()))
			.collect()
	}

	#[test]
	fn chain_top_to_bottom_stacks_ranks() {
		let request = LayeredConfig::default().request(
			ids(&["0", "1", "2"]),
			edges(&[("0", "1"), ("1", "2")]),
		);
		let pos = LayeredLayout.layout(&request).unwrap();
		assert_eq!(pos["0"], Point::new(40.0, 40.0));
		assert_eq!(pos["1"], Point::new(40.0, 260.0));
		assert_eq!(pos["2"], Point::new(40.0, 480.0));
	}

	#[test]
	fn chain_left_to_right_advances_x() {
		let config = LayeredConfig {
			direction: Direction::LeftToRight,
			node_size: Size::new(220.0, 100.0),
			spacing: Spacing {
				node: 40.0,
				rank: 80.0,
			},
			margin: 30.0,
		};
		let request = config.request(ids(&["a", "b"]), edges(&[("a", "b")]));
		let pos = LayeredLayout.layout(&request).unwrap();
		assert_eq!(pos["a"], Point::new(30.0, 30.0));
		assert_eq!(pos["b"], Point::new(330.0, 30.0));
	}

	#[test]
	fn diamond_shares_a_rank_and_centres_the_rest() {
		let request = LayeredConfig::default().request(
			ids(&["a", "b", "c", "d"]),
			edges(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]),
		);
		let pos = LayeredLayout.layout(&request).unwrap();
		assert_eq!(pos["b"].y, pos["c"].y);
		assert_ne!(pos["b"].x, pos["c"].x);
		assert!(pos["d"].y > pos["b"].y);
		assert_eq!(pos["a"].x, pos["d"].x);
		assert_eq!(pos["a"].x, (pos["b"].x + pos["c"].x) / 2.0);
	}

	#[test]
	fn cycles_and_dangling_edges_fail() {
		let config = LayeredConfig::default();
		let cyclic = config.request(ids(&["a", "b"]), edges(&[("a", "b"), ("b", "a")]));
		assert!(matches!(
			LayeredLayout.layout(&cyclic),
			Err(LayoutError::Cyclic(_))
		));
		let dangling = config.request(ids(&["a"]), edges(&[("a", "z")]));
		assert_eq!(
			LayeredLayout.layout(&dangling),
			Err(LayoutError::DanglingEdge("a".into(), "z".into()))
		);
		let empty = config.request(vec![], vec![]);
		assert_eq!(LayeredLayout.layout(&empty), Err(LayoutError::Empty));
	}

	#[test]
	fn failures_fall_back_to_input_order() {
		let request = LayeredConfig::default()
			.request(ids(&["a", "b"]), edges(&[("a", "b"), ("b", "a")]));
		let pos = layout_or_fallback(&LayeredLayout, &request);
		assert_eq!(pos.len(), 2);
		assert_eq!(pos["a"], Point::new(40.0, 40.0));
		assert_eq!(pos["b"], Point::new(40.0, 260.0));
	}
}
