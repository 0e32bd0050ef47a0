use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::ops::RangeInclusive;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::components::viewport::ViewTransform;
use crate::layout::Point;
use crate::model::{NodeId, StyledChain};

pub const NODE_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 16.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
const NETWORK_ZOOM: RangeInclusive<f64> = 0.1..=10.0;

/// Force simulation parameters plus how long to run it before reading positions.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
	pub mass: f32,
	/// Radius of the circle nodes are seeded on.
	pub seed_radius: f64,
	/// Ticks run by [`NetworkState::settle`].
	pub settle_ticks: usize,
	/// Seconds per tick.
	pub dt: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			mass: 10.0,
			seed_radius: 100.0,
			settle_ticks: 240,
			dt: 0.016,
		}
	}
}

impl SimulationConfig {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.charge,
			force_spring: self.spring,
			force_max: self.max_force,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub value: String,
	pub color: String,
	pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	/// Set once the pointer has travelled further than [`CLICK_SLOP`].
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Live force network of the causal chain, in graph space centred on the origin.
pub struct NetworkState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	config: SimulationConfig,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl NetworkState {
	pub fn new(chain: &StyledChain, config: &SimulationConfig, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(config.parameters());
		let mut index_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let count = chain.len().max(1) as f64;

		for entry in chain.entries() {
			let angle = entry.index as f64 * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (config.seed_radius * angle.cos()) as f32,
				y: (config.seed_radius * angle.sin()) as f32,
				mass: config.mass,
				is_anchor: false,
				user_data: NodeInfo {
					id: entry.node.id.clone(),
					label: entry.node.label.clone(),
					value: entry.node.value.clone(),
					color: entry.style.accent.clone(),
					active: false,
				},
			});
			index_to_idx.insert(entry.index, idx);
		}

		for (s, t) in chain.link_indices() {
			if let (Some(&src), Some(&tgt)) = (index_to_idx.get(&s), index_to_idx.get(&t)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			edges,
			config: config.clone(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	/// Run the configured number of ticks.
	pub fn settle(&mut self) {
		for _ in 0..self.config.settle_ticks {
			self.graph.update(self.config.dt);
		}
	}

	/// Node positions in graph space, keyed by id.
	pub fn positions(&self) -> HashMap<NodeId, Point> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(
				node.data.user_data.id.clone(),
				Point::new(node.x() as f64, node.y() as f64),
			);
		});
		out
	}

	pub fn set_active(&mut self, active: Option<&NodeId>) {
		self.graph.visit_nodes_mut(|node| {
			node.data.user_data.active = active == Some(&node.data.user_data.id);
		});
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.to_world(sx, sy)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// graph-space radius, scales with zoom like the nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Begin a press on a node (drag or click) or on the background (pan).
	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				moved: false,
				start_x: x,
				start_y: y,
				..DragState::default()
			};
			let mut start = (0.0, 0.0);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					start = (node.x(), node.y());
				}
			});
			(self.drag.node_start_x, self.drag.node_start_y) = start;
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer moved to `(x, y)` in screen space.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (sx, sy) = (x - self.drag.start_x, y - self.drag.start_y);
			if (sx * sx + sy * sy).sqrt() > CLICK_SLOP {
				self.drag.moved = true;
			}
			if !self.drag.moved {
				return;
			}
			let (nx, ny) = (
				self.drag.node_start_x + (sx / self.transform.k) as f32,
				self.drag.node_start_y + (sy / self.transform.k) as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End the current press. Returns the node that was clicked without being dragged.
	pub fn release(&mut self) -> Option<NodeId> {
		let clicked = match (self.drag.active, self.drag.moved, self.drag.node_idx) {
			(true, false, Some(idx)) => self.node_id(idx),
			_ => None,
		};
		self.cancel_press();
		clicked
	}

	pub fn cancel_press(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.drag.moved = false;
		self.pan.active = false;
	}

	/// Zoom by one wheel notch around the screen point `(x, y)`.
	pub fn zoom(&mut self, x: f64, y: f64, zoom_in: bool) {
		self.transform.zoom_at(x, y, zoom_in, NETWORK_ZOOM);
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight around for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self) {
		let dt = self.config.dt;
		self.graph.update(dt);
		self.flow_time += dt as f64;
		let dt = dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> NetworkState {
		let chain = StyledChain::reference().unwrap();
		NetworkState::new(&chain, &SimulationConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn nodes_are_seeded_on_a_circle() {
		let s = state();
		let positions = s.positions();
		assert_eq!(positions.len(), 6);
		let first = positions[&NodeId::from("0")];
		assert!((first.x - 100.0).abs() < 1e-3);
		assert!(first.y.abs() < 1e-3);
	}

	#[test]
	fn settling_keeps_every_node_finite() {
		let mut s = state();
		s.settle();
		assert!(s.positions().values().all(|p| p.x.is_finite() && p.y.is_finite()));
	}

	#[test]
	fn press_and_release_in_place_is_a_click() {
		let mut s = state();
		// node "0" sits 100 px right of the centre
		s.press(500.0, 300.0);
		s.pointer_move(501.0, 301.0);
		assert_eq!(s.release(), Some(NodeId::from("0")));
	}

	#[test]
	fn dragging_is_not_a_click() {
		let mut s = state();
		s.press(500.0, 300.0);
		s.pointer_move(560.0, 340.0);
		assert!(s.drag.moved);
		assert_eq!(s.release(), None);
	}

	#[test]
	fn background_press_pans() {
		let mut s = state();
		s.press(10.0, 10.0);
		s.pointer_move(30.0, 50.0);
		assert_eq!((s.transform.x, s.transform.y), (420.0, 340.0));
		assert_eq!(s.release(), None);
	}

	#[test]
	fn hover_collects_neighbours() {
		let mut s = state();
		let idx = s.node_at_position(500.0, 300.0).unwrap();
		s.set_hover(Some(idx));
		assert_eq!(s.hover.neighbors.len(), 1);
		assert!(s.is_hovered(idx));
	}

	#[test]
	fn active_flag_follows_selection() {
		let mut s = state();
		s.set_active(Some(&"3".into()));
		let mut active = vec![];
		s.graph.visit_nodes(|n| {
			if n.data.user_data.active {
				active.push(n.data.user_data.id.clone());
			}
		});
		assert_eq!(active, vec![NodeId::from("3")]);
	}
}
