//! Layout strategies and the components that draw them.

pub mod network;
pub mod registry;
pub mod scene;
pub mod scene_view;
pub mod strategy;
pub mod viewport;
pub mod views;

pub use registry::{StrategyRegistry, ordinal};
pub use scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
pub use scene_view::{DetailPanel, SceneOptions, SceneView};
pub use viewport::{PanZoom, ViewTransform};
pub use strategy::{
	Comparison, LayoutFamily, LayoutStrategy, RenderingContext, StrategyContext, StrategyDescriptor,
};
