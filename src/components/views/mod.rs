//! Layout strategies that draw through the generic [`SceneView`](super::scene_view::SceneView).

mod drilldown;
mod fishbone;
mod flowchart;
mod intensity;
mod mindmap;
mod sankey;
mod treemap;
mod waterfall;

pub use drilldown::DrillDownStrategy;
pub use fishbone::FishboneStrategy;
pub use flowchart::FlowchartStrategy;
pub use intensity::IntensityStrategy;
pub use mindmap::MindMapStrategy;
pub use sankey::SankeyStrategy;
pub use treemap::TreemapStrategy;
pub use waterfall::WaterfallStrategy;
