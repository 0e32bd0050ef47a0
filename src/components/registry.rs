use std::collections::HashSet;
use std::sync::Arc;

use super::network::NetworkStrategy;
use super::strategy::{Comparison, LayoutFamily, RenderingContext, StrategyDescriptor};
use super::views::{
	DrillDownStrategy, FishboneStrategy, FlowchartStrategy, IntensityStrategy, MindMapStrategy,
	SankeyStrategy, TreemapStrategy, WaterfallStrategy,
};
use crate::model::{DashboardError, DashboardResult};

/// Ordered, non-empty set of layout strategies; the first entry is the default.
#[derive(Clone, Debug)]
pub struct StrategyRegistry {
	entries: Vec<StrategyDescriptor>,
}

impl StrategyRegistry {
	/// Validate an injected roster: at least one entry, unique ids.
	pub fn new(entries: Vec<StrategyDescriptor>) -> DashboardResult<Self> {
		if entries.is_empty() {
			return Err(DashboardError::EmptyRegistry);
		}
		let mut seen = HashSet::new();
		for entry in &entries {
			if !seen.insert(entry.id) {
				return Err(DashboardError::DuplicateLayout(entry.id.into()));
			}
		}
		Ok(Self { entries })
	}

	/// The six classic views, ordered by recommendation.
	pub fn standard() -> Self {
		Self {
			entries: vec![
				flowchart(),
				flowchart_horizontal(),
				waterfall(),
				sankey(),
				drilldown(),
				treemap(),
			],
		}
	}

	/// Alternative roster: diagnostic diagrams and the force network.
	pub fn extended() -> Self {
		Self {
			entries: vec![fishbone(), mindmap(), intensity(), network(), waterfall()],
		}
	}

	/// Default entry.
	pub fn first(&self) -> &StrategyDescriptor {
		&self.entries[0]
	}

	pub fn get(&self, id: &str) -> Option<&StrategyDescriptor> {
		self.entries.iter().find(|e| e.id == id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.get(id).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = &StrategyDescriptor> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Circled ordinal used to number tabs: ①, ②, …
pub fn ordinal(index: usize) -> char {
	char::from_u32(0x2460 + index.min(19) as u32).unwrap_or('•')
}

fn flowchart() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "flowchart",
		name: "Flowchart + auto-layout",
		tag: "★ RECOMMANDÉ",
		tag_color: "#F59E0B",
		description: "Flowchart interactif avec auto-layout en couches, zoom/pan, minimap. Le plus professionnel pour un comex.",
		package: "petgraph (layout en couches)",
		family: LayoutFamily::Solver,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 5,
			impact: 5,
			complexity: "Moyenne",
		},
		strategy: Arc::new(FlowchartStrategy::vertical()),
	}
}

fn flowchart_horizontal() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "flowchart-horizontal",
		name: "Flowchart horizontal",
		tag: "EXCELLENT",
		tag_color: "#3B82F6",
		description: "Même puissance, layout gauche→droite avec zoom/pan et minimap. Lecture naturelle de la chaîne causale.",
		package: "petgraph (layout en couches)",
		family: LayoutFamily::Solver,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 5,
			impact: 4,
			complexity: "Moyenne",
		},
		strategy: Arc::new(FlowchartStrategy::horizontal()),
	}
}

fn waterfall() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "waterfall",
		name: "Cascade Waterfall",
		tag: "CUSTOM · LÉGER",
		tag_color: "#10B981",
		description: "SVG pur, zéro dépendance. Cascade visuelle descendante, lecture très intuitive.",
		package: "Aucun (SVG custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 3,
			impact: 4,
			complexity: "Faible",
		},
		strategy: Arc::new(WaterfallStrategy::default()),
	}
}

fn sankey() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "sankey",
		name: "Sankey",
		tag: "ANALYTIQUE",
		tag_color: "#8B5CF6",
		description: "Diagramme de flux Sankey. Montre l'atténuation de l'impact à travers la chaîne. Très data-driven.",
		package: "Aucun (SVG custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 4,
			impact: 3,
			complexity: "Faible",
		},
		strategy: Arc::new(SankeyStrategy::default()),
	}
}

fn drilldown() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "drilldown",
		name: "Drill-Down Vertical",
		tag: "COMPACT",
		tag_color: "#06B6D4",
		description: "Plongée progressive avec indentation. Idéal format mobile ou section de dashboard.",
		package: "Aucun (CSS custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 3,
			impact: 4,
			complexity: "Faible",
		},
		strategy: Arc::new(DrillDownStrategy::default()),
	}
}

fn treemap() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "treemap",
		name: "Treemap",
		tag: "HIÉRARCHIQUE",
		tag_color: "#EC4899",
		description: "Treemap imbriqué : chaque cause est contenue dans son effet, détail au survol. Vue \"big picture\".",
		package: "Aucun (SVG custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 3,
			impact: 3,
			complexity: "Faible",
		},
		strategy: Arc::new(TreemapStrategy::default()),
	}
}

fn fishbone() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "fishbone",
		name: "Ishikawa",
		tag: "DIAGNOSTIC",
		tag_color: "#EF4444",
		description: "Diagramme en arêtes de poisson : l'effet en tête, les causes alternées de part et d'autre de l'arête.",
		package: "Aucun (SVG custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 3,
			impact: 4,
			complexity: "Faible",
		},
		strategy: Arc::new(FishboneStrategy::default()),
	}
}

fn mindmap() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "mindmap",
		name: "Carte mentale",
		tag: "EXPLORATOIRE",
		tag_color: "#8B5CF6",
		description: "Branches radiales autour de l'effet observé, reliées par des courbes de Bézier.",
		package: "Aucun (SVG custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 4,
			impact: 3,
			complexity: "Moyenne",
		},
		strategy: Arc::new(MindMapStrategy::default()),
	}
}

fn intensity() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "intensity",
		name: "Barres d'intensité",
		tag: "SYNTHÈSE",
		tag_color: "#10B981",
		description: "Barres empilées dont la largeur s'atténue en remontant vers la cause racine.",
		package: "Aucun (CSS custom)",
		family: LayoutFamily::Intrinsic,
		context: RenderingContext::Svg,
		comparison: Comparison {
			interactivity: 2,
			impact: 3,
			complexity: "Faible",
		},
		strategy: Arc::new(IntensityStrategy::default()),
	}
}

fn network() -> StrategyDescriptor {
	StrategyDescriptor {
		id: "network",
		name: "Réseau de forces",
		tag: "EXPÉRIMENTAL",
		tag_color: "#06B6D4",
		description: "Graphe à forces sur canvas : glisser les nœuds, zoomer, cliquer pour le détail.",
		package: "force_graph (canvas)",
		family: LayoutFamily::Solver,
		context: RenderingContext::Canvas,
		comparison: Comparison {
			interactivity: 5,
			impact: 3,
			complexity: "Élevée",
		},
		strategy: Arc::new(NetworkStrategy::default()),
	}
}
