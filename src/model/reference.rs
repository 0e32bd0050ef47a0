use super::{CausalLink, CausalModel, CausalNode, Category, TypeTaxonomy};

/// Demo dataset: a supplier shortage cascading up to the net margin.
pub(super) fn model() -> CausalModel {
	let nodes = vec![
		CausalNode::new(
			"0",
			"Marge nette",
			"-3.2 pts",
			Some(-3.2),
			Category::Kpi,
			"Marge nette passée de 12.1% à 8.9% sur Q1",
		),
		CausalNode::new(
			"1",
			"Coût unitaire",
			"+18%",
			Some(18.0),
			Category::Kpi,
			"Hausse du coût de production par unité",
		),
		CausalNode::new(
			"2",
			"Coût matières premières",
			"+25%",
			Some(25.0),
			Category::Kpi,
			"Augmentation prix d'achat MP",
		),
		CausalNode::new(
			"3",
			"Volume fournisseur A",
			"-40%",
			Some(-40.0),
			Category::Kpi,
			"Réduction capacité fournisseur principal",
		),
		CausalNode::new(
			"4",
			"Retard livraisons",
			"+12 jours",
			Some(12.0),
			Category::Operational,
			"Délai moyen passé de 5 à 17 jours",
		),
		CausalNode::new(
			"5",
			"Pénurie logistique",
			"Critique",
			None,
			Category::Qualitative,
			"Congestion portuaire Asie du Sud-Est depuis Janvier",
		),
	];
	let links = (0..nodes.len() - 1)
		.map(|i| CausalLink::new(i.to_string(), (i + 1).to_string()))
		.collect();

	match CausalModel::new(nodes, links, &TypeTaxonomy::standard()) {
		Ok(model) => model,
		Err(e) => unreachable!("reference dataset is malformed: {e}"),
	}
}
