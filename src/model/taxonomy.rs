//! Category → colour/label mapping used uniformly by every layout.

use super::error::{DashboardError, DashboardResult};
use super::Category;

/// Colours and display label for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryStyle {
	/// Fill used for an expanded node.
	pub background: String,
	/// Border of a collapsed node.
	pub border: String,
	/// Dark text colour matching the fill.
	pub text: String,
	/// Highlight colour: active border, values, arrows.
	pub accent: String,
	/// Human readable category name.
	pub label: String,
}

impl CategoryStyle {
	/// Build a style from static colour literals.
	pub fn new(background: &str, border: &str, text: &str, accent: &str, label: &str) -> Self {
		Self {
			background: background.into(),
			border: border.into(),
			text: text.into(),
			accent: accent.into(),
			label: label.into(),
		}
	}

	/// The accent with a two-digit hex alpha suffix, e.g. `#EF444433`.
	pub fn accent_alpha(&self, alpha: &str) -> String {
		format!("{}{}", self.accent, alpha)
	}
}

/// An explicit taxonomy value object, passed by reference to every strategy.
///
/// Entries keep their insertion order so the legend is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeTaxonomy {
	entries: Vec<(Category, CategoryStyle)>,
}

impl TypeTaxonomy {
	/// An empty taxonomy. Any model using it fails validation.
	pub fn new() -> Self {
		Self::default()
	}

	/// The reference palette: red KPIs, amber operational, blue qualitative.
	pub fn standard() -> Self {
		Self::new()
			.with(
				Category::Kpi,
				CategoryStyle::new("#FEE2E2", "#EF4444", "#991B1B", "#EF4444", "KPI"),
			)
			.with(
				Category::Operational,
				CategoryStyle::new("#FEF3C7", "#F59E0B", "#92400E", "#F59E0B", "Opérationnel"),
			)
			.with(
				Category::Qualitative,
				CategoryStyle::new("#DBEAFE", "#3B82F6", "#1E3A8A", "#3B82F6", "Qualitatif"),
			)
	}

	/// Register (or replace) the style of `category`.
	pub fn with(mut self, category: Category, style: CategoryStyle) -> Self {
		match self.entries.iter_mut().find(|(c, _)| *c == category) {
			Some(entry) => entry.1 = style,
			None => self.entries.push((category, style)),
		}
		self
	}

	/// Typed lookup.
	pub fn style(&self, category: Category) -> DashboardResult<&CategoryStyle> {
		self.entries
			.iter()
			.find(|(c, _)| *c == category)
			.map(|(_, s)| s)
			.ok_or_else(|| DashboardError::Lookup(category.as_str().into()))
	}

	/// Lookup by category key (`kpi`, `operational`, `qualitative`).
	pub fn category_style(&self, key: &str) -> DashboardResult<&CategoryStyle> {
		let category = key
			.parse::<Category>()
			.map_err(|_| DashboardError::Lookup(key.into()))?;
		self.style(category)
	}

	/// Whether `category` has an entry.
	pub fn contains(&self, category: Category) -> bool {
		self.entries.iter().any(|(c, _)| *c == category)
	}

	/// Entries in declaration order, for the legend.
	pub fn legend(&self) -> impl Iterator<Item = (Category, &CategoryStyle)> {
		self.entries.iter().map(|(c, s)| (*c, s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn standard_entries_have_accents() {
		let taxonomy = TypeTaxonomy::standard();
		for key in ["kpi", "operational", "qualitative"] {
			let style = taxonomy.category_style(key).unwrap();
			assert!(!style.accent.is_empty(), "{key} has no accent");
		}
	}

	#[test]
	fn unknown_key_is_a_lookup_error() {
		let taxonomy = TypeTaxonomy::standard();
		assert_eq!(
			taxonomy.category_style("unknown"),
			Err(DashboardError::Lookup("unknown".into()))
		);
	}

	#[test]
	fn missing_entry_is_a_lookup_error() {
		let taxonomy = TypeTaxonomy::new().with(
			Category::Kpi,
			CategoryStyle::new("#fff", "#000", "#000", "#f00", "KPI"),
		);
		assert!(taxonomy.style(Category::Kpi).is_ok());
		assert_eq!(
			taxonomy.style(Category::Qualitative),
			Err(DashboardError::Lookup("qualitative".into()))
		);
	}

	#[test]
	fn with_replaces_existing_entry() {
		let taxonomy = TypeTaxonomy::standard().with(
			Category::Kpi,
			CategoryStyle::new("#fff", "#000", "#000", "#123456", "Indicateur"),
		);
		assert_eq!(taxonomy.legend().count(), 3);
		assert_eq!(taxonomy.style(Category::Kpi).unwrap().accent, "#123456");
		assert_eq!(taxonomy.legend().next().unwrap().0, Category::Kpi);
	}
}
