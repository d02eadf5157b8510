//! Category labels and the search queries behind them.
//!
//! A label is what the user sees; the query is what goes to the remote
//! source. Known labels expand to a subject term boosted with thematic
//! keywords. Anything else falls back to a bare `subject:` query.

/// Categories shown on the home screen, in display order.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
  "Popular Fiction",
  "Popular Science",
  "Romance",
  "Fantasy",
  "Self-Help",
  "Business & Money",
  "Health & Wellness",
  "World History",
  "Art & Creativity",
  "Travel & Adventure",
];

const BOOSTED: &[(&str, &str)] = &[
  ("Popular Fiction", "subject:fiction (bestseller OR novel OR literary OR contemporary)"),
  ("Popular Science", "subject:science (physics OR biology OR astronomy OR discovery)"),
  ("Romance", "subject:romance (love OR relationships OR historical OR contemporary)"),
  ("Fantasy", "subject:fantasy (magic OR dragons OR wizards OR epic)"),
  ("Self-Help", "subject:self-help (habits OR motivation OR productivity OR mindset)"),
  ("Business & Money", "subject:business (finance OR investing OR leadership OR entrepreneurship)"),
  ("Health & Wellness", "subject:health (fitness OR nutrition OR wellness OR mindfulness)"),
  ("World History", "subject:history (world OR civilization OR empire OR war)"),
  ("Art & Creativity", "subject:art (design OR drawing OR painting OR creativity)"),
  ("Travel & Adventure", "subject:travel (adventure OR exploration OR journey OR expedition)"),
];

/// The remote query for `label`. Matching is case-insensitive.
pub fn query_for(label: &str) -> String {
  let label = label.trim();
  BOOSTED
    .iter()
    .find(|(known, _)| known.eq_ignore_ascii_case(label))
    .map(|(_, query)| (*query).to_owned())
    .unwrap_or_else(|| format!("subject:{label}"))
}

/// [`DEFAULT_CATEGORIES`] as owned labels.
pub fn default_categories() -> Vec<String> {
  DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect()
}
