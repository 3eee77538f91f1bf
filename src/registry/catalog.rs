use std::collections::BTreeSet;

use super::model::AppEntry;

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub category: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl FilterState {
    pub fn matches(&self, entry: &AppEntry) -> bool {
        self.matches_category(entry) && self.matches_query(entry)
    }

    fn matches_category(&self, entry: &AppEntry) -> bool {
        self.category == ALL_CATEGORIES || entry.category == self.category
    }

    fn matches_query(&self, entry: &AppEntry) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        let tags = entry.tags.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        format!("{} {} {}", entry.name, entry.description, tags)
            .to_lowercase()
            .contains(&needle)
    }
}

/// The loaded app list. Swapped as a whole on refresh, never patched.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<AppEntry>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new(entries: Vec<AppEntry>) -> Self {
        let categories = std::iter::once(ALL_CATEGORIES.to_string())
            .chain(
                entries
                    .iter()
                    .map(|entry| entry.category.clone())
                    .filter(|category| !category.is_empty() && category != ALL_CATEGORIES)
                    .collect::<BTreeSet<_>>(),
            )
            .collect();
        Self {
            entries,
            categories,
        }
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category tokens, `all` first.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn find(&self, id: &str) -> Option<&AppEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn filtered_indices(&self, filter: &FilterState) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter.matches(entry))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, category: &str, tags: &[&str]) -> AppEntry {
        AppEntry {
            id: id.into(),
            name: name.into(),
            description: format!("{name} description"),
            category: category.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            icon: None,
            size_bytes: None,
            platforms: Default::default(),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            entry("a1", "Notes", "productivity", &["writing"]),
            entry("a2", "Chess", "games", &["board"]),
            entry("a3", "Tasks", "productivity", &[]),
        ])
    }

    #[test]
    fn test_categories_sorted_with_all_first() {
        assert_eq!(sample().categories(), ["all", "games", "productivity"]);
    }

    #[test]
    fn test_default_filter_shows_everything() {
        assert_eq!(sample().filtered_indices(&FilterState::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_query_matches_tags_case_insensitively() {
        let filter = FilterState {
            query: "BOARD".into(),
            ..Default::default()
        };
        assert_eq!(sample().filtered_indices(&filter), vec![1]);
    }

    #[test]
    fn test_query_matches_description() {
        let filter = FilterState {
            query: "tasks desc".into(),
            ..Default::default()
        };
        assert_eq!(sample().filtered_indices(&filter), vec![2]);
    }

    #[test]
    fn test_category_and_query_combine() {
        let filter = FilterState {
            query: "notes".into(),
            category: "productivity".into(),
        };
        assert_eq!(sample().filtered_indices(&filter), vec![0]);

        let filter = FilterState {
            query: "notes".into(),
            category: "games".into(),
        };
        assert!(sample().filtered_indices(&filter).is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let catalog = sample();
        assert_eq!(catalog.find("a2").map(|e| e.name.as_str()), Some("Chess"));
        assert!(catalog.find("missing").is_none());
    }
}
