use ratatui::widgets::ListState;

use crate::cache::FetchSource;
use crate::registry::catalog::{Catalog, FilterState, ALL_CATEGORIES};
use crate::registry::model::AppEntry;
use crate::system::identity::Session;
use crate::system::os::PlatformTag;
use crate::ui::theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
    pub created_at: std::time::Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Blocking notice; the UI ignores other keys until it is dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

pub struct App {
    pub catalog: Catalog,
    pub catalog_status: CatalogStatus,
    pub catalog_source: Option<FetchSource>,
    pub filter: FilterState,
    pub selected_category: usize,
    pub filtered_indices: Vec<usize>,
    pub list_state: ListState,
    pub search_mode: bool,
    pub platform: PlatformTag,
    pub session: Option<Session>,
    pub login: Option<LoginForm>,
    pub alert: Option<Alert>,
    pub theme: Theme,
    pub status: String,
    pub logs: Vec<LogEntry>,
}

impl App {
    pub fn new(platform: PlatformTag) -> Self {
        let mut app = Self {
            catalog: Catalog::default(),
            catalog_status: CatalogStatus::Loading,
            catalog_source: None,
            filter: FilterState::default(),
            selected_category: 0,
            filtered_indices: Vec::new(),
            list_state: ListState::default(),
            search_mode: false,
            platform,
            session: None,
            login: None,
            alert: None,
            theme: Theme::Dark,
            status: "Loading catalog...".to_string(),
            logs: Vec::new(),
        };
        app.categories_changed();
        app
    }

    /// Swaps in a freshly loaded catalog. The category filter survives if the
    /// new catalog still has that category.
    pub fn replace_catalog(&mut self, entries: Vec<AppEntry>, source: FetchSource) {
        self.catalog = Catalog::new(entries);
        self.catalog_status = CatalogStatus::Ready;
        self.catalog_source = Some(source);
        self.categories_changed();
        let origin = match source {
            FetchSource::Cache => "offline cache",
            FetchSource::Network => "network",
        };
        self.set_status(format!(
            "Loaded {} apps from {origin}. Enter open, I install, / search.",
            self.catalog.len()
        ));
    }

    pub fn catalog_failed(&mut self, message: impl Into<String>) {
        self.catalog_status = CatalogStatus::Failed(message.into());
        self.set_status("Catalog unavailable. Press r to retry.");
    }

    fn categories_changed(&mut self) {
        self.selected_category = self
            .catalog
            .categories()
            .iter()
            .position(|category| category == &self.filter.category)
            .unwrap_or(0);
        self.filter.category = self
            .catalog
            .categories()
            .get(self.selected_category)
            .cloned()
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());
        self.refresh_filter();
    }

    pub fn refresh_filter(&mut self) {
        self.filtered_indices = self.catalog.filtered_indices(&self.filter);

        let new_idx = match self.list_state.selected() {
            Some(idx) if idx < self.filtered_indices.len() => Some(idx),
            _ if self.filtered_indices.is_empty() => None,
            _ => Some(0),
        };
        self.list_state.select(new_idx);
    }

    pub fn set_category_index(&mut self, index: usize) {
        let Some(category) = self.catalog.categories().get(index) else {
            return;
        };
        self.filter.category = category.clone();
        self.selected_category = index;
        self.refresh_filter();
    }

    pub fn category_right(&mut self) {
        let count = self.catalog.categories().len();
        if count == 0 {
            return;
        }
        self.set_category_index((self.selected_category + 1) % count);
    }

    pub fn category_left(&mut self) {
        let count = self.catalog.categories().len();
        if count == 0 {
            return;
        }
        let prev = if self.selected_category == 0 {
            count - 1
        } else {
            self.selected_category - 1
        };
        self.set_category_index(prev);
    }

    pub fn push_search_char(&mut self, c: char) {
        self.filter.query.push(c);
        self.refresh_filter();
    }

    pub fn pop_search_char(&mut self) {
        self.filter.query.pop();
        self.refresh_filter();
    }

    pub fn clear_search(&mut self) {
        self.filter.query.clear();
        self.refresh_filter();
    }

    pub fn current_entry(&self) -> Option<&AppEntry> {
        let idx = self.list_state.selected()?;
        let entry_idx = *self.filtered_indices.get(idx)?;
        self.catalog.entries().get(entry_idx)
    }

    pub fn current_id(&self) -> Option<String> {
        self.current_entry().map(|entry| entry.id.clone())
    }

    pub fn move_down(&mut self) {
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
            return;
        }

        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.filtered_indices.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn move_up(&mut self) {
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
            return;
        }

        let prev = match self.list_state.selected() {
            Some(0) | None => self.filtered_indices.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.list_state.select(Some(prev));
    }

    pub fn show_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.set_status(format!("{} mode", self.theme.label()));
    }

    pub fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = message.into();
    }

    pub fn log(&mut self, message: String, level: LogLevel) {
        let now = std::time::Instant::now();
        self.logs
            .retain(|l| now.duration_since(l.created_at) < std::time::Duration::from_secs(3));
        self.logs.push(LogEntry {
            message,
            level,
            created_at: now,
        });
        if self.logs.len() > 3 {
            self.logs.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, category: &str) -> AppEntry {
        AppEntry {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            category: category.into(),
            tags: Default::default(),
            icon: None,
            size_bytes: None,
            platforms: Default::default(),
        }
    }

    fn loaded() -> App {
        let mut app = App::new(PlatformTag::Web);
        app.replace_catalog(
            vec![entry("a", "games"), entry("b", "tools"), entry("c", "games")],
            FetchSource::Network,
        );
        app
    }

    #[test]
    fn test_replace_catalog_selects_first() {
        let app = loaded();
        assert_eq!(app.catalog_status, CatalogStatus::Ready);
        assert_eq!(app.filtered_indices, vec![0, 1, 2]);
        assert_eq!(app.current_id().as_deref(), Some("a"));
    }

    #[test]
    fn test_category_cycle_filters() {
        let mut app = loaded();
        app.category_right();
        assert_eq!(app.filter.category, "games");
        assert_eq!(app.filtered_indices, vec![0, 2]);

        app.category_left();
        app.category_left();
        assert_eq!(app.filter.category, "tools");
        assert_eq!(app.filtered_indices, vec![1]);
    }

    #[test]
    fn test_category_survives_refresh_when_present() {
        let mut app = loaded();
        app.category_right();
        app.replace_catalog(vec![entry("z", "games")], FetchSource::Cache);
        assert_eq!(app.filter.category, "games");

        app.replace_catalog(vec![entry("y", "music")], FetchSource::Cache);
        assert_eq!(app.filter.category, ALL_CATEGORIES);
    }

    #[test]
    fn test_search_narrows_and_clears() {
        let mut app = loaded();
        app.push_search_char('b');
        assert_eq!(app.filtered_indices, vec![1]);
        app.clear_search();
        assert_eq!(app.filtered_indices.len(), 3);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = loaded();
        app.move_up();
        assert_eq!(app.current_id().as_deref(), Some("c"));
        app.move_down();
        assert_eq!(app.current_id().as_deref(), Some("a"));
    }

    #[test]
    fn test_failed_load_keeps_previous_catalog() {
        let mut app = loaded();
        app.catalog_failed("offline");
        assert_eq!(app.catalog.len(), 3);
        assert!(matches!(app.catalog_status, CatalogStatus::Failed(_)));
    }

    #[test]
    fn test_log_keeps_last_three() {
        let mut app = App::new(PlatformTag::Web);
        for i in 0..5 {
            app.log(format!("line {i}"), LogLevel::Info);
        }
        assert_eq!(app.logs.len(), 3);
        assert_eq!(app.logs[0].message, "line 2");
    }
}
