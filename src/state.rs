//! Application state - pagination, filters and the rendered page

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::coordinator;
use crate::sprite::SpriteArt;

/// Entries requested per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 21;

/// Cards per grid row. Vertical card movement steps by this amount.
pub const GRID_COLUMNS: usize = 3;

/// Maximum number of page-number controls shown at once.
pub const PAGE_WINDOW: u32 = 9;

/// Lightweight `{name, url}` form returned by the listing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntrySummary {
    pub name: String,
    pub url: String,
}

/// One page of the listing plus the provider's total entry count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub total_count: u32,
    pub results: Vec<EntrySummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntryStat {
    pub name: String,
    pub base_value: u16,
}

/// Full record for one catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntryDetail {
    pub name: String,
    /// Lookup reference the detail was fetched from.
    pub detail_url: String,
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<EntryStat>,
}

impl EntryDetail {
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|name| name == type_name)
    }

    pub fn type_line(&self) -> String {
        self.types.join(", ")
    }

    pub fn ability_line(&self) -> String {
        self.abilities.join(", ")
    }

    /// `statName: baseValue` pairs, one per line.
    pub fn stat_lines(&self) -> String {
        self.stats
            .iter()
            .map(|stat| format!("{}: {}", stat.name, stat.base_value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pagination metadata owned by the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// Unfiltered provider count from the last successful refresh.
    pub total_count: Option<u32>,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
            total_count: None,
        }
    }

    pub fn offset(&self) -> u32 {
        coordinator::page_offset(self.current_page, self.page_size)
    }

    pub fn is_known(&self) -> bool {
        self.total_count.is_some()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.is_known() && self.current_page < self.total_pages
    }

    /// Step back one page. Returns false (and changes nothing) on page 1.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Step forward one page. Returns false on the last page or while the
    /// total is still unknown.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Jump directly to `page` if it is a valid, different page.
    pub fn jump(&mut self, page: u32) -> bool {
        if !self.is_known() || page < 1 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Record a fresh provider count. Returns true when the current page had
    /// to be pulled back into range.
    pub fn apply_total(&mut self, total_count: u32) -> bool {
        self.total_count = Some(total_count);
        self.total_pages = coordinator::total_pages(total_count, self.page_size);
        let clamped = self.current_page.min(self.total_pages).max(1);
        if clamped != self.current_page {
            self.current_page = clamped;
            return true;
        }
        false
    }
}

impl PageState {
    /// Switch to `page_size`, recomputing the page count when the total is known.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        if let Some(total_count) = self.total_count {
            self.apply_total(total_count);
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// User-selected narrowing criteria, captured at the start of every refresh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterCriteria {
    pub search_text: String,
    pub type_filter: Option<String>,
    pub generation_filter: Option<String>,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        !self.search_text.is_empty()
            || self.type_filter.is_some()
            || self.generation_filter.is_some()
    }

    /// Case-insensitive substring match. An empty search matches everything.
    pub fn matches_search(&self, name: &str) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        name.to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }

    pub fn matches_type(&self, detail: &EntryDetail) -> bool {
        match &self.type_filter {
            Some(type_name) => detail.has_type(type_name),
            None => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    #[default]
    Grid,
    Pager,
}

impl FocusArea {
    pub fn toggle(self) -> Self {
        match self {
            FocusArea::Grid => FocusArea::Pager,
            FocusArea::Pager => FocusArea::Grid,
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Coordinator ---
    #[debug(section = "Page", label = "State", debug_fmt)]
    pub page: PageState,

    #[debug(section = "Filters", label = "Criteria", debug_fmt)]
    pub filters: FilterCriteria,

    /// Bumped on every refresh trigger; results tagged with an older value are dropped.
    #[debug(section = "Refresh", label = "Generation")]
    pub refresh_generation: u64,

    #[debug(section = "Refresh", label = "In flight")]
    pub refreshing: bool,

    #[debug(section = "Refresh", label = "Message", debug_fmt)]
    pub message: Option<String>,

    /// Entries from the last successful refresh, in listing order.
    #[debug(skip)]
    pub entries: Vec<EntryDetail>,

    /// Page the current `entries` belong to.
    #[debug(section = "Refresh", label = "Shown page", debug_fmt)]
    pub shown_page: Option<u32>,

    // --- Presenter ---
    #[debug(section = "View", label = "Focus", debug_fmt)]
    pub focus: FocusArea,

    #[debug(section = "View", label = "Selected card")]
    pub selected: usize,

    #[debug(section = "View", label = "Pager cursor")]
    pub pager_cursor: u32,

    #[debug(section = "View", label = "Editing search")]
    pub search_active: bool,

    /// Detail overlay: Empty means closed.
    #[debug(skip)]
    pub detail: DataResource<EntryDetail>,

    #[debug(skip)]
    pub detail_url: Option<String>,

    #[debug(skip)]
    pub type_options: Vec<String>,

    #[debug(skip)]
    pub generation_options: Vec<String>,

    /// Sprites for the shown entries and the open detail. Refetched after a restore.
    #[debug(skip)]
    #[serde(skip)]
    pub sprites: HashMap<String, SpriteArt>,

    /// Names whose sprite was already requested (loaded, pending or failed).
    #[debug(skip)]
    #[serde(skip)]
    pub sprites_requested: HashSet<String>,
}

impl AppState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: PageState::new(page_size),
            filters: FilterCriteria::default(),
            refresh_generation: 0,
            refreshing: false,
            message: None,
            entries: Vec::new(),
            shown_page: None,
            focus: FocusArea::Grid,
            selected: 0,
            pager_cursor: 1,
            search_active: false,
            detail: DataResource::Empty,
            detail_url: None,
            type_options: Vec::new(),
            generation_options: Vec::new(),
            sprites: HashMap::new(),
            sprites_requested: HashSet::new(),
        }
    }

    pub fn selected_entry(&self) -> Option<&EntryDetail> {
        self.entries.get(self.selected)
    }

    pub fn entry_by_url(&self, url: &str) -> Option<&EntryDetail> {
        self.entries.iter().find(|entry| entry.detail_url == url)
    }

    /// Drop sprites that belong to neither the shown entries nor the open detail.
    pub fn prune_sprites(&mut self) {
        let keep: HashSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .chain(self.detail.data().map(|detail| detail.name.as_str()))
            .collect();
        self.sprites.retain(|name, _| keep.contains(name.as_str()));
        self.sprites_requested
            .retain(|name| keep.contains(name.as_str()));
    }

    pub fn shows_sprite_for(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
            || self.detail.data().is_some_and(|detail| detail.name == name)
    }

    pub fn detail_open(&self) -> bool {
        !self.detail.is_empty()
    }

    pub fn page_indicator(&self) -> String {
        format!("Page: {}", self.page.current_page)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
