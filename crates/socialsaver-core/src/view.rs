//! Collection view-model.
//!
//! Holds the loaded item list plus the search/filter/sort/selection state and
//! derives the displayed subset from them. Derivation is pure given
//! `(items, filter state, now)`; mutations of the list only happen after the
//! store has confirmed them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use time::{Date, Duration, Month, OffsetDateTime};
use tracing::{debug, warn};

use crate::{Item, ItemId, ItemPatch, ItemStore, Platform, StoreError};

/// Label of the catch-all category/platform entry.
pub const ALL: &str = "All";

/// Viewports narrower than this many columns collapse the sidebar.
pub const NARROW_WIDTH: u16 = 80;

/// A facet selection: everything, or exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(wanted),
        }
    }
}

impl Choice<String> {
    /// `"All"` selects everything; any other label selects that category verbatim.
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Choice::All
        } else {
            Choice::Only(label.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL),
            Choice::Only(v) => v.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    AllTime,
    Today,
    ThisWeek,
    ThisMonth,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            TimeRange::AllTime => "All Time",
            TimeRange::Today => "Today",
            TimeRange::ThisWeek => "This Week",
            TimeRange::ThisMonth => "This Month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeRange::AllTime => TimeRange::Today,
            TimeRange::Today => TimeRange::ThisWeek,
            TimeRange::ThisWeek => TimeRange::ThisMonth,
            TimeRange::ThisMonth => TimeRange::AllTime,
        }
    }

    /// Whether an item created at `created_at` falls in this range, evaluated at `now`.
    pub fn contains(self, created_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        match self {
            TimeRange::AllTime => true,
            TimeRange::Today => created_at.to_offset(now.offset()).date() == now.date(),
            TimeRange::ThisWeek => created_at >= now - Duration::days(7),
            TimeRange::ThisMonth => created_at >= one_month_before(now),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "all" | "alltime" => Ok(TimeRange::AllTime),
            "today" => Ok(TimeRange::Today),
            "week" | "thisweek" => Ok(TimeRange::ThisWeek),
            "month" | "thismonth" => Ok(TimeRange::ThisMonth),
            _ => Err(format!(
                "unknown time range '{s}' (expected all, today, week, month)"
            )),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Alpha,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::Alpha => "A-Z Order",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Newest => SortKey::Oldest,
            SortKey::Oldest => SortKey::Alpha,
            SortKey::Alpha => SortKey::Newest,
        }
    }

    pub fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::Alpha => {
                let (a, b) = (title_key(a), title_key(b));
                a.to_lowercase()
                    .cmp(&b.to_lowercase())
                    .then_with(|| a.cmp(b))
            }
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "alpha" | "a-z" | "az" => Ok(SortKey::Alpha),
            _ => Err(format!("unknown sort '{s}' (expected newest, oldest, alpha)")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn title_key(item: &Item) -> &str {
    item.title.as_deref().unwrap_or("")
}

/// Filter criteria applied to the item list. Every active criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring matched against title, summary, category and hashtags.
    pub search: String,
    pub category: Choice<String>,
    pub platform: Choice<Platform>,
    pub time_range: TimeRange,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.category.is_all()
            && self.platform.is_all()
            && self.time_range == TimeRange::AllTime
    }

    pub fn matches(&self, item: &Item, now: OffsetDateTime) -> bool {
        matches_search(item, &self.search.to_lowercase())
            && self.category.matches(item.category.as_ref())
            && self.platform.matches(Some(&item.item_type))
            && self.time_range.contains(item.created_at, now)
    }
}

fn matches_search(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |s: &str| s.to_lowercase().contains(needle);
    item.title.as_deref().is_some_and(hit)
        || item.summary.as_deref().is_some_and(hit)
        || item.category.as_deref().is_some_and(hit)
        || item.hashtags.iter().any(|t| hit(t.as_str()))
}

fn one_month_before(now: OffsetDateTime) -> OffsetDateTime {
    let date = now.date();
    let month = date.month().previous();
    let year = if month == Month::December {
        date.year() - 1
    } else {
        date.year()
    };
    // clamp e.g. Mar 31 -> Feb 28/29
    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .map(|d| now.replace_date(d))
        .unwrap_or_else(|| now - Duration::days(30))
}

/// `"All"` followed by every distinct non-empty category, in first-seen order.
pub fn derive_categories(items: &[Item]) -> Vec<String> {
    let mut out = vec![ALL.to_string()];
    for c in items.iter().filter_map(|i| i.category.as_deref()) {
        if !c.is_empty() && !out.iter().any(|seen| seen == c) {
            out.push(c.to_string());
        }
    }
    out
}

/// `All` followed by every distinct platform, in first-seen order.
pub fn derive_platforms(items: &[Item]) -> Vec<Choice<Platform>> {
    let mut out = vec![Choice::All];
    for item in items {
        let p = Choice::Only(item.item_type);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

pub fn filter(items: &[Item], state: &FilterState, now: OffsetDateTime) -> Vec<Item> {
    items
        .iter()
        .filter(|i| state.matches(i, now))
        .cloned()
        .collect()
}

/// Stable sort; ties keep their input order.
pub fn sort(items: &[Item], key: SortKey) -> Vec<Item> {
    let mut out = items.to_vec();
    out.sort_by(|a, b| key.compare(a, b));
    out
}

pub fn mark_seen(item: &Item) -> Item {
    Item {
        is_seen: true,
        ..item.clone()
    }
}

/// Current time in the local offset, falling back to UTC when the offset is unknown.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Token handed out by [`ViewModel::begin_load`]. Only the newest one may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was started after this one; its result was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    items: Vec<Item>,
    filter: FilterState,
    sort: SortKey,
    selected: Option<Item>,
    sidebar_open: bool,
    loaded: bool,
    refreshing: bool,
    last_error: Option<String>,
    issued: u64,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModel {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            filter: FilterState::default(),
            sort: SortKey::default(),
            selected: None,
            sidebar_open: true,
            loaded: false,
            refreshing: false,
            last_error: None,
            issued: 0,
        }
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            loaded: true,
            ..Self::new()
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn selected(&self) -> Option<&Item> {
        self.selected.as_ref()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn categories(&self) -> Vec<String> {
        derive_categories(&self.items)
    }

    pub fn platforms(&self) -> Vec<Choice<Platform>> {
        derive_platforms(&self.items)
    }

    /// Filtered and sorted view evaluated at `now`.
    pub fn visible_at(&self, now: OffsetDateTime) -> Vec<&Item> {
        let mut out: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| self.filter.matches(i, now))
            .collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }

    pub fn visible(&self) -> Vec<&Item> {
        self.visible_at(local_now())
    }

    pub fn set_search<S: Into<String>>(&mut self, search: S) {
        self.filter.search = search.into();
    }

    pub fn select_category(&mut self, label: &str) {
        self.filter.category = Choice::from_label(label);
    }

    pub fn select_platform(&mut self, platform: Choice<Platform>) {
        self.filter.platform = platform;
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.filter.time_range = range;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn cycle_category(&mut self) {
        let cats = self.categories();
        let current = self.filter.category.to_string();
        let next = match cats.iter().position(|c| *c == current) {
            Some(i) => &cats[(i + 1) % cats.len()],
            None => &cats[0],
        };
        self.filter.category = Choice::from_label(next);
    }

    pub fn cycle_platform(&mut self) {
        let platforms = self.platforms();
        let next = match platforms.iter().position(|p| *p == self.filter.platform) {
            Some(i) => platforms[(i + 1) % platforms.len()].clone(),
            None => Choice::All,
        };
        self.filter.platform = next;
    }

    pub fn cycle_time_range(&mut self) {
        self.filter.time_range = self.filter.time_range.next();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    /// Clears search, category, platform and time range. Sort and selection are kept.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn fit_viewport(&mut self, width: u16) {
        if width < NARROW_WIDTH {
            self.sidebar_open = false;
        }
    }

    pub fn close_preview(&mut self) {
        self.selected = None;
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.refreshing = true;
        LoadTicket(self.issued)
    }

    /// Apply a finished load. Results for anything but the newest ticket are dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Item>, StoreError>,
    ) -> Result<LoadOutcome, StoreError> {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, newest = self.issued, "dropping stale load");
            return Ok(LoadOutcome::Stale);
        }
        self.refreshing = false;
        self.loaded = true;
        let items = result.map_err(|e| self.record_failure("refresh", e))?;
        let count = items.len();
        self.items = items;
        if let Some(sel) = self.selected.take() {
            self.selected = self.items.iter().find(|i| i.id == sel.id).cloned();
        }
        self.last_error = None;
        debug!(count, "collection loaded");
        Ok(LoadOutcome::Applied { count })
    }

    pub fn refresh(&mut self, store: &dyn ItemStore) -> Result<LoadOutcome, StoreError> {
        let ticket = self.begin_load();
        let result = store.list();
        self.finish_load(ticket, result)
    }

    /// Select an item for preview and mark it seen. The selection happens even
    /// when the seen update fails; the local copy then stays unseen.
    pub fn open(&mut self, store: &dyn ItemStore, id: ItemId) -> Result<(), StoreError> {
        let Some(item) = self.items.iter().find(|i| i.id == id).cloned() else {
            return Err(self.record_failure("open", StoreError::NotFound(id)));
        };
        let already_seen = item.is_seen;
        self.selected = Some(item);
        if already_seen {
            return Ok(());
        }
        self.update(store, id, &ItemPatch::seen()).map(|_| ())
    }

    pub fn update(
        &mut self,
        store: &dyn ItemStore,
        id: ItemId,
        patch: &ItemPatch,
    ) -> Result<Item, StoreError> {
        let mut updated = store
            .update(id, patch)
            .map_err(|e| self.record_failure("update", e))?;
        // The backend may not persist every patched field (is_seen has no
        // column upstream); the confirmed patch still applies locally.
        patch.apply(&mut updated);
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == id) {
            *slot = updated.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = Some(updated.clone());
        }
        Ok(updated)
    }

    /// Delete through the store; the local copy goes only once the store confirms.
    pub fn delete(&mut self, store: &dyn ItemStore, id: ItemId) -> Result<(), StoreError> {
        store
            .delete(id)
            .map_err(|e| self.record_failure("delete", e))?;
        self.items.retain(|i| i.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        debug!(id, "item deleted");
        Ok(())
    }

    fn record_failure(&mut self, op: &'static str, e: StoreError) -> StoreError {
        warn!(op, error = %e, "store operation failed");
        self.last_error = Some(format!("{op} failed: {e}"));
        e
    }
}
