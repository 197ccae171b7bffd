use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use socialsaver_core::display::{
    card_description, card_title, category_badge, long_date, one_line, preview_summary,
    relative_time, tag_label,
};
use socialsaver_core::view::local_now;
use socialsaver_core::{resolve_embed, Item, ItemId, ItemStore, LoadOutcome, ViewModel};
use std::io;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

use crate::theme::DashTheme;

const DELETE_CONFIRM: Duration = Duration::from_millis(1500);
const SIDEBAR_WIDTH: u16 = 28;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub struct DashOptions {
    pub theme: DashTheme,
    pub toast: Duration,
}

impl Default for DashOptions {
    fn default() -> Self {
        Self {
            theme: DashTheme::default(),
            toast: Duration::from_millis(1500),
        }
    }
}

pub fn run_dashboard(store: &dyn ItemStore, vm: &mut ViewModel, opts: &DashOptions) -> Result<()> {
    let mut es = RealEventSource;
    let _ = run_dashboard_with(store, vm, opts, &mut es, true)?;
    Ok(())
}

pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}
pub struct RealEventSource;
impl EventSource for RealEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if crossterm::event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Runs the dashboard until the user quits. Returns the id of the last item
/// opened for preview, if any.
pub fn run_dashboard_with(
    store: &dyn ItemStore,
    vm: &mut ViewModel,
    opts: &DashOptions,
    es: &mut dyn EventSource,
    draw: bool,
) -> Result<Option<ItemId>> {
    let mut terminal = if draw {
        if let Ok((w, _)) = crossterm::terminal::size() {
            vm.fit_viewport(w);
        }
        Some(enter_terminal()?)
    } else {
        None
    };

    let res = event_loop(store, vm, opts, es, terminal.as_mut());

    if draw {
        disable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    }
    res
}

fn enter_terminal() -> Result<Term> {
    enable_raw_mode()?;
    restore_on_err(
        || {
            let mut stdout = io::stdout();
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        restore_terminal,
    )
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen);
}

/// Runs `setup`, calling `restore` before handing back its error.
fn restore_on_err<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    let out = setup();
    if out.is_err() {
        restore();
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Normal,
    Query,
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Toast {
    msg: String,
    until: Instant,
    error: bool,
}

struct Session {
    mode: Mode,
    cursor: usize,
    toast: Option<Toast>,
    pending_delete: Option<(ItemId, Instant)>,
    opened: Option<ItemId>,
    toast_for: Duration,
}

fn event_loop(
    store: &dyn ItemStore,
    vm: &mut ViewModel,
    opts: &DashOptions,
    es: &mut dyn EventSource,
    mut terminal: Option<&mut Term>,
) -> Result<Option<ItemId>> {
    let mut s = Session {
        mode: Mode::Normal,
        cursor: 0,
        toast: None,
        pending_delete: None,
        opened: None,
        toast_for: opts.toast,
    };
    if !vm.is_loaded() {
        s.reload(store, vm);
    }

    loop {
        let now = local_now();
        let ids: Vec<ItemId> = vm.visible_at(now).iter().map(|i| i.id).collect();
        if s.cursor >= ids.len() {
            s.cursor = ids.len().saturating_sub(1);
        }
        if s.toast.as_ref().is_some_and(|t| Instant::now() > t.until) {
            s.toast = None;
        }

        if let Some(term) = terminal.as_mut() {
            let view: &ViewModel = vm;
            term.draw(|f| render(f, view, &s, &opts.theme, now))?;
        }

        let Some(ev) = es.poll(Duration::from_millis(100))? else {
            continue;
        };
        match ev {
            Event::Resize(w, _) => vm.fit_viewport(w),
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if s.handle_key(k, store, vm, &ids) == Flow::Quit {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(s.opened)
}

impl Session {
    fn handle_key(
        &mut self,
        k: KeyEvent,
        store: &dyn ItemStore,
        vm: &mut ViewModel,
        ids: &[ItemId],
    ) -> Flow {
        if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }

        // preview modal swallows everything but close and delete
        if let Some(open_id) = vm.selected().map(|i| i.id) {
            match k.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => vm.close_preview(),
                KeyCode::Delete | KeyCode::Char('x') => self.request_delete(store, vm, open_id),
                _ => {}
            }
            return Flow::Continue;
        }

        if self.mode == Mode::Query {
            match k.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('/') => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    let mut q = vm.filter_state().search.clone();
                    q.pop();
                    vm.set_search(q);
                    self.cursor = 0;
                }
                KeyCode::Char(ch) => {
                    let mut q = vm.filter_state().search.clone();
                    q.push(ch);
                    vm.set_search(q);
                    self.cursor = 0;
                }
                KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
                KeyCode::Down => self.move_down(ids.len()),
                _ => {}
            }
            return Flow::Continue;
        }

        match k.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('/') => self.mode = Mode::Query,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(ids.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = ids.len().saturating_sub(1),
            KeyCode::Enter => {
                if let Some(&id) = ids.get(self.cursor) {
                    self.opened = Some(id);
                    if let Err(e) = vm.open(store, id) {
                        self.error(format!("Could not mark as seen: {e}"));
                    }
                }
            }
            KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('X') => {
                if let Some(&id) = ids.get(self.cursor) {
                    self.request_delete(store, vm, id);
                }
            }
            KeyCode::Char('c') => {
                vm.cycle_category();
                self.cursor = 0;
            }
            KeyCode::Char('p') => {
                vm.cycle_platform();
                self.cursor = 0;
            }
            KeyCode::Char('t') => {
                vm.cycle_time_range();
                self.cursor = 0;
            }
            KeyCode::Char('s') => {
                vm.cycle_sort();
                self.cursor = 0;
            }
            KeyCode::Char('0') => {
                vm.reset_filters();
                self.cursor = 0;
                self.info("Filters cleared".into());
            }
            KeyCode::Char('b') => vm.toggle_sidebar(),
            KeyCode::Char('r') => self.reload(store, vm),
            _ => {}
        }
        Flow::Continue
    }

    fn move_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// First press arms, a second press on the same item within the window deletes.
    fn request_delete(&mut self, store: &dyn ItemStore, vm: &mut ViewModel, id: ItemId) {
        let now = Instant::now();
        let confirmed = self
            .pending_delete
            .is_some_and(|(pending, until)| pending == id && now <= until);
        if !confirmed {
            self.pending_delete = Some((id, now + DELETE_CONFIRM));
            self.toast = Some(Toast {
                msg: "Press x again to delete".into(),
                until: now + DELETE_CONFIRM,
                error: false,
            });
            return;
        }
        self.pending_delete = None;
        match vm.delete(store, id) {
            Ok(()) => self.info("Deleted".into()),
            Err(e) => self.error(format!("Delete failed: {e}")),
        }
    }

    fn reload(&mut self, store: &dyn ItemStore, vm: &mut ViewModel) {
        match vm.refresh(store) {
            Ok(LoadOutcome::Applied { count }) => self.info(format!("Loaded {count} items")),
            Ok(LoadOutcome::Stale) => {}
            Err(e) => self.error(format!("Refresh failed: {e}")),
        }
    }

    fn info(&mut self, msg: String) {
        self.toast = Some(Toast {
            msg,
            until: Instant::now() + self.toast_for,
            error: false,
        });
    }

    fn error(&mut self, msg: String) {
        // errors linger twice as long
        self.toast = Some(Toast {
            msg,
            until: Instant::now() + self.toast_for * 2,
            error: true,
        });
    }
}

fn render(f: &mut Frame, vm: &ViewModel, s: &Session, thm: &DashTheme, now: OffsetDateTime) {
    let area = f.area();
    let border = Style::default().fg(thm.border_fg);

    let main = if vm.sidebar_open() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        render_sidebar(f, vm, thm, cols[0]);
        cols[1]
    } else {
        area
    };

    let show_search = s.mode == Mode::Query || !vm.filter_state().search.is_empty();
    let mut constraints = Vec::with_capacity(3);
    if show_search {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(5));
    constraints.push(Constraint::Length(4));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main);
    let (list_area, footer_area) = if show_search {
        let title = if s.mode == Mode::Query {
            "Search: type to filter"
        } else {
            "Search"
        };
        let q = Paragraph::new(vm.filter_state().search.as_str())
            .block(Block::default().borders(Borders::ALL).title(title).border_style(border));
        f.render_widget(q, rows[0]);
        (rows[1], rows[2])
    } else {
        (rows[0], rows[1])
    };

    let visible = vm.visible_at(now);
    let heading = format!(
        "Collection: {} of {} • {}",
        visible.len(),
        vm.items().len(),
        vm.sort_key().label()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(heading)
        .border_style(border);
    if !vm.is_loaded() {
        let p = Paragraph::new("Loading collection…").block(block);
        f.render_widget(p, list_area);
    } else if visible.is_empty() {
        let p = Paragraph::new(vec![
            Line::from("No items found in this section."),
            Line::from("Press 0 to reset filters.").style(Style::default().add_modifier(Modifier::DIM)),
        ])
        .block(block);
        f.render_widget(p, list_area);
    } else {
        let width = list_area.width.saturating_sub(6) as usize;
        let list_items: Vec<ListItem> = visible
            .iter()
            .map(|it| card(it, thm, now, width))
            .collect();
        let list = List::new(list_items).block(block).highlight_style(
            Style::default()
                .fg(thm.highlight_fg)
                .bg(thm.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(
            list,
            list_area,
            &mut ListState::default().with_selected(Some(s.cursor)),
        );
    }

    let ln1 = "/ search | c category | p platform | t range | s sort | 0 reset | b sidebar";
    let ln2 = "Enter preview | x delete | r refresh | Esc/q quit | ↑/↓ move";
    let mut lines = vec![Line::raw(ln1), Line::raw(ln2)];
    if let Some(t) = &s.toast {
        let style = if t.error {
            Style::default().fg(thm.error_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines[1] = Line::from(vec![Span::raw(ln2), Span::raw("  • "), Span::styled(t.msg.as_str(), style)]);
    }
    let footer = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Shortcuts").border_style(border))
        .style(Style::default().fg(thm.help_fg))
        .wrap(Wrap { trim: true });
    f.render_widget(footer, footer_area);

    if let Some(item) = vm.selected() {
        render_preview(f, item, thm, now, area);
    }
}

fn card<'a>(it: &Item, thm: &DashTheme, now: OffsetDateTime, width: usize) -> ListItem<'a> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let marker = if it.is_seen {
        Span::raw("  ")
    } else {
        Span::styled("● ", Style::default().fg(thm.unseen_fg))
    };
    let title = Line::from(vec![marker, Span::raw(one_line(card_title(it), width))]);
    let meta = Line::from(format!(
        "  {} • {} • {}",
        it.item_type.label(),
        category_badge(it),
        relative_time(it.created_at, now)
    ))
    .style(dim);
    let desc = Line::from(format!("  {}", one_line(card_description(it), width))).style(dim);
    ListItem::new(vec![title, meta, desc])
}

fn render_sidebar(f: &mut Frame, vm: &ViewModel, thm: &DashTheme, area: Rect) {
    let fs = vm.filter_state();
    let current = fs.category.to_string();
    let mut lines = vec![Line::from("Categories").style(Style::default().add_modifier(Modifier::BOLD))];
    for cat in vm.categories() {
        if cat == current {
            lines.push(Line::from(format!("› {cat}")).style(
                Style::default().fg(thm.highlight_bg).add_modifier(Modifier::BOLD),
            ));
        } else {
            lines.push(Line::from(format!("  {cat}")));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(format!("Platform: {}", platform_label(vm))));
    lines.push(Line::from(format!("Range: {}", fs.time_range.label())));
    lines.push(Line::from(format!("Sort: {}", vm.sort_key().label())));
    if vm.is_refreshing() {
        lines.push(Line::from("Refreshing…").style(Style::default().add_modifier(Modifier::DIM)));
    }
    if let Some(err) = vm.last_error() {
        lines.push(Line::raw(""));
        lines.push(Line::from(err.to_string()).style(Style::default().fg(thm.error_fg)));
    }
    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filters")
                .border_style(Style::default().fg(thm.border_fg)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn platform_label(vm: &ViewModel) -> String {
    match &vm.filter_state().platform {
        socialsaver_core::Choice::All => socialsaver_core::view::ALL.to_string(),
        socialsaver_core::Choice::Only(p) => p.label().to_string(),
    }
}

fn render_preview(f: &mut Frame, item: &Item, thm: &DashTheme, now: OffsetDateTime, area: Rect) {
    let popup = centered_rect(80, 80, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let embed = resolve_embed(&item.url);

    let mut lines = vec![
        Line::from(card_title(item).to_string()).style(bold),
        Line::from(format!(
            "{} • {} • Saved {} ({})",
            item.item_type.label(),
            category_badge(item),
            long_date(item.created_at),
            relative_time(item.created_at, now)
        ))
        .style(dim),
        Line::raw(""),
        Line::from(format!("Link: {}", item.url)),
    ];
    match &embed.embed_url {
        Some(u) => lines.push(Line::from(format!("Player: {u}"))),
        None => lines.push(Line::from("Preview not available for this platform.").style(dim)),
    }
    lines.push(Line::raw(""));
    lines.push(Line::from("Summary").style(bold));
    lines.push(Line::from(preview_summary(item).to_string()));
    if let Some(caption) = item.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::from("Original Caption").style(bold));
        lines.extend(caption.lines().map(|l| Line::from(l.to_string())));
    }
    if !item.hashtags.is_empty() {
        lines.push(Line::raw(""));
        let tags: Vec<String> = item.hashtags.iter().map(|t| tag_label(t)).collect();
        lines.push(Line::from(format!("Tags: {}", tags.join(", "))));
    }

    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Preview (Esc close, x delete)")
                .border_style(Style::default().fg(thm.highlight_bg)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn centered_rect(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(rows[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use socialsaver_core::{MemStore, StoreError};
    use std::collections::VecDeque;

    #[test]
    fn failed_terminal_setup_is_restored() {
        let restored = std::cell::Cell::new(false);
        let res: Result<()> = restore_on_err(
            || anyhow::bail!("alternate screen unavailable"),
            || restored.set(true),
        );
        assert!(res.is_err());
        assert!(restored.get());

        restored.set(false);
        let ok = restore_on_err(|| Ok(3), || restored.set(true)).unwrap();
        assert_eq!(ok, 3);
        assert!(!restored.get());
    }

    /// Replays queued events, then sends Ctrl-C so the loop always ends.
    struct FakeEvents {
        events: VecDeque<Event>,
    }
    impl EventSource for FakeEvents {
        fn poll(&mut self, _timeout: Duration) -> anyhow::Result<Option<Event>> {
            Ok(Some(self.events.pop_front().unwrap_or_else(|| {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: KeyEventKind::Press,
                    state: KeyEventState::NONE,
                })
            })))
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn keys(codes: &[KeyCode]) -> FakeEvents {
        FakeEvents {
            events: codes.iter().copied().map(key).collect(),
        }
    }

    fn store() -> MemStore {
        let now = OffsetDateTime::now_utc();
        let mut pasta = Item::new(1, "https://youtu.be/abc123", now - time::Duration::days(2));
        pasta.title = Some("Pasta".into());
        pasta.category = Some("Food".into());
        pasta.hashtags = vec!["#pasta".into()];
        let mut gym = Item::new(2, "https://www.instagram.com/p/gym/", now - time::Duration::days(10));
        gym.title = Some("Gym".into());
        gym.category = Some("Fitness".into());
        gym.hashtags = vec!["#gym".into()];
        MemStore::with_items(vec![pasta, gym])
    }

    fn run(store: &dyn ItemStore, vm: &mut ViewModel, es: &mut FakeEvents) -> Option<ItemId> {
        run_dashboard_with(store, vm, &DashOptions::default(), es, false).unwrap()
    }

    #[test]
    fn search_then_open_marks_seen() {
        let store = store();
        let mut vm = ViewModel::new();
        let mut es = keys(&[
            KeyCode::Char('/'),
            KeyCode::Char('g'),
            KeyCode::Char('y'),
            KeyCode::Char('m'),
            KeyCode::Enter, // leave search mode, filter stays
            KeyCode::Enter, // open preview
        ]);
        let opened = run(&store, &mut vm, &mut es);
        assert_eq!(opened, Some(2));
        assert_eq!(vm.selected().map(|i| i.id), Some(2));
        assert!(store.get(2).unwrap().is_seen);
        assert!(!store.get(1).unwrap().is_seen);
        assert_eq!(vm.filter_state().search, "gym");
    }

    #[test]
    fn typed_keys_in_search_are_not_commands() {
        let store = store();
        let mut vm = ViewModel::new();
        // 'x' twice while searching must not delete anything
        let mut es = keys(&[
            KeyCode::Char('/'),
            KeyCode::Char('x'),
            KeyCode::Char('x'),
            KeyCode::Backspace,
            KeyCode::Backspace,
        ]);
        run(&store, &mut vm, &mut es);
        assert_eq!(store.list().unwrap().len(), 2);
        assert_eq!(vm.filter_state().search, "");
    }

    #[test]
    fn double_x_deletes_top_item() {
        let store = store();
        let mut vm = ViewModel::new();
        let mut es = keys(&[KeyCode::Char('x'), KeyCode::Char('x')]);
        run(&store, &mut vm, &mut es);
        // newest first puts Pasta on top
        let left: Vec<ItemId> = store.list().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(left, vec![2]);
        assert_eq!(vm.items().len(), 1);
    }

    #[test]
    fn single_x_only_arms_delete() {
        let store = store();
        let mut vm = ViewModel::new();
        let mut es = keys(&[KeyCode::Char('x'), KeyCode::Down, KeyCode::Char('x')]);
        run(&store, &mut vm, &mut es);
        // second press landed on another item, so it only re-armed
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn category_cycle_then_open() {
        let store = store();
        let mut vm = ViewModel::new();
        // All -> Food -> Fitness
        let mut es = keys(&[KeyCode::Char('c'), KeyCode::Char('c'), KeyCode::Enter]);
        let opened = run(&store, &mut vm, &mut es);
        assert_eq!(opened, Some(2));
        assert_eq!(vm.filter_state().category.to_string(), "Fitness");
    }

    #[test]
    fn esc_closes_preview_before_quitting() {
        let store = store();
        let mut vm = ViewModel::new();
        let mut es = keys(&[KeyCode::Enter, KeyCode::Esc, KeyCode::Char('s')]);
        run(&store, &mut vm, &mut es);
        assert!(vm.selected().is_none());
        // 's' was handled after the preview closed
        assert_eq!(vm.sort_key(), socialsaver_core::SortKey::Oldest);
    }

    #[test]
    fn delete_failure_keeps_list() {
        struct NoDelete(MemStore);
        impl ItemStore for NoDelete {
            fn list(&self) -> Result<Vec<Item>, StoreError> {
                self.0.list()
            }
            fn delete(&self, _id: ItemId) -> Result<(), StoreError> {
                Err(StoreError::Network("offline".into()))
            }
            fn update(
                &self,
                id: ItemId,
                patch: &socialsaver_core::ItemPatch,
            ) -> Result<Item, StoreError> {
                self.0.update(id, patch)
            }
        }
        let store = NoDelete(store());
        let mut vm = ViewModel::new();
        let mut es = keys(&[KeyCode::Char('x'), KeyCode::Char('x')]);
        run(&store, &mut vm, &mut es);
        assert_eq!(vm.items().len(), 2);
        assert!(vm.last_error().unwrap().contains("delete failed"));
    }

    #[test]
    fn narrow_resize_hides_sidebar() {
        let store = store();
        let mut vm = ViewModel::new();
        let mut es = FakeEvents {
            events: VecDeque::from([Event::Resize(60, 30)]),
        };
        run(&store, &mut vm, &mut es);
        assert!(!vm.sidebar_open());
    }
}
