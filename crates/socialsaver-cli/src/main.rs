use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use socialsaver_core::display::{
    card_title, category_badge, long_date, one_line, preview_summary, relative_time, tag_label,
};
use socialsaver_core::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use socialsaver_core::view::local_now;
use socialsaver_core::{
    resolve_embed, Choice, HttpStore, Item, ItemId, ItemPatch, ItemStore, JsonFileStore, MemStore,
    Platform, SortKey, StoreError, TimeRange, ViewModel,
};
use std::path::PathBuf;
use std::time::Duration;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

mod config;
mod dashboard;
mod theme;

use config::{Settings, Storage};

#[derive(Parser)]
#[command(
    name = "socialsaver",
    version,
    about = "Browse, filter and prune links saved to Social Saver"
)]
struct Cli {
    /// Item store backend (overrides settings)
    #[arg(long, global = true, value_enum)]
    store: Option<StoreKind>,
    /// Backend API base URL, e.g. http://localhost:8000/api/
    #[arg(long, global = true)]
    api: Option<String>,
    /// JSON snapshot used by the file backend
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Http,
    File,
    Mem,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive match on title, summary, category and hashtags
    #[arg(long)]
    search: Option<String>,
    /// Category name ("All" for every category)
    #[arg(long)]
    category: Option<String>,
    /// instagram | x | youtube | blog | other
    #[arg(long)]
    platform: Option<Platform>,
    /// all | today | week | month
    #[arg(long)]
    range: Option<TimeRange>,
    /// newest | oldest | alpha
    #[arg(long)]
    sort: Option<SortKey>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved items with filters applied
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Categories present in the collection
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// Platforms present in the collection
    Platforms {
        #[arg(long)]
        json: bool,
    },
    /// Show one item in full and mark it seen
    Show {
        id: ItemId,
        #[arg(long)]
        json: bool,
    },
    /// Mark an item seen
    Seen { id: ItemId },
    /// Re-file an item under another category
    SetCategory { id: ItemId, category: String },
    /// Delete an item
    Delete { id: ItemId },
    /// Resolve the embeddable player URL for a link
    Embed {
        url: String,
        #[arg(long)]
        json: bool,
    },
    /// Write the current collection to a JSON snapshot
    Snapshot {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print effective settings and paths
    Config {
        #[arg(long)]
        json: bool,
    },
    /// Interactive dashboard
    Dash {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // the dashboard owns the terminal; keep log lines off it unless asked for
    init_logging(if matches!(cli.command, Commands::Dash { .. }) {
        "off"
    } else {
        "warn"
    });
    let settings = config::load_settings();

    match &cli.command {
        Commands::List {
            filters,
            limit,
            json,
        } => {
            let store = open_store(&cli, &settings)?;
            let vm = load_view(store.as_ref(), &settings, filters)?;
            let now = local_now();
            let mut items = vm.visible_at(now);
            if let Some(n) = limit {
                items.truncate(*n);
            }
            if *json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for it in items {
                    println!("{}", list_line(it, now));
                }
            }
        }
        Commands::Categories { json } => {
            let store = open_store(&cli, &settings)?;
            let vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            let cats = vm.categories();
            if *json {
                println!("{}", serde_json::to_string_pretty(&cats)?);
            } else {
                for c in cats {
                    println!("{c}");
                }
            }
        }
        Commands::Platforms { json } => {
            let store = open_store(&cli, &settings)?;
            let vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            let names: Vec<String> = vm.platforms().iter().map(|p| p.to_string()).collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for n in names {
                    println!("{n}");
                }
            }
        }
        Commands::Show { id, json } => {
            let store = open_store(&cli, &settings)?;
            let mut vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            let item = open_for_show(&mut vm, store.as_ref(), *id)?;
            if *json {
                let out = serde_json::json!({
                    "item": item,
                    "embed": resolve_embed(&item.url),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_detail(item, local_now());
            }
        }
        Commands::Seen { id } => {
            let store = open_store(&cli, &settings)?;
            let mut vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            let already = vm.items().iter().any(|i| i.id == *id && i.is_seen);
            vm.open(store.as_ref(), *id)
                .with_context(|| format!("marking item {id} seen"))?;
            if already {
                println!("item {id} already seen");
            } else {
                println!("marked {id} seen");
            }
        }
        Commands::SetCategory { id, category } => {
            let category = category.trim();
            if category.is_empty() {
                bail!("category must not be empty");
            }
            let store = open_store(&cli, &settings)?;
            let mut vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            let item = vm
                .update(store.as_ref(), *id, &ItemPatch::category(category))
                .with_context(|| format!("updating item {id}"))?;
            println!("{}\t{}", item.id, category_badge(&item));
        }
        Commands::Delete { id } => {
            let store = open_store(&cli, &settings)?;
            let mut vm = load_view(store.as_ref(), &settings, &FilterArgs::default())?;
            vm.delete(store.as_ref(), *id)
                .with_context(|| format!("deleting item {id}"))?;
            println!("deleted {id}");
        }
        Commands::Embed { url, json } => {
            let embed = resolve_embed(url);
            let platform = Platform::detect(url);
            if *json {
                let out = serde_json::json!({
                    "item_type": platform,
                    "platform": embed.platform,
                    "embed_url": embed.embed_url,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("item_type\t{platform}");
                match embed.embed_url {
                    Some(u) => println!("embed_url\t{u}"),
                    None => println!("embed_url\t-"),
                }
            }
        }
        Commands::Snapshot { out } => {
            let store = open_store(&cli, &settings)?;
            let items = store.list().context("loading items")?;
            let target = JsonFileStore::new(config::expand(out));
            target
                .write_all(&items)
                .with_context(|| format!("writing {}", target.path().display()))?;
            println!("wrote {} items to {}", items.len(), target.path().display());
        }
        Commands::Config { json } => print_config(&settings, *json)?,
        Commands::Dash { filters } => {
            let store = open_store(&cli, &settings)?;
            let mut vm = ViewModel::new();
            apply_view_defaults(&mut vm, &settings);
            apply_filters(&mut vm, filters);
            let opts = dashboard::DashOptions {
                theme: theme::load_dash_theme(settings.theme()),
                toast: Duration::from_millis(settings.toast_ms()),
            };
            dashboard::run_dashboard(store.as_ref(), &mut vm, &opts)?;
        }
    }

    Ok(())
}

fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_env("SOCIALSAVER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Flags beat settings: `--store` first, then `--api`/`--file` imply a backend.
fn store_kind(cli: &Cli, settings: &Settings) -> StoreKind {
    if let Some(kind) = cli.store {
        return kind;
    }
    if cli.api.is_some() {
        return StoreKind::Http;
    }
    if cli.file.is_some() {
        return StoreKind::File;
    }
    match settings.storage {
        Storage::Http { .. } => StoreKind::Http,
        Storage::File { .. } => StoreKind::File,
    }
}

fn open_store(cli: &Cli, settings: &Settings) -> Result<Box<dyn ItemStore>> {
    let kind = store_kind(cli, settings);
    tracing::debug!(?kind, "opening store");
    Ok(match kind {
        StoreKind::Http => {
            let (base, timeout_ms) = match &settings.storage {
                Storage::Http {
                    base_url,
                    timeout_ms,
                } => (base_url.clone(), *timeout_ms),
                Storage::File { .. } => (None, None),
            };
            let base = cli
                .api
                .clone()
                .or(base)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT);
            Box::new(
                HttpStore::with_timeout(&base, timeout)
                    .with_context(|| format!("configuring backend at {base}"))?,
            )
        }
        StoreKind::File => {
            let configured = match &settings.storage {
                Storage::File { path } => path.clone(),
                Storage::Http { .. } => None,
            };
            let path = cli
                .file
                .clone()
                .or(configured)
                .map(|p| config::expand(&p))
                .unwrap_or_else(config::default_snapshot_path);
            Box::new(JsonFileStore::new(path))
        }
        StoreKind::Mem => Box::new(MemStore::new()),
    })
}

fn load_view(store: &dyn ItemStore, settings: &Settings, filters: &FilterArgs) -> Result<ViewModel> {
    let mut vm = ViewModel::new();
    apply_view_defaults(&mut vm, settings);
    apply_filters(&mut vm, filters);
    vm.refresh(store).map_err(describe).context("loading items")?;
    Ok(vm)
}

/// Opens the preview for `id`. A failed seen-update still shows the item;
/// the view model has already logged it.
fn open_for_show<'a>(vm: &'a mut ViewModel, store: &dyn ItemStore, id: ItemId) -> Result<&'a Item> {
    let opened = vm.open(store, id);
    match vm.selected() {
        Some(item) if item.id == id => Ok(item),
        _ => match opened {
            Err(StoreError::NotFound(_)) | Ok(()) => bail!("item {id} not found"),
            Err(e) => Err(describe(e)),
        },
    }
}

fn describe(e: StoreError) -> anyhow::Error {
    if e.is_network() {
        anyhow::Error::new(e).context("backend unreachable or unhealthy")
    } else {
        e.into()
    }
}

fn apply_view_defaults(vm: &mut ViewModel, settings: &Settings) {
    let Some(view) = &settings.view else {
        return;
    };
    if let Some(s) = view.default_sort.as_deref() {
        match s.parse::<SortKey>() {
            Ok(k) => vm.set_sort(k),
            Err(e) => tracing::warn!(error = %e, "ignoring view.default_sort"),
        }
    }
    if let Some(r) = view.default_range.as_deref() {
        match r.parse::<TimeRange>() {
            Ok(r) => vm.set_time_range(r),
            Err(e) => tracing::warn!(error = %e, "ignoring view.default_range"),
        }
    }
}

fn apply_filters(vm: &mut ViewModel, f: &FilterArgs) {
    if let Some(s) = &f.search {
        vm.set_search(s.clone());
    }
    if let Some(c) = &f.category {
        vm.select_category(c);
    }
    if let Some(p) = f.platform {
        vm.select_platform(Choice::Only(p));
    }
    if let Some(r) = f.range {
        vm.set_time_range(r);
    }
    if let Some(k) = f.sort {
        vm.set_sort(k);
    }
}

fn list_line(it: &Item, now: OffsetDateTime) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        it.id,
        if it.is_seen { " " } else { "*" },
        it.item_type,
        category_badge(it),
        one_line(card_title(it), 60),
        relative_time(it.created_at, now)
    )
}

fn print_detail(item: &Item, now: OffsetDateTime) {
    println!("{}", card_title(item));
    println!("{} • {}", item.item_type.label(), category_badge(item));
    println!(
        "Saved {} ({})",
        long_date(item.created_at),
        relative_time(item.created_at, now)
    );
    println!("Link: {}", item.url);
    match resolve_embed(&item.url).embed_url {
        Some(u) => println!("Player: {u}"),
        None => println!("Player: preview not available for this platform"),
    }
    println!();
    println!("Summary");
    println!("{}", preview_summary(item));
    if let Some(caption) = item.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        println!();
        println!("Original Caption");
        println!("{caption}");
    }
    if !item.hashtags.is_empty() {
        let tags: Vec<String> = item.hashtags.iter().map(|t| tag_label(t)).collect();
        println!();
        println!("Tags: {}", tags.join(", "));
    }
}

fn print_config(settings: &Settings, json: bool) -> Result<()> {
    let dir = config::config_dir();
    let path = config::settings_path();
    let theme_path = theme::theme_path(settings.theme());
    if json {
        let out = serde_json::json!({
            "config_dir": dir,
            "settings_path": path,
            "settings_exists": path.exists(),
            "theme_path": theme_path,
            "storage": settings.storage,
            "view": settings.view,
            "tui": settings.tui,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("config_dir\t{}", dir.display());
        println!(
            "settings\t{}{}",
            path.display(),
            if path.exists() { "" } else { " (missing, using defaults)" }
        );
        println!("theme\t{}", theme_path.display());
        println!();
        print!("{}", toml::to_string_pretty(settings)?);
    }
    Ok(())
}
