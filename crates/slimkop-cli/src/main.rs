mod args;
mod render;

use std::cell::Cell;
use std::env;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use slimkop_core::clock::Clock;
use slimkop_core::clock::FixedClock;
use slimkop_core::clock::LocalClock;
use slimkop_core::config::Config;
use slimkop_core::error::ActionError;
use slimkop_core::persistence::FileStorage;
use slimkop_core::persistence::KeyValueStorage;
use slimkop_core::persistence::MemoryStorage;
use slimkop_core::PersistenceMode;
use slimkop_core::RoutineStore;
use slimkop_core::StoreOptions;
use slimkop_core::Theme;
use tracing_subscriber::EnvFilter;

use crate::args::Command;
use crate::args::Invocation;

type Store = RoutineStore<Box<dyn KeyValueStorage>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let invocation = args::parse_args(env::args().skip(1).collect())?;
    match invocation.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("slimkop {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let config_path = invocation.config.clone().or_else(default_config_path);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    init_tracing(&config.logging.filter);
    tracing::debug!(config = ?config_path, "configuration loaded");

    let storage = open_storage(&invocation, &config);
    let clock: Box<dyn Clock> = match invocation.date {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(LocalClock),
    };
    let theme = Rc::new(Cell::new(Theme::default()));
    let sink_theme = Rc::clone(&theme);
    let mut store = RoutineStore::load(storage, clock.as_ref(), StoreOptions::from(&config))
        .with_theme_sink(move |active: Theme| {
            if sink_theme.replace(active) != active {
                tracing::debug!(theme = active.label(), "theme applied");
            }
        });

    execute(&mut store, invocation.command)?;
    if store.mode() == PersistenceMode::InMemory {
        eprintln!("warning: storage unavailable, changes are kept for this run only");
    }
    print!(
        "{}",
        render::render_status(store.state(), store.options().gate, theme.get())
    );
    Ok(())
}

fn execute(store: &mut Store, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Status | Command::Help | Command::Version => {}
        Command::Toggle(id) => {
            if store.toggle_task(id)? {
                println!("🎉 {}", store.t("allDone"));
            }
        }
        Command::Reset { yes } => {
            if yes || prompt_confirm(store.t("startNewDay"))? {
                store.reset_progress()?;
            } else {
                println!("reset cancelled");
            }
        }
        Command::User(patch) => store.update_user(patch)?,
        Command::Add { phase, draft } => {
            let id = store.add_activity(phase, draft)?;
            println!("added {id}");
        }
        Command::Update { phase, id, edit } => {
            let Some(current) = store.state().find_activity(phase, &id).cloned() else {
                return Err(ActionError::UnknownActivity { phase, id }.into());
            };
            store.update_activity(phase, &id, edit.into_patch(&current))?;
        }
        Command::Remove { phase, id } => store.remove_activity(phase, &id)?,
        Command::Move { phase, from, to } => store.reorder_activities(phase, from, to)?,
        Command::Rename { phase, name } => store.update_phase_name(phase, name)?,
        Command::Translate(key) => {
            println!("{}", store.t(&key));
            return Ok(());
        }
    }
    Ok(())
}

fn open_storage(invocation: &Invocation, config: &Config) -> Box<dyn KeyValueStorage> {
    let dir = invocation
        .data_dir
        .clone()
        .or_else(|| config.storage.data_dir.clone())
        .or_else(|| dirs::data_dir().map(|dir| dir.join("slimkop")))
        .unwrap_or_else(|| PathBuf::from(".slimkop"));
    match FileStorage::open(&dir) {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot open data dir");
            Box::new(MemoryStorage::new())
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("slimkop").join("config.toml"))
}

fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn prompt_confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES" | "ja" | "JA"))
}

fn print_help() {
    println!("slimkop {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  slimkop [--data-dir DIR] [--config FILE] [--date YYYY-MM-DD] [COMMAND]");
    println!();
    println!("Commands:");
    println!("  status                              show today's checklist (default)");
    println!("  toggle ID                           tick or untick a task or sub-task");
    println!("  reset [--yes]                       clear today's progress");
    println!("  user [--name N] [--language af|en] [--theme meisie|seun] [--onboarded true|false]");
    println!("  add PHASE --icon NAME --en TEXT --af TEXT [--timer MIN]");
    println!("  update PHASE ID [--icon NAME] [--en TEXT] [--af TEXT] [--timer MIN | --no-timer]");
    println!("  remove PHASE ID");
    println!("  move PHASE FROM TO                  reorder, zero-based positions");
    println!("  rename PHASE --en TEXT --af TEXT");
    println!("  t KEY                               resolve a translation key");
    println!("  --help | --version");
    println!();
    println!("PHASE is one of arrival, organization, study.");
    println!("Logging honours RUST_LOG, falling back to [logging] filter in the config file.");
}
