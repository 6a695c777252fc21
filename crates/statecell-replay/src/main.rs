use anyhow::{Context, Result};
use clap::Parser;
use statecell::Observable;
use statecell_config::ReplayConfig;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::rc::Rc;

mod logger;
mod reducers;
mod replay;

use replay::AppState;

/// Replay a JSON-lines action log through a statecell store
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of .statecell.toml / the global config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the state after every dispatched action
    #[arg(long)]
    each: bool,

    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,

    /// Action log to replay, reads stdin when omitted
    actions: Option<PathBuf>,
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReplayConfig::load_from(path)?,
        None => ReplayConfig::load(),
    };
    if cli.each {
        config.print_each_state = true;
    }
    if cli.compact {
        config.pretty = false;
    }
    log::debug!("Replay config: {:?}", config);

    let store = replay::build_store(&config)?;

    let pretty = config.pretty;
    let _subscription = if config.print_each_state {
        let observer = move |state: &Rc<AppState>| match replay::render(state, pretty) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => log::error!("{:#}", e),
        };
        Some(Observable::new(&store).subscribe(observer)?)
    } else {
        None
    };

    let summary = match &cli.actions {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open action log {}", path.display()))?;
            replay::replay(BufReader::new(file), &store)?
        }
        None => replay::replay(io::stdin().lock(), &store)?,
    };
    log::info!(
        "Replayed {} actions ({} rejected)",
        summary.dispatched,
        summary.rejected
    );

    if !config.print_each_state {
        let state = store.get_state()?;
        println!("{}", replay::render(&state, pretty)?);
    }

    Ok(())
}
