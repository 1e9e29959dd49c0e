//! Seatwise - event seating planner
//!
//! Runs TOML scenarios through the layout engine, prints the resulting plan
//! and keeps saved layouts in a local SQLite database.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seatwise_core::{Footprint, LayoutRepository, LayoutStore, SessionCode, SessionContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;
mod scenario;
mod state;

/// Event seating planner
#[derive(Debug, Parser)]
#[command(name = "seatwise", version)]
struct Cli {
    /// Layout database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Planner configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Run a scenario file and print the resulting plan
    Run {
        scenario: PathBuf,
        /// Print the plan without saving it
        #[arg(long)]
        no_save: bool,
    },
    /// List saved layouts
    List,
    /// Print a saved layout
    Show { code: String },
    /// Delete a saved layout
    Delete { code: String },
}

fn run(cli: Cli) -> seatwise_core::Result<()> {
    let app = state::AppState::new(cli.db.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Command::Run { scenario, no_save } => {
            let scenario = scenario::Scenario::load(&scenario)?;
            let ctx = SessionContext::new(scenario.event, app.config.clone());
            let mut store = LayoutStore::new(ctx);
            let outcome = scenario.run(&mut store)?;

            let capacity = scenario.auto_arrange.as_ref().and_then(|section| {
                store
                    .estimate_capacity(
                        Footprint {
                            width: section.width,
                            height: section.height,
                        },
                        app.config.capacity.spacing_factor,
                    )
                    .ok()
            });
            print!("{}", report::render(&store, &outcome, capacity));

            if !no_save {
                app.db.save_layout(&store.snapshot())?;
                println!("\nSaved as {}", store.code());
            }
        }
        Command::List => {
            for layout in app.db.list_layouts()? {
                println!(
                    "{}  {:<10} {}  {} elements, {} people",
                    layout.code,
                    layout.kind.as_str(),
                    layout.saved_at.format("%Y-%m-%d %H:%M"),
                    layout.elements,
                    layout.people
                );
            }
        }
        Command::Show { code } => {
            let code = SessionCode(code);
            match app.db.load_layout(&code)? {
                Some(snapshot) => {
                    let ctx = SessionContext::new(snapshot.kind, app.config.clone());
                    let store = LayoutStore::restore(ctx, snapshot)?;
                    print!("{}", report::render(&store, &Default::default(), None));
                }
                None => println!("No layout saved as {}", code),
            }
        }
        Command::Delete { code } => {
            let code = SessionCode(code);
            if app.db.delete_layout(&code)? {
                println!("Deleted {}", code);
            } else {
                println!("No layout saved as {}", code);
            }
        }
    }
    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::info!(command = ?cli.command, "Starting Seatwise");

    if let Err(e) = run(cli) {
        tracing::error!("Seatwise failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
