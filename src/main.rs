use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use railway_sim::simulation::{SaveData, SimWorld};

#[derive(Parser)]
#[command(name = "railway_sim")]
#[command(about = "Railway economy simulation, headless")]
struct Cli {
    /// Number of simulated days to run
    #[arg(long, default_value = "365")]
    days: u32,

    /// Seed for the demo scenario layout
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Clock speed multiplier (days advanced per tick, clamped to 1-6)
    #[arg(long, default_value = "1")]
    speed: u32,

    /// Draw the text map after the run
    #[arg(long)]
    map: bool,

    /// Write a snapshot of the final state to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Restore state from a snapshot JSON file instead of the demo scenario
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut world = match &cli.load {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening snapshot {}", path.display()))?;
            let data: SaveData = serde_json::from_reader(file)
                .with_context(|| format!("parsing snapshot {}", path.display()))?;
            info!("restoring snapshot from {}", path.display());
            data.restore(SimWorld::demo_map(cli.seed), SimWorld::demo_catalog()?)?
        }
        None => SimWorld::demo_scenario(cli.seed)?,
    };

    world.set_speed(cli.speed);
    info!(
        "starting run: {} days from {}, speed {}x, balance {}",
        cli.days,
        world.today(),
        world.speed(),
        world.balance()
    );

    // Advance in speed-sized ticks, the way a UI frame loop would.
    let mut remaining = cli.days;
    while remaining > 0 {
        let step = world.speed().min(remaining);
        world.advance(step);
        remaining -= step;
    }

    info!("SIMULATION COMPLETE");
    info!("Days simulated: {}", cli.days);
    info!("Final date: {}", world.today());
    info!("Final balance: {}", world.balance());
    for record in world.ledger().records() {
        info!(
            "Year {}: earnings {}, expenses {}, net {}",
            record.year,
            record.earning,
            record.total_expenses(),
            record.net_revenue()
        );
    }

    world.print_summary();
    if cli.map {
        world.draw_map();
    }

    if let Some(path) = &cli.save {
        let file = File::create(path)
            .with_context(|| format!("creating snapshot {}", path.display()))?;
        serde_json::to_writer_pretty(file, &SaveData::capture(&world))?;
        info!("snapshot written to {}", path.display());
    }

    Ok(())
}
