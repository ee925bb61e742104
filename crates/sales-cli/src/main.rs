//! Smart-Sales CLI
//!
//! Command-line orchestrator for the sales warehouse pipeline: prepare the
//! raw extracts, initialize the warehouses, load them, build the OLAP
//! cubes, and run the goal analyses.

use clap::{Parser, Subcommand, ValueEnum};
use smartsales_core::{PipelineConfig, Result};
use smartsales_olap::{
    build_month_cube, build_region_cube, run_sales_by_region_goal, run_top_product_by_month_goal,
};
use smartsales_prep::datasets::prepare_all;
use smartsales_warehouse::loader::{
    load_smart_sales, load_store_returns, PreparedSmartSales, PreparedStoreReturns,
};
use smartsales_warehouse::WarehouseStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartsales")]
#[command(version, about = "Smart-sales warehouse pipeline", long_about = None)]
struct Cli {
    /// Root data directory (raw/, prepared/, dw/, ... live beneath it)
    #[arg(short, long, default_value = "data", global = true)]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw extracts into prepared CSVs
    Prep,

    /// Initialize both warehouse databases
    InitDw {
        /// Drop and recreate the warehouses if they exist
        #[arg(short, long)]
        force: bool,
    },

    /// Reload both warehouses from the prepared CSVs
    Load,

    /// Build the OLAP cubes from the loaded warehouse
    Cube,

    /// Run one goal analysis over the persisted cubes
    Goal {
        #[arg(value_enum)]
        goal: Goal,
    },

    /// Run the full pipeline: prep, init-dw, load, cube, both goals
    Run,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Goal {
    /// Which region produced the least revenue
    SalesByRegion,
    /// Each month's top product by revenue
    TopProductByMonth,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_data_dir(&cli.data_dir);

    let result = match cli.command {
        Commands::Prep => prep(&config),
        Commands::InitDw { force } => init_dw(&config, force),
        Commands::Load => load(&config),
        Commands::Cube => cube(&config),
        Commands::Goal { goal } => run_goal(&config, goal),
        Commands::Run => run_pipeline(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn prep(config: &PipelineConfig) -> Result<()> {
    prepare_all(config)?;
    println!("Prepared datasets written to '{}'", config.prepared_dir.display());
    Ok(())
}

fn init_dw(config: &PipelineConfig, force: bool) -> Result<()> {
    for store in [
        WarehouseStore::smart_sales(config),
        WarehouseStore::store_returns(config),
    ] {
        if force {
            store.reset()?;
        } else {
            store.create_if_absent()?;
        }
        println!("Warehouse ready at '{}'", store.path().display());
    }
    Ok(())
}

fn load(config: &PipelineConfig) -> Result<()> {
    let store = WarehouseStore::smart_sales(config);
    let mut conn = store.connect()?;
    let data = PreparedSmartSales::read_from(config)?;
    let summary = load_smart_sales(&mut conn, &data)?;
    println!(
        "Loaded {} customers, {} products, {} sales into '{}'",
        summary.customers,
        summary.products,
        summary.sales,
        store.path().display()
    );

    let store = WarehouseStore::store_returns(config);
    let mut conn = store.connect()?;
    let data = PreparedStoreReturns::read_from(config)?;
    let summary = load_store_returns(&mut conn, &data)?;
    println!(
        "Loaded {} products, {} salesreps, {} sales, {} returns into '{}'",
        summary.products,
        summary.salesreps,
        summary.sales,
        summary.returns,
        store.path().display()
    );
    Ok(())
}

fn cube(config: &PipelineConfig) -> Result<()> {
    let store = WarehouseStore::smart_sales(config);
    let conn = store.connect()?;

    let region = build_region_cube(&conn, config)?;
    let month = build_month_cube(&conn, config)?;
    println!(
        "Built region cube ({} groups) and month cube ({} groups) in '{}'",
        region.row_count(),
        month.row_count(),
        config.cube_dir.display()
    );
    Ok(())
}

fn run_goal(config: &PipelineConfig, goal: Goal) -> Result<()> {
    match goal {
        Goal::SalesByRegion => match run_sales_by_region_goal(config)? {
            Some(winner) => println!(
                "Lowest-revenue region: {} (total {:.2})",
                winner.region, winner.total_revenue
            ),
            None => println!("Region cube is empty; no answer."),
        },
        Goal::TopProductByMonth => {
            let winners = run_top_product_by_month_goal(config)?;
            if winners.is_empty() {
                println!("Month cube is empty; no answer.");
            }
            for winner in winners {
                println!(
                    "{}: product {} (total {:.2})",
                    winner.month, winner.product_id, winner.total_revenue
                );
            }
        }
    }
    Ok(())
}

fn run_pipeline(config: &PipelineConfig) -> Result<()> {
    prep(config)?;
    init_dw(config, false)?;
    load(config)?;
    cube(config)?;
    run_goal(config, Goal::SalesByRegion)?;
    run_goal(config, Goal::TopProductByMonth)?;
    println!("Pipeline complete.");
    Ok(())
}
