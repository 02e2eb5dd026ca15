use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use collatz_tree::config::{LEG_DEPTH_RANGE, MAX_K_RANGE};
use collatz_tree::report::write_report;
use collatz_tree::{categorize, generate_from, CollatzTree, Node, TreeConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "collatz-tree", about = "Collatz predecessor tree layout generator")]
struct Cli {
    /// Exponent of the topmost main-leg node (2^max_k).
    #[arg(long, default_value_t = 12, global = true)]
    max_k: u32,
    /// Number of doublings above every G1 node.
    #[arg(long, default_value_t = 6, global = true)]
    leg_depth: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print node counts, connected stations and the layout fingerprint.
    Summary,
    /// Write the tab-separated layout report.
    Report {
        /// Output file (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the category and style of one node (`42`, `∞_main`, `∞_5`).
    Classify {
        /// Node identity.
        node: String,
    },
    /// Write a JSON snapshot for external renderers.
    #[cfg(feature = "visualize")]
    Export {
        /// Output file (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "collatz_tree=info".into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TreeConfig::new(cli.max_k, cli.leg_depth)
        .context("invalid tree parameters")?;
    if !config.within_interactive_bounds() {
        warn!(
            max_k = config.max_k(),
            leg_depth = config.leg_depth(),
            "parameters outside the usual ranges {:?} / {:?}",
            MAX_K_RANGE,
            LEG_DEPTH_RANGE
        );
    }

    let tree = generate_from(config);
    info!(
        nodes = tree.node_count(),
        edges = tree.edge_count(),
        "generated tree"
    );

    match cli.command {
        Commands::Summary => print_summary(&tree),
        Commands::Report { output } => run_report(&tree, output)?,
        Commands::Classify { node } => run_classify(&tree, &node)?,
        #[cfg(feature = "visualize")]
        Commands::Export { output } => run_export(&tree, output)?,
    }

    Ok(())
}

fn print_summary(tree: &CollatzTree) {
    let cache = tree.cache_stats();
    println!("main leg\t{}", tree.main_leg().len());
    println!("g1 nodes\t{}", tree.g1_nodes().len());
    println!("g2 nodes\t{}", tree.g2_nodes().len());
    println!("nodes\t{}", tree.node_count());
    println!("edges\t{}", tree.edge_count());
    println!(
        "connected main-leg stations\t{}",
        tree.stations_with_odd_connection().len()
    );
    println!(
        "connected g1 stations\t{}",
        tree.g1_stations_with_odd_connection().len()
    );
    println!(
        "cache\thits={} misses={} entries={}",
        cache.hits, cache.misses, cache.entries
    );
    println!("fingerprint\t{}", tree.fingerprint().to_hex());
}

fn open_output(output: Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run_report(tree: &CollatzTree, output: Option<PathBuf>) -> Result<()> {
    let mut writer = open_output(output)?;
    write_report(&mut writer, tree).context("failed to write layout report")
}

fn run_classify(tree: &CollatzTree, raw: &str) -> Result<()> {
    let node: Node = raw.parse()?;
    if !tree.contains(node) {
        warn!(%node, "node is not part of this tree");
    }
    let category = categorize(node, &tree.classification_context());
    let style = category.style();
    println!(
        "{node}\t{category}\tfill={}\toutline={}\twidth={}\tsize={}",
        style.fill, style.outline, style.outline_width, style.size
    );
    Ok(())
}

#[cfg(feature = "visualize")]
fn run_export(tree: &CollatzTree, output: Option<PathBuf>) -> Result<()> {
    let snapshot = collatz_tree::export::TreeSnapshot::capture(tree);
    let json = snapshot.to_json().context("failed to serialize snapshot")?;
    let mut writer = open_output(output)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}
