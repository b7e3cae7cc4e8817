//! Multimodal Route Planner - Command Line Interface
//!
//! Finds routes through a multimodal transport network loaded from CSV files.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use multimodal_router::benchmark::{all_queries, Benchmark, BenchmarkConfig};
use multimodal_router::loader::load_graph;
use multimodal_router::route::RouteSummary;
use multimodal_router::search::{
    bounded_round_search, constrained_search, evolutionary_search, HeuristicKind,
};
use multimodal_router::{Mode, Result, SearchConfig, TransportGraph};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "multimodal-router")]
#[command(version = "1.0")]
#[command(about = "Multi-objective route planner for multimodal transport networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search routes between two nodes
    Route {
        /// Path to nodes.csv
        #[arg(long, default_value = "data/nodes.csv")]
        nodes: PathBuf,

        /// Path to edges.csv
        #[arg(long, default_value = "data/edges.csv")]
        edges: PathBuf,

        /// Start node id
        #[arg(long)]
        from: String,

        /// Goal node id
        #[arg(long)]
        to: String,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "all")]
        algorithm: Algorithm,

        /// JSON search configuration; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Allowed modes for the best-first and bounded-round searches
        #[arg(long, value_enum, value_delimiter = ',')]
        modes: Vec<CliMode>,

        /// Maximum total cost (best-first)
        #[arg(long)]
        max_cost: Option<f64>,

        /// Maximum total travel time in minutes (best-first)
        #[arg(long)]
        max_time: Option<f64>,

        /// Use the fixed-speed heuristic with this speed (planar units per minute)
        #[arg(long)]
        heuristic_speed: Option<f64>,

        /// Number of relaxation rounds (bounded-round)
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Number of generations (evolutionary)
        #[arg(long)]
        generations: Option<usize>,

        /// Population size (evolutionary)
        #[arg(long)]
        population: Option<usize>,

        /// Maximum number of intermediate nodes (evolutionary)
        #[arg(long)]
        max_len: Option<usize>,

        /// Random seed (evolutionary)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output routes to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze a network
    Analyze {
        #[arg(long, default_value = "data/nodes.csv")]
        nodes: PathBuf,

        #[arg(long, default_value = "data/edges.csv")]
        edges: PathBuf,
    },

    /// Run every algorithm over many start/goal pairs
    Benchmark {
        #[arg(long, default_value = "data/nodes.csv")]
        nodes: PathBuf,

        #[arg(long, default_value = "data/edges.csv")]
        edges: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of evolutionary runs (seeds) per query
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Maximum number of queries
        #[arg(long)]
        max_queries: Option<usize>,

        /// JSON search configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run evolutionary seeds one after another
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Constrained best-first search (fastest route under budgets)
    BestFirst,
    /// Bounded-round relaxation search
    Rounds,
    /// Multi-objective evolutionary search (Pareto front)
    Pareto,
    /// All of the above
    All,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum CliMode {
    Metro,
    Bus,
    Train,
    Walk,
    Bike,
    Car,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Metro => Mode::Metro,
            CliMode::Bus => Mode::Bus,
            CliMode::Train => Mode::Train,
            CliMode::Walk => Mode::Walk,
            CliMode::Bike => Mode::Bike,
            CliMode::Car => Mode::Car,
        }
    }
}

/// Command-line overrides of the route search configuration
struct RouteOverrides {
    modes: Vec<CliMode>,
    max_cost: Option<f64>,
    max_time: Option<f64>,
    heuristic_speed: Option<f64>,
    max_rounds: Option<usize>,
    generations: Option<usize>,
    population: Option<usize>,
    max_len: Option<usize>,
    seed: Option<u64>,
}

impl RouteOverrides {
    fn apply(self, config: &mut SearchConfig) {
        if !self.modes.is_empty() {
            let modes: BTreeSet<Mode> = self.modes.into_iter().map(Mode::from).collect();
            config.constrained.allowed_modes = modes.clone();
            config.rounds.modes = modes;
        }
        if self.max_cost.is_some() {
            config.constrained.max_cost = self.max_cost;
        }
        if self.max_time.is_some() {
            config.constrained.max_time = self.max_time;
        }
        if let Some(speed) = self.heuristic_speed {
            config.constrained.heuristic = HeuristicKind::FixedSpeed(speed);
        }
        if let Some(v) = self.max_rounds {
            config.rounds.max_rounds = v;
        }
        if let Some(v) = self.generations {
            config.evolution.generations = v;
        }
        if let Some(v) = self.population {
            config.evolution.population_size = v;
        }
        if let Some(v) = self.max_len {
            config.evolution.max_intermediate_len = v;
        }
        if let Some(v) = self.seed {
            config.evolution.seed = v;
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Route {
            nodes,
            edges,
            from,
            to,
            algorithm,
            config,
            modes,
            max_cost,
            max_time,
            heuristic_speed,
            max_rounds,
            generations,
            population,
            max_len,
            seed,
            output,
        } => {
            let overrides = RouteOverrides {
                modes,
                max_cost,
                max_time,
                heuristic_speed,
                max_rounds,
                generations,
                population,
                max_len,
                seed,
            };
            route(&nodes, &edges, &from, &to, algorithm, config.as_deref(), overrides, output.as_deref())
        }

        Commands::Analyze { nodes, edges } => analyze_network(&nodes, &edges),

        Commands::Benchmark { nodes, edges, output, runs, max_queries, config, sequential } => {
            run_benchmark(&nodes, &edges, &output, runs, max_queries, config.as_deref(), !sequential)
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_file(path),
        None => Ok(SearchConfig::default()),
    }
}

fn load_network(nodes: &Path, edges: &Path) -> Result<TransportGraph> {
    println!("Loading network from {:?} and {:?}...", nodes, edges);
    load_graph(nodes, edges)
}

#[allow(clippy::too_many_arguments)]
fn route(
    nodes: &Path,
    edges: &Path,
    from: &str,
    to: &str,
    algorithm: Algorithm,
    config_path: Option<&Path>,
    overrides: RouteOverrides,
    output: Option<&Path>,
) -> Result<()> {
    let graph = load_network(nodes, edges)?;
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);
    config.validate()?;

    let start = graph.require_node(from)?;
    let goal = graph.require_node(to)?;
    let mut summaries: Vec<RouteSummary> = Vec::new();

    if matches!(algorithm, Algorithm::BestFirst | Algorithm::All) {
        println!("\n========== Best-first search ==========");
        let clock = Instant::now();
        match constrained_search(&graph, start, goal, &config.constrained)? {
            Some(route) => {
                let summary = route.summary(&graph, "best-first");
                print!("{}", summary);
                summaries.push(summary);
            }
            None => println!("No route satisfies the mode and budget constraints."),
        }
        println!("Time: {:.4}s", clock.elapsed().as_secs_f64());
    }

    if matches!(algorithm, Algorithm::Rounds | Algorithm::All) {
        println!("\n========== Bounded-round search ==========");
        let clock = Instant::now();
        match bounded_round_search(&graph, start, goal, &config.rounds)? {
            Some(found) => {
                let mut summary = found.route.summary(&graph, "rounds");
                summary.rounds_used = Some(found.rounds_used);
                print!("{}", summary);
                summaries.push(summary);
            }
            None => println!("Goal not reachable within {} rounds.", config.rounds.max_rounds),
        }
        println!("Time: {:.4}s", clock.elapsed().as_secs_f64());
    }

    if matches!(algorithm, Algorithm::Pareto | Algorithm::All) {
        println!("\n========== Evolutionary search ==========");
        let clock = Instant::now();
        let front = evolutionary_search(&graph, start, goal, &config.evolution)?;
        if front.is_empty() {
            println!("No feasible route found.");
        }
        for (i, p) in front.iter().enumerate() {
            println!(
                "Solution {}: {}  (time {:.1} min, cost {:.2}, transfers {})",
                i + 1,
                p.route.node_ids(&graph).join(" -> "),
                p.objectives.time,
                p.objectives.cost,
                p.objectives.transfers
            );
            summaries.push(p.summary(&graph));
        }
        println!("Time: {:.4}s", clock.elapsed().as_secs_f64());
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&summaries)?;
        std::fs::write(out_path, json)?;
        println!("\nRoutes saved to {:?}", out_path);
    }

    Ok(())
}

fn analyze_network(nodes: &Path, edges: &Path) -> Result<()> {
    let graph = load_network(nodes, edges)?;

    println!("========== Network Analysis ==========\n");
    println!("{}", graph.statistics());

    let nodes = graph.nodes();
    println!("Station capabilities:");
    println!("  Metro: {}", nodes.iter().filter(|n| n.has_metro).count());
    println!("  Bus: {}", nodes.iter().filter(|n| n.has_bus).count());
    println!("  Train: {}", nodes.iter().filter(|n| n.has_train).count());
    println!("  Bike: {}", nodes.iter().filter(|n| n.has_bike).count());

    let one_way = graph.edges().filter(|e| !graph.has_edge(e.to, e.from)).count();
    println!("\nOne-way edges: {}", one_way);

    Ok(())
}

fn run_benchmark(
    nodes: &Path,
    edges: &Path,
    output: &Path,
    runs: usize,
    max_queries: Option<usize>,
    config_path: Option<&Path>,
    parallel: bool,
) -> Result<()> {
    let graph = load_network(nodes, edges)?;
    let search = load_config(config_path)?;
    let queries = all_queries(&graph, max_queries);

    println!("Running {} queries with {} evolutionary runs each", queries.len(), runs);
    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig { num_runs: runs, parallel, search };
    let mut benchmark = Benchmark::new(config);

    let progress = ProgressBar::new(queries.len() as u64);
    progress.set_style(ProgressStyle::default_bar());
    for &(start, goal) in &queries {
        log::debug!("query {}->{}", graph.node_id(start), graph.node_id(goal));
        benchmark.run_query(&graph, start, goal)?;
        progress.inc(1);
    }
    progress.finish();

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}
