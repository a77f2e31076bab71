//! Grow a graph with a probabilistic roadmap and search it with A*
//!
//! Reads `nodes.csv`, `edges.csv` and `obstacles.csv` from a scene directory,
//! adds sampled nodes, finds the best path between two nodes and writes
//! `path.csv` plus the augmented `nodes.csv`, `edges.csv` and
//! `obstacles.csv` to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info, warn};

use roadmap_planner::graph::records::{format_edge, format_node, format_obstacle, to_lines};
use roadmap_planner::path_planning::StartCost;
use roadmap_planner::utils::plot_roadmap;
use roadmap_planner::{
    AStarConfig, AStarPlanner, Bounds, Graph, LoadReport, PlanningResult, PrmConfig, RngSeed,
    RoadmapGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "prm_run", about = "Calculates a PRM path around obstacles")]
struct Args {
    /// Scene directory holding the input files
    #[arg(short, long, default_value = "planning_coursera")]
    directory: PathBuf,

    /// Name of the nodes file
    #[arg(long, default_value = "nodes.csv")]
    nodes: String,

    /// Name of the edges file
    #[arg(long, default_value = "edges.csv")]
    edges: String,

    /// Name of the obstacles file
    #[arg(long, default_value = "obstacles.csv")]
    obstacles: String,

    /// Id of the first node
    #[arg(short, long, default_value = "1")]
    first_node: String,

    /// Id of the target node
    #[arg(short, long, default_value = "2")]
    target_node: String,

    /// PRM nodes to generate
    #[arg(short, long, default_value_t = 10)]
    nodes_to_gen: usize,

    /// Max links to add to a PRM node
    #[arg(short, long, default_value_t = 3)]
    max_links: usize,

    /// Sampling rectangle
    #[arg(
        long,
        num_args = 4,
        value_names = ["X0", "Y0", "X1", "Y1"],
        default_values_t = [-0.5, -0.5, 0.5, 0.5],
        allow_negative_numbers = true
    )]
    bounds: Vec<f64>,

    /// Random seed value
    #[arg(short, long, default_value_t = 1234)]
    seed: u64,

    /// Draw a fresh random seed and report it
    #[arg(long)]
    random_seed: bool,

    /// Give up sampling after this many draws
    #[arg(long)]
    max_sample_attempts: Option<usize>,

    /// Seed the start cost with the first node's record cost
    #[arg(long)]
    base_cost_start: bool,

    /// Report edges cheaper than their straight-line length
    #[arg(long)]
    check_distances: bool,

    /// Save a plot of the final path (.svg or .png)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Open the plot in a gnuplot window
    #[arg(long)]
    show: bool,

    /// Directory for the output files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn read_optional(path: &Path) -> PlanningResult<Option<String>> {
    if path.is_file() {
        Ok(Some(fs::read_to_string(path)?))
    } else {
        warn!("{} not found", path.display());
        Ok(None)
    }
}

fn load_graph(args: &Args) -> PlanningResult<(Graph, LoadReport)> {
    let nodes = fs::read_to_string(args.directory.join(&args.nodes))?;
    let edges = fs::read_to_string(args.directory.join(&args.edges))?;
    let obstacles = read_optional(&args.directory.join(&args.obstacles))?;

    Ok(Graph::from_text(&nodes, &edges, obstacles.as_deref()))
}

fn run(args: &Args) -> PlanningResult<()> {
    let (mut graph, report) = load_graph(args)?;
    if !report.is_clean() {
        warn!("{} input records were skipped", report.issues.len());
    }

    let config = PrmConfig {
        n_sample: args.nodes_to_gen,
        max_links_per_node: args.max_links,
        bounds: Bounds::new(args.bounds[0], args.bounds[1], args.bounds[2], args.bounds[3]),
        max_sample_attempts: args.max_sample_attempts,
        seed: if args.random_seed {
            RngSeed::Entropy
        } else {
            RngSeed::Fixed(args.seed)
        },
    };
    let prm = RoadmapGenerator::new(config).generate_seeded(&mut graph)?;
    if let Some(seed) = prm.seed {
        println!("Random seed: {}", seed);
    }

    if args.check_distances {
        let violations = graph.check_edge_weights();
        println!("{} edges are cheaper than their length", violations.len());
    }

    let planner = AStarPlanner::new(AStarConfig {
        start_cost: if args.base_cost_start {
            StartCost::BaseCost
        } else {
            StartCost::Zero
        },
    });
    let outcome = planner.find_path(&graph, &args.first_node, &args.target_node)?;
    let path = outcome.path().cloned().unwrap_or_default();
    if path.is_empty() {
        println!("No path found!");
    } else {
        println!("bestpath: {}", path.nodes.join(","));
        println!("bestpath cost:{:.5}", path.cost);
    }

    fs::create_dir_all(&args.output_dir)?;
    fs::write(args.output_dir.join("path.csv"), path.nodes.join(","))?;
    fs::write(
        args.output_dir.join("nodes.csv"),
        to_lines(&graph.node_records(), format_node),
    )?;
    fs::write(
        args.output_dir.join("edges.csv"),
        to_lines(&graph.edge_records(), format_edge),
    )?;
    fs::write(
        args.output_dir.join("obstacles.csv"),
        to_lines(&graph.obstacle_records(), format_obstacle),
    )?;
    info!("results written to {}", args.output_dir.display());

    if args.plot.is_some() || args.show {
        let title = format!("PRM path {} -> {}", args.first_node, args.target_node);
        let mut vis = plot_roadmap(&graph, outcome.path(), &title);
        if let Some(plot_path) = &args.plot {
            let file = plot_path.to_string_lossy();
            if plot_path.extension().map_or(false, |e| e == "png") {
                vis.save_png(&file, 800, 600)?;
            } else {
                vis.save_svg(&file)?;
            }
            println!("Plot saved to {}", file);
        }
        if args.show {
            vis.show()?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
