//! Linkrank CLI: rank a dataset with PageRank or HITS
//!
//! Caches are built on the first run for a dataset and reused afterwards.
//! Logs go to stderr; stdout carries only the report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use linkrank::algo::TopKSummary;
use linkrank::{
    inspect_cache, run_hits, run_pagerank, Algorithm, CacheReport, HitsReport, PageRankReport,
    RunConfig, SolverSettings,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "linkrank", version, about = "PageRank and HITS over cached CSR graphs")]
struct Cli {
    /// Directory holding the PR_<id> / HITS_<id> caches
    #[arg(long, default_value = ".", global = true)]
    cache_root: PathBuf,

    /// Directory for score files and Jaccard reports
    #[arg(long, default_value = ".", global = true)]
    output_dir: PathBuf,

    /// YAML file with solver settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at DEBUG level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AlgorithmArg {
    Pagerank,
    Hits,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Pagerank => Algorithm::PageRank,
            AlgorithmArg::Hits => Algorithm::Hits,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a dataset with PageRank
    Pagerank {
        /// Edge-list file
        dataset: PathBuf,
        /// Report the top K nodes and their Jaccard coefficients
        k: Option<usize>,
    },
    /// Rank a dataset with HITS (authorities and hubs)
    Hits {
        /// Edge-list file
        dataset: PathBuf,
        /// Report the top K nodes of both vectors
        k: Option<usize>,
    },
    /// Show the dimensions of an existing cache
    Inspect {
        /// Edge-list file the cache was built from
        dataset: PathBuf,

        #[arg(long, value_enum)]
        algorithm: AlgorithmArg,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Pagerank { dataset, k } => {
            let config = run_config(cli, dataset, *k)?;
            let report = run_pagerank(&config)
                .with_context(|| format!("PageRank failed for {:?}", dataset))?;
            print_pagerank(&report, &cli.format)
        }
        Commands::Hits { dataset, k } => {
            let config = run_config(cli, dataset, *k)?;
            let report =
                run_hits(&config).with_context(|| format!("HITS failed for {:?}", dataset))?;
            print_hits(&report, &cli.format)
        }
        Commands::Inspect { dataset, algorithm } => {
            let config = run_config(cli, dataset, None)?;
            let report = inspect_cache(&config, (*algorithm).into())?;
            print_cache(&report, &cli.format)
        }
    }
}

fn run_config(cli: &Cli, dataset: &Path, k: Option<usize>) -> Result<RunConfig> {
    let solver = match &cli.config {
        Some(path) => SolverSettings::from_yaml_file(path)
            .with_context(|| format!("cannot load solver settings from {:?}", path))?,
        None => SolverSettings::default(),
    };
    let config = RunConfig::new(dataset)?
        .with_cache_root(&cli.cache_root)
        .with_output_dir(&cli.output_dir)
        .with_top_k(k)
        .with_solver(solver)?;
    Ok(config)
}

fn print_pagerank(report: &PageRankReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            println!("Dataset:    {}", report.dataset);
            println!("Cache:      {:?} ({})", report.cache_dir, hit_label(report.cache_hit));
            println!("Nodes:      {}", report.graph.node_count);
            println!("Edges:      {}", report.graph.edge_count);
            if let Some(d) = report.graph.dangling_count {
                println!("Dangling:   {}", d);
            }
            println!(
                "Iterations: {} (residual {:e}{})",
                report.iterations,
                report.residual,
                if report.converged { "" } else { ", not converged" }
            );
            println!("Score sum:  {:.12}", report.score_sum);
            println!("Load time:  {:.3}s", report.load_secs);
            println!("Solve time: {:.3}s", report.solve_secs);
            println!("Scores:     {:?}", report.result_path);
            if let Some(top) = &report.top_k {
                print_top_k(top);
            }
        }
    }
    Ok(())
}

fn print_hits(report: &HitsReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            println!("Dataset:       {}", report.dataset);
            println!("Cache:         {:?} ({})", report.cache_dir, hit_label(report.cache_hit));
            println!("Nodes:         {}", report.graph.node_count);
            println!("Edges:         {}", report.graph.edge_count);
            println!(
                "Iterations:    {} (residuals {:e} / {:e}{})",
                report.iterations,
                report.authority_residual,
                report.hub_residual,
                if report.converged { "" } else { ", not converged" }
            );
            println!("Authority sum: {:.12}", report.authority_sum);
            println!("Hub sum:       {:.12}", report.hub_sum);
            println!("Load time:     {:.3}s", report.load_secs);
            println!("Solve time:    {:.3}s", report.solve_secs);
            println!("Authorities:   {:?}", report.authority_path);
            println!("Hubs:          {:?}", report.hub_path);
            for top in report.top_authorities.iter().chain(&report.top_hubs) {
                print_top_k(top);
            }
        }
    }
    Ok(())
}

fn print_cache(report: &CacheReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec!["Algorithm".to_string(), report.algorithm.to_string()]);
            table.add_row(vec!["Dataset".to_string(), report.dataset.to_string()]);
            table.add_row(vec!["Directory".to_string(), report.cache_dir.display().to_string()]);
            table.add_row(vec!["Nodes".to_string(), report.graph.node_count.to_string()]);
            table.add_row(vec!["Edges".to_string(), report.graph.edge_count.to_string()]);
            if let Some(d) = report.graph.dangling_count {
                table.add_row(vec!["Dangling".to_string(), d.to_string()]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_top_k(top: &TopKSummary) {
    println!();
    println!("Top {} by {} score (Jaccard table: {:?})", top.k, top.kind, top.report_path);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Node", "Score", "In-degree"]);
    for row in &top.nodes {
        table.add_row(vec![
            row.rank.to_string(),
            row.node.to_string(),
            format!("{:.6e}", row.score),
            row.in_degree.to_string(),
        ]);
    }
    println!("{}", table);
}

fn hit_label(hit: bool) -> &'static str {
    if hit {
        "hit"
    } else {
        "built"
    }
}
