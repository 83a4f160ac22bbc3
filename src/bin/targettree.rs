//! targettree: CLI tool for normalizing target lists and checking hosts against them.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use targettree::{
    merge_subnets, Normalized, NormalizeOptions, TargetListParser, TargetNormalizer,
    DEFAULT_MAX_MERGE_PASSES,
};

#[derive(Parser)]
#[command(name = "targettree")]
#[command(version)]
#[command(about = "Match hosts against IP network and domain target lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the most specific target containing each host
    Search {
        #[command(flatten)]
        targets: TargetArgs,

        /// Hosts to look up (IP addresses, networks, or domain names)
        #[arg(required = true)]
        hosts: Vec<String>,
    },

    /// Print the minimal covering set of a target list
    Normalize {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Merge two sibling networks into their parent
    Merge {
        /// First network
        first: ipnet::IpNet,

        /// Second network
        second: ipnet::IpNet,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Target list file, one target per line
    #[arg(short, long)]
    targets: PathBuf,

    /// Merge sibling networks into their parents
    #[arg(short, long)]
    aggregate: bool,

    /// Upper bound on aggregation passes
    #[arg(long, default_value_t = DEFAULT_MAX_MERGE_PASSES)]
    max_passes: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search { targets, hosts } => search(&targets, &hosts),
        Commands::Normalize { targets } => normalize(&targets),
        Commands::Merge { first, second } => merge(first, second),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load(args: &TargetArgs) -> Result<Normalized, Box<dyn std::error::Error>> {
    let raw = TargetListParser::load_file(&args.targets)?;
    let options = NormalizeOptions::new()
        .with_aggregation(args.aggregate)
        .with_max_merge_passes(args.max_passes);

    let result = TargetNormalizer::new(options).normalize(&raw);
    log::info!(
        "Loaded {} targets from {:?} ({} kept, {} rejected)",
        raw.len(),
        args.targets,
        result.hosts.len(),
        result.rejected.len()
    );
    Ok(result)
}

fn search(args: &TargetArgs, hosts: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let normalized = load(args)?;

    for host in hosts {
        match normalized.tree.search(host) {
            Ok(Some(target)) => println!("{} -> {}", host, target),
            Ok(None) => println!("{} -> (no match)", host),
            Err(e) => eprintln!("{} -> {}", host, e),
        }
    }
    Ok(())
}

fn normalize(args: &TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let normalized = load(args)?;

    for host in &normalized.hosts {
        println!("{}", host);
    }
    Ok(())
}

fn merge(first: ipnet::IpNet, second: ipnet::IpNet) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", merge_subnets(first, second)?);
    Ok(())
}
