//! Search command

use clap::Args;
use elemental_catalog::suggest_names;
use elemental_core::TierPolicy;
use elemental_search::{PathFinder, Strategy};

use crate::output::{format_report, to_json, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct SearchArgs {
    /// Element to reach
    pub target: String,

    /// Number of distinct paths to find
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Give up after this many seconds (defaults to the configured deadline)
    #[arg(short, long)]
    pub deadline: Option<u64>,

    /// Search strategy: bfs or dfs
    #[arg(short, long)]
    pub method: Option<Strategy>,

    /// Starting elements, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub start: Vec<String>,

    /// Only allow ingredients of a strictly lower tier
    #[arg(long)]
    pub strict_tiers: bool,

    /// Worker count for multi-path searches
    #[arg(short, long)]
    pub workers: Option<usize>,
}

pub async fn run(args: &SearchArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = OutputFormat::from(cli.format.as_str());

    if !ctx.db.contains(&args.target) {
        let suggestions = suggest_names(&ctx.db, &args.target, 5);
        if suggestions.is_empty() {
            anyhow::bail!("Element '{}' not found in catalog", args.target);
        }
        anyhow::bail!(
            "Element '{}' not found in catalog. Did you mean: {}?",
            args.target,
            suggestions.join(", ")
        );
    }

    let mut config = ctx.config.search.clone();
    if let Some(method) = args.method {
        config = config.with_strategy(method);
    }
    if !args.start.is_empty() {
        config = config.with_start_elements(args.start.clone());
    }
    if args.strict_tiers {
        config = config.with_tier_policy(TierPolicy::strict());
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }

    let deadline = args.deadline.unwrap_or(ctx.config.deadline);
    let finder = PathFinder::with_config(ctx.db.clone(), config);

    tracing::info!(
        "Searching {} path(s) to {} using {}",
        args.count,
        args.target,
        finder.config().strategy
    );

    let report = if args.count == 1 {
        finder.find_one(&args.target, deadline).await?
    } else {
        finder.find_many(&args.target, args.count, deadline).await?
    };

    if report.is_partial(args.count) {
        tracing::warn!(
            "Found {} of {} requested paths to {}",
            report.paths.len(),
            args.count,
            args.target
        );
    }

    match format {
        OutputFormat::Json => println!("{}", to_json(&report)),
        OutputFormat::Table => {
            let available = finder.config().start_elements.contains(&args.target)
                || ctx.db.get(&args.target).is_some_and(|e| e.is_basic);
            if available {
                println!("{} is a starting element; no steps needed", args.target);
            } else if !cli.quiet || report.found() {
                print!("{}", format_report(&report));
            }
        }
    }

    Ok(())
}
