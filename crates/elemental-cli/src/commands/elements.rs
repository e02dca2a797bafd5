//! Elements command

use clap::Args;
use elemental_catalog::find_similar;
use elemental_core::Element;

use crate::output::{format_elements, to_json, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct ElementsArgs {
    /// Fuzzy-match element names
    #[arg(short, long)]
    pub like: Option<String>,

    /// Maximum number of elements to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only show starting elements
    #[arg(long)]
    pub basic: bool,
}

pub fn run(args: &ElementsArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let mut elements: Vec<&Element> = match &args.like {
        Some(query) => find_similar(&ctx.db, query, args.limit.unwrap_or(20)),
        None => {
            let mut all: Vec<&Element> = ctx.db.iter().collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            all
        }
    };
    if args.basic {
        elements.retain(|e| e.is_basic);
    }
    if let Some(limit) = args.limit {
        elements.truncate(limit);
    }

    match OutputFormat::from(cli.format.as_str()) {
        OutputFormat::Json => println!("{}", to_json(&elements)),
        OutputFormat::Table => {
            if elements.is_empty() {
                if !cli.quiet {
                    println!("No elements found");
                }
            } else {
                print!("{}", format_elements(&elements));
            }
        }
    }
    Ok(())
}
