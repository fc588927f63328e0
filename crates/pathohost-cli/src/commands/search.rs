use crate::cli::SearchArgs;
use crate::config::{AppConfig, ConfigOverrides};
use crate::error::Result;
use pathohost::remote::rcsb::{EntrySummary, RcsbClient};
use pathohost::workflows::session::Session;
use tracing::{info, warn};

pub fn overrides(args: &SearchArgs, base: ConfigOverrides) -> ConfigOverrides {
    ConfigOverrides {
        max_results: args.max_results,
        ..base
    }
}

pub async fn run(args: SearchArgs, config: &AppConfig) -> Result<()> {
    let client = RcsbClient::new()?;
    let mut session = Session::new(config.scratch_dir());

    info!(
        "Searching for up to {} entries from '{}'.",
        config.max_results, args.organism
    );
    let hits = session
        .search(&client, &args.organism, config.max_results)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        warn!("No entries matched organism '{}'.", args.organism);
        println!("No matching structures found for '{}'.", args.organism);
        return Ok(());
    }

    println!("{}", format_table(hits));
    println!("Fetch one with: pathohost fetch <PDB_ID>");
    Ok(())
}

fn format_table(hits: &[EntrySummary]) -> String {
    let mut lines = Vec::with_capacity(hits.len() + 1);
    lines.push(format!("{:<12}  {}", "PDB ID", "Title"));
    lines.extend(
        hits.iter()
            .map(|hit| format!("{:<12}  {}", hit.pdb_id, hit.title)),
    );
    lines.join("\n")
}
