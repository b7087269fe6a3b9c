use anyhow::{Context, Result};

use scout_terminal::config::AppConfig;
use scout_terminal::provider::StatTotals;

fn main() -> Result<()> {
    let config = AppConfig::load();
    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("usage: player_lookup <name fragment>");
        return Ok(());
    }

    let provider = config.source.provider();
    println!("Source: {}", provider.label());

    let matches = provider
        .search(&query)
        .with_context(|| format!("search for {query:?}"))?;
    if matches.is_empty() {
        println!("No players match {query:?}.");
        return Ok(());
    }
    for player in matches.iter().take(config.suggestion_limit) {
        println!("  {:>8}  {}", player.id, player.name);
    }

    let first = &matches[0];
    let info = provider
        .player_info(first.id)
        .with_context(|| format!("profile for {}", first.id))?;
    println!();
    println!("{} (id {})", info.name, info.id);
    println!(
        "Club: {} | Age: {} | Position: {} | Value: {}",
        info.club.as_deref().unwrap_or("-"),
        info.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
        info.position.as_deref().unwrap_or("-"),
        info.market_value.as_deref().unwrap_or("-"),
    );
    if !info.description.is_empty() {
        println!("{}", info.description);
    }

    match provider.stats(first.id) {
        Ok(stats) => {
            let totals = StatTotals::from_seasons(&stats);
            println!(
                "Seasons: {}  Goals: {}  Assists: {}",
                totals.seasons, totals.goals, totals.assists
            );
            for row in &stats {
                println!("  {:<10} {:>3} G {:>3} A", row.season, row.goals, row.assists);
            }
        }
        Err(err) => println!("ERR stats: {err}"),
    }

    match provider.recommendations(first.id) {
        Ok(recs) => {
            println!("You may also like:");
            for rec in recs.iter().take(config.recommendation_limit) {
                println!("  {}", rec.name);
            }
        }
        Err(err) => println!("ERR recommendations: {err}"),
    }

    Ok(())
}
