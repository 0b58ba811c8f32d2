use clap::Parser;
use kelasku::{
    CliArgs, LoggingConfig, PortalClient, PortalConfig, Sourced, SupabaseGateway, init_logging,
};
use std::sync::Arc;

fn report<T>(label: &str, result: &Sourced<Vec<T>>) {
    let source = if result.is_fallback() { "fallback" } else { "live" };
    println!("{label:<12} {:>3} records  [{source}]", result.records.len());
}

/// Smoke check: fetch every domain once and report counts and serving
/// source. With no backend reachable every line reads `[fallback]`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let cli = CliArgs::parse();
    let config = PortalConfig::from_args(cli)?;
    tracing::info!(backend = %config.backend_url, week = %config.week, "starting portal fetch");

    let gateway = Arc::new(SupabaseGateway::new(&config)?);
    let client = PortalClient::new(gateway);

    report("students", &*client.students().await);
    report("schedules", &*client.schedules(config.week).await);
    report("tasks", &*client.tasks().await);
    report("infaq", &*client.donations().await);
    report("groups", &*client.groups().await);
    report("quotes", &*client.quotes().await);
    report("gallery", &*client.gallery().await);
    report("org chart", &*client.org_chart().await);

    // Karya has no mock fallback; an unreachable backend shows as such.
    match client.karya().await {
        Ok(karya) => println!("{:<12} {:>3} records  [live]", "karya", karya.len()),
        Err(err) => println!("{:<12}   unavailable: {err}", "karya"),
    }

    let stats = client.cache_stats();
    tracing::info!(
        operations = stats.operations,
        hits = stats.hits,
        misses = stats.misses,
        "fetch complete"
    );
    Ok(())
}
