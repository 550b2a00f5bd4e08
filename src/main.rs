use clap::Parser;
use repo_harvest::utils::{logger, validation::Validate};
use repo_harvest::{
    plan_all, CliArgs, Driver, HarvestConfig, HttpFetcher, LocalStorage, Plan, RepositoryOutcome,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);
    let mut config = match HarvestConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let plans = match plan_all(&config, &args.only) {
        Ok(plans) => plans,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if args.dry_run {
        print_plan(&plans, &config);
        return Ok(());
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
    let storage = LocalStorage::new(config.output_directory().to_string());
    let driver = Driver::new(fetcher, storage, config.output.file_identifier.clone())
        .quiet(args.quiet);

    let report = driver.run(plans).await;

    for entry in &report.entries {
        match &entry.outcome {
            RepositoryOutcome::Written(summary) => println!(
                "✅ {}: {} rows -> {}",
                entry.repository, summary.rows, summary.output_path
            ),
            RepositoryOutcome::Skipped { reason } => {
                println!("⏭️  {}: skipped ({})", entry.repository, reason)
            }
            RepositoryOutcome::Failed(e) => {
                eprintln!("❌ {}: {}", entry.repository, e.user_friendly_message())
            }
        }
    }

    if report.has_failures() {
        std::process::exit(2);
    }
    Ok(())
}

fn print_plan(plans: &[Plan], config: &HarvestConfig) {
    println!("Output directory: {}", config.output_directory());
    for plan in plans {
        match plan {
            Plan::Run(spec) => {
                println!("▶ {} -> {}", spec.name, spec.file_name(&config.output.file_identifier));
                for search in &spec.searches {
                    println!("    {} {}", search.label, search.request.url);
                }
            }
            Plan::Skip { repository, reason } => println!("⏭️  {}: {}", repository, reason),
        }
    }
}
