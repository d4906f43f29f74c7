use clap::Parser;
use stier_world::config::{AppConfig, Command, SourceKind};
use stier_world::domain::ports::{ProductSource, RatingRepository};
use stier_world::domain::services::{profile_summary, TierList};
use stier_world::utils::{logger, validation::Validate};
use stier_world::{
    compute_consensus, CliConfig, JsonRatingRepository, LocalStorage, NewRating, RestClient,
    Result, ScorePolicy, ScoredProduct, SeedCatalog, StierError, Tier, TierWorld, UserRating,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let loaded = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::default()),
    };
    let json_logs = cli.json_logs || loaded.as_ref().is_ok_and(|c| c.logging.json);

    // 初始化日誌
    logger::init(cli.verbose, json_logs);
    tracing::debug!("CLI args: {:?}", cli);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = execute(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn execute(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Classify { score, strict } => {
            let policy = if strict {
                ScorePolicy::Reject
            } else {
                config.score_policy()
            };
            let tier = policy.classify(score)?;
            println!("{} {}  color {}  range {}", score, tier, tier.color(), tier.range_label());
            Ok(())
        }
        Command::Consensus { ratings } => {
            for &rating in &ratings {
                stier_world::utils::validation::validate_score_range("rating", rating, 0.0, 5.0)?;
            }
            let consensus = compute_consensus(&ratings);
            let tier = config.score_policy().classify(consensus.average)?;
            println!(
                "{:.1}/10 {}  {}% recommend  ({} ratings)",
                consensus.average, tier, consensus.recommend_percent, consensus.count
            );
            Ok(())
        }
        Command::Tiers => {
            for tier in Tier::ALL {
                println!("{:<3} {:<9} {}", tier.label(), tier.range_label(), tier.color());
            }
            Ok(())
        }
        Command::Profile { path } => {
            let data = tokio::fs::read(&path).await?;
            let ratings: Vec<UserRating> = serde_json::from_slice(&data)?;
            let summary = profile_summary(ratings, config.score_policy())?;
            println!(
                "Products rated: {}  Reviews: {}  Average: {:.1}/10",
                summary.products_rated, summary.reviews_written, summary.average_score
            );
            for (tier, count) in &summary.distribution {
                println!("  {:<3} {}", tier, count);
            }
            for entry in &summary.entries {
                println!("{:<3} {:>4.1}  {}", entry.tier, entry.rating.score, entry.rating.title);
            }
            Ok(())
        }
        command => match config.source_kind() {
            SourceKind::Seed => {
                let path = config
                    .source
                    .catalog_path
                    .clone()
                    .ok_or_else(|| StierError::MissingConfigError {
                        field: "source.catalog_path".to_string(),
                    })?;
                let source = SeedCatalog::new(LocalStorage::new("."), path);
                let ratings =
                    JsonRatingRepository::new(LocalStorage::new("."), config.ratings_path());
                let engine = TierWorld::new(source, ratings)
                    .with_policy(config.score_policy());
                run_catalog_command(command, &engine, config).await
            }
            SourceKind::Rest => {
                let engine = TierWorld::new(rest_client(config)?, rest_client(config)?)
                    .with_policy(config.score_policy());
                run_catalog_command(command, &engine, config).await
            }
        },
    }
}

fn rest_client(config: &AppConfig) -> Result<RestClient> {
    let endpoint = config
        .source
        .endpoint
        .clone()
        .ok_or_else(|| StierError::MissingConfigError {
            field: "source.endpoint".to_string(),
        })?;
    let client = RestClient::with_timeout(
        endpoint,
        config.source.api_key.clone(),
        Duration::from_secs(config.timeout_seconds()),
    )?;
    Ok(client.with_tables(
        config.source.products_table.as_deref().unwrap_or("products"),
        config.source.ratings_table.as_deref().unwrap_or("ratings"),
    ))
}

async fn run_catalog_command<S: ProductSource, R: RatingRepository>(
    command: Command,
    engine: &TierWorld<S, R>,
    config: &AppConfig,
) -> Result<()> {
    match command {
        Command::TierList { category, export } => {
            let category = category.or_else(|| config.source.category.clone());
            if export {
                let storage = LocalStorage::new(config.output_path());
                let written = engine
                    .run(category.as_deref(), config.output_formats(), &storage)
                    .await?;
                println!("✅ Exported {} files", written.len());
                for path in written {
                    println!("📁 {}", path);
                }
            } else {
                print_tier_list(&engine.tier_list(category.as_deref()).await?);
            }
            Ok(())
        }
        Command::Search { query } => {
            let results = engine.search(&query).await?;
            if results.is_empty() {
                println!("No products found matching \"{}\"", query);
            }
            for item in &results {
                print_product_line(item);
            }
            Ok(())
        }
        Command::Rate {
            slug,
            rating,
            reviewer,
        } => {
            let scored = engine.rate(NewRating::new(slug, reviewer, rating)).await?;
            print_product_line(&scored);
            Ok(())
        }
        other => Err(StierError::ConfigError {
            message: format!("{:?} does not read the product catalog", other),
        }),
    }
}

fn print_tier_list(list: &TierList) {
    if list.is_empty() {
        println!("No products to rank");
        return;
    }
    for group in list.non_empty() {
        let noun = if group.products.len() == 1 { "product" } else { "products" };
        println!(
            "{} Tier  {} {} • {} rating",
            group.tier,
            group.products.len(),
            noun,
            group.range
        );
        for item in &group.products {
            print_product_line(item);
        }
    }
}

fn print_product_line(item: &ScoredProduct) {
    if item.has_ratings() {
        println!(
            "  [{:<2}] {:>4.1}/10  {:>3}%  {}",
            item.tier, item.consensus.average, item.consensus.recommend_percent, item.product.title
        );
    } else {
        println!("  [--]   unrated      {}", item.product.title);
    }
}
