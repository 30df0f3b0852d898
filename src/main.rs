use clap::Parser;
use store_rankings::core::export;
use store_rankings::domain::model::Backend;
use store_rankings::domain::{collections, locale};
use store_rankings::utils::error::{CatalogError, ErrorSeverity};
use store_rankings::utils::{logger, validation::Validate};
use store_rankings::{CatalogConfig, CliConfig, DefaultDispatcher, LocalOutput, OutputFormat};

fn print_collections() {
    for backend in Backend::ALL {
        println!("{} ({}):", backend.display_name(), backend.param());
        for spec in collections::collections_for(backend) {
            println!("  {:<30} {}", spec.id, spec.label);
        }
    }
    println!("PlayStation regions:");
    for mapping in locale::all() {
        println!("  {:<4} {}", mapping.country, mapping.store_locale());
    }
}

async fn run(cli: &CliConfig) -> Result<String, CatalogError> {
    let mut config = CatalogConfig::load(cli.config.as_deref())?;
    config.apply_env_overrides()?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let backend = Backend::from_param(&cli.store);
    let dispatcher = DefaultDispatcher::from_config(&config)?;
    let listing = dispatcher
        .fetch_catalog(backend, &cli.collection, &cli.country)
        .await?;

    if !listing.failed_pages.is_empty() {
        tracing::warn!(
            "⚠️ {} page(s) failed: {:?}",
            listing.failed_pages.len(),
            listing.failed_pages.iter().map(|f| f.page).collect::<Vec<_>>()
        );
    }

    let data = match cli.format {
        OutputFormat::Json => export::to_json(&listing)?,
        OutputFormat::Csv => export::to_csv(&listing.entries)?,
    };
    LocalOutput::new(cli.output.clone()).write(&data)
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if cli.list_collections {
        print_collections();
        return;
    }

    match run(&cli).await {
        Ok(destination) => {
            tracing::info!("📁 Output written to {}", destination);
        }
        Err(e) => {
            tracing::error!(
                "❌ Fetch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
