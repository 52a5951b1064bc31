use airbnb_bot::core::importer::import_listings;
use airbnb_bot::domain::model::ImportSummary;
use airbnb_bot::utils::logger;
use airbnb_bot::utils::validation::validate_path;
use airbnb_bot::{BotError, ImportArgs};
use clap::Parser;

fn main() {
    let args = ImportArgs::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Importing listings from {} into {}", args.csv, args.db);

    match run(&args) {
        Ok(summary) => {
            tracing::info!("✅ Import completed successfully!");
            println!(
                "✅ {} Wohnungen ({} Spalten) nach {} importiert.",
                summary.rows, summary.columns, args.db
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(args: &ImportArgs) -> Result<ImportSummary, BotError> {
    validate_path("csv", &args.csv)?;
    validate_path("db", &args.db)?;

    import_listings(&args.csv, &args.db)
}
