use airbnb_bot::domain::ports::ConfigProvider;
use airbnb_bot::utils::error::BotError;
use airbnb_bot::utils::{logger, validation::Validate};
use airbnb_bot::{BotArgs, BotConfig, LocationResolver, Session, TurnOutcome};
use clap::Parser;

fn main() {
    let args = BotArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting airbnb-bot");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = run(&args) {
        tracing::error!(
            "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

fn run(args: &BotArgs) -> Result<(), BotError> {
    let config = BotConfig::from_args(args)?;
    config.validate()?;

    let resolver = LocationResolver::new(config.patterns.clone());
    let session = Session::start(config.store_path(), resolver, config.top_n())?
        .with_exit_words(config.exit_words());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    if config.loop_mode() {
        let outcomes = session.run_loop(&mut input, &mut out)?;
        tracing::info!("✅ Conversation finished after {} turns", outcomes.len());
    } else {
        match session.run_once(&mut input, &mut out)? {
            TurnOutcome::Reported { found, shown, .. } => {
                tracing::info!("✅ Reported {} of {} listings", shown, found)
            }
            outcome => tracing::info!("Session ended: {:?}", outcome),
        }
    }

    Ok(())
}
