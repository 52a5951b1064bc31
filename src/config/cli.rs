use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "airbnb-bot")]
#[command(about = "Finds Berlin apartments by district")]
pub struct BotArgs {
    /// SQLite file produced by import-listings
    #[arg(long)]
    pub db: Option<String>,

    /// Number of listings to print
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Keep asking until an exit word is entered
    #[arg(long = "loop")]
    pub loop_mode: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "import-listings")]
#[command(about = "Loads a listings CSV file into a SQLite store")]
pub struct ImportArgs {
    /// CSV file with a header row
    #[arg(long, default_value = "listings.csv")]
    pub csv: String,

    /// SQLite file to create or overwrite
    #[arg(long, default_value = "listings.db")]
    pub db: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
