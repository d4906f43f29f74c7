use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "stier-world")]
#[command(about = "Community tier ratings for sneakers and video games")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Classify a 0-10 score into its tier
    Classify {
        #[arg(allow_negative_numbers = true)]
        score: f64,

        /// Reject scores outside 0-10 instead of clamping
        #[arg(long)]
        strict: bool,
    },

    /// Consensus of 0-5 star ratings
    Consensus {
        #[arg(required = true, allow_negative_numbers = true)]
        ratings: Vec<f64>,
    },

    /// Print the tier table
    Tiers,

    /// Group every product by tier
    TierList {
        #[arg(long)]
        category: Option<String>,

        /// Also write the formats listed under [export]
        #[arg(long)]
        export: bool,
    },

    /// Search products by title, category or SKU
    Search { query: String },

    /// Submit a 0-5 rating for a product
    Rate {
        slug: String,
        rating: f64,

        #[arg(long, default_value = "@anonymous")]
        reviewer: String,
    },

    /// Summarise a JSON file of a user's rated products
    Profile { path: String },
}
