use clap::Parser;

/// AiFoodLog — log foods by name and let a generative-AI service estimate
/// the calories and macros.
#[derive(Parser, Debug)]
#[command(name = "ai_food_log")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Gemini model to use for suggestions and lookups.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Debounce delay in milliseconds before a suggestion lookup fires.
    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,
}
