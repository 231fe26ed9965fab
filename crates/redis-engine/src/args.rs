use clap::Args;

/// Redis-specific pollute arguments.
#[derive(Args, Clone, Debug)]
pub struct RedisPolluteArgs {
    /// Redis URL (e.g., redis://localhost:6379/0)
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: String,
}
