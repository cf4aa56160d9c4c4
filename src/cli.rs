use clap::Parser;

#[derive(Parser)]
#[command(name = "strive")]
#[command(about = "Personal goal dashboard for the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/store)
    #[arg(long)]
    pub dev: bool,
}
