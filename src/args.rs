use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "siteharvest")]
#[command(about = "Renders a website with a browser and archives its content graph for migration")]
#[command(version)]
pub struct Args {
    /// Path to the JSON run configuration
    #[arg(default_value = "config.json")]
    pub config: PathBuf,
}
