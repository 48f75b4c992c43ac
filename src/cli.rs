//! Command line surface.

use clap::Parser;
use uuid::Uuid;

use crate::types::SortKey;

#[derive(Debug, Parser)]
#[command(
    name = "scanwarte",
    version,
    about = "Terminal-Dashboard zur Live-Überwachung von Video-Scan- und Dedup-Jobs"
)]
pub struct Cli {
    /// Id of the running job to attach to
    pub job_id: Uuid,
    /// Override the server base URL from the configuration
    #[arg(long)]
    pub base_url: Option<String>,
    /// Initial sort of the remaining view (name or size)
    #[arg(long, value_name = "KEY")]
    pub sort: Option<SortKey>,
}
