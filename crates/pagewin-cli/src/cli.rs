use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pagewin")]
#[command(about = "Page through and edit a row dataset one window at a time", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// Path to dataset file (or set PAGEWIN_FILE env var)
    #[arg(value_name = "FILE", env = "PAGEWIN_FILE")]
    pub file: Option<String>,

    /// Rows per page (defaults to the config file, then 10)
    #[arg(long, global = true, env = "PAGEWIN_PAGE_SIZE")]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row count, page size and page count
    Info,
    /// Show one page of rows
    Page(PageArgs),
    /// Edit one field through a page view
    Edit(EditArgs),
    /// Sort the dataset by one field
    Sort(SortArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct PageArgs {
    /// 1-based page number
    pub page: usize,
    /// Row ids to leave out of the output
    #[arg(long)]
    pub hide: Vec<Uuid>,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub field: String,
    /// New value as JSON (e.g. 42, "text", true, null)
    #[arg(long)]
    pub value: String,
}

#[derive(Args)]
pub struct SortArgs {
    #[arg(long)]
    pub field: String,
    #[arg(long)]
    pub descending: bool,
    /// Page to show after sorting
    #[arg(long)]
    pub page: Option<usize>,
}
