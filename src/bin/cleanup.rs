use std::path::PathBuf;

use clap::Parser;
use gradesheet_merge_lib::cleanup::{sweep, DEFAULT_RETENTION_DAYS};

#[derive(Parser, Debug)]
#[command(about = "Delete stored uploads and results older than a number of days.")]
struct Args {
    /// Age threshold in days.
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    days: u64,

    /// Storage root holding `uploads/` and `results/`.
    #[arg(long, env = "STORAGE_DIR", default_value = "./storage")]
    root: PathBuf,
}

fn main() {
    let _ = dotenv::dotenv();
    gradesheet_merge_lib::init_tracing();

    let args = Args::parse();
    let summary = sweep(&args.root, args.days);

    if summary.failed > 0 {
        eprintln!("{} files could not be deleted, see log.", summary.failed);
    }
    println!("Deleted {} files older than {} days.", summary.deleted, args.days);
}
