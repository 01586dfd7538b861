use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::Args;
use mellow_core::export::{to_markdown, write_file};
use mellow_core::{Database, EntryKind, SessionStore};

use super::CmdResult;

#[derive(Args)]
pub struct ExportArgs {
    /// Only export entries of this kind
    #[arg(long)]
    kind: Option<EntryKind>,
    /// File or directory to write to; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> CmdResult {
    let db = Database::open()?;
    let store = SessionStore::load(&db);
    let entries = store
        .newest_first()
        .into_iter()
        .filter(|e| args.kind.map_or(true, |k| e.kind() == k));
    let markdown = to_markdown(entries, &Local);

    match args.out {
        Some(out) => {
            let path = write_file(&out, &markdown, Utc::now())?;
            println!("{}", path.display());
        }
        None => print!("{markdown}"),
    }
    Ok(())
}
