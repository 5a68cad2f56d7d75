//! CLI smoke binary.
//!
//! # Responsibility
//! - Verify `notekeep_core` linkage without any UI runtime.
//! - Optionally summarize the store persisted at a given SQLite path.

use notekeep_core::{core_version, open_sqlite_store};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notekeep_core version={}", core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match open_sqlite_store(&db_path) {
        Ok(store) => {
            let dangling = store
                .raw_notes()
                .iter()
                .map(|note| note.dangling_tag_ids(store.tags()).len())
                .sum::<usize>();
            println!(
                "notekeep_core store={db_path} notes={} tags={} dangling_tag_refs={dangling}",
                store.raw_notes().len(),
                store.tags().len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("notekeep_core store={db_path} error={err}");
            ExitCode::FAILURE
        }
    }
}
