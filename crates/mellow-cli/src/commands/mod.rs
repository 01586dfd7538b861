pub mod breathe;
pub mod config;
pub mod export;
pub mod focus;
pub mod journal;
pub mod mode;
pub mod recall;
pub mod stats;

use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
