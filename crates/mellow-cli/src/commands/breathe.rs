use std::io::Write;
use std::time::Duration;

use clap::Args;
use mellow_core::{BreathingPattern, BreathingPreset};
use tokio::time::{Instant, MissedTickBehavior};

use super::CmdResult;

#[derive(Args)]
pub struct BreatheArgs {
    /// box, 4-7-8, focus-pulse or custom
    pattern: BreathingPreset,
    /// Number of full cycles
    #[arg(long, default_value_t = 3)]
    cycles: u64,
    /// Seconds for inhale, hold, exhale, hold (custom pattern only)
    #[arg(long, num_args = 4, value_names = ["IN", "HOLD", "OUT", "REST"])]
    secs: Option<Vec<u32>>,
}

pub async fn run(args: BreatheArgs) -> CmdResult {
    let pattern = match (args.pattern, args.secs.as_deref()) {
        (BreathingPreset::Custom, Some(&[inhale, hold, exhale, rest])) => {
            BreathingPattern::custom([inhale, hold, exhale, rest])
        }
        (preset, _) => BreathingPattern::preset(preset),
    };
    if pattern.cycle_secs() == 0 {
        return Err("breathing pattern has no length".into());
    }

    println!("{} ({}s per cycle), Ctrl-C to stop", pattern.name, pattern.cycle_secs());
    let start = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(200));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let Some(pos) = pattern.at(elapsed_ms) else { break };
                if pos.cycle >= args.cycles {
                    break;
                }
                let shown = (pos.cycle, pos.step_index, pos.remaining_secs);
                if last != Some(shown) {
                    print!("\r{:<8}{:>3}s   cycle {}/{}", pos.phase.to_string(), pos.remaining_secs, pos.cycle + 1, args.cycles);
                    std::io::stdout().flush()?;
                    last = Some(shown);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    println!();
    Ok(())
}
