//! Tabular CFR vs Deep CFR on Secret Tic-Tac-Toe.
//!
//! Usage:
//!   cargo run --release --bin arena -- [OPTIONS]
//!
//! Options:
//!   --filepath-cfr <FILE>       Tabular policy file (default: output.txt)
//!   --filepath-deep-cfr <FILE>  Policy network weights (default: deep_cfr.txt)
//!
//! Prints two lines to stdout: the Deep CFR win rate when it moves first,
//! then the tabular win rate when it moves first. Logs go to stderr and are
//! filtered with `RUST_LOG` (default `info`).

use std::process;

use clap::Parser;

use policy_arena::arena::{
    ArenaConfig, Evaluator, ModelPolicyProvider, SeatReport, TabularPolicyProvider,
};
use policy_arena::games::secret_tic_tac_toe::SecretTicTacToe;
use policy_arena::ArenaResult;

#[derive(Parser)]
#[command(name = "arena", about = "Pit a tabular CFR policy against a Deep CFR policy network.")]
struct Cli {
    /// Tabular policy file written by the CFR solver.
    #[arg(long, default_value = "output.txt")]
    filepath_cfr: String,

    /// Safetensors weights of the Deep CFR policy network.
    #[arg(long, default_value = "deep_cfr.txt")]
    filepath_deep_cfr: String,
}

fn run(cli: &Cli) -> ArenaResult<SeatReport> {
    let config = ArenaConfig::default();

    let tabular = TabularPolicyProvider::load(&cli.filepath_cfr)?;
    let deep = ModelPolicyProvider::load(&cli.filepath_deep_cfr, config.max_action_width)?;

    let evaluator = Evaluator::new(SecretTicTacToe::new(), config)?;
    evaluator.evaluate_both_seats(&deep, &tabular)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            log::info!(
                "{:<32}{:<32}",
                "deep cfr first",
                format!("{}W {}D {}L", report.first.wins, report.first.draws, report.first.losses)
            );
            log::info!(
                "{:<32}{:<32}",
                "tabular cfr first",
                format!(
                    "{}W {}D {}L",
                    report.swapped.wins, report.swapped.draws, report.swapped.losses
                )
            );
            println!("{}", report.first.win_rate);
            println!("{}", report.swapped.win_rate);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
