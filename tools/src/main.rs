//! coinden-runner: headless runner for the Coin Den economy engine.
//!
//! Speaks line-oriented JSON on stdin/stdout so a chat transport (or a
//! human with a terminal) can drive the engine:
//!
//!   {"type":"command","actor":"alice","command":{"cmd":"daily"}}
//!   {"type":"command","actor":"alice","privileged":true,
//!    "command":{"cmd":"add_money","target":"bob","amount":500}}
//!   {"type":"accrual_tick"}
//!   {"type":"quit"}
//!
//! Usage:
//!   coinden-runner --db coinden.db --seed 12345

use anyhow::Result;
use coinden_core::{
    command::{Command, CommandContext},
    config::EconConfig,
    engine::EconEngine,
    error::EconError,
    store::EconStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RunnerInput {
    Command {
        actor: String,
        #[serde(default)]
        privileged: bool,
        command: Command,
    },
    AccrualTick,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", rand_seed());
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or("coinden.db");

    let cfg = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EconConfig::from_json(&std::fs::read_to_string(&w[1])?)?,
        None => EconConfig::default(),
    };

    let store = if db == ":memory:" {
        EconStore::in_memory()?
    } else {
        EconStore::open(db)?
    };
    let mut engine = EconEngine::build_system(store, cfg, seed)?;
    log::info!("coinden-runner up: db={db} seed={seed}");

    // Catch up any payouts owed from downtime before serving commands.
    engine.accrual_tick()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();
    let mut handle = stdin.lock();

    loop {
        buffer.clear();
        if handle.read_line(&mut buffer)? == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let input: RunnerInput = match serde_json::from_str(&buffer) {
            Ok(input) => input,
            Err(e) => {
                emit(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
                continue;
            }
        };

        match input {
            RunnerInput::Quit => break,
            RunnerInput::AccrualTick => match engine.accrual_tick() {
                Ok(report) => emit(&mut stdout, &serde_json::json!({ "accrual": report }))?,
                Err(e) => {
                    // The checkpoint only advances on success; the next
                    // tick retries the same window.
                    log::warn!("accrual tick failed: {e}");
                    emit(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
                }
            },
            RunnerInput::Command {
                actor,
                privileged,
                command,
            } => {
                // The accrual trigger rides the command loop: cheap and
                // idempotent when no whole hour has elapsed.
                if let Err(e) = engine.accrual_tick() {
                    log::warn!("accrual tick failed: {e}");
                }
                let ctx = CommandContext { actor, privileged };
                let reply = match engine.dispatch(&ctx, command) {
                    Ok(outcome) => serde_json::json!({ "ok": outcome }),
                    Err(e @ EconError::Database(_))
                    | Err(e @ EconError::Serialization(_))
                    | Err(e @ EconError::Other(_)) => {
                        log::error!("dispatch failed: {e}");
                        serde_json::json!({ "error": e.to_string() })
                    }
                    Err(e) => serde_json::json!({ "rejected": e.to_string() }),
                };
                emit(&mut stdout, &reply)?;
            }
        }
    }

    Ok(())
}

fn emit(stdout: &mut io::Stdout, value: &serde_json::Value) -> Result<()> {
    writeln!(stdout, "{value}")?;
    stdout.flush()?;
    Ok(())
}

fn parse_arg(args: &[String], flag: &str, default: u64) -> u64 {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

/// Fresh per-process seed when none is given; game outcomes should not
/// repeat across restarts.
fn rand_seed() -> u64 {
    let id = uuid::Uuid::new_v4();
    let (hi, lo) = id.as_u64_pair();
    hi ^ lo
}
