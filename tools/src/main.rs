//! desk-runner: headless complaint desk.
//!
//! Usage:
//!   desk-runner --seed 12345 --sample 50 --db desk.db
//!   desk-runner --data-dir ./data --ipc-mode

use anyhow::Result;
use complaint_desk_core::{
    clock::{DeskClock, SystemClock},
    command::DeskCommand,
    config::DeskConfig,
    desk::ComplaintDesk,
    error::DeskError,
    session::{Actor, Authenticator, UserDirectory},
    store::{ComplaintStore, DeskStore},
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let sample = parse_arg(&args, "--sample", 50usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    if !ipc_mode {
        println!("Complaint Desk - desk-runner");
        println!("  seed:      {seed}");
        println!("  sample:    {sample}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = DeskConfig::load(data_dir)?;
    let store = DeskStore::open(db)?;
    store.migrate()?;
    log::info!("store ready at {db}");

    let clock = SystemClock;
    let directory = UserDirectory::new(config.users.clone());
    let desk = ComplaintDesk::new(config, store);

    if sample > 0 && desk.store().complaint_count()? == 0 {
        desk.seed_sample(seed, sample, clock.now())?;
    }

    if ipc_mode {
        run_ipc_loop(&desk, &directory, &clock)?;
    } else {
        print_summary(&desk, &clock)?;
    }
    Ok(())
}

fn run_ipc_loop<S: ComplaintStore>(
    desk: &ComplaintDesk<S>,
    auth: &dyn Authenticator,
    clock: &dyn DeskClock,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    // The session lives here, in the loop, and is passed to every call.
    let mut session: Option<Actor> = None;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: DeskCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
                continue;
            }
        };

        if cmd == DeskCommand::Quit {
            break;
        }
        let response = match handle_command(desk, auth, clock, &mut session, cmd) {
            Ok(value) => value,
            Err(e) => error_json(&e),
        };
        reply(&mut stdout, &response)?;
    }
    Ok(())
}

fn handle_command<S: ComplaintStore>(
    desk: &ComplaintDesk<S>,
    auth: &dyn Authenticator,
    clock: &dyn DeskClock,
    session: &mut Option<Actor>,
    cmd: DeskCommand,
) -> Result<serde_json::Value, DeskError> {
    let now = clock.now();
    match cmd {
        DeskCommand::Login { username, secret } => {
            *session = auth.authenticate(&username, &secret);
            Ok(match session {
                Some(actor) => serde_json::to_value(actor)?,
                None => serde_json::json!({ "error": "invalid credentials" }),
            })
        }
        DeskCommand::Logout => {
            *session = None;
            Ok(serde_json::json!({ "ok": true }))
        }
        // Intake is open to citizens; no session needed.
        DeskCommand::Submit { submission } => {
            Ok(serde_json::to_value(desk.submit(submission, now)?)?)
        }
        DeskCommand::UpdateStatus { update } => {
            let actor = require_session(session)?;
            Ok(serde_json::to_value(desk.update_status(actor, &update, now)?)?)
        }
        DeskCommand::List { query } => {
            let actor = require_session(session)?;
            Ok(serde_json::to_value(desk.list(actor, &query, now)?)?)
        }
        DeskCommand::Dashboard => {
            let actor = require_session(session)?;
            Ok(serde_json::to_value(desk.dashboard(actor, now)?)?)
        }
        DeskCommand::Analytics => {
            let actor = require_session(session)?;
            Ok(serde_json::to_value(desk.analytics(actor, now)?)?)
        }
        DeskCommand::Quit => Ok(serde_json::json!({ "ok": true })),
    }
}

fn require_session(session: &Option<Actor>) -> Result<&Actor, DeskError> {
    session
        .as_ref()
        .ok_or_else(|| DeskError::Other(anyhow::anyhow!("not logged in")))
}

fn error_json(err: &DeskError) -> serde_json::Value {
    let kind = match err {
        DeskError::InvalidTransition { .. } => "invalid_transition",
        DeskError::Unauthorized { .. } => "unauthorized",
        DeskError::UnknownDepartment { .. } => "unknown_department",
        DeskError::DuplicateComplaint { .. } => "duplicate_complaint",
        DeskError::ComplaintNotFound { .. } => "not_found",
        DeskError::StaleWrite { .. } => "stale_write",
        _ => "internal",
    };
    serde_json::json!({ "error": err.to_string(), "kind": kind })
}

fn reply(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{value}")?;
    out.flush()?;
    Ok(())
}

fn print_summary<S: ComplaintStore>(desk: &ComplaintDesk<S>, clock: &dyn DeskClock) -> Result<()> {
    let now = clock.now();
    let admin = Actor::main_admin("runner", "desk-runner");
    let stats = desk.dashboard(&admin, now)?;
    let report = desk.analytics(&admin, now)?;

    println!("=== DESK SUMMARY ===");
    println!("  total:          {}", stats.total);
    println!("  pending:        {}", stats.pending);
    println!("  resolved today: {}", stats.resolved_today);
    println!("  overdue:        {}", stats.overdue);
    println!("  avg resolution: {:.1}h", stats.avg_resolution_hours);
    println!("  resolution:     {}%", stats.resolution_rate_pct);
    println!("  within SLA:     {}%", report.sla.within_pct);

    println!();
    println!("=== DEPARTMENTS ===");
    if report.departments.is_empty() {
        println!("  (No complaints yet)");
    }
    for d in &report.departments {
        println!(
            "  {:<12} | total {:>3} | pending {:>3} | overdue {:>3} | resolved {:>3}%",
            d.department, d.total, d.pending, d.overdue, d.resolution_rate_pct
        );
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
