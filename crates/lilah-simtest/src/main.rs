//! Maha Lilah Headless Rules Harness
//!
//! Validates the reference board tables and the movement rules, then plays
//! seeded random games to completion. Runs entirely in-process — no DB, no
//! networking, no rendering.
//!
//! Usage:
//!   cargo run -p lilah-simtest
//!   cargo run -p lilah-simtest -- --verbose --games 5000 --seed 7

use clap::Parser;
use lilah_logic::board::{validate_tables, BoardTables, Jump, JumpType};
use lilah_logic::engine::Engine;
use lilah_logic::journey::Journey;
use lilah_logic::rules::{Rules, RulesConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

/// Headless validation of the Maha Lilah movement rules
#[derive(Parser, Debug)]
#[command(name = "lilah-simtest", about, long_about = None)]
struct Options {
    /// Print every check and the jump table, and log at debug level
    #[arg(long)]
    verbose: bool,

    /// Number of seeded games to play
    #[arg(long, default_value_t = 1000)]
    games: u32,

    /// Seed for the dice
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Give up on a game after this many rolls
    #[arg(long, default_value_t = 10_000)]
    max_rolls: u32,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let options = Options::parse();
    init_tracing(options.verbose);
    println!("=== Maha Lilah Rules Harness ===\n");

    let mut results = Vec::new();

    // 1. Board tables
    results.extend(validate_board_tables(options.verbose));

    let engine = match Engine::standard() {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "reference board failed to load");
            results.push(TestResult::new("engine_load", false, e.to_string()));
            report(&results, options.verbose);
            std::process::exit(1);
        }
    };

    // 2. Derived geometry
    results.extend(validate_rules(engine.rules()));

    // 3. Full input sweep
    results.extend(validate_move_sweep(engine));

    // 4. Reference scenarios
    results.extend(validate_scenarios(engine));

    // 5. Seeded playthroughs
    results.extend(simulate_games(engine, &options));

    if !report(&results, options.verbose) {
        std::process::exit(1);
    }
}

/// Print the summary; returns true when everything passed.
fn report(results: &[TestResult], verbose: bool) -> bool {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed == 0
}

// ── 1. Board Tables ─────────────────────────────────────────────────────

fn validate_board_tables(verbose: bool) -> Vec<TestResult> {
    println!("--- Board Tables ---");
    let mut results = Vec::new();

    let tables = match BoardTables::standard() {
        Ok(t) => t,
        Err(e) => {
            results.push(TestResult::new("tables_parse", false, e.to_string()));
            return results;
        }
    };
    let rules = match Rules::from_config(&RulesConfig::default()) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::new("rules_config", false, e.to_string()));
            return results;
        }
    };

    let errors = validate_tables(&rules, &tables);
    results.push(TestResult::new(
        "tables_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!(
                "{} houses, {} jumps",
                tables.houses.len(),
                tables.jumps.len()
            )
        } else {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    let forward = tables
        .jumps
        .iter()
        .filter(|j| j.kind() == Some(JumpType::Forward))
        .count();
    let backward = tables
        .jumps
        .iter()
        .filter(|j| j.kind() == Some(JumpType::Backward))
        .count();
    results.push(TestResult::new(
        "jumps_balanced",
        forward == backward,
        format!("{forward} forward, {backward} backward"),
    ));

    // A jump landing on another jump's source would be a chain the rules never follow.
    let chained: Vec<&Jump> = tables
        .jumps
        .iter()
        .filter(|j| tables.jumps.iter().any(|k| k.from == j.to))
        .collect();
    results.push(TestResult::new(
        "jumps_unchained",
        chained.is_empty(),
        if chained.is_empty() {
            "no jump ends on another jump".into()
        } else {
            chained
                .iter()
                .map(|j| format!("{}->{}", j.from, j.to))
                .collect::<Vec<_>>()
                .join(", ")
        },
    ));

    if verbose {
        for jump in &tables.jumps {
            let kind = jump.kind().map(|k| k.as_str()).unwrap_or("self-loop");
            println!("    {:>2} -> {:>2} ({})", jump.from, jump.to, kind);
        }
    }

    results
}

// ── 2. Rules ────────────────────────────────────────────────────────────

fn validate_rules(rules: &Rules) -> Vec<TestResult> {
    println!("--- Rules ---");

    let rebuilt = Rules::from_config(&RulesConfig::default());
    vec![
        TestResult::new(
            "grid_cells",
            rules.total_cells() == rules.rows() as usize * rules.cols() as usize,
            format!(
                "{}x{} = {} cells",
                rules.rows(),
                rules.cols(),
                rules.total_cells()
            ),
        ),
        TestResult::new(
            "bounce_zone_at_end",
            rules.bounce_end() == rules.total_cells() - 1,
            format!(
                "zone [{}, {}], width {}",
                rules.bounce_start(),
                rules.bounce_end(),
                rules.bounce_width()
            ),
        ),
        TestResult::new(
            "rules_stable",
            rebuilt.as_ref() == Ok(rules),
            "rebuilding from the same config yields identical rules".into(),
        ),
    ]
}

// ── 3. Move Sweep ───────────────────────────────────────────────────────

fn validate_move_sweep(engine: &Engine) -> Vec<TestResult> {
    println!("--- Move Sweep ---");
    let rules = engine.rules();
    let (zone_start, zone_end) = rules.bounce_zone();

    let mut checked = 0u32;
    let mut failures: Vec<String> = Vec::new();

    for pos in 0..rules.total_cells() {
        for dice in 1..=6u8 {
            for started in [false, true] {
                checked += 1;
                let (a, b) = match (
                    engine.apply_move(pos, dice, started),
                    engine.apply_move(pos, dice, started),
                ) {
                    (Ok(a), Ok(b)) => (a, b),
                    (Err(e), _) | (_, Err(e)) => {
                        failures.push(format!("({pos},{dice},{started}): {e}"));
                        continue;
                    }
                };
                if a != b {
                    failures.push(format!("({pos},{dice},{started}): non-deterministic"));
                }
                if a.to_index >= rules.total_cells() {
                    failures.push(format!("({pos},{dice},{started}): off board"));
                }
                if !started && dice != 6 && (a.to_index != pos || a.has_started_after) {
                    failures.push(format!("({pos},{dice},{started}): gate moved"));
                }
                let overshoot = started && pos + dice as usize > zone_end;
                let landed_in_zone = a.applied_jump.is_some()
                    || (zone_start..=zone_end).contains(&a.to_index);
                if overshoot && (!a.used_bounce || !landed_in_zone) {
                    failures.push(format!("({pos},{dice},{started}): escaped bounce zone"));
                }
            }
        }
    }

    vec![TestResult::new(
        "move_sweep",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{checked} inputs checked")
        } else {
            format!("{} failures: {}", failures.len(), failures.join("; "))
        },
    )]
}

// ── 4. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(engine: &Engine) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let opened = engine.apply_move(67, 6, false);
    results.push(TestResult::new(
        "gate_opens_on_six",
        matches!(opened, Ok(r) if r.to_index == 5 && r.has_started_after),
        format!("{opened:?}"),
    ));

    let waiting = engine.apply_move(67, 3, false);
    results.push(TestResult::new(
        "gate_waits_otherwise",
        matches!(waiting, Ok(r) if r.to_index == 67 && !r.has_started_after),
        format!("{waiting:?}"),
    ));

    let bounced = engine.apply_move(67, 5, true);
    results.push(TestResult::new(
        "bounce_off_last_cell",
        matches!(bounced, Ok(r) if r.used_bounce && r.to_index == 70),
        format!("{bounced:?}"),
    ));

    let completed =
        engine.is_completed(engine.rules().start_index(), true) && !engine.is_completed(0, true);
    results.push(TestResult::new(
        "completion_predicate",
        completed,
        "only a started token on the gate is complete".into(),
    ));

    results
}

// ── 5. Playthroughs ─────────────────────────────────────────────────────

fn simulate_games(engine: &Engine, options: &Options) -> Vec<TestResult> {
    println!("--- Playthroughs ---");
    tracing::info!(
        games = options.games,
        seed = options.seed,
        "Simulating seeded games"
    );

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut unfinished = 0u32;
    let mut roll_counts = Vec::with_capacity(options.games as usize);
    let mut forward = 0u64;
    let mut backward = 0u64;
    let mut bounces = 0u64;
    let mut roll_errors = 0u32;

    for game in 0..options.games {
        let mut journey = Journey::new(engine.rules());
        while !journey.is_completed() && journey.rolls() < options.max_rolls {
            let dice: u8 = rng.gen_range(1..=6);
            if let Err(e) = journey.roll(engine, dice) {
                tracing::error!(game, error = %e, "roll rejected");
                roll_errors += 1;
                break;
            }
        }
        match journey.completed_at() {
            Some(rolls) => roll_counts.push(rolls),
            None => {
                tracing::warn!(game, rolls = journey.rolls(), "game did not finish");
                unfinished += 1;
            }
        }
        forward += journey.forward_jumps() as u64;
        backward += journey.backward_jumps() as u64;
        bounces += journey.bounces() as u64;
    }

    let finished = roll_counts.len() as u32;
    let mean = if finished > 0 {
        roll_counts.iter().map(|&r| r as f64).sum::<f64>() / finished as f64
    } else {
        0.0
    };
    let min = roll_counts.iter().min().copied().unwrap_or(0);
    let max = roll_counts.iter().max().copied().unwrap_or(0);
    let per_game = |n: u64| {
        if options.games > 0 {
            n as f64 / options.games as f64
        } else {
            0.0
        }
    };

    vec![
        TestResult::new(
            "games_finish",
            unfinished == 0 && roll_errors == 0,
            format!(
                "{finished}/{} finished within {} rolls",
                options.games, options.max_rolls
            ),
        ),
        TestResult::new(
            "game_length",
            finished == 0 || min > 0,
            format!("rolls per game: mean {mean:.1}, min {min}, max {max}"),
        ),
        TestResult::new(
            "jump_usage",
            true,
            format!(
                "per game: {:.2} shortcuts, {:.2} setbacks, {:.2} bounces",
                per_game(forward),
                per_game(backward),
                per_game(bounces)
            ),
        ),
    ]
}
