// Ledger Benchmark Runner, seedable account-lifecycle soak test.
// Drives many synthetic accounts through many weekly cycles of random user
// activity and checks the accounting invariants after every cycle.
//
// Usage:
//   cargo run --release --bin bench                    # 50 accounts, 26 cycles
//   cargo run --release --bin bench -- --accounts 5    # Quick mode
//   cargo run --release --bin bench -- --cycles 104    # Two simulated years
//   cargo run --release --bin bench -- --seed 42       # Custom base seed

mod report;
mod roster;

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use report::{AccountResult, BenchReport, Stats, Summary};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    accounts: usize,
    cycles: usize,
    seed: u64,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        accounts: 50,
        cycles: 26,
        seed: 0,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" => {
                i += 1;
                if i < args.len() {
                    cli.accounts = args[i].parse().unwrap_or(50);
                }
            }
            "--cycles" => {
                i += 1;
                if i < args.len() {
                    cli.cycles = args[i].parse().unwrap_or(26);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();

    println!("\n  Ledger Benchmark Runner v0.2.0");
    println!(
        "  PRNG: ChaCha8Rng | Accounts: {} | Cycles/account: {} | Base seed: {}\n",
        cli.accounts, cli.cycles, cli.seed
    );
    println!(
        "  {:<10} {:>6} {:>9} {:>8} {:>8} {:>12} {:>6} {:>7}",
        "Account", "Roster", "Mutations", "Rolls", "History", "Peak gold", "Viol", "Time"
    );
    println!("  {}", "-".repeat(74));

    let suite_start = Instant::now();
    let mut results: Vec<AccountResult> = Vec::with_capacity(cli.accounts);

    for account in 0..cli.accounts {
        let result = roster::run_account(account, cli.cycles, cli.seed);
        let status = if result.pass { "PASS" } else { "FAIL" };

        println!(
            "  {:<10} {:>6} {:>9} {:>8} {:>8} {:>12.0} {:>6} {:>5}ms  {}",
            format!("#{account}"),
            result.roster_size,
            result.mutations,
            result.rolls,
            result.history_len,
            result.peak_weekly_gold,
            result.violation_total(),
            result.elapsed_ms,
            status,
        );

        results.push(result);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let failed = total - passed;
    let total_violations: u64 = results.iter().map(|r| r.violation_total()).sum();

    println!("  {}", "-".repeat(74));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Violations: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        total_violations,
        suite_elapsed.as_secs_f64()
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis();
    let timestamp = format!("{ts}");

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.2.0",
        prng: "ChaCha8Rng",
        accounts: cli.accounts,
        cycles_per_account: cli.cycles,
        base_seed: cli.seed,
        summary: Summary {
            total,
            passed,
            failed,
            total_violations,
        },
        weekly_gold: Stats::from_samples(
            &results.iter().map(|r| r.mean_weekly_gold).collect::<Vec<_>>(),
        ),
        mutations_per_account: Stats::from_samples(
            &results.iter().map(|r| r.mutations as f64).collect::<Vec<_>>(),
        ),
        elapsed_ms: Stats::from_samples(
            &results.iter().map(|r| r.elapsed_ms as f64).collect::<Vec<_>>(),
        ),
        results,
    };

    let dir = std::path::Path::new("benchmark-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create benchmark-results/");
    }
    let path = dir.join(format!("bench-{timestamp}.json"));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write benchmark file");
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
}
