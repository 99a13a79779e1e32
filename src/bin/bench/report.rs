// Benchmark report types and per-metric aggregation.
// Structured JSON output so regressions can be diffed between runs.

use serde::Serialize;

// ─── Statistics (per-metric aggregation across accounts) ────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Self {
            mean,
            std_dev: variance.sqrt(),
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Account Result ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AccountResult {
    pub account: usize,
    pub seed: u64,
    pub roster_size: usize,
    pub cycles: usize,
    pub mutations: u64,
    pub rolls: u64,
    pub history_len: usize,
    pub recorded_cycles: u64,
    pub zero_cycles: u64,
    pub peak_weekly_gold: f64,
    pub mean_weekly_gold: f64,
    pub additivity_violations: u64,
    pub rollup_violations: u64,
    pub idempotence_violations: u64,
    pub history_violations: u64,
    pub round_trip_violations: u64,
    pub elapsed_ms: u128,
    pub pass: bool,
}

impl AccountResult {
    pub fn violation_total(&self) -> u64 {
        self.additivity_violations
            + self.rollup_violations
            + self.idempotence_violations
            + self.history_violations
            + self.round_trip_violations
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub accounts: usize,
    pub cycles_per_account: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub weekly_gold: Stats,
    pub mutations_per_account: Stats,
    pub elapsed_ms: Stats,
    pub results: Vec<AccountResult>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_violations: u64,
}
