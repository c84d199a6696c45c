use std::{collections::BTreeMap, io::stdin, time::Instant};

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use model_selection::{Decision, History, ModelMetrics, Preference, Selector, SelectorConfig};
use rand::{rngs::SmallRng, Rng as _, SeedableRng as _};
use tracing_subscriber::EnvFilter;

/// Replays repeated selections over jittered metrics read from stdin as
/// `name,quality,response_time,cost` lines.
#[derive(Parser)]
struct Opt {
    #[arg(short, long, default_value = "balanced")]
    preference: Preference,
    #[arg(short, long, default_value_t = 1_000)]
    rounds: u64,
    /// Relative jitter applied to response time and cost each round.
    #[arg(short, long, default_value_t = 0.05)]
    jitter: f64,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Do not thread the previous selection into the next round.
    #[arg(long)]
    no_hysteresis: bool,
    #[arg(long, default_value_t = 800.0)]
    rt_ref: f64,
    #[arg(long, default_value_t = 1.0)]
    cost_ref: f64,
    #[arg(long, default_value_t = 0.2)]
    quality_tie_delta: f64,
    #[arg(long, default_value_t = 0.5)]
    anti_flap_delta: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let opt = Opt::parse();
    if !(0.0..1.0).contains(&opt.jitter) {
        bail!("jitter must be in [0, 1), got {}", opt.jitter);
    }
    let config = SelectorConfig::new(
        opt.rt_ref,
        opt.cost_ref,
        opt.quality_tie_delta,
        opt.anti_flap_delta,
    )
    .context("invalid selector config")?;
    let selector = Selector::new(config).context("invalid selector config")?;

    let header = "name,quality,response_time,cost";
    let mut characteristics: Vec<ModelMetrics> = Vec::new();
    for (line_index, line) in stdin().lines().enumerate() {
        let line = line.context("read stdin")?;
        if line.trim().is_empty() || line.starts_with(header) {
            continue;
        }
        let metrics = parse_line(&line).with_context(|| format!("line {}", line_index + 1))?;
        characteristics.push(metrics);
    }
    if characteristics.is_empty() {
        bail!("no candidates on stdin, expected lines of `{header}`");
    }
    tracing::info!(candidates = characteristics.len(), preference = %opt.preference, "loaded");

    let mut rng = match opt.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut history = History::default();
    let mut selection_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut switches: u64 = 0;
    let mut kept: u64 = 0;
    let mut total_selection_μs = 0;
    let mut previous: Option<String> = None;
    let mut last_candidates: Vec<ModelMetrics> = Vec::new();

    for round in 0..opt.rounds {
        let mut jitter = || rng.gen_range((1.0 - opt.jitter)..=(1.0 + opt.jitter));
        let candidates: Vec<ModelMetrics> = characteristics
            .iter()
            .map(|c| ModelMetrics {
                response_time: c.response_time * jitter(),
                cost: c.cost * jitter(),
                last_updated: round,
                ..c.clone()
            })
            .collect();

        let t0 = Instant::now();
        let selection = selector.select(&candidates, opt.preference, &history)?;
        total_selection_μs += Instant::now().duration_since(t0).as_micros();

        let name = selection.candidate.name.clone();
        if matches!(selection.decision, Decision::KeptPrevious { .. }) {
            kept += 1;
        }
        if previous.as_ref().is_some_and(|p| p != &name) {
            switches += 1;
        }
        *selection_counts.entry(name.clone()).or_default() += 1;
        if !opt.no_hysteresis {
            history = selection.history();
        }
        previous = Some(name);
        last_candidates = candidates;
    }

    println!(
        "avg_selection_μs: {:.2}",
        total_selection_μs as f64 / opt.rounds.max(1) as f64
    );
    println!("switches: {switches}");
    println!("kept_previous: {kept}");
    for (name, count) in &selection_counts {
        println!("selected {name}: {count}");
    }
    if !last_candidates.is_empty() {
        let selection = selector.select(&last_candidates, opt.preference, &history)?;
        let comparison = selector.compare(&selection)?;
        println!("final {}: {comparison}", selection.candidate.name);
    }
    Ok(())
}

fn parse_line(line: &str) -> Result<ModelMetrics> {
    let fields = line.split(',').map(str::trim).collect::<Vec<&str>>();
    let &[name, quality, response_time, cost] = fields.as_slice() else {
        bail!("expected 4 fields, got {}", fields.len());
    };
    Ok(ModelMetrics::new(
        name,
        quality.parse().context("quality")?,
        response_time.parse().context("response_time")?,
        cost.parse().context("cost")?,
    ))
}
