//! two_arm — two robot arms sharing a three-layer, two-material part.
//!
//! Arm 1 (material A) sits left of the part and arm 2 (material B) right of
//! it.  Each layer is a 100 × 100 square whose four edges alternate between
//! the two materials, so the arms keep reaching into the same square and
//! the planner has to serialize them.  Layers are stacked with
//! `Precedence::by_layers`.
//!
//! Usage:
//!
//! ```text
//! two_arm [config.json]        # optional PlanConfig overrides
//! TPS_LOG=debug two_arm        # per-commit logging
//! TPS_BATCH=1 two_arm          # one layer at a time
//! ```
//!
//! The schedule is written to `output/two_arm/schedule.json`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tps_agent::{AgentDescriptor, AgentRoster, RosterBuilder};
use tps_collision::{Sphere, SphereClearance};
use tps_core::{AgentId, Capability, Point3};
use tps_plan::{Conflict, PlanConfig, PlanObserver, PlanStats, PlannerBuilder};
use tps_schedule::{EventKind, Schedule};
use tps_toolpath::{Precedence, Segment, Toolpath};

// ── Constants ─────────────────────────────────────────────────────────────────

const MATERIAL_A:     Capability = Capability(0);
const MATERIAL_B:     Capability = Capability(1);
const LAYERS:         usize      = 3;
const LAYER_HEIGHT:   f64        = 2.0;
const SIDE:           f64        = 100.0;
const ARM_SPEED:      f64        = 50.0;
const TOOL_RADIUS:    f64        = 40.0;
const OUTPUT_DIR:     &str       = "output/two_arm";

// ── Cell ──────────────────────────────────────────────────────────────────────

fn build_toolpath() -> Result<Toolpath> {
    let h = SIDE / 2.0;
    let corners = [(-h, -h), (h, -h), (h, h), (-h, h)];
    let mut path = Toolpath::empty();
    for layer in 0..LAYERS {
        let z = layer as f64 * LAYER_HEIGHT;
        for edge in 0..4 {
            let (x0, y0) = corners[edge];
            let (x1, y1) = corners[(edge + 1) % 4];
            let material = if (edge + layer) % 2 == 0 { MATERIAL_A } else { MATERIAL_B };
            path.push(Segment::new(
                vec![Point3::new(x0, y0, z), Point3::new(x1, y1, z)],
                material,
            )?);
        }
    }
    Ok(path)
}

fn build_roster() -> Result<AgentRoster<Sphere>> {
    let arm = |id: u32, material: Capability, x: f64| {
        AgentDescriptor::new(AgentId(id), Sphere::new(TOOL_RADIUS))
            .with_capability(material)
            .with_base(Point3::new(x * 350.0, 0.0, 0.0))
            .with_home(Point3::new(x * 250.0, 0.0, 0.0))
            .with_speeds(ARM_SPEED, ARM_SPEED)
    };
    Ok(RosterBuilder::new()
        .agent(arm(1, MATERIAL_A, -1.0))
        .agent(arm(2, MATERIAL_B, 1.0))
        .build()?)
}

fn load_config(arg: Option<String>) -> Result<PlanConfig> {
    let Some(path) = arg else {
        return Ok(PlanConfig {
            retract_height: 5.0,
            return_home: true,
            ..PlanConfig::default()
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: PlanConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Progress {
    conflicts: usize,
    stats:     Option<PlanStats>,
}

impl PlanObserver for Progress {
    fn on_conflict(&mut self, conflict: &Conflict) {
        self.conflicts += 1;
        info!(event = "demo.conflict", %conflict);
    }

    fn on_plan_end(&mut self, stats: &PlanStats) {
        self.stats = Some(stats.clone());
    }
}

fn print_summary(schedule: &Schedule) {
    println!("{:<12} {:>7} {:>8} {:>10} {:>10}", "Agent", "Travel", "Process", "Start", "End");
    println!("{}", "-".repeat(51));
    for (agent, timeline) in schedule.timelines() {
        let travel = timeline.events().iter().filter(|e| e.kind == EventKind::Travel).count();
        let process = timeline.events().len() - travel;
        println!(
            "{:<12} {:>7} {:>8} {:>10.3} {:>10.3}",
            agent.to_string(),
            travel,
            process,
            timeline.start_time().map_or(0.0, |t| t.secs()),
            timeline.end_time().map_or(0.0, |t| t.secs()),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TPS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== two_arm — rust_tps toolpath scheduler ===");

    // 1. Part and cell.
    let toolpath = build_toolpath()?;
    let layers = Precedence::by_layers(&toolpath, LAYER_HEIGHT / 4.0)?;
    let roster = build_roster()?;
    println!(
        "Toolpath: {} segments, {:.1} mm  |  Agents: {}  |  Precedence edges: {}",
        toolpath.len(),
        toolpath.total_length(),
        roster.len(),
        layers.edge_count(),
    );

    // 2. Planner.
    let config = load_config(std::env::args().nth(1))?;
    println!(
        "Config: dt = {} s, K = {}, retract = {} mm, return home = {}, allocation = {:?}",
        config.sample_dt, config.max_retries, config.retract_height, config.return_home, config.allocation
    );
    let batch = std::env::var("TPS_BATCH")
        .ok()
        .map(|v| v.parse::<usize>().with_context(|| format!("TPS_BATCH = {v:?}")))
        .transpose()?;
    let planner = PlannerBuilder::new(roster, SphereClearance::default())
        .config(config)
        .build()?;

    // 3. Plan.
    let mut progress = Progress::default();
    let t0 = Instant::now();
    let schedule = match batch {
        Some(size) => planner.plan_batched(&toolpath, &layers, size, &mut progress)?,
        None => planner.plan_with(&toolpath, &layers, &mut progress)?,
    };
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!();
    println!("Planned in {:.3} ms", elapsed.as_secs_f64() * 1e3);
    println!(
        "Makespan {:.3} s  |  {} events  |  {} conflicts resolved",
        schedule.makespan().secs(),
        schedule.event_count(),
        progress.conflicts,
    );
    if let Some(stats) = &progress.stats {
        println!("Worst task needed {} delay(s)", stats.max_attempts);
    }
    println!();
    print_summary(&schedule);

    // 5. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let out = Path::new(OUTPUT_DIR).join("schedule.json");
    std::fs::write(&out, serde_json::to_string_pretty(&schedule)?)?;
    println!();
    println!("Schedule written to {}", out.display());

    Ok(())
}
