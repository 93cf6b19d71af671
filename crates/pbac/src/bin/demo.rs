//! # Particle Binding Core — Golden Path Demo
//!
//! Drives a scripted scenario through the whole pipeline without a real
//! camera, detector or renderer: synthetic tracking frames at ~30 Hz feed
//! an [`Engine`] ticking at 60 Hz, and this binary measures how much of
//! the 16.67 ms frame budget each tick actually costs at full particle
//! count.
//!
//! Scenario: one hand fades in, both hands are tracked steadily, the mode
//! flips from Attract to Repel, one hand is lost and recovers.

use std::time::Instant;

use pbac::{Engine, EngineConfig};
use pbac_shared::{HandObs, Handedness, Landmark, PhysicsMode, TrackingFrame, HAND_LANDMARK_COUNT};

const RENDER_STEP_MS: f64 = 16.67;
const DETECT_STEP_MS: f64 = 33.33;

fn hand_at(x: f32, y: f32, handedness: Handedness) -> HandObs {
    HandObs { landmarks: vec![Landmark::new(x, y, 0.0, 1.0); HAND_LANDMARK_COUNT], handedness }
}

/// Per-tick timing, in the style of the orchestration layer this crate
/// was split out of.
#[derive(Clone, Copy, Debug, Default)]
struct TickStats {
    frames_recorded: u64,
    total_us_sum: u64,
    min_us: u64,
    max_us: u64,
    frames_over_budget: u64,
}

impl TickStats {
    fn record(&mut self, total_us: u64) {
        self.frames_recorded += 1;
        self.total_us_sum += total_us;
        self.min_us = if self.frames_recorded == 1 { total_us } else { self.min_us.min(total_us) };
        self.max_us = self.max_us.max(total_us);
        if total_us > (RENDER_STEP_MS * 1000.0) as u64 {
            self.frames_over_budget += 1;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    fn print_summary(&self, particle_count: u32) {
        println!("+----------------------------------------------------------+");
        println!("| TICK TIMING SUMMARY ({particle_count} particles)");
        println!("+----------------------------------------------------------+");
        println!("| frames recorded:    {}", self.frames_recorded);
        println!("| average tick:       {:.3} ms", self.avg_ms());
        println!("| min tick:           {:.3} ms", self.min_us as f64 / 1000.0);
        println!("| max tick:           {:.3} ms", self.max_us as f64 / 1000.0);
        println!(
            "| over 16.67ms budget: {} ({:.1}%)",
            self.frames_over_budget,
            100.0 * self.frames_over_budget as f64 / self.frames_recorded.max(1) as f64
        );
        println!("+----------------------------------------------------------+");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::default();
    let mut engine = Engine::new(&config).expect("default config is always valid");
    let mut stats = TickStats::default();

    println!("particle binding & animation core -- golden path demo");
    println!("particle budget: {}", engine.particle_count());
    println!();

    let mut now_ms = 0.0_f64;
    let mut last_detect_ms = f64::NEG_INFINITY;

    // Phase 1 (0-500ms): left hand only, fading in and settling.
    // Phase 2 (500-1500ms): both hands tracked.
    // Phase 3 (1500ms): flip to Repel.
    // Phase 4 (1500-2500ms): hold both hands in Repel mode.
    // Phase 5 (2500-3000ms): right hand lost (occlusion -> fade-out).
    for frame in 0..180 {
        now_ms = f64::from(frame) * RENDER_STEP_MS;

        if now_ms - last_detect_ms >= DETECT_STEP_MS {
            let mut hands = vec![hand_at(0.3, 0.5, Handedness::Left)];
            if now_ms >= 500.0 && now_ms < 2500.0 {
                hands.push(hand_at(0.7, 0.5, Handedness::Right));
            }
            engine.push_frame(&TrackingFrame { hands, face: None, timestamp_ms: now_ms });
            last_detect_ms = now_ms;
        }

        if (now_ms - 1500.0).abs() < RENDER_STEP_MS / 2.0 {
            engine.set_physics_mode(PhysicsMode::Repel);
            println!("[t={now_ms:.1}ms] switched to Repel mode");
        }

        let start = Instant::now();
        let view = engine.tick(now_ms);
        let elapsed_us = start.elapsed().as_micros() as u64;
        stats.record(elapsed_us);

        if frame % 30 == 0 {
            println!(
                "[t={now_ms:.1}ms] generation={} visible>0alpha particles in buffer, tick={:.3}ms",
                view.generation(),
                elapsed_us as f64 / 1000.0
            );
        }
    }

    println!();
    println!("[t={now_ms:.1}ms] idle check: {}", engine.is_idle(now_ms));
    println!();
    stats.print_summary(engine.particle_count());

    if stats.max_us as f64 / 1000.0 > RENDER_STEP_MS {
        eprintln!("warning: at least one tick exceeded the 16.67ms render budget");
    }
}
