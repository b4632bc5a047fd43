//! Tick loop with failure recovery.
//!
//! A tick that panics halts the loop, leaves a system event in the history,
//! waits for the configured delay and resumes. Once the restart budget is
//! spent, the next failure ends the run with an error.

use crate::config::Config;
use crate::error::{SimError, SimResult};
use crate::snapshot::WorldSnapshot;
use crate::world::World;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

/// Recovery settings for the driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Pause before resuming after a failed tick
    pub restart_delay: Duration,
    /// Failed ticks tolerated before giving up
    pub max_restarts: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            restart_delay: Duration::from_millis(1000),
            max_restarts: 1,
        }
    }
}

impl DriverConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            restart_delay: Duration::from_millis(config.safety.restart_delay_ms),
            max_restarts: config.safety.max_restarts,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct DriverReport {
    pub ticks_run: u64,
    pub restarts: u32,
    pub final_population: usize,
    pub elapsed_secs: f64,
}

impl DriverReport {
    pub fn ticks_per_second(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.ticks_run as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

/// Owns a world and advances it tick by tick
pub struct Driver {
    world: World,
    config: DriverConfig,
    restarts: u32,
    /// Set between a restart and the next successful tick
    recovering: bool,
}

impl Driver {
    pub fn new(world: World, config: DriverConfig) -> Self {
        Self {
            world,
            config,
            restarts: 0,
            recovering: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Advance `ticks` successful ticks
    pub fn run(&mut self, ticks: u64) -> SimResult<DriverReport> {
        self.run_with(ticks, |_| {})
    }

    /// Advance `ticks` successful ticks, handing every snapshot to `on_tick`
    pub fn run_with<F: FnMut(&WorldSnapshot)>(&mut self, ticks: u64, mut on_tick: F) -> SimResult<DriverReport> {
        let start = Instant::now();
        let mut completed = 0;

        while completed < ticks {
            let tick = self.world.time;
            let world = &mut self.world;
            match panic::catch_unwind(AssertUnwindSafe(|| world.tick())) {
                Ok(snapshot) => {
                    completed += 1;
                    self.recovering = false;
                    on_tick(&snapshot);
                }
                Err(payload) => self.recover(tick, panic_message(payload.as_ref()))?,
            }
        }

        Ok(DriverReport {
            ticks_run: completed,
            restarts: self.restarts,
            final_population: self.world.population(),
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    fn recover(&mut self, tick: u64, message: String) -> SimResult<()> {
        log::error!("Tick {} failed: {}", tick, message);
        self.world
            .record_system_event(format!("Simulation halted at tick {}: {}", tick, message));

        if self.recovering {
            return Err(SimError::RestartFailed { tick });
        }
        if self.restarts >= self.config.max_restarts {
            return Err(SimError::TickPanicked { tick, message });
        }

        self.restarts += 1;
        self.recovering = true;
        thread::sleep(self.config.restart_delay);
        log::info!("Resuming simulation after failure at tick {}", tick);
        self.world.record_system_event("Simulation restarted");
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
