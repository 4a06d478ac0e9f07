//! Real-time interactive session.
//!
//! The simulation lives on its own thread. Front ends talk to it through a
//! command channel; commands are applied only between ticks, so a reset or
//! a paradigm switch is never observed half-way through a step. After each
//! tick a [`StateSnapshot`] is offered on a bounded telemetry channel. When
//! the consumer lags the snapshot is dropped rather than stalling the loop.

use std::sync::mpsc::{
    self, Receiver, RecvTimeoutError, Sender, SyncSender, TryRecvError, TrySendError,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use aq_controls::DesignParadigm;
use aq_plant::FaultKind;
use aq_signals::DisturbanceConfig;
use aq_sim::{PlanStep, SimResult, Simulation, StateSnapshot};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// How long a paused session waits for a command before checking again.
const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub enum SessionCommand {
    Run,
    Pause,
    Reset,
    SelectParadigm(DesignParadigm),
    SetDemand(DisturbanceConfig),
    SetSetpoint(DisturbanceConfig),
    EnqueuePlan(PlanStep),
    SetFault(FaultKind, f64),
    ClearFault(FaultKind),
    SetValve(bool),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Simulated seconds per wall-clock second. 1.0 is real time.
    pub speed: f64,
    pub start_running: bool,
    /// Snapshots buffered before new ones are dropped.
    pub telemetry_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start_running: false,
            telemetry_capacity: 256,
        }
    }
}

pub struct Session {
    commands: Sender<SessionCommand>,
    telemetry: Receiver<StateSnapshot>,
    handle: Option<JoinHandle<Simulation>>,
}

impl Session {
    pub fn start(sim: Simulation, options: SessionOptions) -> AppResult<Self> {
        if !options.speed.is_finite() || options.speed <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "session speed must be positive, got {}",
                options.speed
            )));
        }
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (tel_tx, tel_rx) = mpsc::sync_channel(options.telemetry_capacity.max(1));

        let handle = thread::Builder::new()
            .name("aq-session".to_string())
            .spawn(move || SessionLoop::new(sim, options, cmd_rx, tel_tx).run())?;

        Ok(Self {
            commands: cmd_tx,
            telemetry: tel_rx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, command: SessionCommand) -> AppResult<()> {
        self.commands
            .send(command)
            .map_err(|_| AppError::SessionClosed)
    }

    /// A cloneable handle for other threads (e.g. an input reader).
    pub fn commander(&self) -> Sender<SessionCommand> {
        self.commands.clone()
    }

    pub fn telemetry(&self) -> &Receiver<StateSnapshot> {
        &self.telemetry
    }

    /// Drain the telemetry channel, keeping only the newest snapshot.
    pub fn latest(&self) -> Option<StateSnapshot> {
        self.telemetry.try_iter().last()
    }

    /// Stop the loop and hand the simulation back.
    pub fn shutdown(mut self) -> AppResult<Simulation> {
        let _ = self.commands.send(SessionCommand::Shutdown);
        let handle = self.handle.take().ok_or(AppError::SessionClosed)?;
        handle.join().map_err(|_| AppError::SessionClosed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(SessionCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

struct SessionLoop {
    sim: Simulation,
    period: Duration,
    running: bool,
    commands: Receiver<SessionCommand>,
    telemetry: SyncSender<StateSnapshot>,
    dropped: u64,
}

impl SessionLoop {
    fn new(
        sim: Simulation,
        options: SessionOptions,
        commands: Receiver<SessionCommand>,
        telemetry: SyncSender<StateSnapshot>,
    ) -> Self {
        let period = Duration::from_secs_f64(sim.config().dt / options.speed);
        Self {
            sim,
            period,
            running: options.start_running,
            commands,
            telemetry,
            dropped: 0,
        }
    }

    fn run(mut self) -> Simulation {
        debug!(period_ms = self.period.as_secs_f64() * 1e3, running = self.running, "session started");
        self.publish();
        let mut deadline = Instant::now() + self.period;
        loop {
            if !self.running {
                match self.commands.recv_timeout(IDLE_POLL) {
                    Ok(cmd) => {
                        if let Flow::Stop = self.apply(cmd) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                deadline = Instant::now() + self.period;
                continue;
            }

            // Wait for the tick deadline, applying commands as they arrive.
            if let Flow::Stop = self.wait_until(deadline) {
                break;
            }
            if !self.running {
                continue;
            }

            self.sim.step();
            self.publish();

            deadline += self.period;
            let now = Instant::now();
            if deadline < now {
                // Overran: restart pacing instead of bursting to catch up.
                deadline = now + self.period;
            }
        }
        debug!(
            t = self.sim.time(),
            dropped_snapshots = self.dropped,
            "session stopped"
        );
        self.sim
    }

    fn wait_until(&mut self, deadline: Instant) -> Flow {
        loop {
            let now = Instant::now();
            if now >= deadline {
                // Anything that arrived exactly at the boundary still lands
                // before the tick.
                loop {
                    match self.commands.try_recv() {
                        Ok(cmd) => {
                            if let Flow::Stop = self.apply(cmd) {
                                return Flow::Stop;
                            }
                        }
                        Err(TryRecvError::Empty) => return Flow::Continue,
                        Err(TryRecvError::Disconnected) => return Flow::Stop,
                    }
                }
            }
            match self.commands.recv_timeout(deadline - now) {
                Ok(cmd) => {
                    if let Flow::Stop = self.apply(cmd) {
                        return Flow::Stop;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Flow::Stop,
            }
        }
    }

    fn apply(&mut self, command: SessionCommand) -> Flow {
        let result: SimResult<()> = match command {
            SessionCommand::Run => {
                if !self.running {
                    info!(t = self.sim.time(), "session running");
                }
                self.running = true;
                Ok(())
            }
            SessionCommand::Pause => {
                if self.running {
                    info!(t = self.sim.time(), "session paused");
                }
                self.running = false;
                Ok(())
            }
            SessionCommand::Reset => self.sim.reset(),
            SessionCommand::SelectParadigm(paradigm) => self.sim.select_paradigm(paradigm),
            SessionCommand::SetDemand(demand) => self.sim.set_demand(demand),
            SessionCommand::SetSetpoint(setpoint) => self.sim.set_setpoint(setpoint),
            SessionCommand::EnqueuePlan(plan) => self.sim.enqueue_plan(plan).map(|_| ()),
            SessionCommand::SetFault(kind, value) => self.sim.set_fault(kind, value),
            SessionCommand::ClearFault(kind) => {
                self.sim.clear_fault(kind);
                Ok(())
            }
            SessionCommand::SetValve(open) => {
                self.sim.set_valve(open);
                Ok(())
            }
            SessionCommand::Shutdown => return Flow::Stop,
        };
        match result {
            Ok(()) => {
                if !self.running {
                    // Paused front ends still see the effect.
                    self.publish();
                }
            }
            Err(e) => warn!(error = %e, "session command rejected"),
        }
        Flow::Continue
    }

    fn publish(&mut self) {
        match self.telemetry.try_send(self.sim.snapshot()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_controls::Algorithm;
    use aq_sim::SimConfig;

    fn fast_session(start_running: bool) -> Session {
        let sim = Simulation::new(SimConfig::default().with_seed(8)).unwrap();
        Session::start(
            sim,
            SessionOptions {
                speed: 50.0,
                start_running,
                telemetry_capacity: 4096,
            },
        )
        .unwrap()
    }

    fn wait_for(session: &Session, pred: impl Fn(&StateSnapshot) -> bool) -> StateSnapshot {
        let timeout = Duration::from_secs(10);
        let start = Instant::now();
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            let snap = session
                .telemetry()
                .recv_timeout(remaining)
                .expect("no matching snapshot");
            if pred(&snap) {
                return snap;
            }
        }
    }

    #[test]
    fn paused_session_does_not_tick() {
        let session = fast_session(false);
        let first = wait_for(&session, |_| true);
        assert_eq!(first.tick, 0);
        thread::sleep(Duration::from_millis(100));
        assert!(session.latest().is_none_or(|s| s.tick == 0));
        let sim = session.shutdown().unwrap();
        assert_eq!(sim.state().tick, 0);
    }

    #[test]
    fn run_then_pause_stops_advancing() {
        let session = fast_session(false);
        session.send(SessionCommand::Run).unwrap();
        wait_for(&session, |s| s.tick >= 10);
        session.send(SessionCommand::Pause).unwrap();
        thread::sleep(Duration::from_millis(50));
        let _ = session.latest();
        let sim = session.shutdown().unwrap();
        let paused_at = sim.state().tick;
        assert!(paused_at >= 10);
    }

    #[test]
    fn reset_lands_between_ticks() {
        let session = fast_session(true);
        wait_for(&session, |s| s.tick >= 20);
        session.send(SessionCommand::Pause).unwrap();
        session.send(SessionCommand::Reset).unwrap();
        let snap = wait_for(&session, |s| s.tick == 0);
        assert_eq!(snap.time, 0.0);
        assert_eq!(snap.true_level, 50.0);
        session.shutdown().unwrap();
    }

    #[test]
    fn paradigm_switch_via_command() {
        let session = fast_session(false);
        let predictor = DesignParadigm::preset("predictor").unwrap();
        session
            .send(SessionCommand::SelectParadigm(predictor))
            .unwrap();
        let snap = wait_for(&session, |s| s.algorithm == Algorithm::Smith);
        assert_eq!(snap.tick, 0);
        session.shutdown().unwrap();
    }

    #[test]
    fn rejected_command_keeps_session_alive() {
        let session = fast_session(false);
        session
            .send(SessionCommand::SetFault(FaultKind::PumpEfficiency, 500.0))
            .unwrap();
        session.send(SessionCommand::SetValve(false)).unwrap();
        let snap = wait_for(&session, |s| !s.valve_open);
        assert!(!snap.faults.pump_efficiency);
        session.shutdown().unwrap();
    }

    #[test]
    fn invalid_speed_rejected() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        let options = SessionOptions {
            speed: 0.0,
            ..SessionOptions::default()
        };
        assert!(Session::start(sim, options).is_err());
    }
}
