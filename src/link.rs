//! Link orchestration
//!
//! A [`Session`] wires the codec to its peripherals for one direction of the
//! link. The [`Orchestrator`] owns exactly one session, feeds it events, and
//! applies the configured [`ErrorPolicy`](crate::types::ErrorPolicy) when a
//! session fails.
//!
//! ```text
//!            ┌──────────── Stopped ◄──────────┐
//!   start()  │                 ▲              │ stop() / Stop policy
//!            ▼                 │ start failed │
//!         Starting ────────────┘              │
//!            │ ok                             │
//!            ▼                                │
//!         Running ────────────────────────────┘
//!            │ ▲
//!            │ └── Restart policy (bounded by max_restarts)
//!            ▼
//!         Halted (terminal)
//! ```

pub mod emitter;
pub mod policy;
pub mod receiver;

pub use emitter::Emitter;
pub use policy::{decide, Recovery};
pub use receiver::Receiver;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::LinkConfig;
use crate::error::{LinkError, LinkResult};
use crate::types::{ErrorPolicy, LinkMode};

/// Peripheral completion delivered to the running session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Sample clock fired
    Tick,
    /// ADC conversion finished
    SampleReady,
    /// UART finished sending the previous byte
    ByteSent,
    /// UART received a byte
    ByteReceived(u8),
}

#[cfg(feature = "embedded")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tick => defmt::write!(f, "Tick"),
            Self::SampleReady => defmt::write!(f, "SampleReady"),
            Self::ByteSent => defmt::write!(f, "ByteSent"),
            Self::ByteReceived(b) => defmt::write!(f, "ByteReceived({=u8:#x})", b),
        }
    }
}

/// Orchestrator lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// Not started, or stopped by request or by the Stop policy
    #[default]
    Stopped,
    /// Session start or restart in progress
    Starting,
    /// Events are being processed
    Running,
    /// Stopped for good after an unrecoverable error
    Halted,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(f, "Stopped"),
            Self::Starting => defmt::write!(f, "Starting"),
            Self::Running => defmt::write!(f, "Running"),
            Self::Halted => defmt::write!(f, "Halted"),
        }
    }
}

/// One direction of the link bound to its peripherals
pub trait Session {
    /// Direction handled by this session
    fn mode(&self) -> LinkMode;

    /// Allocate the rings, start the codec, then the peripherals
    ///
    /// # Errors
    ///
    /// Allocation, configuration and peripheral failures.
    fn start(&mut self, config: &LinkConfig) -> LinkResult<()>;

    /// Stop the peripherals and release the rings
    ///
    /// Everything is torn down even when a peripheral refuses to stop.
    ///
    /// # Errors
    ///
    /// The first peripheral failure.
    fn stop(&mut self) -> LinkResult<()>;

    /// Stop and start again with the same bindings
    ///
    /// # Errors
    ///
    /// [`LinkError::NotStarted`] if never started, the first peripheral that
    /// refused to stop, or any start failure.
    fn restart(&mut self) -> LinkResult<()>;

    /// Process one event, returning the number of words encoded or decoded
    ///
    /// # Errors
    ///
    /// Overruns and peripheral failures.
    fn handle(&mut self, event: Event) -> LinkResult<usize>;
}

/// Either direction of the link, fixed when the firmware is configured
pub enum Link<E, R> {
    /// Sampling and transmitting
    Emitter(E),
    /// Receiving and reconstructing
    Receiver(R),
}

impl<E: Session, R: Session> Session for Link<E, R> {
    fn mode(&self) -> LinkMode {
        match self {
            Self::Emitter(_) => LinkMode::Emitter,
            Self::Receiver(_) => LinkMode::Receiver,
        }
    }

    fn start(&mut self, config: &LinkConfig) -> LinkResult<()> {
        match self {
            Self::Emitter(s) => s.start(config),
            Self::Receiver(s) => s.start(config),
        }
    }

    fn stop(&mut self) -> LinkResult<()> {
        match self {
            Self::Emitter(s) => s.stop(),
            Self::Receiver(s) => s.stop(),
        }
    }

    fn restart(&mut self) -> LinkResult<()> {
        match self {
            Self::Emitter(s) => s.restart(),
            Self::Receiver(s) => s.restart(),
        }
    }

    fn handle(&mut self, event: Event) -> LinkResult<usize> {
        match self {
            Self::Emitter(s) => s.handle(event),
            Self::Receiver(s) => s.handle(event),
        }
    }
}

/// Diagnostic counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Events handed to the session
    pub events: u32,
    /// Events dropped because the link was not running
    pub dropped: u32,
    /// Errors escalated to the policy, failed restarts included
    pub errors: u32,
    /// Restart attempts
    pub restarts: u32,
    /// Words encoded (emitter) or decoded (receiver)
    pub words: u32,
}

/// Event loop context owning one session
pub struct Orchestrator<S, P, D> {
    session: S,
    indicator: P,
    delay: D,
    config: LinkConfig,
    state: LinkState,
    stats: LinkStats,
    last_error: Option<LinkError>,
    indicator_lit: bool,
}

impl<S, P, D> Orchestrator<S, P, D>
where
    S: Session,
    P: OutputPin,
    D: DelayNs,
{
    /// Wrap a session; call `start` to run it
    pub const fn new(session: S, indicator: P, delay: D, config: LinkConfig) -> Self {
        Self {
            session,
            indicator,
            delay,
            config,
            state: LinkState::Stopped,
            stats: LinkStats {
                events: 0,
                dropped: 0,
                errors: 0,
                restarts: 0,
                words: 0,
            },
            last_error: None,
            indicator_lit: false,
        }
    }

    /// Lifecycle state
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Check if events are being processed
    pub fn is_running(&self) -> bool {
        self.state == LinkState::Running
    }

    /// Diagnostic counters
    pub const fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Most recent escalated error
    pub const fn last_error(&self) -> Option<LinkError> {
        self.last_error
    }

    /// Session configuration
    pub const fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Owned session
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Owned session, mutably
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Indicator binding
    pub const fn indicator(&self) -> &P {
        &self.indicator
    }

    /// Start the session
    ///
    /// A failed start leaves the link `Stopped` and is returned to the caller
    /// rather than escalated.
    ///
    /// # Errors
    ///
    /// [`LinkError::Allocation`] or [`LinkError::Configuration`] for an invalid
    /// configuration, or whatever the session start reports.
    pub fn start(&mut self) -> LinkResult<()> {
        if matches!(self.state, LinkState::Running | LinkState::Halted) {
            return Ok(());
        }
        self.config.check()?;

        self.state = LinkState::Starting;
        match self.session.start(&self.config) {
            Ok(()) => {
                self.state = LinkState::Running;
                info!("link running");
                Ok(())
            }
            Err(e) => {
                // Undo whatever was brought up before the failure
                if let Err(undo) = self.session.stop() {
                    warn!("link unwind failed: {}", undo);
                }
                self.state = LinkState::Stopped;
                self.last_error = Some(e);
                error!("link start failed: {}", e);
                Err(e)
            }
        }
    }

    /// Stop the session; a halted link stays halted
    ///
    /// # Errors
    ///
    /// The first peripheral that refused to stop.
    pub fn stop(&mut self) -> LinkResult<()> {
        if self.state != LinkState::Halted {
            self.state = LinkState::Stopped;
        }
        self.session.stop()
    }

    /// Feed one event to the session and apply the policy on failure
    ///
    /// Events are dropped unless the link is running.
    pub fn handle(&mut self, event: Event) -> LinkState {
        if self.state != LinkState::Running {
            self.stats.dropped = self.stats.dropped.saturating_add(1);
            return self.state;
        }

        self.stats.events = self.stats.events.saturating_add(1);
        match self.session.handle(event) {
            Ok(words) => {
                let words = u32::try_from(words).unwrap_or(u32::MAX);
                self.stats.words = self.stats.words.saturating_add(words);
            }
            Err(e) => self.escalate(e),
        }
        self.state
    }

    /// Apply the error policy to a failure reported while running
    fn escalate(&mut self, err: LinkError) {
        let recovery = self.config.recovery;
        self.record(err);

        if recovery.policy != ErrorPolicy::Ignore && recovery.delay_ms > 0 {
            self.delay.delay_ms(recovery.delay_ms);
        }

        let mut attempts = 0;
        loop {
            match decide(recovery.policy, attempts, recovery.max_restarts) {
                Recovery::Continue => return,
                Recovery::Stop => {
                    warn!("link stopped by policy");
                    if let Err(e) = self.session.stop() {
                        self.record(e);
                    }
                    self.state = LinkState::Stopped;
                    return;
                }
                Recovery::Halt => {
                    error!("link halted after {=u8} restarts", attempts);
                    if let Err(e) = self.session.stop() {
                        self.record(e);
                    }
                    self.state = LinkState::Halted;
                    return;
                }
                Recovery::Restart => {
                    attempts += 1;
                    self.stats.restarts = self.stats.restarts.saturating_add(1);
                    self.state = LinkState::Starting;
                    match self.session.restart() {
                        Ok(()) => {
                            info!("link restarted");
                            self.state = LinkState::Running;
                            self.clear_indicator();
                            return;
                        }
                        Err(e) => {
                            self.record(e);
                            if recovery.delay_ms > 0 {
                                self.delay.delay_ms(recovery.delay_ms);
                            }
                        }
                    }
                }
            }
        }
    }

    fn record(&mut self, err: LinkError) {
        warn!("link error: {}", err);
        self.stats.errors = self.stats.errors.saturating_add(1);
        self.last_error = Some(err);
        if self.config.recovery.indicate {
            self.toggle_indicator();
        }
    }

    fn toggle_indicator(&mut self) {
        self.indicator_lit = !self.indicator_lit;
        // A stuck LED must not mask the link error
        let _ = if self.indicator_lit {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
    }

    fn clear_indicator(&mut self) {
        if self.indicator_lit {
            self.indicator_lit = false;
            let _ = self.indicator.set_low();
        }
    }
}
