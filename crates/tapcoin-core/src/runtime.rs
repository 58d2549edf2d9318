//! Recurring tick tasks and the single-consumer session loop.
//!
//! Ticks, taps and expiries all travel through one channel into
//! [`SessionRuntime::run`], which applies each input to completion before
//! receiving the next. Run it on a `current_thread` runtime for the
//! cooperative single-threaded model the session expects.
//!
//! ```text
//! accrual task ──┐
//! countdown task ├─> inbox ─> GameSession
//! SessionHandle ─┘
//! ```

use chrono::Utc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::events::Event;
use crate::floating::CoinId;
use crate::session::GameSession;

/// One unit of work for the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    AccrualTick,
    CountdownTick,
    Tap { x: f64, y: f64 },
    ExpireCoin(CoinId),
    Shutdown,
}

/// A periodic producer owned as a guard.
///
/// The task is aborted by [`cancel`](Self::cancel) or on drop, whichever
/// happens first, and never more than once.
#[derive(Debug)]
pub struct RecurringTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    /// Send `input` into `inbox` every `period`, starting one period from now.
    ///
    /// Holds only a weak sender, so the task also winds down once every
    /// [`SessionHandle`] is gone. Must be called inside a tokio runtime.
    pub fn spawn(
        name: &'static str,
        period: Duration,
        inbox: &mpsc::UnboundedSender<SessionInput>,
        input: SessionInput,
    ) -> Self {
        let inbox = inbox.downgrade();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(tx) = inbox.upgrade() else { break };
                if tx.send(input.clone()).is_err() {
                    break;
                }
            }
        });
        debug!(task = name, ?period, "Recurring task scheduled");
        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Abort the task. Returns `true` only on the call that actually cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!(task = self.name, "Recurring task cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Input side of a running session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionInput>,
}

impl SessionHandle {
    /// Queue a tap. Returns `false` once the session has shut down.
    pub fn tap(&self, x: f64, y: f64) -> bool {
        self.tx.send(SessionInput::Tap { x, y }).is_ok()
    }

    /// Queue a coin expiry from the renderer.
    pub fn expire(&self, id: CoinId) -> bool {
        self.tx.send(SessionInput::ExpireCoin(id)).is_ok()
    }

    pub fn shutdown(&self) -> bool {
        self.tx.send(SessionInput::Shutdown).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct SessionRuntime {
    session: GameSession,
    inbox: mpsc::UnboundedReceiver<SessionInput>,
    accrual: RecurringTask,
    countdown: RecurringTask,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl SessionRuntime {
    /// Schedule both recurring tasks for `session`.
    ///
    /// Must be called inside a tokio runtime. Nothing is applied until
    /// [`run`](Self::run) is polled.
    pub fn start(
        session: GameSession,
        accrual_every: Duration,
        countdown_every: Duration,
    ) -> (Self, SessionHandle) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let accrual = RecurringTask::spawn("accrual", accrual_every, &tx, SessionInput::AccrualTick);
        let countdown =
            RecurringTask::spawn("countdown", countdown_every, &tx, SessionInput::CountdownTick);
        let runtime = Self {
            session,
            inbox,
            accrual,
            countdown,
            events: None,
        };
        (runtime, SessionHandle { tx })
    }

    /// Forward every produced event to `sink`.
    pub fn with_event_sink(mut self, sink: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Process inputs in arrival order until shutdown, or until every handle
    /// is dropped. Returns the final session state.
    pub async fn run(mut self) -> GameSession {
        while let Some(input) = self.inbox.recv().await {
            if input == SessionInput::Shutdown {
                break;
            }
            self.apply(input);
        }
        self.teardown()
    }

    fn apply(&mut self, input: SessionInput) {
        let now = Utc::now();
        let events = match input {
            SessionInput::AccrualTick => self.session.accrual_tick(),
            SessionInput::CountdownTick => vec![self.session.countdown_tick(now)],
            SessionInput::Tap { x, y } => self.session.tap(x, y, now),
            SessionInput::ExpireCoin(id) => self.session.expire_coin(id).into_iter().collect(),
            SessionInput::Shutdown => Vec::new(),
        };
        self.emit(events);
    }

    fn teardown(mut self) -> GameSession {
        self.accrual.cancel();
        self.countdown.cancel();
        self.inbox.close();
        let mut discarded = 0usize;
        while self.inbox.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "Discarded inputs queued after shutdown");
        }
        let ended = self.session.end(Utc::now());
        self.emit(vec![ended]);
        self.session
    }

    fn emit(&self, events: Vec<Event>) {
        if let Some(sink) = &self.events {
            for event in events {
                // A dropped sink only means nobody is listening.
                let _ = sink.send(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> GameSession {
        GameSession::from_config(&Config::default(), Utc::now()).unwrap()
    }

    fn start(session: GameSession) -> (SessionRuntime, SessionHandle) {
        SessionRuntime::start(session, Duration::from_secs(1), Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn accrual_ticks_once_per_second() {
        let (runtime, handle) = start(session());
        let task = tokio::spawn(runtime.run());

        time::sleep(Duration::from_millis(5_500)).await;
        handle.shutdown();
        let session = task.await.unwrap();

        assert_eq!(session.points(), 420 + 5 * 11);
    }

    #[tokio::test(start_paused = true)]
    async fn inputs_after_shutdown_are_discarded() {
        let (runtime, handle) = start(session());
        let (sink, mut events) = mpsc::unbounded_channel();
        let task = tokio::spawn(runtime.with_event_sink(sink).run());

        time::sleep(Duration::from_millis(1_500)).await;
        assert!(handle.tap(5.0, 5.0));
        handle.shutdown();
        handle.tap(6.0, 6.0);
        let session = task.await.unwrap();

        assert_eq!(session.points(), 420 + 11 + 420);
        assert!(session.floating().is_empty());
        assert!(handle.is_closed());
        assert!(!handle.tap(7.0, 7.0));

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }
        assert!(matches!(received.last(), Some(Event::SessionEnded { .. })));
        let taps = received
            .iter()
            .filter(|e| matches!(e, Event::Tapped { .. }))
            .count();
        assert_eq!(taps, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_teardown() {
        let (runtime, handle) = start(session());
        let (sink, mut events) = mpsc::unbounded_channel();
        let task = tokio::spawn(runtime.with_event_sink(sink).run());
        time::sleep(Duration::from_millis(2_500)).await;
        handle.shutdown();
        let session = task.await.unwrap();
        assert_eq!(session.points(), 420 + 2 * 11);

        time::sleep(Duration::from_secs(10)).await;
        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }
        let accruals = received
            .iter()
            .filter(|e| matches!(e, Event::PassiveAccrued { .. }))
            .count();
        assert_eq!(accruals, 2);
        assert!(matches!(received.last(), Some(Event::SessionEnded { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_tick_every_minute() {
        let (runtime, handle) = start(session());
        let (sink, mut events) = mpsc::unbounded_channel();
        let task = tokio::spawn(runtime.with_event_sink(sink).run());

        time::sleep(Duration::from_secs(125)).await;
        handle.shutdown();
        task.await.unwrap();

        let mut refreshes = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, Event::CountdownsRefreshed { .. }) {
                refreshes += 1;
            }
        }
        assert_eq!(refreshes, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_every_handle_ends_the_session() {
        let (runtime, handle) = start(session());
        let task = tokio::spawn(runtime.run());
        time::sleep(Duration::from_millis(1_500)).await;
        drop(handle);
        let session = task.await.unwrap();
        assert_eq!(session.points(), 431);
    }

    #[tokio::test]
    async fn cancel_happens_exactly_once() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut task = RecurringTask::spawn("probe", Duration::from_secs(1), &tx, SessionInput::AccrualTick);
        assert!(task.is_active());
        assert!(task.cancel());
        assert!(!task.cancel());
        assert!(!task.is_active());
        assert_eq!(task.name(), "probe");
    }
}
