use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::channel::ChannelError;

use super::renderer::Renderer;
use super::source::PointSource;
use super::trail::Trail;

pub const MIN_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);

/// History batch size fetched each cycle.
const HISTORY_RESULTS: usize = 20;

#[derive(Debug, Default)]
struct Shared {
    last_pos: Option<(f64, f64)>,
    trail: Trail,
}

struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Timer-driven fetch-render loop. Stopped until `start`; `start` while
/// running cancels the previous timer first, so at most one recurring timer
/// exists. All cycle state (trail, last position) lives here rather than in
/// module-level variables.
pub struct Poller {
    source: Arc<Mutex<Box<dyn PointSource>>>,
    renderer: Arc<Mutex<Box<dyn Renderer>>>,
    shared: Arc<StdMutex<Shared>>,
    default_center: (f64, f64),
    worker: Option<WorkerHandle>,
}

impl Poller {
    pub fn new(
        source: Box<dyn PointSource>,
        renderer: Box<dyn Renderer>,
        default_center: (f64, f64),
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            renderer: Arc::new(Mutex::new(renderer)),
            shared: Arc::new(StdMutex::new(Shared::default())),
            default_center,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.shared.lock().unwrap().last_pos
    }

    pub fn trail_len(&self) -> usize {
        self.shared.lock().unwrap().trail.len()
    }

    /// Begin polling: one immediate cycle, then one cycle per interval
    /// (floored to [`MIN_INTERVAL`]). Restart semantics when already running.
    pub async fn start(&mut self, interval: Duration) {
        self.cancel_worker().await;
        let period = interval.max(MIN_INTERVAL);

        self.renderer.lock().await.set_running(true);
        run_cycle(&self.source, &self.renderer, &self.shared).await;

        let source = self.source.clone();
        let renderer = self.renderer.clone();
        let shared = self.shared.clone();
        let (stop_tx, stop_rx) = oneshot::channel();

        let join = tokio::spawn(async move {
            let mut stop_rx = stop_rx;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // A stop between cycles wins; a cycle already underway runs
                // to completion and renders once more.
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        run_cycle(&source, &renderer, &shared).await;
                    }
                }
            }
        });

        self.worker = Some(WorkerHandle { stop_tx, join });
    }

    /// Cancel the recurring timer if any. Idempotent.
    pub async fn stop(&mut self) {
        self.cancel_worker().await;
        self.renderer.lock().await.set_running(false);
    }

    /// Reset the view to the last known position (or the default center),
    /// clear the displayed history and readout, then run exactly one cycle.
    /// Independent of the Running/Stopped state.
    pub async fn refresh(&mut self) {
        let center = {
            let mut locked = self.shared.lock().unwrap();
            locked.trail.clear();
            locked.last_pos.unwrap_or(self.default_center)
        };

        {
            let mut renderer = self.renderer.lock().await;
            renderer.reset_view(center.0, center.1);
            renderer.clear_history();
            renderer.clear_position();
        }

        run_cycle(&self.source, &self.renderer, &self.shared).await;
    }

    async fn cancel_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
        }
    }
}

async fn run_cycle(
    source: &Arc<Mutex<Box<dyn PointSource>>>,
    renderer: &Arc<Mutex<Box<dyn Renderer>>>,
    shared: &Arc<StdMutex<Shared>>,
) {
    if let Err(e) = fetch_and_render(source, renderer, shared).await {
        // Failures skip this tick's update; the loop keeps running.
        log::warn!("poll cycle failed: {}", e);
    }
}

async fn fetch_and_render(
    source: &Arc<Mutex<Box<dyn PointSource>>>,
    renderer: &Arc<Mutex<Box<dyn Renderer>>>,
    shared: &Arc<StdMutex<Shared>>,
) -> Result<(), ChannelError> {
    let (last, history) = {
        let mut source = source.lock().await;
        let last = source.latest().await?;
        let history = source.history(HISTORY_RESULTS).await?;
        (last, history)
    };

    let mut renderer = renderer.lock().await;
    renderer.show_position(&last);
    renderer.show_history(&history);

    let mut locked = shared.lock().unwrap();
    locked.last_pos = Some((last.lat, last.lng));
    locked.trail.push(last.lat, last.lng);
    renderer.update_trail(&last, &locked.trail);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Point, PointOrigin};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PointSource for CountingSource {
        async fn latest(&mut self) -> Result<Point, ChannelError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) as f64;
            Ok(Point {
                source: PointOrigin::Synthetic,
                created_at: None,
                lat: n,
                lng: -n,
            })
        }

        async fn history(&mut self, results: usize) -> Result<Vec<Point>, ChannelError> {
            Ok((0..results)
                .map(|i| Point {
                    source: PointOrigin::Synthetic,
                    created_at: None,
                    lat: i as f64,
                    lng: 0.0,
                })
                .collect())
        }
    }

    struct FailingSource {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PointSource for FailingSource {
        async fn latest(&mut self) -> Result<Point, ChannelError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(ChannelError::MissingChannelId)
        }

        async fn history(&mut self, _results: usize) -> Result<Vec<Point>, ChannelError> {
            Err(ChannelError::MissingChannelId)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        events: Arc<StdMutex<Vec<String>>>,
    }

    impl RecordingRenderer {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Renderer for RecordingRenderer {
        fn set_running(&mut self, running: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("running={}", running));
        }

        fn show_position(&mut self, point: &Point) {
            self.events
                .lock()
                .unwrap()
                .push(format!("position={},{}", point.lat, point.lng));
        }

        fn clear_position(&mut self) {
            self.events.lock().unwrap().push("position-clear".into());
        }

        fn show_history(&mut self, points: &[Point]) {
            self.events
                .lock()
                .unwrap()
                .push(format!("history={}", points.len()));
        }

        fn clear_history(&mut self) {
            self.events.lock().unwrap().push("history-clear".into());
        }

        fn update_trail(&mut self, _point: &Point, trail: &Trail) {
            self.events
                .lock()
                .unwrap()
                .push(format!("trail={}", trail.len()));
        }

        fn reset_view(&mut self, lat: f64, lng: f64) {
            self.events
                .lock()
                .unwrap()
                .push(format!("reset={},{}", lat, lng));
        }
    }

    fn counting_poller() -> (Poller, Arc<AtomicUsize>, RecordingRenderer) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let renderer = RecordingRenderer::default();
        let poller = Poller::new(
            Box::new(CountingSource {
                fetches: fetches.clone(),
            }),
            Box::new(renderer.clone()),
            (10.7769, 106.7009),
        );
        (poller, fetches, renderer)
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_an_immediate_cycle() {
        let (mut poller, fetches, renderer) = counting_poller();
        poller.start(Duration::from_secs(20)).await;
        assert!(poller.is_running());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        let events = renderer.events();
        assert_eq!(events[0], "running=true");
        assert!(events.iter().any(|e| e.starts_with("position=")));
        assert!(events.contains(&"history=20".to_string()));
        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn restart_leaves_exactly_one_recurring_timer() {
        let (mut poller, fetches, _renderer) = counting_poller();
        poller.start(Duration::from_secs(2)).await;
        poller.stop().await;
        poller.start(Duration::from_secs(2)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        // Three intervals elapse; a leaked timer from the first start would
        // produce extra fetches.
        tokio::time::sleep(Duration::from_millis(6100)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 5);
        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn interval_is_floored_to_the_minimum() {
        let (mut poller, fetches, _renderer) = counting_poller();
        poller.start(Duration::from_millis(100)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_no_further_ticks_fire() {
        let (mut poller, fetches, renderer) = counting_poller();
        poller.start(Duration::from_secs(2)).await;
        poller.stop().await;
        poller.stop().await;
        assert!(!poller.is_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(
            renderer
                .events()
                .iter()
                .filter(|e| *e == "running=false")
                .count(),
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_resets_view_and_runs_one_cycle_without_changing_state() {
        let (mut poller, fetches, renderer) = counting_poller();
        poller.refresh().await;

        assert!(!poller.is_running());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        let events = renderer.events();
        assert_eq!(events[0], "reset=10.7769,106.7009");
        assert_eq!(events[1], "history-clear");
        assert_eq!(events[2], "position-clear");
        assert!(events[3].starts_with("position="));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_recenters_on_the_last_known_position() {
        let (mut poller, _fetches, renderer) = counting_poller();
        poller.start(Duration::from_secs(20)).await;
        poller.stop().await;
        assert_eq!(poller.last_position(), Some((0.0, 0.0)));

        poller.refresh().await;
        assert!(renderer.events().contains(&"reset=0,-0".to_string()));
        // The trail restarts from the refresh cycle's point.
        assert_eq!(poller.trail_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_failures_are_swallowed_and_polling_continues() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let renderer = RecordingRenderer::default();
        let mut poller = Poller::new(
            Box::new(FailingSource {
                attempts: attempts.clone(),
            }),
            Box::new(renderer.clone()),
            (0.0, 0.0),
        );

        poller.start(Duration::from_secs(2)).await;
        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert!(poller.is_running());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(!renderer.events().iter().any(|e| e.starts_with("position=")));
        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn trail_grows_one_point_per_cycle() {
        let (mut poller, _fetches, _renderer) = counting_poller();
        poller.start(Duration::from_secs(2)).await;
        tokio::time::sleep(Duration::from_millis(4100)).await;
        poller.stop().await;
        assert_eq!(poller.trail_len(), 3);
        assert_eq!(poller.last_position(), Some((2.0, -2.0)));
    }
}
