use crate::alert::{self, AlertSink};
use crate::errors::AppError;
use crate::inspiration::{TextGenerator, get_inspiration};
use crate::models::{Habit, Snapshot};
use crate::storage::{KvStore, persist_check_ins, persist_notes};
use crate::timer::Ticker;
use crate::update::{Action, AppModel, Effect, Event, update, validate};
use crate::view::build_snapshot;
use chrono::Local;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error};

#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    pub habits: Arc<[Habit]>,
    pub model: Arc<Mutex<AppModel>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    events: mpsc::UnboundedSender<Event>,
    generator: Arc<dyn TextGenerator>,
    alert: Arc<dyn AlertSink>,
}

impl AppState {
    /// Builds the state and starts the task that feeds ticks and settled
    /// fetches back through [`AppState::dispatch`].
    pub fn spawn(
        store: KvStore,
        model: AppModel,
        generator: Arc<dyn TextGenerator>,
        alert: Arc<dyn AlertSink>,
    ) -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        let state = Self {
            store,
            habits: model.habits.clone().into(),
            model: Arc::new(Mutex::new(model)),
            ticker: Arc::new(Mutex::new(None)),
            events,
            generator,
            alert,
        };
        tokio::spawn(state.clone().pump(rx));
        state
    }

    async fn pump(self, mut rx: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = rx.recv().await {
            if let Err(err) = self.dispatch(event).await {
                error!("background event failed: {}", err.message);
            }
        }
    }

    /// Validates and applies a user action.
    pub async fn act(&self, action: Action) -> Result<(), AppError> {
        validate(&self.habits, &action)?;
        self.dispatch(action.into()).await
    }

    pub async fn dispatch(&self, event: Event) -> Result<(), AppError> {
        let mut model = self.model.lock().await;
        let effects = update(&mut model, event, Local::now());
        let mut failure = None;

        for effect in effects {
            debug!(?effect, "running effect");
            let result = match effect {
                Effect::SaveCheckIns => persist_check_ins(&self.store, &model.check_ins).await,
                Effect::SaveNotes => persist_notes(&self.store, &model.notes).await,
                Effect::StartTicker { run } => {
                    let ticker = Ticker::spawn(run, self.events.clone(), |run| Event::Tick { run });
                    // replacing drops, and so aborts, any previous ticker
                    *self.ticker.lock().await = Some(ticker);
                    Ok(())
                }
                Effect::StopTicker => {
                    if let Some(ticker) = self.ticker.lock().await.take() {
                        ticker.cancel();
                    }
                    Ok(())
                }
                Effect::PlayAlert => {
                    alert::ring(self.alert.as_ref());
                    Ok(())
                }
                Effect::FetchInspiration { summary } => {
                    let generator = Arc::clone(&self.generator);
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let text = get_inspiration(generator.as_ref(), &summary).await;
                        let _ = events.send(Event::InspirationSettled { text });
                    });
                    Ok(())
                }
            };
            if let Err(err) = result {
                error!("failed to persist state: {}", err.message);
                failure.get_or_insert(err);
            }
        }

        failure.map_or(Ok(()), Err)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let model = self.model.lock().await;
        build_snapshot(&model, Local::now().date_naive())
    }

    pub async fn ticker_active(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    /// Stops the tick source; called on shutdown.
    pub async fn shutdown(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel();
        }
    }
}
