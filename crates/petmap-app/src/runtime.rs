//! Effect runtime: runs store effects on tokio tasks and feeds their
//! completions back into the store, re-rendering the map as needed.

use std::future::Future;
use std::sync::Arc;

use petmap_client::{FacilityBackend, SearchRequest};
use petmap_map::{MapController, MapProvider, RenderSummary};
use tokio::sync::mpsc;

use crate::action::{Action, Effect, FetchError};
use crate::location::{resolve_location, Geolocator, LocationMode};
use crate::state::{AppState, Notice};
use crate::store::Store;

pub struct Runtime<B, G, M: MapProvider> {
    store: Store,
    backend: Arc<B>,
    geolocator: Arc<G>,
    map: MapController<M>,
    tx: mpsc::UnboundedSender<Vec<Action>>,
    rx: mpsc::UnboundedReceiver<Vec<Action>>,
    in_flight: usize,
    notices: Vec<Notice>,
}

impl<B, G, M> Runtime<B, G, M>
where
    B: FacilityBackend + 'static,
    G: Geolocator + 'static,
    M: MapProvider,
{
    pub fn new(store: Store, backend: Arc<B>, geolocator: Arc<G>, map: MapController<M>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            backend,
            geolocator,
            map,
            tx,
            rx,
            in_flight: 0,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn map(&self) -> &MapController<M> {
        &self.map
    }

    /// Tasks started but not yet applied.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Starts the one-per-session district fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load_districts(&mut self) {
        self.run(Effect::LoadDistricts);
    }

    /// Applies `action` and starts its effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: Action) {
        for effect in self.store.dispatch(action) {
            self.run(effect);
        }
    }

    /// Selects the facility behind a clicked map marker.
    pub fn click(&mut self, marker: M::Marker) {
        match self.map.facility_for(marker).cloned() {
            Some(id) => self.dispatch(Action::SelectFacility(Some(id))),
            None => tracing::debug!(?marker, "click on a marker without a facility"),
        }
    }

    /// Waits for the next task to finish and applies its actions.
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(actions) = self.rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        for action in actions {
            self.dispatch(action);
        }
        true
    }

    /// Applies completions until no task is in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::LoadDistricts => {
                let backend = Arc::clone(&self.backend);
                self.spawn(async move { vec![Action::DistrictsLoaded(backend.districts().await)] });
            }
            Effect::FetchFiltered { seq, request } => {
                tracing::debug!(seq, district = ?request.district, categories = request.categories.len(), "fetching facilities");
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.filter(&request).await.map_err(FetchError::from);
                    vec![Action::FacilitiesLoaded { seq, result }]
                });
            }
            Effect::SearchNearDevice {
                seq,
                location_seq,
                query,
                fallback,
            } => {
                tracing::debug!(seq, %query, "searching near device");
                let backend = Arc::clone(&self.backend);
                let geolocator = Arc::clone(&self.geolocator);
                self.spawn(async move {
                    let located =
                        resolve_location(&LocationMode::Device, &[], geolocator.as_ref()).await;
                    let origin = located.as_ref().ok().copied().or(fallback);
                    let result = match origin {
                        Some(origin) => backend
                            .search(&SearchRequest::new(&query, origin))
                            .await
                            .map_err(FetchError::from),
                        None => Err(FetchError::NoSearchOrigin),
                    };
                    vec![
                        Action::LocationResolved {
                            seq: location_seq,
                            mode: LocationMode::Device,
                            result: located,
                        },
                        Action::FacilitiesLoaded { seq, result },
                    ]
                });
            }
            Effect::ResolveLocation { seq, mode } => {
                let districts = self.store.state().districts.clone();
                let geolocator = Arc::clone(&self.geolocator);
                self.spawn(async move {
                    let result = resolve_location(&mode, &districts, geolocator.as_ref()).await;
                    vec![Action::LocationResolved { seq, mode, result }]
                });
            }
            Effect::LoadDetail(id) => {
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.facility(&id).await;
                    vec![Action::DetailLoaded { id, result }]
                });
            }
            Effect::Render => {
                self.render();
            }
            Effect::Notify(notice) => {
                tracing::info!(?notice, "notice raised");
                self.notices.push(notice);
            }
        }
    }

    fn render(&mut self) -> RenderSummary {
        let reference = self.store.state().reference;
        let visible = self.store.visible();
        self.map.reconcile(visible, reference)
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Vec<Action>> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let actions = task.await;
            if tx.send(actions).is_err() {
                tracing::debug!("runtime dropped before task completed");
            }
        });
    }
}
