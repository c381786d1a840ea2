use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::NaiveDate;
use thiserror::Error;
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

use crate::{
    middleware::session::BackendSession,
    models::menu::{DishId, MealSelection, MenuStatus, OrderField, WeekMenu},
    services::{
        backend::{BackendClient, BackendError},
        menu::MenuService,
        menu_editor::{EditorView, GatingError, LoadTicket, MenuEditor, SelectionTarget},
        metrics,
    },
};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Brouillon introuvable")]
    NotFound,
    #[error(transparent)]
    Gating(#[from] GatingError),
    #[error("Aucun plat sélectionné pour cette semaine")]
    EmptyWeek,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DraftError {
    fn label(&self) -> &'static str {
        match self {
            DraftError::NotFound => "not_found",
            DraftError::Gating(_) => "rejected",
            DraftError::EmptyWeek => "empty",
            DraftError::Backend(_) => "backend_error",
        }
    }
}

/// Outcome of a pick: the refreshed view and whether the store changed.
#[derive(Debug)]
pub struct PickOutcome {
    pub changed: bool,
    pub view: EditorView,
}

struct Draft {
    editor: MenuEditor,
    touched: Instant,
}

/// In-memory menu drafts, one [`MenuEditor`] per dashboard editing session.
///
/// The lock is never held across a backend call: loads take a ticket, release the
/// lock, fetch, then apply the result only if the ticket is still current. Drafts
/// left alone for longer than the idle timeout are evicted.
pub struct DraftRegistry {
    drafts: Mutex<HashMap<Uuid, Draft>>,
    idle_timeout: Duration,
}

impl DraftRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }

    async fn with<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut MenuEditor) -> R,
    ) -> Result<R, DraftError> {
        let mut drafts = self.drafts.lock().await;
        let draft = drafts.get_mut(&id).ok_or(DraftError::NotFound)?;
        draft.touched = Instant::now();
        Ok(f(&mut draft.editor))
    }

    async fn insert(&self, editor: MenuEditor) -> Uuid {
        let id = Uuid::new_v4();
        let mut drafts = self.drafts.lock().await;
        let evicted = Self::evict_locked(&mut drafts, self.idle_timeout);
        if evicted > 0 {
            tracing::info!("Evicted {} idle menu draft(s)", evicted);
        }
        drafts.insert(
            id,
            Draft {
                editor,
                touched: Instant::now(),
            },
        );
        metrics::DRAFTS_GAUGE.set(drafts.len() as f64);
        id
    }

    fn evict_locked(drafts: &mut HashMap<Uuid, Draft>, idle_timeout: Duration) -> usize {
        let before = drafts.len();
        drafts.retain(|_, draft| draft.touched.elapsed() < idle_timeout);
        before - drafts.len()
    }

    /// Drop every draft untouched for longer than the idle timeout.
    pub async fn evict_idle(&self) -> usize {
        let mut drafts = self.drafts.lock().await;
        let evicted = Self::evict_locked(&mut drafts, self.idle_timeout);
        metrics::DRAFTS_GAUGE.set(drafts.len() as f64);
        if evicted > 0 {
            metrics::record_draft_operation("evict", "ok");
        }
        evicted
    }

    /// Open a draft on the week starting `monday`, prefilled from the backend.
    pub async fn create(
        &self,
        backend: &BackendClient,
        session: &BackendSession,
        monday: NaiveDate,
    ) -> (Uuid, EditorView) {
        let mut editor = MenuEditor::new(monday);
        let ticket = editor.select_week(monday);
        let id = self.insert(editor).await;
        tracing::info!("Opened menu draft {} for week of {}", id, monday);
        metrics::record_draft_operation("create", "ok");

        let view = match self.load(backend, session, id, ticket).await {
            Ok(view) => view,
            Err(_) => MenuEditor::new(monday).view(),
        };
        (id, view)
    }

    pub async fn view(&self, id: Uuid) -> Result<EditorView, DraftError> {
        self.with(id, |editor| editor.view()).await
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let mut drafts = self.drafts.lock().await;
        let removed = drafts.remove(&id).is_some();
        metrics::DRAFTS_GAUGE.set(drafts.len() as f64);
        if removed {
            tracing::info!("Closed menu draft {}", id);
        }
        removed
    }

    /// Move a draft to the week containing `date`, discarding its pending edits.
    pub async fn select_week(
        &self,
        backend: &BackendClient,
        session: &BackendSession,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<EditorView, DraftError> {
        let ticket = self.with(id, |editor| editor.select_week(date)).await?;
        metrics::record_draft_operation("select_week", "ok");
        self.load(backend, session, id, ticket).await
    }

    async fn load(
        &self,
        backend: &BackendClient,
        session: &BackendSession,
        id: Uuid,
        ticket: LoadTicket,
    ) -> Result<EditorView, DraftError> {
        let week = MenuService::find_week(backend, session, ticket.monday()).await;
        self.with(id, |editor| {
            if !editor.apply_loaded_week(ticket, week) {
                metrics::record_draft_operation("load", "stale");
            }
            editor.view()
        })
        .await
    }

    pub async fn pick(
        &self,
        id: Uuid,
        date: NaiveDate,
        target: SelectionTarget,
        selection: MealSelection,
    ) -> Result<PickOutcome, DraftError> {
        let result = self
            .with(id, |editor| {
                let changed = editor.pick(date, target, selection)?;
                Ok::<_, DraftError>(PickOutcome {
                    changed,
                    view: editor.view(),
                })
            })
            .await
            .and_then(|r| r);
        record("pick", &result);
        result
    }

    pub async fn remove_selection(
        &self,
        id: Uuid,
        date: NaiveDate,
        field: OrderField,
        dish: DishId,
    ) -> Result<EditorView, DraftError> {
        let result = self
            .with(id, |editor| {
                editor.remove(date, field, dish)?;
                Ok::<_, DraftError>(editor.view())
            })
            .await
            .and_then(|r| r);
        record("remove", &result);
        result
    }

    pub async fn cancel_day(&self, id: Uuid, date: NaiveDate) -> Result<EditorView, DraftError> {
        let result = self
            .with(id, |editor| {
                editor.cancel_day(date)?;
                Ok::<_, DraftError>(editor.view())
            })
            .await
            .and_then(|r| r);
        record("cancel_day", &result);
        result
    }

    /// Send the draft to the backend as a complete week.
    pub async fn save(
        &self,
        backend: &BackendClient,
        session: &BackendSession,
        id: Uuid,
        status: MenuStatus,
    ) -> Result<WeekMenu, DraftError> {
        let result = self.save_inner(backend, session, id, status).await;
        record("save", &result);
        result
    }

    async fn save_inner(
        &self,
        backend: &BackendClient,
        session: &BackendSession,
        id: Uuid,
        status: MenuStatus,
    ) -> Result<WeekMenu, DraftError> {
        let (ticket, payload) = self
            .with(id, |editor| editor.payload(status))
            .await?
            .ok_or(DraftError::EmptyWeek)?;
        let saved = MenuService::create_or_update(backend, session, &payload).await?;
        let current = self
            .with(id, |editor| editor.mark_saved(ticket, saved.clone()))
            .await?;
        if !current {
            tracing::info!(
                "Draft {} moved to another week while saving {}",
                id,
                ticket.monday()
            );
        }
        Ok(saved)
    }
}

/// Periodically evict idle drafts for the lifetime of the process.
pub fn start_eviction(registry: Arc<DraftRegistry>, every: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            let evicted = registry.evict_idle().await;
            if evicted > 0 {
                tracing::info!("Evicted {} idle menu draft(s)", evicted);
            }
        }
    });
}

fn record<T>(operation: &str, result: &Result<T, DraftError>) {
    match result {
        Ok(_) => metrics::record_draft_operation(operation, "ok"),
        Err(e) => {
            tracing::debug!("Draft {} failed: {}", operation, e);
            metrics::record_draft_operation(operation, e.label());
        }
    }
}
