//! Client-side composition session for projects.
//!
//! A [`ComposerSession`] owns one [`ProjectDraft`] and a cached project
//! listing, and talks to the host through two collaborator traits: a
//! [`ProjectRepository`] for creation/listing and a [`Navigator`] for record
//! views. Draft edits are synchronous once the draft lock is held; only
//! submission and listing refresh suspend, and neither holds the draft lock
//! across an await, so the tree stays editable while a submission is in
//! flight.

pub mod draft;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use shared::{
    domain::{ProjectId, RecordKind, UserId},
    error::{RepositoryError, ValidationError},
    protocol::{MilestonePayload, ProjectPayload, ProjectRecord, ProjectSummary, TodoPayload},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

pub use draft::{IndexError, Milestone, ProjectDraft, ToDo};

/// Remote store of project records.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Persists a new project tree. All-or-nothing on the service side.
    async fn create(&self, payload: &ProjectPayload) -> Result<(), RepositoryError>;

    /// Returns every project record visible to the acting user.
    async fn list_all(&self) -> Result<Vec<ProjectRecord>, RepositoryError>;
}

/// Host-side navigation to a stored record.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn go_to_record(&self, record_id: ProjectId, kind: RecordKind) -> anyhow::Result<()>;
}

/// Placeholder repository for hosts that have not wired a service yet.
pub struct MissingProjectRepository;

#[async_trait]
impl ProjectRepository for MissingProjectRepository {
    async fn create(&self, _payload: &ProjectPayload) -> Result<(), RepositoryError> {
        Err(RepositoryError::Transport(
            "no project service configured".to_string(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        Err(RepositoryError::Transport(
            "no project service configured".to_string(),
        ))
    }
}

/// Placeholder navigator for hosts without record routing.
pub struct MissingNavigator;

#[async_trait]
impl Navigator for MissingNavigator {
    async fn go_to_record(&self, record_id: ProjectId, kind: RecordKind) -> anyhow::Result<()> {
        Err(anyhow!("no navigator wired for {kind:?} record {record_id}"))
    }
}

/// Async outcomes pushed to the host. Synchronous draft edits are observed
/// through [`ComposerSession::draft`] instead of events.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ListingUpdated(Vec<ProjectSummary>),
    ProjectCreated,
    Error(String),
}

/// Why a submission did not create a project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Checks the draft against the service's creation rules. Milestone and
/// to-do names may be blank; only the project name is required.
pub fn validate(draft: &ProjectDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Projects the draft onto the wire shape. Keys and labels never leave the
/// client; order is preserved level by level.
pub fn build_payload(draft: &ProjectDraft) -> ProjectPayload {
    ProjectPayload {
        name: draft.name.clone(),
        owner_id: draft.owner_id.clone(),
        milestones: draft
            .milestones
            .iter()
            .map(|milestone| MilestonePayload {
                name: milestone.name.clone(),
                todos: milestone
                    .todos
                    .iter()
                    .map(|todo| TodoPayload {
                        name: todo.name.clone(),
                        is_complete: todo.is_complete,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// One user's project-composition session.
///
/// The draft lock is released before any collaborator call, so an in-flight
/// submission works on a snapshot and concurrent edits land in the live
/// draft without affecting it.
pub struct ComposerSession {
    acting_user: UserId,
    repository: Arc<dyn ProjectRepository>,
    navigator: Arc<dyn Navigator>,
    draft: Mutex<ProjectDraft>,
    listing: RwLock<Vec<ProjectSummary>>,
    events: broadcast::Sender<SessionEvent>,
}

impl ComposerSession {
    /// Session with placeholder collaborators. Draft editing works fully;
    /// submission and listing report the missing service.
    pub fn new(acting_user: UserId) -> Arc<Self> {
        Self::new_with_dependencies(
            acting_user,
            Arc::new(MissingProjectRepository),
            Arc::new(MissingNavigator),
        )
    }

    pub fn new_with_dependencies(
        acting_user: UserId,
        repository: Arc<dyn ProjectRepository>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            draft: Mutex::new(ProjectDraft::new(acting_user.clone())),
            acting_user,
            repository,
            navigator,
            listing: RwLock::new(Vec::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current draft for rendering.
    pub async fn draft(&self) -> ProjectDraft {
        self.draft.lock().await.clone()
    }

    /// Snapshot of the cached listing rows.
    pub async fn listing(&self) -> Vec<ProjectSummary> {
        self.listing.read().await.clone()
    }

    /// Discards the draft and starts over: fresh tree, acting user as owner.
    pub async fn reset_draft(&self) {
        let mut draft = self.draft.lock().await;
        *draft = ProjectDraft::new(self.acting_user.clone());
        debug!("draft: reset");
    }

    pub async fn add_milestone(&self) {
        let mut draft = self.draft.lock().await;
        draft.add_milestone();
        debug!(milestones = draft.milestones.len(), "draft: milestone added");
    }

    pub async fn remove_milestone(&self, index: usize) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.remove_milestone(index)?;
        debug!(
            index,
            milestones = draft.milestones.len(),
            "draft: milestone removed"
        );
        Ok(())
    }

    pub async fn add_todo(&self, milestone_index: usize) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.add_todo(milestone_index)?;
        debug!(milestone = milestone_index, "draft: to-do added");
        Ok(())
    }

    pub async fn remove_todo(
        &self,
        milestone_index: usize,
        todo_index: usize,
    ) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.remove_todo(milestone_index, todo_index)?;
        debug!(
            milestone = milestone_index,
            index = todo_index,
            "draft: to-do removed"
        );
        Ok(())
    }

    pub async fn rename_project(&self, name: impl Into<String>) {
        let mut draft = self.draft.lock().await;
        draft.rename_project(name);
    }

    pub async fn set_owner(&self, owner_id: UserId) {
        let mut draft = self.draft.lock().await;
        draft.set_owner(owner_id);
    }

    pub async fn rename_milestone(
        &self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.rename_milestone(index, name)
    }

    pub async fn rename_todo(
        &self,
        milestone_index: usize,
        todo_index: usize,
        name: impl Into<String>,
    ) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.rename_todo(milestone_index, todo_index, name)
    }

    pub async fn set_todo_complete(
        &self,
        milestone_index: usize,
        todo_index: usize,
        is_complete: bool,
    ) -> Result<(), IndexError> {
        let mut draft = self.draft.lock().await;
        draft.set_todo_complete(milestone_index, todo_index, is_complete)
    }

    /// Validates the draft, hands a payload snapshot to the repository, and
    /// refreshes the listing on success.
    ///
    /// The draft itself is left untouched on every path, success included;
    /// hosts call [`ComposerSession::reset_draft`] when they want a blank
    /// form. A listing refresh failure after a successful create is reported
    /// as an event but does not fail the submission.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let payload = {
            let draft = self.draft.lock().await;
            if let Err(err) = validate(&draft) {
                warn!("submit: rejected: {err}");
                let _ = self.events.send(SessionEvent::Error(err.to_string()));
                return Err(err.into());
            }
            build_payload(&draft)
        };

        info!(
            project = %payload.name,
            milestones = payload.milestones.len(),
            "submit: creating project"
        );
        if let Err(err) = self.repository.create(&payload).await {
            warn!("submit: create failed: {err}");
            let _ = self.events.send(SessionEvent::Error(err.to_string()));
            return Err(err.into());
        }

        info!("submit: project created");
        let _ = self.events.send(SessionEvent::ProjectCreated);

        if let Err(err) = self.refresh_listing().await {
            warn!("submit: listing refresh after create failed: {err}");
        }
        Ok(())
    }

    /// Reloads the listing cache from the repository. On failure the
    /// previously cached rows stay in place.
    pub async fn refresh_listing(&self) -> Result<(), RepositoryError> {
        let records = match self.repository.list_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!("listing: refresh failed: {err}");
                let _ = self.events.send(SessionEvent::Error(err.to_string()));
                return Err(err);
            }
        };

        let rows: Vec<ProjectSummary> = records.into_iter().map(ProjectSummary::from).collect();
        info!(rows = rows.len(), "listing: refreshed");
        {
            let mut listing = self.listing.write().await;
            *listing = rows.clone();
        }
        let _ = self.events.send(SessionEvent::ListingUpdated(rows));
        Ok(())
    }

    /// Routes the listing's row action to the navigator.
    pub async fn view_project(&self, record_id: ProjectId) -> anyhow::Result<()> {
        debug!(record = %record_id, "nav: opening project record");
        self.navigator
            .go_to_record(record_id, RecordKind::Project)
            .await
    }
}

/// [`ProjectRepository`] over HTTP.
///
/// The service exposes `POST {base}/projects` for creation and
/// `GET {base}/projects` for listing. Creation does not send the payload
/// directly: the service contract takes one `payloadJson` field holding the
/// serialized payload as a string, and deserializes it on its side.
pub struct HttpProjectRepository {
    http: reqwest::Client,
    service_url: String,
}

#[derive(Debug, Serialize)]
struct CreateProjectBody {
    #[serde(rename = "payloadJson")]
    payload_json: String,
}

impl HttpProjectRepository {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            service_url: service_url.into(),
        }
    }
}

#[async_trait]
impl ProjectRepository for HttpProjectRepository {
    async fn create(&self, payload: &ProjectPayload) -> Result<(), RepositoryError> {
        let payload_json = serde_json::to_string(payload).map_err(|err| {
            RepositoryError::Transport(format!("payload encoding failed: {err}"))
        })?;

        let response = self
            .http
            .post(format!("{}/projects", self.service_url))
            .json(&CreateProjectBody { payload_json })
            .send()
            .await
            .map_err(|err| RepositoryError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Service(format!(
                "create returned {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let response = self
            .http
            .get(format!("{}/projects", self.service_url))
            .send()
            .await
            .map_err(|err| RepositoryError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(RepositoryError::Service(format!(
                "list returned {}",
                response.status()
            )));
        }

        response
            .json::<Vec<ProjectRecord>>()
            .await
            .map_err(|err| RepositoryError::InvalidResponse(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
