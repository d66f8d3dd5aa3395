use std::sync::Arc;

use shared::{
    domain::MemberId,
    protocol::{CreateMemberRequest, DeleteMembersRequest, Member, UpdatePositionRequest},
};
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::{
    error::{ClientError, ValidationError},
    notify::{self, NotificationKind, Notifier, Prompter},
    selection::SelectionTracker,
    session::{BusyFlags, SessionLifetime, Workflow},
    store::ResourceList,
    view::{self, MemberRow, Toolbar},
    MembersApi,
};

#[derive(Debug)]
pub enum WorkflowOutcome {
    Completed,
    Rejected(ValidationError),
    Cancelled,
    Failed(ClientError),
    Busy,
    Disposed,
}

impl WorkflowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub members: Vec<Member>,
    pub selected: Vec<MemberId>,
    pub ready: bool,
    pub create_dialog_open: bool,
}

#[derive(Default)]
struct BoardState {
    members: ResourceList<Member>,
    selection: SelectionTracker<MemberId>,
    ready: bool,
    create_dialog_open: bool,
}

pub struct MembersBoard {
    api: Arc<dyn MembersApi>,
    notifier: Arc<dyn Notifier>,
    prompter: Arc<dyn Prompter>,
    state: Mutex<BoardState>,
    busy: BusyFlags,
    lifetime: SessionLifetime,
    member_count: watch::Sender<usize>,
}

impl MembersBoard {
    pub fn new(
        api: Arc<dyn MembersApi>,
        notifier: Arc<dyn Notifier>,
        prompter: Arc<dyn Prompter>,
    ) -> Arc<Self> {
        let (member_count, _rx) = watch::channel(0);
        Arc::new(Self {
            api,
            notifier,
            prompter,
            state: Mutex::new(BoardState::default()),
            busy: BusyFlags::default(),
            lifetime: SessionLifetime::new(),
            member_count,
        })
    }

    pub fn subscribe_member_count(&self) -> watch::Receiver<usize> {
        self.member_count.subscribe()
    }

    pub fn is_busy(&self, workflow: Workflow) -> bool {
        self.busy.is_busy(workflow)
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_disposed()
    }

    pub fn dispose(&self) {
        info!("members board disposed");
        self.lifetime.dispose();
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.lock().await;
        BoardSnapshot {
            members: state.members.records().to_vec(),
            selected: state.selection.ids().iter().copied().collect(),
            ready: state.ready,
            create_dialog_open: state.create_dialog_open,
        }
    }

    pub async fn rows(&self) -> Vec<MemberRow> {
        let state = self.state.lock().await;
        view::project_rows(&state.members, &state.selection)
    }

    pub async fn toolbar(&self) -> Toolbar {
        let state = self.state.lock().await;
        view::toolbar(&state.selection)
    }

    pub async fn open_create_dialog(&self) {
        self.state.lock().await.create_dialog_open = true;
    }

    pub async fn close_create_dialog(&self) {
        self.state.lock().await.create_dialog_open = false;
    }

    pub async fn toggle(&self, id: MemberId) -> bool {
        let mut state = self.state.lock().await;
        if !state.members.contains(id) {
            warn!(member_id = %id, "ignoring selection of unknown member");
            return false;
        }
        state.selection.toggle(id);
        state.selection.contains(id)
    }

    pub async fn load(&self) -> WorkflowOutcome {
        let Some(result) = self.lifetime.run(self.api.list_members()).await else {
            return WorkflowOutcome::Disposed;
        };

        let mut state = self.state.lock().await;
        state.ready = true;
        match result {
            Ok(members) => {
                info!(count = members.len(), "members loaded");
                state.members.replace(members);
                self.member_count.send_replace(state.members.len());
                WorkflowOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "failed to load members");
                self.notifier
                    .notify(notify::LOAD_FAILED, NotificationKind::Error);
                WorkflowOutcome::Failed(err)
            }
        }
    }

    pub async fn create(&self, name: &str, affiliation: &str) -> WorkflowOutcome {
        if self.lifetime.is_disposed() {
            return WorkflowOutcome::Disposed;
        }
        if name.trim().is_empty() || affiliation.trim().is_empty() {
            return self.reject(ValidationError::NameAndAffiliationRequired);
        }
        let Some(_busy) = self.busy.try_acquire(Workflow::Create) else {
            return WorkflowOutcome::Busy;
        };

        let request = CreateMemberRequest {
            name: name.to_string(),
            affiliation: affiliation.to_string(),
        };
        let Some(result) = self.lifetime.run(self.api.create_member(&request)).await else {
            return WorkflowOutcome::Disposed;
        };

        match result {
            Ok(member) => {
                info!(member_id = %member.id, "member added");
                let mut state = self.state.lock().await;
                state.members.append(member);
                self.member_count.send_replace(state.members.len());
                state.create_dialog_open = false;
                drop(state);
                self.notifier
                    .notify(notify::MEMBER_ADDED, NotificationKind::Success);
                WorkflowOutcome::Completed
            }
            Err(ClientError::Conflict) => {
                info!(name, affiliation, "member already exists");
                self.notifier
                    .notify(notify::ALREADY_MEMBER, NotificationKind::Error);
                WorkflowOutcome::Failed(ClientError::Conflict)
            }
            Err(err) => {
                warn!(error = %err, "failed to add member");
                self.notifier.notify(notify::TRY_AGAIN, NotificationKind::Error);
                WorkflowOutcome::Failed(err)
            }
        }
    }

    /// Sets the forum position of the single selected member. Selection
    /// survives the precondition exits but is cleared once the update has
    /// been attempted, whatever the server answered.
    pub async fn change_position(&self) -> WorkflowOutcome {
        if self.lifetime.is_disposed() {
            return WorkflowOutcome::Disposed;
        }
        let Some(_busy) = self.busy.try_acquire(Workflow::ChangePosition) else {
            return WorkflowOutcome::Busy;
        };

        let selected = self.state.lock().await.selection.single();
        let Some(id) = selected else {
            return self.reject(ValidationError::SelectExactlyOne);
        };

        let Some(answer) = self
            .lifetime
            .run(self.prompter.prompt(notify::POSITION_PROMPT))
            .await
        else {
            return WorkflowOutcome::Disposed;
        };
        let Some(note) = answer else {
            return WorkflowOutcome::Cancelled;
        };
        if note.is_empty() {
            return self.reject(ValidationError::EmptyPosition);
        }

        let request = UpdatePositionRequest { id, note };
        let Some(result) = self.lifetime.run(self.api.update_position(&request)).await else {
            return WorkflowOutcome::Disposed;
        };

        let mut state = self.state.lock().await;
        state.selection.clear();
        match result {
            Ok(members) => {
                info!(member_id = %id, "position updated");
                state.members.replace(members);
                self.member_count.send_replace(state.members.len());
                drop(state);
                self.notifier
                    .notify(notify::POSITION_UPDATED, NotificationKind::Success);
                WorkflowOutcome::Completed
            }
            Err(err) => {
                drop(state);
                warn!(member_id = %id, error = %err, "failed to update position");
                self.notifier.notify(notify::TRY_AGAIN, NotificationKind::Error);
                WorkflowOutcome::Failed(err)
            }
        }
    }

    /// Removes every selected member after confirmation. Selection is only
    /// cleared when the server confirms the removal.
    pub async fn delete_selected(&self) -> WorkflowOutcome {
        if self.lifetime.is_disposed() {
            return WorkflowOutcome::Disposed;
        }
        let Some(_busy) = self.busy.try_acquire(Workflow::Delete) else {
            return WorkflowOutcome::Busy;
        };

        let ids = self.state.lock().await.selection.ids().clone();
        if ids.is_empty() {
            return self.reject(ValidationError::SelectAtLeastOne);
        }

        let Some(confirmed) = self
            .lifetime
            .run(self.prompter.confirm(notify::REMOVE_CONFIRM))
            .await
        else {
            return WorkflowOutcome::Disposed;
        };
        if !confirmed {
            return WorkflowOutcome::Cancelled;
        }

        let request = DeleteMembersRequest {
            ids: ids.iter().copied().collect(),
        };
        let Some(result) = self.lifetime.run(self.api.delete_members(&request)).await else {
            return WorkflowOutcome::Disposed;
        };

        match result {
            Ok(()) => {
                info!(count = ids.len(), "members removed");
                let mut state = self.state.lock().await;
                let survivors = state.members.remove(&ids);
                state.members.replace(survivors);
                state.selection.clear();
                self.member_count.send_replace(state.members.len());
                drop(state);
                self.notifier
                    .notify(notify::MEMBERS_REMOVED, NotificationKind::Success);
                WorkflowOutcome::Completed
            }
            Err(err) => {
                warn!(count = ids.len(), error = %err, "failed to remove members");
                self.notifier.notify(notify::TRY_AGAIN, NotificationKind::Error);
                WorkflowOutcome::Failed(err)
            }
        }
    }

    fn reject(&self, reason: ValidationError) -> WorkflowOutcome {
        let message = match reason {
            ValidationError::SelectExactlyOne => notify::SELECT_EXACTLY_ONE,
            ValidationError::SelectAtLeastOne => notify::SELECT_AT_LEAST_ONE,
            ValidationError::EmptyPosition => notify::POSITION_REQUIRED,
            ValidationError::NameAndAffiliationRequired => notify::NAME_AND_AFFILIATION_REQUIRED,
        };
        self.notifier.notify(message, NotificationKind::Warning);
        WorkflowOutcome::Rejected(reason)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
