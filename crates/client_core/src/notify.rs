use async_trait::async_trait;

pub const LOAD_FAILED: &str = "Could not load data.";
pub const NAME_AND_AFFILIATION_REQUIRED: &str = "Enter a name and an affiliation.";
pub const MEMBER_ADDED: &str = "Member added.";
pub const ALREADY_MEMBER: &str = "Already a member of the forum.";
pub const TRY_AGAIN: &str = "Something went wrong. Please try again.";
pub const SELECT_EXACTLY_ONE: &str = "Select exactly one member.";
pub const POSITION_REQUIRED: &str = "Enter a position.";
pub const POSITION_UPDATED: &str = "Position updated.";
pub const SELECT_AT_LEAST_ONE: &str = "Select at least one member.";
pub const MEMBERS_REMOVED: &str = "Member removed.";
pub const POSITION_PROMPT: &str = "Enter the new position.";
pub const REMOVE_CONFIRM: &str = "Remove the selected members from the forum?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Asks for free text. `None` means the prompt was dismissed.
    async fn prompt(&self, message: &str) -> Option<String>;
    async fn confirm(&self, message: &str) -> bool;
}
