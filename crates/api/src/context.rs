use stockroom_core::UserId;

/// Actor context for a request (authenticated identity).
///
/// This is immutable and must be present for all protected routes; the
/// movement protocol records it as `performed_by` on every ledger entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActorContext {
    user_id: UserId,
}

impl ActorContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
