use tracing::debug;

/// Progress of one transfer. `Logged` and `Rejected` are terminal.
///
/// `Debiting → Pending` is the retry edge taken when the source row changed between read
/// and write; the guarded write failed, so nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Pending,
    Debiting,
    Crediting,
    Logged,
    Rejected,
}

impl TransferState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferState::Logged | TransferState::Rejected)
    }

    pub fn can_advance_to(self, next: TransferState) -> bool {
        use TransferState::*;
        matches!(
            (self, next),
            (Pending, Debiting)
                | (Pending, Rejected)
                | (Debiting, Pending)
                | (Debiting, Crediting)
                | (Debiting, Rejected)
                | (Crediting, Logged)
        )
    }

    pub(crate) fn advance(&mut self, next: TransferState) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal transfer transition {self:?} -> {next:?}"
        );
        debug!(from = ?*self, to = ?next, "Transfer state");
        *self = next;
    }
}
