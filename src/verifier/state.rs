/// What a single candidate server produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStep {
    /// No numeric reply: the connection failed or the server went silent.
    NoReply,
    /// A real reply at the sender or recipient stage, accepting or not.
    Definitive,
}

/// Progress of the candidate loop.
///
/// `Trying` moves to `DefinitiveReply` on the first real reply and stays
/// there; running out of candidates while still `Trying` gives `Exhausted`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeState {
    #[default]
    Trying,
    DefinitiveReply,
    Exhausted,
}

impl ProbeState {
    pub fn advance(self, step: CandidateStep) -> Self {
        match (self, step) {
            (Self::Trying, CandidateStep::NoReply) => Self::Trying,
            (Self::Trying, CandidateStep::Definitive) => Self::DefinitiveReply,
            (done, _) => done,
        }
    }

    /// Called once no candidate is left.
    pub fn finish(self) -> Self {
        match self {
            Self::Trying => Self::Exhausted,
            done => done,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Trying)
    }
}
