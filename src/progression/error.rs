/// Rejected progression operations. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("achievement {key:?} cannot be claimed: it is {state}")]
    InvalidClaim { key: String, state: &'static str },

    #[error("unknown achievement key {0:?}")]
    UnknownAchievementKey(String),

    #[error("car name is blank")]
    BlankName,

    #[error("no car with id {0}")]
    UnknownCar(String),

    #[error("note is {len} characters long (limit {max})")]
    NoteTooLong { len: usize, max: usize },

    #[error("no pending car with sequence {0}")]
    NotPending(u64),
}
