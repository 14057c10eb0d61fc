use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("A range is selected, refusing to rewrite")]
    RangeSelected,

    #[error("No cursor on the surface")]
    NoCursor,

    #[error("Anchor node is no longer a connected text node")]
    StaleAnchor,

    #[error("Trigger pattern no longer matches before the cursor")]
    NoMatch,
}

pub type RewriteResult<T> = Result<T, RewriteError>;
