use crate::feed::FeedError;
use crate::persistence::PersistenceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Dashboard event loop has stopped")]
    Stopped,

    #[error("Dashboard task panicked or was cancelled")]
    Task(#[source] tokio::task::JoinError),
}
