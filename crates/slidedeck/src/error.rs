use std::path::PathBuf;

/// Errors raised while loading a deck and building its view model.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("deck contains no slides")]
    Empty,
}

/// Failures reported by the host platform.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("fullscreen request rejected: {0}")]
    Fullscreen(String),
}
