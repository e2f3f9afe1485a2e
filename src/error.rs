use crate::fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error processing {tab}: {source}")]
    Tab {
        tab: String,
        #[source]
        source: Box<Error>,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Config(String),
}

impl Error {
    /// Attribute the failure to the tab being processed.
    pub fn in_tab(self, tab: &str) -> Self {
        Error::Tab {
            tab: tab.to_string(),
            source: Box::new(self),
        }
    }
}
