use std::time::Duration;
use thiserror::Error;

const SHEETS_URL: &str = "https://docs.google.com/spreadsheets/d";

fn tab_hint(tab: &Option<String>) -> String {
    match tab {
        Some(tab) => format!(" Check that the tab '{tab}' exists and matches exactly (case-sensitive)."),
        None => String::new(),
    }
}

/// Why a sheet download failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "Access denied (403). The sheet is not publicly viewable; share it with 'Anyone with the link' can view.{}",
        tab_hint(.tab)
    )]
    Forbidden { tab: Option<String> },
    #[error("Sheet or tab not found (404). Check the sheet id.{}", tab_hint(.tab))]
    NotFound { tab: Option<String> },
    #[error("Bad request (400). The tab name may not exist.{}", tab_hint(.tab))]
    BadRequest { tab: Option<String> },
    #[error("Failed to fetch sheet data: HTTP {0}")]
    Status(u16),
    #[error("Failed to fetch sheet data: {0}")]
    Transport(String),
}

impl FetchError {
    fn from_status(code: u16, tab: Option<&str>) -> Self {
        let tab = tab.map(str::to_string);
        match code {
            403 => FetchError::Forbidden { tab },
            404 => FetchError::NotFound { tab },
            400 => FetchError::BadRequest { tab },
            code => FetchError::Status(code),
        }
    }

    /// Lower ranks are more telling about what went wrong.
    fn rank(&self) -> u8 {
        match self {
            FetchError::Forbidden { .. } => 0,
            FetchError::NotFound { .. } => 1,
            FetchError::BadRequest { .. } => 2,
            FetchError::Status(_) | FetchError::Transport(_) => 3,
        }
    }
}

/// Pick the failure to report out of every attempt; ties go to the earliest.
fn most_relevant(errors: Vec<FetchError>) -> Option<FetchError> {
    errors
        .into_iter()
        .enumerate()
        .min_by_key(|(i, e)| (e.rank(), *i))
        .map(|(_, e)| e)
}

/// Downloads sheet tabs as CSV text.
pub struct SheetFetcher {
    agent: ureq::Agent,
    base_url: String,
}

impl SheetFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: SHEETS_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn candidates(&self, sheet_id: &str, tab: Option<&str>) -> Vec<ureq::Request> {
        let gviz = self
            .agent
            .get(&format!("{}/{sheet_id}/gviz/tq", self.base_url))
            .query("tqx", "out:csv");
        match tab {
            Some(tab) => vec![gviz.query("sheet", tab)],
            None => vec![
                gviz,
                self.agent
                    .get(&format!("{}/{sheet_id}/export", self.base_url))
                    .query("format", "csv"),
            ],
        }
    }

    /// Fetch one tab, or the sheet's default tab when `tab` is `None`.
    pub fn fetch_csv(&self, sheet_id: &str, tab: Option<&str>) -> Result<String, FetchError> {
        log::info!(
            "Fetching sheet {sheet_id}{}",
            tab.map(|t| format!(" tab {t:?}")).unwrap_or_default()
        );
        let mut errors = Vec::new();
        for request in self.candidates(sheet_id, tab) {
            let url = request.url().to_string();
            let err = match request.call() {
                Ok(resp) => match resp.into_string() {
                    Ok(body) => return Ok(body),
                    Err(e) => FetchError::Transport(e.to_string()),
                },
                Err(ureq::Error::Status(code, _)) => FetchError::from_status(code, tab),
                Err(ureq::Error::Transport(t)) => FetchError::Transport(t.to_string()),
            };
            log::warn!("{url}: {err}");
            errors.push(err);
        }
        Err(most_relevant(errors)
            .unwrap_or_else(|| FetchError::Transport("no download URL to try".into())))
    }
}
