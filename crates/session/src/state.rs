use {
    analysis::{AnalysisError, AnalysisResult},
    base::{Sequence, Stamped},
    std::sync::Arc,
    tokio::sync::watch,
};

/// Where the current submission stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(AnalysisResult),
    Failed(AnalysisError),
}

/// A response stamped with the request number it answers.
pub type Response = Stamped<Result<AnalysisResult, AnalysisError>>;

/// All result-related UI state in one place.
///
/// Only the latest issued request may move the state out of `Loading`.
/// A failure never erases the last successful result.
#[derive(Debug, Clone, Default)]
pub struct ResultState {
    request: RequestState,
    last_result: Option<AnalysisResult>,
    sequence: Sequence,
}

impl ResultState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission. Returns its request number.
    pub fn begin(&mut self) -> u64 {
        let number = self.sequence.issue();
        self.request = RequestState::Loading;
        number
    }

    /// Apply a response. Returns false when it was stale or already applied.
    pub fn complete(&mut self, response: Response) -> bool {
        if !self.sequence.is_current(response.number) {
            log::debug!(
                "dropping stale response #{} (latest is #{})",
                response.number,
                self.sequence.latest()
            );
            return false;
        }
        if !self.is_loading() {
            return false;
        }

        match response.inner {
            Ok(result) => {
                self.last_result = Some(result.clone());
                self.request = RequestState::Succeeded(result);
            }
            Err(error) => {
                self.request = RequestState::Failed(error);
            }
        }
        true
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn is_loading(&self) -> bool {
        self.request == RequestState::Loading
    }

    /// The result to show right now. Nothing while loading or after a failure.
    pub fn current(&self) -> Option<&AnalysisResult> {
        match &self.request {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Most recent successful result, kept across failures.
    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.request {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn can_retry(&self) -> bool {
        self.error().is_some_and(AnalysisError::is_retryable)
    }

    pub fn latest_request(&self) -> u64 {
        self.sequence.latest()
    }
}

/// Shared, observable `ResultState`.
///
/// Transitions run under the channel lock, so concurrent submissions never
/// interleave half-applied updates. Subscribers wake on every change.
#[derive(Clone)]
pub struct ResultStore {
    sender: Arc<watch::Sender<ResultState>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ResultState::new());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn begin(&self) -> u64 {
        let mut number = 0;
        self.sender.send_modify(|state| number = state.begin());
        number
    }

    pub fn complete(&self, response: Response) -> bool {
        self.sender.send_if_modified(|state| state.complete(response))
    }

    pub fn snapshot(&self) -> ResultState {
        self.sender.borrow().clone()
    }

    /// Read the state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&ResultState) -> R) -> R {
        f(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultState> {
        self.sender.subscribe()
    }
}
