// Per-widget request lifecycle: Idle -> Loading -> {Rendered, Errored}.
//
// Every widget owns a monotonically increasing request sequence. Starting a
// request bumps it; a response is applied only if it carries the latest
// sequence, so a slow reply to an older request can never overwrite a newer
// one.

/// Sequence number of one request issued by one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Idle,
    Loading(RequestId),
    Rendered(T),
    /// Carries the user-facing message, never a raw error.
    Errored(String),
}

impl<T> Default for WidgetState<T> {
    fn default() -> Self {
        WidgetState::Idle
    }
}

/// A widget's current state plus its request fence.
#[derive(Debug, Clone)]
pub struct Widget<T> {
    state: WidgetState<T>,
    issued: u64,
}

impl<T> Default for Widget<T> {
    fn default() -> Self {
        Widget {
            state: WidgetState::Idle,
            issued: 0,
        }
    }
}

impl<T> Widget<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WidgetState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, WidgetState::Loading(_))
    }

    /// Start a new request, superseding any in flight.
    pub fn begin(&mut self) -> RequestId {
        self.issued += 1;
        let id = RequestId(self.issued);
        self.state = WidgetState::Loading(id);
        id
    }

    /// Whether `id` is the latest request this widget issued.
    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.issued
    }

    /// Apply a response. Returns `false` (and changes nothing) when the
    /// response belongs to a superseded request.
    pub fn complete(&mut self, id: RequestId, outcome: Result<T, String>) -> bool {
        if !self.is_current(id) {
            tracing::debug!(
                "discarding stale response (request {}, latest {})",
                id.0,
                self.issued
            );
            return false;
        }
        self.state = match outcome {
            Ok(value) => WidgetState::Rendered(value),
            Err(message) => WidgetState::Errored(message),
        };
        true
    }

    /// Show a result that did not come from a request (e.g. a local
    /// validation message or a local action's confirmation). Any in-flight
    /// request is superseded.
    pub fn set(&mut self, outcome: Result<T, String>) {
        let id = self.begin();
        self.complete(id, outcome);
    }

    /// Back to `Idle`, superseding any in-flight request.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.state = WidgetState::Idle;
    }
}
