use uuid::Uuid;

/// Correlation ID that follows a single state transition (trade, governance
/// call, or block tick) through the logs.
#[derive(Clone, Debug)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn as_str(&self) -> String {
        self.0.as_hyphenated().to_string()
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.as_hyphenated().fmt(f)
    }
}
