//! Arguments handed to a task at execution time.

use barmill_types::Frame;
use serde_json::Value;

/// Arguments declared for a step in a pipeline specification.
pub type Params = serde_json::Map<String, Value>;

/// Reserved argument carrying the previous step's tabular result.
pub const DF_ARG: &str = "df";

/// Reserved argument carrying the pipeline's storage signature.
pub const STORAGE_SIGNATURE_ARG: &str = "storage_signature";

/// A step's own parameters merged with the values injected by the runner.
///
/// Injected values live in typed slots. Injecting a reserved value replaces
/// any parameter of the same name, so the injected value always wins.
#[derive(Debug, Clone, Default)]
pub struct TaskArgs {
    params: Params,
    df: Option<Frame>,
    storage_signature: Option<String>,
}

impl TaskArgs {
    /// Creates arguments from a step's own parameters.
    #[must_use]
    pub const fn new(params: Params) -> Self {
        Self { params, df: None, storage_signature: None }
    }

    /// Injects the previous step's tabular result as `df`.
    #[must_use]
    pub fn with_df(mut self, frame: Frame) -> Self {
        self.params.remove(DF_ARG);
        self.df = Some(frame);
        self
    }

    /// Injects the pipeline's storage signature.
    #[must_use]
    pub fn with_storage_signature(mut self, signature: impl Into<String>) -> Self {
        self.params.remove(STORAGE_SIGNATURE_ARG);
        self.storage_signature = Some(signature.into());
        self
    }

    /// Returns the step's own parameters, without injected values.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns true if the argument is present, injected or declared.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match key {
            DF_ARG if self.df.is_some() => true,
            STORAGE_SIGNATURE_ARG if self.storage_signature.is_some() => true,
            _ => self.params.contains_key(key),
        }
    }

    /// Returns the injected tabular result.
    #[must_use]
    pub const fn df(&self) -> Option<&Frame> {
        self.df.as_ref()
    }

    /// Takes ownership of the injected tabular result.
    pub const fn take_df(&mut self) -> Option<Frame> {
        self.df.take()
    }

    /// Returns the injected storage signature.
    #[must_use]
    pub fn storage_signature(&self) -> Option<&str> {
        self.storage_signature.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barmill_types::Tick;
    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_own_params_only() {
        let args = TaskArgs::new(params(json!({"unit": "tick"})));
        assert!(args.contains("unit"));
        assert!(!args.contains(DF_ARG));
        assert!(!args.contains(STORAGE_SIGNATURE_ARG));
        assert_eq!(args.get("unit"), Some(&json!("tick")));
    }

    #[test]
    fn test_injected_values_win() {
        let args = TaskArgs::new(params(json!({"storage_signature": "gcsfs", "df": 1})))
            .with_storage_signature("memory")
            .with_df(Frame::Ticks(vec![Tick::from_trade(0, "X", 1.0, 1.0)]));

        assert_eq!(args.storage_signature(), Some("memory"));
        assert_eq!(args.df().map(Frame::len), Some(1));
        assert!(args.params().is_empty());
        assert!(args.contains(DF_ARG));
    }

    #[test]
    fn test_explicit_df_param_kept_without_injection() {
        let args = TaskArgs::new(params(json!({"df": "explicit"})));
        assert!(args.contains(DF_ARG));
        assert!(args.df().is_none());
    }

    #[test]
    fn test_take_df() {
        let mut args = TaskArgs::default().with_df(Frame::Bars(Vec::new()));
        assert!(args.take_df().is_some());
        assert!(args.take_df().is_none());
    }
}
