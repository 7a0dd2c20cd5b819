use deep_observe_util::path::ancestors;
use deep_observe_util::Value;

/// Unqualified event key, fired for every change.
pub const CHANGE_EVENT: &str = "change";

/// Handle returned by `on`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Dot path of the property that was written.
    pub path: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// Event key for changes at `path`: `change.<path>`, or `change` for the root.
pub fn event_key(path: &str) -> String {
    if path.is_empty() {
        return CHANGE_EVENT.to_owned();
    }
    let mut key = String::with_capacity(CHANGE_EVENT.len() + 1 + path.len());
    key.push_str(CHANGE_EVENT);
    key.push('.');
    key.push_str(path);
    key
}

/// Keys fired for a write at `path`, in dispatch order: the unqualified key,
/// then the written path and each ancestor, most specific first.
pub(crate) fn cascade_keys(path: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(CHANGE_EVENT.to_owned()).chain(ancestors(path).map(event_key))
}

/// One or several event keys.
pub trait EventKeys {
    fn into_event_keys(self) -> Vec<String>;
}

impl EventKeys for &str {
    fn into_event_keys(self) -> Vec<String> {
        vec![self.to_owned()]
    }
}

impl EventKeys for String {
    fn into_event_keys(self) -> Vec<String> {
        vec![self]
    }
}

impl EventKeys for &String {
    fn into_event_keys(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl EventKeys for &[&str] {
    fn into_event_keys(self) -> Vec<String> {
        self.iter().map(|k| (*k).to_owned()).collect()
    }
}

impl EventKeys for &[String] {
    fn into_event_keys(self) -> Vec<String> {
        self.to_vec()
    }
}

impl<const N: usize> EventKeys for [&str; N] {
    fn into_event_keys(self) -> Vec<String> {
        self.iter().map(|k| (*k).to_owned()).collect()
    }
}

impl EventKeys for Vec<&str> {
    fn into_event_keys(self) -> Vec<String> {
        self.into_iter().map(str::to_owned).collect()
    }
}

impl EventKeys for Vec<String> {
    fn into_event_keys(self) -> Vec<String> {
        self
    }
}
