use std::sync::{Arc, Mutex};

use taskline::registry::{Hook, TaskDefinition};

/// Shared, ordered log of hook invocations such as `"foo:before"`.
///
/// Hooks built from the same recorder append to one list, which makes it easy
/// to assert on execution order across tasks.
#[derive(Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Hook that records `entry` and succeeds.
    pub fn hook(&self, entry: &str) -> Hook {
        self.hook_with_result(entry, true)
    }

    /// Hook that records `entry` and then fails.
    pub fn failing_hook(&self, entry: &str) -> Hook {
        self.hook_with_result(entry, false)
    }

    /// Definition whose `before`, callback and `after` all record and succeed.
    pub fn full_definition(&self, label: &str) -> TaskDefinition {
        TaskDefinition::from_hook(self.hook(&format!("{label}:callback")))
            .before_hook(self.hook(&format!("{label}:before")))
            .after_hook(self.hook(&format!("{label}:after")))
    }

    /// Definition with only a recording callback.
    pub fn definition(&self, label: &str) -> TaskDefinition {
        TaskDefinition::from_hook(self.hook(&format!("{label}:callback")))
    }

    /// Definition with only a failing callback.
    pub fn failing_definition(&self, label: &str) -> TaskDefinition {
        TaskDefinition::from_hook(self.failing_hook(&format!("{label}:callback")))
    }

    fn hook_with_result(&self, entry: &str, succeed: bool) -> Hook {
        let calls = Arc::clone(&self.calls);
        let entry = entry.to_string();
        Hook::new(move |_ctx| {
            let calls = Arc::clone(&calls);
            let entry = entry.clone();
            async move {
                calls.lock().unwrap().push(entry.clone());
                if succeed {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("{entry} failed"))
                }
            }
        })
    }
}
