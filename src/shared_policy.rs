use std::sync::{Arc, Mutex, MutexGuard};
use crate::scaling_policy::{Decision, ScalingPolicy};

/// A scaling policy that can be evaluated from several threads.
///
/// Every operation holds the lock for the whole bound check and update, so
/// concurrent callers never push the count outside its bounds.
#[derive(Clone)]
pub struct SharedScalingPolicy {
    inner: Arc<Mutex<ScalingPolicy>>,
}

impl SharedScalingPolicy {
    pub fn new(policy: ScalingPolicy) -> Self {
        Self { inner: Arc::new(Mutex::new(policy)) }
    }

    pub fn evaluate(&self, metric: f64) -> Decision {
        self.lock().evaluate(metric)
    }

    pub fn scale_up(&self) -> bool {
        self.lock().scale_up()
    }

    pub fn scale_down(&self) -> bool {
        self.lock().scale_down()
    }

    pub fn current_instances(&self) -> u32 {
        self.lock().current_instances()
    }

    /// Returns a copy of the policy state at this moment.
    pub fn snapshot(&self) -> ScalingPolicy {
        self.lock().clone()
    }

    // The policy is consistent between calls, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ScalingPolicy> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
