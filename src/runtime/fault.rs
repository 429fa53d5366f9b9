//! Runtime fault signaling
//!
//! A fault is a runtime-level failure that is not tied to argument marshalling,
//! such as an undefined constant. Native code holding a `FaultSignal` can raise
//! one; the dispatcher takes it after the call and refuses to return a value.

use crate::interop::dispatch::FaultSource;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct FaultSignal {
    pending: Rc<RefCell<Option<String>>>,
}

impl FaultSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a fault. While one is pending, later faults are dropped.
    pub fn raise(&self, message: impl Into<String>) {
        let mut pending = self.pending.borrow_mut();
        if pending.is_none() {
            let message = message.into();
            debug!(target: "runtime", fault = %message, "runtime fault raised");
            *pending = Some(message);
        }
    }

    pub fn is_raised(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub fn clear(&self) {
        self.pending.borrow_mut().take();
    }
}

impl FaultSource for FaultSignal {
    fn take_fault(&self) -> Option<String> {
        self.pending.borrow_mut().take()
    }
}

impl fmt::Debug for FaultSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultSignal")
            .field("pending", &*self.pending.borrow())
            .finish()
    }
}
