//! The consent gate consulted before any tracking work happens.

use std::cell::Cell;
use std::rc::Rc;

/// Answers whether the visitor has agreed to analytics.
///
/// Implemented for any `Fn() -> bool`, so a host can hand over a closure
/// reading its own cookie-banner state.
pub trait ConsentProvider {
    fn has_consent(&self) -> bool;
}

impl<F: Fn() -> bool> ConsentProvider for F {
    fn has_consent(&self) -> bool {
        self()
    }
}

/// A shared, switchable consent flag.
///
/// Clones observe the same flag, so the host keeps one clone and updates it
/// when the visitor changes their choice.
#[derive(Debug, Clone, Default)]
pub struct ConsentFlag {
    granted: Rc<Cell<bool>>,
}

impl ConsentFlag {
    pub fn granted() -> Self {
        Self::new(true)
    }

    pub fn denied() -> Self {
        Self::new(false)
    }

    pub fn new(granted: bool) -> Self {
        Self {
            granted: Rc::new(Cell::new(granted)),
        }
    }

    pub fn set(&self, granted: bool) {
        self.granted.set(granted);
    }
}

impl ConsentProvider for ConsentFlag {
    fn has_consent(&self) -> bool {
        self.granted.get()
    }
}
