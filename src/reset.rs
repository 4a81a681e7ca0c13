//! Rewinding a stateful type back to its initial configuration.

use crate::state::State;
use crate::transformer::{Status, Transformer};

/// Types that can be rewound and reused from scratch.
pub trait Reset {
    /// Rewind to the initial state, as if freshly constructed.
    fn reset(&mut self);
}

impl<'a> Reset for Transformer<'a> {
    fn reset(&mut self) {
        self.reset_output();
        self.rewind_cursor();
        self.clear_stack();
        debug_assert_eq!(self.state(), State::Opening);
        debug_assert_eq!(self.status(), Status::Advancing);
    }
}
