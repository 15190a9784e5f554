//! Input events
//!
//! Window and pointer input arrives through an injected [`EventSource`] as
//! normalized [`InputEvent`]s. The lifecycle manager attaches the source during
//! initialization, polls it once per frame, and detaches it on dispose.
//!
//! [`QueuedEventSource`] is an in-process source fed through a cloneable
//! [`EventQueue`]; it backs headless runs and tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{EngineError, Result};

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button / primary touch
    Primary,
    /// Right mouse button
    Secondary,
    /// Middle mouse button
    Middle,
}

/// Normalized input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved; pixels from the top-left corner
    PointerMoved {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Pointer button went down
    PointerPressed {
        /// Which button
        button: PointerButton,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Pointer button went up
    PointerReleased {
        /// Which button
        button: PointerButton,
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Viewport was resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The user asked to close the application
    CloseRequested,
}

impl InputEvent {
    /// Screen position for pointer events
    pub fn pointer_position(&self) -> Option<(f64, f64)> {
        match *self {
            InputEvent::PointerMoved { x, y }
            | InputEvent::PointerPressed { x, y, .. }
            | InputEvent::PointerReleased { x, y, .. } => Some((x, y)),
            InputEvent::Resized { .. } | InputEvent::CloseRequested => None,
        }
    }
}

/// Source of input events
pub trait EventSource {
    /// Start delivering events
    fn attach(&mut self) -> Result<()>;

    /// Take every event received since the last poll
    fn poll(&mut self) -> Result<Vec<InputEvent>>;

    /// Stop delivering events and drop anything pending
    fn detach(&mut self);
}

/// Producer side of a [`QueuedEventSource`]
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl EventQueue {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&self, event: InputEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Number of undelivered events
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Event source fed by an [`EventQueue`]
#[derive(Debug, Default)]
pub struct QueuedEventSource {
    queue: EventQueue,
    attached: bool,
}

impl QueuedEventSource {
    /// Source and a producer handle for it
    pub fn new() -> (Self, EventQueue) {
        let source = Self::default();
        let queue = source.queue.clone();
        (source, queue)
    }

    /// Whether `attach` has been called without a matching `detach`
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl EventSource for QueuedEventSource {
    fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Err(EngineError::Backend("event source is already attached".to_string()));
        }
        self.attached = true;
        log::debug!("Queued event source attached");
        Ok(())
    }

    fn poll(&mut self) -> Result<Vec<InputEvent>> {
        if !self.attached {
            return Ok(Vec::new());
        }
        Ok(self.queue.events.borrow_mut().drain(..).collect())
    }

    fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.queue.events.borrow_mut().clear();
            log::debug!("Queued event source detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_requires_attach() {
        let (mut source, queue) = QueuedEventSource::new();
        queue.push(InputEvent::CloseRequested);
        assert!(source.poll().unwrap().is_empty());

        source.attach().unwrap();
        assert_eq!(source.poll().unwrap(), vec![InputEvent::CloseRequested]);
        assert!(source.poll().unwrap().is_empty());
    }

    #[test]
    fn test_detach_drops_pending() {
        let (mut source, queue) = QueuedEventSource::new();
        source.attach().unwrap();
        queue.push(InputEvent::Resized { width: 10, height: 10 });
        source.detach();
        assert!(queue.is_empty());
        assert!(!source.is_attached());
    }

    #[test]
    fn test_double_attach_fails() {
        let (mut source, _queue) = QueuedEventSource::new();
        source.attach().unwrap();
        assert!(matches!(source.attach(), Err(EngineError::Backend(_))));
    }

    #[test]
    fn test_pointer_position() {
        let event = InputEvent::PointerPressed { button: PointerButton::Primary, x: 4.0, y: 8.0 };
        assert_eq!(event.pointer_position(), Some((4.0, 8.0)));
        assert_eq!(InputEvent::CloseRequested.pointer_position(), None);
    }
}
