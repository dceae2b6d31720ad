//! Leptos Debounce Utilities
//!
//! Last-write-wins debouncing for text inputs.
//! A newer value always cancels the pending one, so at most one
//! scheduled run is outstanding at any time.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Default quiet period for search boxes
pub const DEFAULT_DELAY_MS: u32 = 300;

/// Handle for one scheduled run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub deadline_ms: u64,
}

/// Clock-agnostic debounce state machine.
///
/// Holds at most one pending value. Time is supplied by the caller, which
/// keeps it usable both from browser timers and from plain tests.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    generation: u64,
    pending: Option<(Ticket, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedule `value`, replacing any pending one
    pub fn schedule(&mut self, now_ms: u64, value: T) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            deadline_ms: now_ms + self.delay_ms,
        };
        self.pending = Some((ticket, value));
        ticket
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.pending {
            Some((ticket, _)) if ticket.deadline_ms <= now_ms => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Take the pending value only if `ticket` is still the latest
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        match self.pending {
            Some((current, _)) if current == ticket => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(ticket, _)| ticket.deadline_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without running it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }
}

/// Milliseconds since the epoch from the JS clock
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Wrap `on_settle` so it runs `delay_ms` after the last call.
///
/// Each call replaces the stored timeout; dropping the old
/// `Timeout` clears it in the browser. The timeout lives in the current
/// reactive owner, so a pending run is dropped when the component unmounts.
pub fn use_debounced<T, F>(delay_ms: u32, on_settle: F) -> impl Fn(T) + Clone + 'static
where
    T: 'static,
    F: Fn(T) + 'static,
{
    let state = Rc::new(RefCell::new(Debouncer::<T>::new(delay_ms as u64)));
    let timer = StoredValue::new_local(None::<Timeout>);
    let on_settle = Rc::new(on_settle);

    move |value: T| {
        let ticket = state.borrow_mut().schedule(now_ms(), value);
        let state = state.clone();
        let on_settle = on_settle.clone();
        let timeout = Timeout::new(delay_ms, move || {
            let ready = state.borrow_mut().fire(ticket);
            if let Some(value) = ready {
                on_settle(value);
            }
        });
        let _ = timer.try_update_value(|slot| slot.replace(timeout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_keystroke_fires() {
        let mut debouncer = Debouncer::new(300);
        debouncer.schedule(0, "a");
        debouncer.schedule(50, "ab");
        debouncer.schedule(100, "abc");
        debouncer.schedule(250, "abcd");

        // Nothing is due before 550ms
        for t in [300, 350, 400, 549] {
            assert_eq!(debouncer.poll(t), None);
        }
        assert_eq!(debouncer.deadline(), Some(550));
        assert_eq!(debouncer.poll(550), Some("abcd"));
        // Exactly once
        assert_eq!(debouncer.poll(10_000), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut debouncer = Debouncer::new(300);
        let first = debouncer.schedule(0, 1);
        let second = debouncer.schedule(10, 2);

        assert_eq!(debouncer.fire(first), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.fire(second), Some(2));
        assert_eq!(debouncer.fire(second), None);
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::new(300);
        debouncer.schedule(0, "x");
        assert_eq!(debouncer.cancel(), Some("x"));
        assert_eq!(debouncer.poll(1_000), None);
    }
}
