//! Coalesces change notifications into at most one pending repaint.

/// Handle for a requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Single-shot "next refresh" primitive offered by the host.
pub trait FrameClock {
    /// Requests one callback at the next display refresh.
    fn request_frame(&mut self) -> FrameToken;
    /// Withdraws a request that has not fired yet.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Clock for hosts that poll: the event loop asks whether a frame is armed
/// and renders it when the compositor is ready for another buffer.
#[derive(Debug, Default)]
pub struct PolledClock {
    next: u64,
    armed: Option<FrameToken>,
}

impl PolledClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the armed request, if any.
    pub fn due(&self) -> Option<FrameToken> {
        self.armed
    }

    /// Disarms and returns the armed request.
    pub fn take_due(&mut self) -> Option<FrameToken> {
        self.armed.take()
    }
}

impl FrameClock for PolledClock {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.armed = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.armed == Some(token) {
            self.armed = None;
        }
    }
}

/// Cancel-and-resubmit scheduling against a [`FrameClock`].
#[derive(Debug)]
pub struct RedrawScheduler<C: FrameClock> {
    clock: C,
    pending: Option<FrameToken>,
    coalesced: u64,
}

impl<C: FrameClock> RedrawScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: None,
            coalesced: 0,
        }
    }

    /// Requests a repaint; an earlier pending request is cancelled first.
    pub fn schedule(&mut self) {
        if let Some(previous) = self.pending.take() {
            self.clock.cancel_frame(previous);
            self.coalesced += 1;
            log::trace!("Coalesced redraw request {:?}", previous);
        }
        self.pending = Some(self.clock.request_frame());
    }

    /// Consumes the pending request if `token` is it.
    ///
    /// Returns false for cancelled or unknown tokens.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Number of requests superseded before they fired.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingClock {
        requested: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
    }

    impl FrameClock for CountingClock {
        fn request_frame(&mut self) -> FrameToken {
            let token = FrameToken(self.requested.len() as u64);
            self.requested.push(token);
            token
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            self.cancelled.push(token);
        }
    }

    #[test]
    fn repeated_schedules_leave_one_pending() {
        let mut scheduler = RedrawScheduler::new(CountingClock::default());
        scheduler.schedule();
        scheduler.schedule();
        scheduler.schedule();
        assert_eq!(scheduler.pending(), Some(FrameToken(2)));
        assert_eq!(scheduler.clock().cancelled, [FrameToken(0), FrameToken(1)]);
        assert_eq!(scheduler.coalesced(), 2);
    }

    #[test]
    fn only_the_pending_token_fires() {
        let mut scheduler = RedrawScheduler::new(CountingClock::default());
        scheduler.schedule();
        scheduler.schedule();
        assert!(!scheduler.fire(FrameToken(0)));
        assert!(scheduler.fire(FrameToken(1)));
        assert!(!scheduler.fire(FrameToken(1)));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn polled_clock_keeps_latest_request_armed() {
        let mut scheduler = RedrawScheduler::new(PolledClock::new());
        scheduler.schedule();
        scheduler.schedule();
        let due = scheduler.clock().due();
        assert_eq!(due, scheduler.pending());
        assert_eq!(scheduler.clock_mut().take_due(), due);
        assert_eq!(scheduler.clock().due(), None);
    }
}
