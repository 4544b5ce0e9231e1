// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use arrayvec::ArrayVec;

/// Unsigned time, in scheduler ticks.
pub type Time = u64;
/// Signed time, used for relative offsets.
pub type TimeS = i64;

/// Maximum amount of events that can be pending at once.
/// Both CPUs' DMA channels together need at most 8 in regular operation;
/// the rest is headroom for channels re-triggered while still pending.
/// A full queue drops new events, so hosts must keep triggers within this.
const CAPACITY: usize = 32;

/// A time-ordered queue of deferred tasks.
/// It is generic over the possible events and keeps its events
/// sorted by execution time, latest first, so popping is cheap.
/// Events scheduled for the same tick run in the order they were scheduled.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Scheduler<E: Kind> {
    /// Current time of the scheduler.
    time: Time,
    /// Time of the next event.
    next: Time,
    /// Events currently awaiting execution.
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    events: ArrayVec<ScheduledEvent<E>, CAPACITY>,
}

impl<E: Kind> Scheduler<E> {
    /// Schedule an event of the given kind after the given amount
    /// of ticks have elapsed from now.
    /// Number can be negative, in which case the event is due immediately.
    pub fn schedule(&mut self, kind: E, after: TimeS) {
        let execute_at = self.time.saturating_add_signed(after);
        let event = ScheduledEvent { kind, execute_at };

        // Sorted latest-first; a new event goes behind all events due
        // at the same time so equal-time events stay FIFO.
        let idx = self.events.partition_point(|e| e.execute_at > execute_at);
        if self.events.try_insert(idx, event).is_err() {
            log::error!("Scheduler is full, dropping event due at {execute_at}");
            return;
        }
        self.update_next();
    }

    /// Advance the timer by the given amount of ticks.
    #[inline]
    pub fn advance(&mut self, by: Time) {
        self.time += by;
    }

    /// Take the next event that is due, if any.
    #[inline]
    pub fn get_next_pending(&mut self) -> Option<Event<E>> {
        if self.next > self.time {
            return None;
        }
        let event = self.events.pop()?;
        self.update_next();
        Some(Event {
            kind: event.kind,
            late_by: (self.time - event.execute_at) as TimeS,
        })
    }

    #[inline]
    pub fn has_events(&self) -> bool {
        self.next <= self.time
    }

    /// Return the next event immediately, and set the current time to
    /// the event's execution time. Used when nothing else is running
    /// until the next event.
    pub fn pop(&mut self) -> Option<Event<E>> {
        let event = self.events.pop()?;
        self.time = self.time.max(event.execute_at);
        self.update_next();
        Some(Event {
            kind: event.kind,
            late_by: 0,
        })
    }

    /// Amount of events still awaiting execution.
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn now(&self) -> Time {
        self.time
    }

    fn update_next(&mut self) {
        self.next = self.events.last().map_or(Time::MAX, |e| e.execute_at);
    }
}

impl<E: Kind> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            time: 0,
            next: Time::MAX,
            events: ArrayVec::new(),
        }
    }
}

/// An event awaiting execution
#[derive(Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
struct ScheduledEvent<E: Kind> {
    /// Kind of event to execute
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    kind: E,
    /// Time of the scheduler to execute it at
    execute_at: Time,
}

/// Trait for event kinds.
#[cfg(feature = "serde")]
pub trait Kind:
    for<'de> serde::Deserialize<'de> + serde::Serialize + PartialEq + Copy + Clone
{
}
#[cfg(not(feature = "serde"))]
pub trait Kind: PartialEq + Copy + Clone {}

/// Event that is ready to be handled.
#[derive(Copy, Clone, Debug)]
pub struct Event<E: Kind> {
    /// The kind of event to handle
    pub kind: E,
    /// By how many ticks the event was delayed by. For example:
    /// - Event was scheduled to be executed at tick 1000
    /// - Scheduler ran until 1010 before the event got handled
    /// - `late_by` will be 1010 - 1000 = 10.
    pub late_by: TimeS,
}
