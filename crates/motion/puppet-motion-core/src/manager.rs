//! Priority overlay on the motion queue, plus the accumulated time base.

use crate::ids::EntryHandle;
use crate::model::Model;
use crate::motion::SharedMotion;
use crate::outputs::Outputs;
use crate::queue::MotionQueueManager;

/// Priority value meaning "free" (nothing playing or reserved).
pub const PRIORITY_NONE: i32 = 0;

/// A [`MotionQueueManager`] with priority gating and its own clock.
///
/// `reserve` lets a caller announce an upcoming motion (for example while
/// the asset loads on another thread) so lower-priority reservations lose
/// out; `start_motion_priority` trusts the caller to have gated through
/// `reserve` and never rejects a start.
#[derive(Default)]
pub struct MotionManager {
    queue: MotionQueueManager,
    user_time: f32,
    current_priority: i32,
    reserve_priority: i32,
}

impl MotionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_priority(&self) -> i32 {
        self.current_priority
    }

    pub fn reserve_priority(&self) -> i32 {
        self.reserve_priority
    }

    pub fn set_reserve_priority(&mut self, priority: i32) {
        self.reserve_priority = priority;
    }

    /// Claim the intent to play at `priority`. Succeeds only when it beats
    /// both the standing reservation and the currently playing priority.
    pub fn reserve(&mut self, priority: i32) -> bool {
        if priority <= self.reserve_priority || priority <= self.current_priority {
            return false;
        }
        self.reserve_priority = priority;
        true
    }

    /// Start `motion` at `priority`, consuming a matching reservation.
    pub fn start_motion_priority(&mut self, motion: SharedMotion, priority: i32) -> EntryHandle {
        if priority == self.reserve_priority {
            self.reserve_priority = PRIORITY_NONE;
        }
        self.current_priority = priority;
        self.queue.start_motion(motion)
    }

    /// Start `motion` without touching priorities.
    pub fn start_motion(&mut self, motion: SharedMotion) -> EntryHandle {
        self.queue.start_motion(motion)
    }

    /// Advance the clock by `delta_seconds` (negative deltas clamp to zero)
    /// and run the queue. Frees the current priority once nothing plays.
    pub fn update(&mut self, model: &mut dyn Model, delta_seconds: f32) -> bool {
        self.user_time += delta_seconds.max(0.0);
        let updated = self.queue.update(model, self.user_time);
        if self.queue.is_finished() {
            self.current_priority = PRIORITY_NONE;
        }
        updated
    }

    pub fn user_time(&self) -> f32 {
        self.user_time
    }

    pub fn stop_all_motions(&mut self) {
        self.queue.stop_all_motions();
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_finished()
    }

    pub fn is_finished_handle(&self, handle: EntryHandle) -> bool {
        self.queue.is_finished_handle(handle)
    }

    pub fn outputs(&self) -> &Outputs {
        self.queue.outputs()
    }

    pub fn queue(&self) -> &MotionQueueManager {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut MotionQueueManager {
        &mut self.queue
    }
}
