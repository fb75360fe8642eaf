//! The motion queue: per-playback entries and the manager that runs them.
//!
//! Entries hold every piece of playback state so the motions they reference
//! stay immutable and shareable. The manager advances entries in insertion
//! order, drains fired events into [`Outputs`], and reaps finished entries.

use std::sync::Arc;

use crate::ids::{EntryHandle, HandleAllocator};
use crate::model::Model;
use crate::motion::SharedMotion;
use crate::outputs::{EventSink, FiredEvent, Outputs};

/// One playback instance of a motion.
pub struct MotionQueueEntry {
    motion: SharedMotion,
    handle: EntryHandle,
    available: bool,
    finished: bool,
    started: bool,
    start_time: f32,
    fade_in_start_time: f32,
    end_time: Option<f32>,
    state_time: f32,
    state_weight: f32,
    last_event_check_time: f32,
    fade_out_seconds: f32,
    fade_out_triggered: bool,
}

impl MotionQueueEntry {
    fn new(motion: SharedMotion, handle: EntryHandle) -> Self {
        MotionQueueEntry {
            motion,
            handle,
            available: true,
            finished: false,
            started: false,
            start_time: 0.0,
            fade_in_start_time: 0.0,
            end_time: None,
            state_time: 0.0,
            state_weight: 0.0,
            last_event_check_time: 0.0,
            fade_out_seconds: 0.0,
            fade_out_triggered: false,
        }
    }

    pub fn motion(&self) -> &SharedMotion {
        &self.motion
    }

    pub fn handle(&self) -> EntryHandle {
        self.handle
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn set_started(&mut self, started: bool) {
        self.started = started;
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn set_start_time(&mut self, time: f32) {
        self.start_time = time;
    }

    pub fn fade_in_start_time(&self) -> f32 {
        self.fade_in_start_time
    }

    pub fn set_fade_in_start_time(&mut self, time: f32) {
        self.fade_in_start_time = time;
    }

    pub fn end_time(&self) -> Option<f32> {
        self.end_time
    }

    pub fn set_end_time(&mut self, time: Option<f32>) {
        self.end_time = time;
    }

    /// Last computed playback state (time and composite fade weight).
    pub fn set_state(&mut self, time: f32, weight: f32) {
        self.state_time = time;
        self.state_weight = weight;
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn state_weight(&self) -> f32 {
        self.state_weight
    }

    pub fn last_event_check_time(&self) -> f32 {
        self.last_event_check_time
    }

    pub fn set_last_event_check_time(&mut self, time: f32) {
        self.last_event_check_time = time;
    }

    /// Request a fade-out of `seconds`; applied on the next update.
    pub fn trigger_fade_out(&mut self, seconds: f32) {
        self.fade_out_seconds = seconds;
        self.fade_out_triggered = true;
    }

    pub fn is_fade_out_triggered(&self) -> bool {
        self.fade_out_triggered
    }

    /// Resolve a pending fade-out against the current time. The end time
    /// only ever moves earlier; a later trigger never extends playback.
    pub fn start_fade_out(&mut self, user_time: f32) {
        let new_end = user_time + self.fade_out_seconds;
        self.end_time = Some(match self.end_time {
            Some(end) => end.min(new_end),
            None => new_end,
        });
        self.fade_out_triggered = false;
    }
}

/// Runs any number of concurrently playing entries against a model.
#[derive(Default)]
pub struct MotionQueueManager {
    entries: Vec<MotionQueueEntry>,
    handles: HandleAllocator,
    outputs: Outputs,
    event_sink: Option<EventSink>,
}

impl MotionQueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `motion`, crossfading every live entry out with its own
    /// motion's configured fade-out window. Returns the new entry's handle.
    pub fn start_motion(&mut self, motion: SharedMotion) -> EntryHandle {
        for entry in &mut self.entries {
            let fade_out = entry.motion().fade_out_seconds();
            entry.trigger_fade_out(fade_out);
        }

        let handle = self.handles.alloc();
        self.entries.push(MotionQueueEntry::new(motion, handle));
        handle
    }

    /// Advance every entry to `user_time`, collect fired events, and reap
    /// finished entries. Returns false only when no entry was processed.
    pub fn update(&mut self, model: &mut dyn Model, user_time: f32) -> bool {
        self.outputs.clear();

        let mut updated = false;
        let mut index = 0;
        while index < self.entries.len() {
            let entry = &mut self.entries[index];

            if entry.is_fade_out_triggered() {
                entry.start_fade_out(user_time);
            }

            let motion = Arc::clone(entry.motion());
            motion.update_parameters(model, entry, user_time);
            updated = true;

            let before = entry.last_event_check_time() - entry.start_time();
            let local_now = user_time - entry.start_time();
            let handle = entry.handle();
            let fired: Vec<FiredEvent> = motion
                .events_in(before, local_now)
                .map(|event| FiredEvent {
                    handle,
                    value: event.value.clone(),
                })
                .collect();
            entry.set_last_event_check_time(user_time);
            let finished = entry.is_finished();

            for event in fired {
                if let Some(sink) = self.event_sink.as_mut() {
                    sink(&event);
                }
                self.outputs.fired.push(event);
            }

            if finished {
                self.outputs.finished.push(handle);
                self.entries.remove(index);
            } else {
                index += 1;
            }
        }
        updated
    }

    /// Hard stop: discard every entry with no fade.
    pub fn stop_all_motions(&mut self) {
        self.entries.clear();
    }

    /// True when no entry is still playing.
    pub fn is_finished(&self) -> bool {
        self.entries.iter().all(|e| e.is_finished())
    }

    /// True when `handle`'s entry no longer exists or reports finished.
    pub fn is_finished_handle(&self, handle: EntryHandle) -> bool {
        self.entry(handle).map_or(true, |e| e.is_finished())
    }

    pub fn entry(&self, handle: EntryHandle) -> Option<&MotionQueueEntry> {
        self.entries.iter().find(|e| e.handle() == handle)
    }

    pub fn entry_mut(&mut self, handle: EntryHandle) -> Option<&mut MotionQueueEntry> {
        self.entries.iter_mut().find(|e| e.handle() == handle)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Events and finished handles from the most recent update.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Install a push-style event consumer, called once per fired event in
    /// addition to the polled [`Outputs`] buffer.
    pub fn set_event_sink(&mut self, sink: EventSink) {
        self.event_sink = Some(sink);
    }
}
