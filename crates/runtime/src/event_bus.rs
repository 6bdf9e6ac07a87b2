use crate::frame::Frame;

/// Everything the engine reports to its host.
///
/// Orientation triples are degrees. Placement events mirror the result the
/// caller already received synchronously; they exist so an editor overlay can
/// observe placements without owning the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Continuous orientation update, throttled by the notifier gate.
    OrientationChanged {
        yaw_deg: f64,
        pitch_deg: f64,
        zoom_deg: f64,
    },
    /// One-shot notification after interaction ends and the settle delay passes.
    OrientationSettled {
        yaw_deg: f64,
        pitch_deg: f64,
        zoom_deg: f64,
    },
    /// A programmatic transition converged on its target.
    TransitionCompleted {
        yaw_deg: f64,
        pitch_deg: f64,
        zoom_deg: f64,
    },
    PlacementResolved {
        yaw_deg: f64,
        pitch_deg: f64,
    },
    PlacementRejected {
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub data: EngineEvent,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, data: EngineEvent) {
        self.events.push(Event {
            frame_index: frame.index,
            data,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Hands the accumulated events to the host and clears the queue.
    ///
    /// Typically called once per frame after the update step.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
