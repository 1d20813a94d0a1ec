use crate::core::{constants::SUBSCRIBER_CAPACITY, geo::LatLng};
use crate::layers::marker::Marker;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

/// One-shot, dismissable message for the user. None of these is fatal
/// and none of them changes session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    PermissionDenied,
    LocationUnavailable,
    SearchNotFound,
    SearchFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Permission to access location was denied",
            Notice::LocationUnavailable => "Current location is unavailable",
            Notice::SearchNotFound => "Location not found",
            Notice::SearchFailed => "Error fetching location",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Events published to observers of a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Something observable changed; re-read the snapshot
    StateChanged,
    Notice(Notice),
    /// A search succeeded and on-screen text input should let go of focus
    InputFocusReleased,
}

/// Result of [`MapSession::submit_search`](super::MapSession::submit_search)
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Empty query, nothing was sent
    Skipped,
    Found(Marker),
    NotFound,
    Failed(String),
    /// A newer search was issued before this one resolved; its result was dropped
    Superseded,
}

/// Result of [`MapSession::initialize`](super::MapSession::initialize)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    Located(LatLng),
    PermissionDenied,
    Unavailable,
}

/// Fan-out of session events to any number of channel subscribers.
///
/// Each subscriber gets a bounded buffer. Publishing never blocks: a
/// subscriber whose buffer is full misses the event.
#[derive(Debug)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<SessionEvent>>,
    capacity: usize,
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::with_capacity(SUBSCRIBER_CAPACITY)
    }
}

impl Subscribers {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            senders: Vec::new(),
            capacity,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = bounded(self.capacity);
        self.senders.push(tx);
        rx
    }

    /// Delivers to every live subscriber; disconnected ones are dropped
    pub fn publish(&mut self, event: &SessionEvent) {
        self.senders.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("subscriber buffer full; dropping {:?}", event);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
