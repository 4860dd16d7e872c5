//! Open/closed state of the stream views the display can show.
//!
//! The registry is the only owner of that state. Views are opened and closed by
//! broadcasting a [`ViewCommand`] to whatever display is subscribed.

use dashmap::DashMap;
use std::net::IpAddr;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 16;

/// A full-screen view that can be toggled remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamView {
    /// This device's own camera stream.
    LocalStream,
    /// A camera stream served by the device that sent the trigger.
    RemoteCamera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Closed,
    Open {
        /// Address of the device that asked for the view.
        remote_addr: Option<IpAddr>,
    },
}

/// Instruction for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    Open {
        view: StreamView,
        remote_addr: Option<IpAddr>,
    },
    Close {
        view: StreamView,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opened,
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no display attached")]
    NoDisplay,
}

pub struct StreamRegistry {
    views: DashMap<StreamView, ViewState>,
    tx: broadcast::Sender<ViewCommand>,
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRegistry {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            views: DashMap::new(),
            tx,
        }
    }

    /// Attach a display.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewCommand> {
        self.tx.subscribe()
    }

    pub fn state(&self, view: StreamView) -> ViewState {
        self.views.get(&view).map(|s| *s).unwrap_or_default()
    }

    /// Open `view` if closed, close it if open.
    ///
    /// Opening needs a subscribed display; without one the view stays closed.
    pub fn toggle(&self, view: StreamView, remote_addr: Option<IpAddr>) -> Result<ToggleOutcome, RegistryError> {
        let mut entry = self.views.entry(view).or_default();
        match *entry {
            ViewState::Closed => {
                if self.tx.send(ViewCommand::Open { view, remote_addr }).is_err() {
                    warn!("Cannot open {:?}: no display attached", view);
                    return Err(RegistryError::NoDisplay);
                }
                *entry = ViewState::Open { remote_addr };
                info!("Opened {:?} for {:?}", view, remote_addr);
                Ok(ToggleOutcome::Opened)
            }
            ViewState::Open { .. } => {
                if self.tx.send(ViewCommand::Close { view }).is_err() {
                    debug!("Closing {:?} with no display attached", view);
                }
                *entry = ViewState::Closed;
                info!("Closed {:?}", view);
                Ok(ToggleOutcome::Closed)
            }
        }
    }

    /// Record that the display closed `view` on its own.
    pub fn mark_closed(&self, view: StreamView) {
        self.views.insert(view, ViewState::Closed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const PHONE: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42));

    #[test]
    fn test_toggle_opens_then_closes() {
        let registry = StreamRegistry::new();
        let mut display = registry.subscribe();

        assert_eq!(
            registry.toggle(StreamView::RemoteCamera, Some(PHONE)),
            Ok(ToggleOutcome::Opened)
        );
        assert_eq!(
            registry.state(StreamView::RemoteCamera),
            ViewState::Open { remote_addr: Some(PHONE) }
        );
        assert_eq!(
            display.try_recv().unwrap(),
            ViewCommand::Open {
                view: StreamView::RemoteCamera,
                remote_addr: Some(PHONE)
            }
        );

        assert_eq!(
            registry.toggle(StreamView::RemoteCamera, Some(PHONE)),
            Ok(ToggleOutcome::Closed)
        );
        assert_eq!(registry.state(StreamView::RemoteCamera), ViewState::Closed);
        assert_eq!(
            display.try_recv().unwrap(),
            ViewCommand::Close {
                view: StreamView::RemoteCamera
            }
        );
    }

    #[test]
    fn test_views_are_independent() {
        let registry = StreamRegistry::new();
        let _display = registry.subscribe();

        registry.toggle(StreamView::LocalStream, None).unwrap();
        assert_eq!(registry.state(StreamView::RemoteCamera), ViewState::Closed);
        assert_eq!(
            registry.state(StreamView::LocalStream),
            ViewState::Open { remote_addr: None }
        );
    }

    #[test]
    fn test_open_without_display_stays_closed() {
        let registry = StreamRegistry::new();

        assert_eq!(
            registry.toggle(StreamView::RemoteCamera, Some(PHONE)),
            Err(RegistryError::NoDisplay)
        );
        assert_eq!(registry.state(StreamView::RemoteCamera), ViewState::Closed);
    }

    #[test]
    fn test_mark_closed_allows_reopen() {
        let registry = StreamRegistry::new();
        let mut display = registry.subscribe();
        registry.toggle(StreamView::LocalStream, None).unwrap();

        registry.mark_closed(StreamView::LocalStream);
        assert_eq!(registry.toggle(StreamView::LocalStream, None), Ok(ToggleOutcome::Opened));

        assert!(matches!(display.try_recv(), Ok(ViewCommand::Open { .. })));
        assert!(matches!(display.try_recv(), Ok(ViewCommand::Open { .. })));
    }
}
