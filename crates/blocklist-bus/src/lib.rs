//! # Blocklist Bus - Change Notification for the Blocked Number Store
//!
//! Process-wide broadcast telling registered observers that the set of
//! blocked numbers changed. Notifications carry no payload: an observer that
//! wakes up re-reads whatever it needs from the store.
//!
//! ## Delivery Model
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Record Store │                    │   Observer   │
//! │              │  notify_changed()  │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ChangeNotifier│          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! - Each observer owns a bounded channel; publishing uses `try_send` and
//!   never blocks the mutating caller.
//! - A full channel already holds a pending notification, so the new one is
//!   coalesced into it.
//! - A closed channel (observer gone) is pruned from the registry.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{ChangeEvent, ObserverId};
pub use publisher::{ChangeNotifier, ChangePublisher};
pub use subscriber::{ChangeStream, Subscription, SubscriptionError};

/// Notifications buffered per observer before further ones are coalesced.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
