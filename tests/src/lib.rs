//! # Blocked Number Store Test Suite
//!
//! Cross-crate tests that drive the store the way collaborators do.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── provider_contract.rs  # Resource surface rules
//!     ├── membership.rs         # Tiered matching across countries
//!     ├── notifications.rs      # Change notifier behaviour
//!     └── concurrency.rs        # Parallel writers and readers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p blocklist-tests
//! cargo test -p blocklist-tests integration::membership::
//! ```

#![allow(dead_code)]

pub mod integration;
