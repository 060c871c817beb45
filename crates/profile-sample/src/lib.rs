//! # Profile Sample
//!
//! A worked example of building on `profile-framework`: the [`media`]
//! module implements a stream-relay profile, and the accompanying binary
//! drives a full activate → start → stop → teardown pass against it.
//!
//! ## Module Tour
//!
//! - **[`media`]**: the concrete profile. Its lifecycle hooks show the
//!   three interesting outcomes a profile can produce: a clean start, a
//!   start that fails permanently (no capacity configured), and a stop
//!   that is refused and retried later (streams still live).
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run -p profile-sample
//! ```

pub mod media;
