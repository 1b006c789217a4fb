//! hmikit visual controls: LED, pump, valve and signal box bindings.
//!
//! Each control is an independent instantiation of the same reducer shape:
//! change-gated attribute setters feed a deterministic processor that writes
//! visual state onto template sub-elements resolved once at construction.
//! Setters never fail; invalid values degrade to the attribute's declared
//! default. A missing template sub-element aborts construction.

pub mod direction;
pub mod led;
pub mod pump;
pub mod signalbox;
pub mod valve;

pub use direction::{Direction, QuadrantTable};
pub use led::Led;
pub use pump::Pump;
pub use signalbox::SignalBox;
pub use valve::Valve;

/// Namespace under which these controls register with the host registry.
pub const CONTROL_NAMESPACE: &str = "hmikit";
