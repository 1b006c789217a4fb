//! hmikit Core Library
//!
//! Host-service modelling and the reducer scaffolding shared by all hmikit
//! visual controls: raw attribute values and fail-soft conversion, structured
//! style types, the pre-rendered template tree, property-changed eventing,
//! and the change-gated attribute store.
//!
//! Controls built on this crate are thin adapters: a setter validates and
//! converts a host-supplied value, skips unchanged values, stores the result,
//! raises one notification and runs the control's processor, which writes
//! visual state onto sub-elements resolved once at construction.

pub mod control;
pub mod error;
pub mod event;
pub mod style;
pub mod template;
pub mod value;

pub use control::{AttributeDefaults, AttributeSlot, ControlBase};
pub use error::TemplateError;
pub use event::{EventBus, PropertyChanged, SubscriptionId};
pub use style::{Measurement, PixelUnit, RotateTransform, SolidColor};
pub use template::{Element, ElementHandle, ElementId};
pub use value::RawValue;
