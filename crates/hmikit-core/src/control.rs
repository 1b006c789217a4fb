//! Attribute store scaffolding and the lifecycle shared by every control.
//!
//! Every widget setter follows the same contract: convert the raw value,
//! fall back to the declared default when conversion fails, skip unchanged
//! values, store, raise one notification and run the widget's processor.
//! The pieces of that contract that are not widget-specific live here.

use crate::event::{EventBus, PropertyChanged};
use crate::value::RawValue;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Declared attribute defaults from the host's description metadata.
#[derive(Debug, Clone, Default)]
pub struct AttributeDefaults {
    values: HashMap<String, RawValue>,
}

impl AttributeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.values.insert(name.into(), value);
    }

    /// Fetch a typed default. A missing or schema-violating default degrades
    /// to the type's own default; defaults are fail-soft like the attribute
    /// values they back.
    pub fn get<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.values.get(name) {
            Some(raw) => match serde_json::from_value(raw.clone()) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("declared default for '{name}' does not match its schema: {err}");
                    T::default()
                }
            },
            None => {
                log::warn!("no declared default for '{name}'");
                T::default()
            }
        }
    }
}

/// A change-gated cell of a control's attribute store.
///
/// Starts unset; getters return the unset sentinel until the first setter
/// call stores a validated value.
#[derive(Debug, Clone)]
pub struct AttributeSlot<T> {
    value: Option<T>,
}

impl<T> Default for AttributeSlot<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> AttributeSlot<T> {
    pub const fn unset() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T: PartialEq> AttributeSlot<T> {
    /// Store a validated value. Returns whether the stored value changed
    /// under value-equality; the first store is always a change.
    pub fn replace(&mut self, value: T) -> bool {
        if self.value.as_ref() == Some(&value) {
            return false;
        }
        self.value = Some(value);
        true
    }
}

impl<T: Copy> AttributeSlot<T> {
    pub fn copied(&self) -> Option<T> {
        self.value
    }
}

impl<T: Clone> AttributeSlot<T> {
    pub fn cloned(&self) -> Option<T> {
        self.value.clone()
    }
}

/// Identity, defaults, eventing and lifecycle flags shared by all controls.
pub struct ControlBase {
    id: String,
    defaults: AttributeDefaults,
    events: EventBus,
    keep_alive: bool,
    attached: bool,
}

impl ControlBase {
    pub fn new(id: impl Into<String>, defaults: AttributeDefaults, events: EventBus) -> Self {
        Self {
            id: id.into(),
            defaults,
            events,
            keep_alive: false,
            attached: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raise the property-changed notification for one attribute.
    pub fn notify(&self, property: &'static str) {
        self.events.raise(PropertyChanged {
            control_id: self.id.clone(),
            property,
        });
    }

    pub fn default_for<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.defaults.get(name)
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Externally-held keep-alive marker; a marked control refuses destroy.
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }

    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn refuses_destroy(&self) -> bool {
        if self.keep_alive {
            log::debug!("control '{}' is kept alive, refusing destroy", self.id);
        }
        self.keep_alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::SolidColor;
    use serde_json::json;

    #[test]
    fn slot_gates_on_value_equality() {
        let mut slot = AttributeSlot::unset();
        assert_eq!(slot.get(), None);

        assert!(slot.replace(true));
        assert!(!slot.replace(true));
        assert!(slot.replace(false));
        assert_eq!(slot.copied(), Some(false));
    }

    #[test]
    fn defaults_deserialize_to_declared_type() {
        let defaults = AttributeDefaults::new()
            .with("Enabled", json!(true))
            .with("OnColor", json!({"r": 0, "g": 255, "b": 0}));

        assert!(defaults.get::<bool>("Enabled"));
        assert_eq!(
            defaults.get::<SolidColor>("OnColor"),
            SolidColor::new(0, 255, 0)
        );
    }

    #[test]
    fn missing_or_invalid_defaults_degrade() {
        let defaults = AttributeDefaults::new().with("Enabled", json!("not a bool"));
        assert!(!defaults.get::<bool>("Enabled"));
        assert!(!defaults.get::<bool>("Blink"));
        assert_eq!(
            defaults.get::<SolidColor>("AlarmColor"),
            SolidColor::transparent()
        );
    }

    #[test]
    fn base_lifecycle_flags() {
        let mut base = ControlBase::new("p1", AttributeDefaults::new(), EventBus::new());
        assert!(!base.is_attached());
        base.attach();
        assert!(base.is_attached());
        base.detach();
        assert!(!base.is_attached());

        assert!(!base.refuses_destroy());
        base.set_keep_alive(true);
        assert!(base.refuses_destroy());
    }
}
