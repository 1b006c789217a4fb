//! Pump control with a rotatable direction indicator.

use crate::direction::{Direction, QuadrantTable};
use hmikit_core::control::{AttributeDefaults, AttributeSlot, ControlBase};
use hmikit_core::error::TemplateError;
use hmikit_core::event::EventBus;
use hmikit_core::style::{RotateTransform, SolidColor};
use hmikit_core::template::{self, ElementHandle};
use hmikit_core::value::{self, RawValue};

/// Structural class of the template root.
pub const CLASS_TEMPLATE: &str = "hmikit-pump-template";
/// Structural class of the running-state circle.
pub const CLASS_CIRCLE_ON: &str = "hmikit-pump-circle-on";
/// Structural class of the stopped-state circle.
pub const CLASS_CIRCLE_OFF: &str = "hmikit-pump-circle-off";
/// Structural class of the direction indicator.
pub const CLASS_DIRECTION: &str = "hmikit-pump-direction";
/// Style class that drives the blink animation.
pub const BLINK_CLASS: &str = "hmikit-pump-blink";

/// Direction-to-quadrant mapping for the pump indicator artwork.
const DIRECTIONS: QuadrantTable = QuadrantTable::new(3, 0, 2, 1);

/// A pump symbol: on/off circles plus a flow-direction indicator rotated in
/// quarter turns about the element center.
pub struct Pump {
    base: ControlBase,
    circle_on: ElementHandle,
    circle_off: ElementHandle,
    indicator: ElementHandle,
    enabled: AttributeSlot<bool>,
    blink: AttributeSlot<bool>,
    direction: AttributeSlot<String>,
    enabled_background_color: AttributeSlot<SolidColor>,
    disabled_background_color: AttributeSlot<SolidColor>,
}

impl Pump {
    /// Registration type name for the host control registry.
    pub const TYPE_NAME: &'static str = "pump";

    /// Resolve the template sub-elements and create the control.
    pub fn new(
        id: impl Into<String>,
        host: &ElementHandle,
        defaults: AttributeDefaults,
        events: EventBus,
    ) -> Result<Self, TemplateError> {
        let root = template::require_root(host, CLASS_TEMPLATE)?;
        let circle_on = template::require(&root, CLASS_CIRCLE_ON, "running circle")?;
        let circle_off = template::require(&root, CLASS_CIRCLE_OFF, "stopped circle")?;
        let indicator = template::require(&root, CLASS_DIRECTION, "direction indicator")?;

        Ok(Self {
            base: ControlBase::new(id, defaults, events),
            circle_on,
            circle_off,
            indicator,
            enabled: AttributeSlot::unset(),
            blink: AttributeSlot::unset(),
            direction: AttributeSlot::unset(),
            enabled_background_color: AttributeSlot::unset(),
            disabled_background_color: AttributeSlot::unset(),
        })
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    /// Set the `Enabled` attribute from a raw host value.
    pub fn set_enabled(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_boolean(raw).unwrap_or_else(|| self.base.default_for("Enabled"));
        if !self.enabled.replace(converted) {
            return;
        }
        self.base.notify("Enabled");
        self.process();
    }

    pub fn enabled(&self) -> Option<bool> {
        self.enabled.copied()
    }

    /// Set the `Blink` attribute from a raw host value.
    pub fn set_blink(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_boolean(raw).unwrap_or_else(|| self.base.default_for("Blink"));
        if !self.blink.replace(converted) {
            return;
        }
        self.base.notify("Blink");
        self.process();
    }

    pub fn blink(&self) -> Option<bool> {
        self.blink.copied()
    }

    /// Set the `Direction` attribute from a raw host value.
    ///
    /// The raw string is stored as-is; recognition happens in the processor
    /// so an unrecognized direction still participates in change gating.
    pub fn set_direction(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_string(raw).unwrap_or_else(|| self.base.default_for("Direction"));
        if !self.direction.replace(converted) {
            return;
        }
        self.base.notify("Direction");
        self.process();
    }

    pub fn direction(&self) -> Option<String> {
        self.direction.cloned()
    }

    /// Set the `EnabledBackgroundColor` attribute from a raw host value.
    pub fn set_enabled_background_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("EnabledBackgroundColor"));
        if !self.enabled_background_color.replace(converted) {
            return;
        }
        self.base.notify("EnabledBackgroundColor");
        self.process();
    }

    pub fn enabled_background_color(&self) -> Option<SolidColor> {
        self.enabled_background_color.copied()
    }

    /// Set the `DisabledBackgroundColor` attribute from a raw host value.
    pub fn set_disabled_background_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("DisabledBackgroundColor"));
        if !self.disabled_background_color.replace(converted) {
            return;
        }
        self.base.notify("DisabledBackgroundColor");
        self.process();
    }

    pub fn disabled_background_color(&self) -> Option<SolidColor> {
        self.disabled_background_color.copied()
    }

    pub fn attach(&mut self) {
        self.base.attach();
    }

    pub fn detach(&mut self) {
        self.base.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.base.is_attached()
    }

    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.base.set_keep_alive(keep_alive);
    }

    /// Consume the control. A control under the keep-alive marker refuses
    /// and is handed back unchanged.
    pub fn destroy(self) -> Result<(), Self> {
        if self.base.refuses_destroy() {
            return Err(self);
        }
        Ok(())
    }

    fn process(&self) {
        let direction = self
            .direction
            .get()
            .map(String::as_str)
            .and_then(Direction::parse);
        let angle = DIRECTIONS.angle_deg(direction);
        self.indicator
            .set_transform(RotateTransform::about_center(angle));

        self.circle_on.set_fill(self.enabled_background_color.copied());
        self.circle_off
            .set_fill(self.disabled_background_color.copied());

        if self.enabled.copied().unwrap_or(false) {
            if self.blink.copied().unwrap_or(false) {
                self.circle_on.add_style_class(BLINK_CLASS);
            } else {
                self.circle_on.remove_style_class(BLINK_CLASS);
            }
            self.circle_on.set_opacity(1.0);
        } else {
            self.circle_on.set_opacity(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmikit_core::event::PropertyChanged;
    use hmikit_core::template::Element;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pump_host() -> ElementHandle {
        let host = ElementHandle::new(Element::new("host"));
        let root = host.append(Element::new(CLASS_TEMPLATE));
        root.append(Element::new(CLASS_CIRCLE_ON));
        root.append(Element::new(CLASS_CIRCLE_OFF));
        root.append(Element::new(CLASS_DIRECTION));
        host
    }

    fn pump_defaults() -> AttributeDefaults {
        AttributeDefaults::new()
            .with("Enabled", json!(false))
            .with("Blink", json!(false))
            .with("Direction", json!("Right"))
            .with("EnabledBackgroundColor", json!({"r": 0, "g": 200, "b": 0}))
            .with("DisabledBackgroundColor", json!({"r": 100, "g": 100, "b": 100}))
    }

    fn recording_bus() -> (EventBus, Rc<RefCell<Vec<PropertyChanged>>>) {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (bus, seen)
    }

    fn indicator_angle(host: &ElementHandle) -> f64 {
        host.find(CLASS_DIRECTION)
            .unwrap()
            .transform()
            .expect("indicator transform applied")
            .angle_deg
    }

    #[test]
    fn construction_fails_on_missing_indicator() {
        let host = ElementHandle::new(Element::new("host"));
        let root = host.append(Element::new(CLASS_TEMPLATE));
        root.append(Element::new(CLASS_CIRCLE_ON));
        root.append(Element::new(CLASS_CIRCLE_OFF));

        let result = Pump::new("p1", &host, pump_defaults(), EventBus::new());
        assert!(matches!(
            result,
            Err(TemplateError::MissingElement { role: "direction indicator", .. })
        ));
    }

    #[test]
    fn direction_table_maps_to_quarter_turns() {
        let host = pump_host();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();

        pump.set_direction(Some(&json!("Up")));
        assert!((indicator_angle(&host) - 270.0).abs() < f64::EPSILON);

        pump.set_direction(Some(&json!("Right")));
        assert!((indicator_angle(&host) - 0.0).abs() < f64::EPSILON);

        pump.set_direction(Some(&json!("Left")));
        assert!((indicator_angle(&host) - 180.0).abs() < f64::EPSILON);

        pump.set_direction(Some(&json!("Down")));
        assert!((indicator_angle(&host) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrecognized_direction_rotates_to_zero() {
        let host = pump_host();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();

        pump.set_direction(Some(&json!("Sideways")));
        assert_eq!(pump.direction(), Some("Sideways".to_string()));
        assert!((indicator_angle(&host) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rotation_origin_is_the_element_center() {
        let host = pump_host();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();
        pump.set_direction(Some(&json!("Down")));

        let transform = host.find(CLASS_DIRECTION).unwrap().transform().unwrap();
        assert_eq!(transform, RotateTransform::about_center(90.0));
    }

    #[test]
    fn disabled_forces_running_circle_transparent() {
        let host = pump_host();
        let circle_on = host.find(CLASS_CIRCLE_ON).unwrap();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();

        pump.set_blink(Some(&json!(true)));
        pump.set_enabled(Some(&json!(false)));
        assert_eq!(circle_on.opacity(), Some(0.0));

        pump.set_enabled(Some(&json!(true)));
        assert_eq!(circle_on.opacity(), Some(1.0));
        assert!(circle_on.has_style_class(BLINK_CLASS));
    }

    #[test]
    fn repeated_direction_is_a_no_op() {
        let host = pump_host();
        let (bus, seen) = recording_bus();
        let mut pump = Pump::new("p1", &host, pump_defaults(), bus).unwrap();

        pump.set_direction(Some(&json!("Left")));
        pump.set_direction(Some(&json!("Left")));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn invalid_direction_value_falls_back_to_default() {
        let host = pump_host();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();

        pump.set_direction(Some(&json!({"bad": "shape"})));
        assert_eq!(pump.direction(), Some("Right".to_string()));
    }

    #[test]
    fn background_colors_reach_their_layers() {
        let host = pump_host();
        let circle_on = host.find(CLASS_CIRCLE_ON).unwrap();
        let circle_off = host.find(CLASS_CIRCLE_OFF).unwrap();
        let mut pump = Pump::new("p1", &host, pump_defaults(), EventBus::new()).unwrap();

        pump.set_enabled_background_color(Some(&json!({"r": 0, "g": 255, "b": 0})));
        pump.set_disabled_background_color(Some(&json!({"r": 80, "g": 80, "b": 80})));

        assert_eq!(circle_on.fill(), Some(SolidColor::new(0, 255, 0)));
        assert_eq!(circle_off.fill(), Some(SolidColor::new(80, 80, 80)));
    }
}
