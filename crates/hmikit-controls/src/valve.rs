//! Valve control with direction indicator and manual/auto actuation marks.

use crate::direction::{Direction, QuadrantTable};
use hmikit_core::control::{AttributeDefaults, AttributeSlot, ControlBase};
use hmikit_core::error::TemplateError;
use hmikit_core::event::EventBus;
use hmikit_core::style::{RotateTransform, SolidColor};
use hmikit_core::template::{self, ElementHandle};
use hmikit_core::value::{self, RawValue};

/// Structural class of the template root.
pub const CLASS_TEMPLATE: &str = "hmikit-valve-template";
/// Structural class of the open-state fill.
pub const CLASS_ON_FILL: &str = "hmikit-valve-on-fill";
/// Structural class of the closed-state fill.
pub const CLASS_OFF_FILL: &str = "hmikit-valve-off-fill";
/// Structural class of the direction indicator.
pub const CLASS_DIRECTION: &str = "hmikit-valve-direction";
/// Structural class of the auto-actuator box.
pub const CLASS_AUTO_BOX: &str = "hmikit-valve-auto-box";
/// Structural class of the auto-actuator box stem.
pub const CLASS_AUTO_BOX_LINE: &str = "hmikit-valve-auto-box-line";
/// Structural class of the manual-actuator line.
pub const CLASS_MANUAL_LINE: &str = "hmikit-valve-manual-line";
/// Style class that drives the blink animation.
pub const BLINK_CLASS: &str = "hmikit-valve-blink";

/// Valve type attribute value for a hand-operated valve.
pub const VALVE_TYPE_MANUAL: &str = "Manual";
/// Valve type attribute value for an actuator-operated valve.
pub const VALVE_TYPE_AUTO: &str = "Auto";

/// Direction-to-quadrant mapping for the valve indicator artwork. The valve
/// symbol is drawn pointing up, so the table differs from the pump's.
const DIRECTIONS: QuadrantTable = QuadrantTable::new(0, 1, 3, 2);

/// A valve symbol: open/closed fills, a quarter-turn direction indicator and
/// mutually exclusive manual/auto actuation marks.
pub struct Valve {
    base: ControlBase,
    on_fill: ElementHandle,
    off_fill: ElementHandle,
    indicator: ElementHandle,
    auto_box: ElementHandle,
    auto_box_line: ElementHandle,
    manual_line: ElementHandle,
    enabled: AttributeSlot<bool>,
    blink: AttributeSlot<bool>,
    direction: AttributeSlot<String>,
    valve_type: AttributeSlot<String>,
    enabled_background_color: AttributeSlot<SolidColor>,
    disabled_background_color: AttributeSlot<SolidColor>,
}

impl Valve {
    /// Registration type name for the host control registry.
    pub const TYPE_NAME: &'static str = "valve";

    /// Resolve the template sub-elements and create the control.
    pub fn new(
        id: impl Into<String>,
        host: &ElementHandle,
        defaults: AttributeDefaults,
        events: EventBus,
    ) -> Result<Self, TemplateError> {
        let root = template::require_root(host, CLASS_TEMPLATE)?;
        let off_fill = template::require(&root, CLASS_OFF_FILL, "closed fill")?;
        let on_fill = template::require(&root, CLASS_ON_FILL, "open fill")?;
        let indicator = template::require(&root, CLASS_DIRECTION, "direction indicator")?;
        let auto_box = template::require(&root, CLASS_AUTO_BOX, "auto box")?;
        let auto_box_line = template::require(&root, CLASS_AUTO_BOX_LINE, "auto box stem")?;
        let manual_line = template::require(&root, CLASS_MANUAL_LINE, "manual line")?;

        Ok(Self {
            base: ControlBase::new(id, defaults, events),
            on_fill,
            off_fill,
            indicator,
            auto_box,
            auto_box_line,
            manual_line,
            enabled: AttributeSlot::unset(),
            blink: AttributeSlot::unset(),
            direction: AttributeSlot::unset(),
            valve_type: AttributeSlot::unset(),
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

    /// Set the `ValveType` attribute from a raw host value.
    ///
    /// Recognized values are [`VALVE_TYPE_MANUAL`] and [`VALVE_TYPE_AUTO`];
    /// any other string is stored but leaves the actuation marks untouched.
    pub fn set_valve_type(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_string(raw).unwrap_or_else(|| self.base.default_for("ValveType"));
        if !self.valve_type.replace(converted) {
            return;
        }
        self.base.notify("ValveType");
        log::debug!("valve '{}' type set to {:?}", self.base.id(), self.valve_type.get());
        self.process();
    }

    pub fn valve_type(&self) -> Option<String> {
        self.valve_type.cloned()
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

        self.on_fill.set_fill(self.enabled_background_color.copied());
        self.off_fill
            .set_fill(self.disabled_background_color.copied());

        if self.enabled.copied().unwrap_or(false) {
            if self.blink.copied().unwrap_or(false) {
                self.on_fill.add_style_class(BLINK_CLASS);
            } else {
                self.on_fill.remove_style_class(BLINK_CLASS);
            }
            self.on_fill.set_opacity(1.0);
        } else {
            self.on_fill.set_opacity(0.0);
        }

        // An unrecognized type leaves both actuation marks in their previous
        // state; only the two known values switch visibility.
        match self.valve_type.get().map(String::as_str) {
            Some(VALVE_TYPE_MANUAL) => {
                self.auto_box.set_opacity(0.0);
                self.auto_box_line.set_opacity(0.0);
                self.manual_line.set_opacity(1.0);
            }
            Some(VALVE_TYPE_AUTO) => {
                self.auto_box.set_opacity(1.0);
                self.auto_box_line.set_opacity(1.0);
                self.manual_line.set_opacity(0.0);
            }
            _ => {}
        }
    }
}
