//! LED indicator control.

use hmikit_core::control::{AttributeDefaults, AttributeSlot, ControlBase};
use hmikit_core::error::TemplateError;
use hmikit_core::event::EventBus;
use hmikit_core::style::SolidColor;
use hmikit_core::template::{self, ElementHandle};
use hmikit_core::value::{self, RawValue};

/// Structural class of the template root.
pub const CLASS_TEMPLATE: &str = "hmikit-led-template";
/// Structural class of the lit layer.
pub const CLASS_ON_FILL: &str = "hmikit-led-on-fill";
/// Structural class of the unlit layer.
pub const CLASS_OFF_FILL: &str = "hmikit-led-off-fill";
/// Style class that drives the blink animation.
pub const BLINK_CLASS: &str = "hmikit-led-blink";

/// A two-layer LED indicator.
///
/// The unlit layer is always painted underneath; the lit layer sits on top
/// at full opacity while enabled, optionally carrying the blink class, and
/// is fully transparent while disabled.
pub struct Led {
    base: ControlBase,
    on_fill: ElementHandle,
    off_fill: ElementHandle,
    enabled: AttributeSlot<bool>,
    blink: AttributeSlot<bool>,
    on_color: AttributeSlot<SolidColor>,
    off_color: AttributeSlot<SolidColor>,
}

impl Led {
    /// Registration type name for the host control registry.
    pub const TYPE_NAME: &'static str = "led";

    /// Resolve the template sub-elements and create the control.
    ///
    /// Fails when any required sub-element is missing from the pre-rendered
    /// template.
    pub fn new(
        id: impl Into<String>,
        host: &ElementHandle,
        defaults: AttributeDefaults,
        events: EventBus,
    ) -> Result<Self, TemplateError> {
        let root = template::require_root(host, CLASS_TEMPLATE)?;
        let off_fill = template::require(&root, CLASS_OFF_FILL, "unlit layer")?;
        let on_fill = template::require(&root, CLASS_ON_FILL, "lit layer")?;

        Ok(Self {
            base: ControlBase::new(id, defaults, events),
            on_fill,
            off_fill,
            enabled: AttributeSlot::unset(),
            blink: AttributeSlot::unset(),
            on_color: AttributeSlot::unset(),
            off_color: AttributeSlot::unset(),
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

    /// Set the `OnColor` attribute from a raw host value.
    pub fn set_on_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("OnColor"));
        if !self.on_color.replace(converted) {
            return;
        }
        self.base.notify("OnColor");
        self.process();
    }

    pub fn on_color(&self) -> Option<SolidColor> {
        self.on_color.copied()
    }

    /// Set the `OffColor` attribute from a raw host value.
    pub fn set_off_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("OffColor"));
        if !self.off_color.replace(converted) {
            return;
        }
        self.base.notify("OffColor");
        self.process();
    }

    pub fn off_color(&self) -> Option<SolidColor> {
        self.off_color.copied()
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
        self.on_fill.set_fill(self.on_color.copied());
        self.off_fill.set_fill(self.off_color.copied());

        if self.enabled.copied().unwrap_or(false) {
            if self.blink.copied().unwrap_or(false) {
                self.on_fill.add_style_class(BLINK_CLASS);
            } else {
                self.on_fill.remove_style_class(BLINK_CLASS);
            }
            self.on_fill.set_opacity(1.0);
        } else {
            // Blink class is deliberately left as-is while disabled.
            self.on_fill.set_opacity(0.0);
        }
    }
}
