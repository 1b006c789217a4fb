//! Signal box control: a bordered box flagging alarm or warning state.

use hmikit_core::control::{AttributeDefaults, AttributeSlot, ControlBase};
use hmikit_core::error::TemplateError;
use hmikit_core::event::EventBus;
use hmikit_core::style::{Measurement, PixelUnit, SolidColor};
use hmikit_core::template::{self, ElementHandle};
use hmikit_core::value::{self, RawValue};

/// Structural class of the template root.
pub const CLASS_TEMPLATE: &str = "hmikit-signalbox-template";
/// Structural class of the outer bordered rectangle.
pub const CLASS_MAIN_RECT: &str = "hmikit-signalbox-main-rect";
/// Structural class of the filled corner square.
pub const CLASS_CORNER_RECT: &str = "hmikit-signalbox-corner-rect";
/// Structural class of the signal glyph text block.
pub const CLASS_SIGNAL_TEXT: &str = "hmikit-signalbox-signal-text";

/// Glyph shown while the alarm state is active.
const ALARM_GLYPH: &str = "A";
/// Glyph shown while only the warning state is active.
const WARNING_GLYPH: &str = "W";
/// Inset subtracted from the text box span to get the font size.
const FONT_INSET: f64 = 4.0;

/// A signal box: invisible at rest, fully visible in the alarm or warning
/// color when the corresponding state is set. Alarm takes priority over
/// warning.
pub struct SignalBox {
    base: ControlBase,
    root: ElementHandle,
    main_rect: ElementHandle,
    corner_rect: ElementHandle,
    signal_text: ElementHandle,
    alarm_state: AttributeSlot<bool>,
    warning_state: AttributeSlot<bool>,
    alarm_color: AttributeSlot<SolidColor>,
    warning_color: AttributeSlot<SolidColor>,
    text_color: AttributeSlot<SolidColor>,
    stroke_thickness: AttributeSlot<f64>,
    stroke_thickness_unit: AttributeSlot<PixelUnit>,
    box_size: AttributeSlot<f64>,
    box_size_unit: AttributeSlot<PixelUnit>,
}

impl SignalBox {
    /// Registration type name for the host control registry.
    pub const TYPE_NAME: &'static str = "signalbox";

    /// Resolve the template sub-elements and create the control.
    pub fn new(
        id: impl Into<String>,
        host: &ElementHandle,
        defaults: AttributeDefaults,
        events: EventBus,
    ) -> Result<Self, TemplateError> {
        let root = template::require_root(host, CLASS_TEMPLATE)?;
        let main_rect = template::require(&root, CLASS_MAIN_RECT, "main rectangle")?;
        let corner_rect = template::require(&root, CLASS_CORNER_RECT, "corner rectangle")?;
        let signal_text = template::require(&root, CLASS_SIGNAL_TEXT, "signal text")?;

        Ok(Self {
            base: ControlBase::new(id, defaults, events),
            root,
            main_rect,
            corner_rect,
            signal_text,
            alarm_state: AttributeSlot::unset(),
            warning_state: AttributeSlot::unset(),
            alarm_color: AttributeSlot::unset(),
            warning_color: AttributeSlot::unset(),
            text_color: AttributeSlot::unset(),
            stroke_thickness: AttributeSlot::unset(),
            stroke_thickness_unit: AttributeSlot::unset(),
            box_size: AttributeSlot::unset(),
            box_size_unit: AttributeSlot::unset(),
        })
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    /// Set the `AlarmState` attribute from a raw host value.
    pub fn set_alarm_state(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_boolean(raw).unwrap_or_else(|| self.base.default_for("AlarmState"));
        if !self.alarm_state.replace(converted) {
            return;
        }
        self.base.notify("AlarmState");
        self.process();
    }

    pub fn alarm_state(&self) -> Option<bool> {
        self.alarm_state.copied()
    }

    /// Set the `WarningState` attribute from a raw host value.
    pub fn set_warning_state(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_boolean(raw).unwrap_or_else(|| self.base.default_for("WarningState"));
        if !self.warning_state.replace(converted) {
            return;
        }
        self.base.notify("WarningState");
        self.process();
    }

    pub fn warning_state(&self) -> Option<bool> {
        self.warning_state.copied()
    }

    /// Set the `AlarmColor` attribute from a raw host value.
    pub fn set_alarm_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("AlarmColor"));
        if !self.alarm_color.replace(converted) {
            return;
        }
        self.base.notify("AlarmColor");
        self.process();
    }

    pub fn alarm_color(&self) -> Option<SolidColor> {
        self.alarm_color.copied()
    }

    /// Set the `WarningColor` attribute from a raw host value.
    pub fn set_warning_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("WarningColor"));
        if !self.warning_color.replace(converted) {
            return;
        }
        self.base.notify("WarningColor");
        self.process();
    }

    pub fn warning_color(&self) -> Option<SolidColor> {
        self.warning_color.copied()
    }

    /// Set the `SignalTextColor` attribute from a raw host value.
    pub fn set_signal_text_color(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<SolidColor>(raw)
            .unwrap_or_else(|| self.base.default_for("SignalTextColor"));
        if !self.text_color.replace(converted) {
            return;
        }
        self.base.notify("SignalTextColor");
        self.process();
    }

    pub fn signal_text_color(&self) -> Option<SolidColor> {
        self.text_color.copied()
    }

    /// Set the `BoxStrokeThickness` attribute from a raw host value.
    pub fn set_box_stroke_thickness(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<f64>(raw)
            .unwrap_or_else(|| self.base.default_for("BoxStrokeThickness"));
        if !self.stroke_thickness.replace(converted) {
            return;
        }
        self.base.notify("BoxStrokeThickness");
        self.process();
    }

    pub fn box_stroke_thickness(&self) -> Option<f64> {
        self.stroke_thickness.copied()
    }

    /// Set the `BoxStrokeThicknessUnit` attribute from a raw host value.
    pub fn set_box_stroke_thickness_unit(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<PixelUnit>(raw)
            .unwrap_or_else(|| self.base.default_for("BoxStrokeThicknessUnit"));
        if !self.stroke_thickness_unit.replace(converted) {
            return;
        }
        self.base.notify("BoxStrokeThicknessUnit");
        self.process();
    }

    pub fn box_stroke_thickness_unit(&self) -> Option<PixelUnit> {
        self.stroke_thickness_unit.copied()
    }

    /// Set the `BoxSize` attribute from a raw host value.
    pub fn set_box_size(&mut self, raw: Option<&RawValue>) {
        let converted =
            value::to_schema::<f64>(raw).unwrap_or_else(|| self.base.default_for("BoxSize"));
        if !self.box_size.replace(converted) {
            return;
        }
        self.base.notify("BoxSize");
        self.process();
    }

    pub fn box_size(&self) -> Option<f64> {
        self.box_size.copied()
    }

    /// Set the `BoxSizeUnit` attribute from a raw host value.
    pub fn set_box_size_unit(&mut self, raw: Option<&RawValue>) {
        let converted = value::to_schema::<PixelUnit>(raw)
            .unwrap_or_else(|| self.base.default_for("BoxSizeUnit"));
        if !self.box_size_unit.replace(converted) {
            return;
        }
        self.base.notify("BoxSizeUnit");
        self.process();
    }

    pub fn box_size_unit(&self) -> Option<PixelUnit> {
        self.box_size_unit.copied()
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

    fn stroke_measurement(&self) -> Option<Measurement> {
        let value = self.stroke_thickness.copied()?;
        Some(Measurement {
            value,
            unit: self.stroke_thickness_unit.copied().unwrap_or_default(),
        })
    }

    fn box_measurement(&self) -> Option<Measurement> {
        let value = self.box_size.copied()?;
        Some(Measurement {
            value,
            unit: self.box_size_unit.copied().unwrap_or_default(),
        })
    }

    fn process(&self) {
        self.signal_text.set_text_color(self.text_color.copied());

        let stroke = self.stroke_measurement();
        if let Some(stroke) = stroke {
            self.main_rect.set_stroke_thickness(stroke);
            // The corner square sits inside the border.
            self.corner_rect.set_left(stroke);
            self.corner_rect.set_bottom(stroke);
        }

        let size = self.box_measurement();
        if let Some(size) = size {
            self.corner_rect.set_width(size);
            self.corner_rect.set_height(size);
        }

        if let (Some(stroke), Some(size)) = (stroke, size) {
            // Text box spans the corner square plus the border; the font
            // tracks the span with a small inset.
            let span = Measurement {
                value: size.value + stroke.value,
                unit: size.unit,
            };
            self.signal_text.set_width(span);
            self.signal_text.set_height(span);
            self.signal_text.set_font_size(Measurement {
                value: span.value - FONT_INSET,
                unit: span.unit,
            });
        }

        if self.alarm_state.copied().unwrap_or(false) {
            self.apply_signal(self.alarm_color.copied(), ALARM_GLYPH);
            return;
        }
        if self.warning_state.copied().unwrap_or(false) {
            self.apply_signal(self.warning_color.copied(), WARNING_GLYPH);
            return;
        }
        self.root.set_opacity(0.0);
    }

    fn apply_signal(&self, color: Option<SolidColor>, glyph: &str) {
        self.main_rect.set_stroke_color(color);
        self.corner_rect.set_stroke_color(color);
        self.corner_rect.set_fill(color);
        self.signal_text.set_text(glyph);
        self.root.set_opacity(1.0);
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

    fn signalbox_host() -> ElementHandle {
        let host = ElementHandle::new(Element::new("host"));
        let root = host.append(Element::new(CLASS_TEMPLATE));
        root.append(Element::new(CLASS_MAIN_RECT));
        root.append(Element::new(CLASS_CORNER_RECT));
        root.append(Element::new(CLASS_SIGNAL_TEXT));
        host
    }

    fn signalbox_defaults() -> AttributeDefaults {
        AttributeDefaults::new()
            .with("AlarmState", json!(false))
            .with("WarningState", json!(false))
            .with("AlarmColor", json!({"r": 255, "g": 0, "b": 0}))
            .with("WarningColor", json!({"r": 255, "g": 160, "b": 0}))
            .with("SignalTextColor", json!({"r": 255, "g": 255, "b": 255}))
            .with("BoxStrokeThickness", json!(2.0))
            .with("BoxStrokeThicknessUnit", json!("px"))
            .with("BoxSize", json!(10.0))
            .with("BoxSizeUnit", json!("px"))
    }

    fn recording_bus() -> (EventBus, Rc<RefCell<Vec<PropertyChanged>>>) {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (bus, seen)
    }

    #[test]
    fn construction_fails_on_missing_text_block() {
        let host = ElementHandle::new(Element::new("host"));
        let root = host.append(Element::new(CLASS_TEMPLATE));
        root.append(Element::new(CLASS_MAIN_RECT));
        root.append(Element::new(CLASS_CORNER_RECT));

        let result = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new());
        assert!(matches!(
            result,
            Err(TemplateError::MissingElement { role: "signal text", .. })
        ));
    }

    #[test]
    fn alarm_wins_over_warning() {
        let host = signalbox_host();
        let root = host.find(CLASS_TEMPLATE).unwrap();
        let corner = host.find(CLASS_CORNER_RECT).unwrap();
        let text = host.find(CLASS_SIGNAL_TEXT).unwrap();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_alarm_color(Some(&json!({"r": 255, "g": 0, "b": 0})));
        sb.set_warning_color(Some(&json!({"r": 255, "g": 160, "b": 0})));
        sb.set_warning_state(Some(&json!(true)));
        sb.set_alarm_state(Some(&json!(true)));

        assert_eq!(root.opacity(), Some(1.0));
        assert_eq!(text.text().as_deref(), Some("A"));
        assert_eq!(corner.fill(), Some(SolidColor::new(255, 0, 0)));
        assert_eq!(corner.stroke_color(), Some(SolidColor::new(255, 0, 0)));
    }

    #[test]
    fn warning_alone_shows_warning_glyph() {
        let host = signalbox_host();
        let root = host.find(CLASS_TEMPLATE).unwrap();
        let main = host.find(CLASS_MAIN_RECT).unwrap();
        let text = host.find(CLASS_SIGNAL_TEXT).unwrap();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_warning_color(Some(&json!({"r": 255, "g": 160, "b": 0})));
        sb.set_alarm_state(Some(&json!(false)));
        sb.set_warning_state(Some(&json!(true)));

        assert_eq!(root.opacity(), Some(1.0));
        assert_eq!(text.text().as_deref(), Some("W"));
        assert_eq!(main.stroke_color(), Some(SolidColor::new(255, 160, 0)));
    }

    #[test]
    fn neither_state_hides_the_box() {
        let host = signalbox_host();
        let root = host.find(CLASS_TEMPLATE).unwrap();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_alarm_color(Some(&json!({"r": 255, "g": 0, "b": 0})));
        sb.set_alarm_state(Some(&json!(false)));
        sb.set_warning_state(Some(&json!(false)));

        assert_eq!(root.opacity(), Some(0.0));
    }

    #[test]
    fn geometry_propagates_to_sub_elements() {
        let host = signalbox_host();
        let main = host.find(CLASS_MAIN_RECT).unwrap();
        let corner = host.find(CLASS_CORNER_RECT).unwrap();
        let text = host.find(CLASS_SIGNAL_TEXT).unwrap();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_box_stroke_thickness(Some(&json!(2.0)));
        sb.set_box_stroke_thickness_unit(Some(&json!("px")));
        sb.set_box_size(Some(&json!(10.0)));
        sb.set_box_size_unit(Some(&json!("px")));

        assert_eq!(main.stroke_thickness(), Some(Measurement::px(2.0)));
        assert_eq!(corner.left(), Some(Measurement::px(2.0)));
        assert_eq!(corner.bottom(), Some(Measurement::px(2.0)));
        assert_eq!(corner.width(), Some(Measurement::px(10.0)));
        assert_eq!(corner.height(), Some(Measurement::px(10.0)));
        assert_eq!(text.width(), Some(Measurement::px(12.0)));
        assert_eq!(text.height(), Some(Measurement::px(12.0)));
        assert_eq!(text.font_size(), Some(Measurement::px(8.0)));
    }

    #[test]
    fn invalid_unit_falls_back_to_default() {
        let host = signalbox_host();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_box_size_unit(Some(&json!("furlongs")));
        assert_eq!(sb.box_size_unit(), Some(PixelUnit::Px));
    }

    #[test]
    fn text_color_applies_independently_of_state() {
        let host = signalbox_host();
        let text = host.find(CLASS_SIGNAL_TEXT).unwrap();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), EventBus::new()).unwrap();

        sb.set_signal_text_color(Some(&json!({"r": 255, "g": 255, "b": 255})));
        assert_eq!(text.text_color(), Some(SolidColor::white()));
    }

    #[test]
    fn repeated_state_is_a_no_op() {
        let host = signalbox_host();
        let (bus, seen) = recording_bus();
        let mut sb = SignalBox::new("s1", &host, signalbox_defaults(), bus).unwrap();

        sb.set_alarm_state(Some(&json!(true)));
        sb.set_alarm_state(Some(&json!("true")));
        sb.set_alarm_state(Some(&json!(1)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].property, "AlarmState");
    }
}
