//! The pre-rendered template tree and sub-element handles.
//!
//! A control's visual markup is compiled by the host into a tree of elements
//! addressed by structural class name. Controls resolve the handles they need
//! exactly once during construction and afterwards only write visual state
//! through them. Handles share the underlying node; the model is
//! single-threaded by construction.

use crate::error::TemplateError;
use crate::style::{Measurement, RotateTransform, SolidColor};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identity of a template element.
pub type ElementId = Uuid;

/// A single node in a widget's pre-rendered template.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    classes: Vec<String>,
    children: Vec<ElementHandle>,
    fill: Option<SolidColor>,
    stroke_color: Option<SolidColor>,
    stroke_thickness: Option<Measurement>,
    opacity: Option<f64>,
    style_classes: BTreeSet<String>,
    transform: Option<RotateTransform>,
    text: Option<String>,
    text_color: Option<SolidColor>,
    font_size: Option<Measurement>,
    left: Option<Measurement>,
    bottom: Option<Measurement>,
    width: Option<Measurement>,
    height: Option<Measurement>,
}

impl Element {
    /// Create an element with one structural class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            classes: vec![class.into()],
            children: Vec::new(),
            fill: None,
            stroke_color: None,
            stroke_thickness: None,
            opacity: None,
            style_classes: BTreeSet::new(),
            transform: None,
            text: None,
            text_color: None,
            font_size: None,
            left: None,
            bottom: None,
            width: None,
            height: None,
        }
    }

    /// Add a further structural class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the initial template opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// A shared handle onto a template element.
///
/// Clones refer to the same node, matching the host's element references.
#[derive(Clone)]
pub struct ElementHandle(Rc<RefCell<Element>>);

impl ElementHandle {
    pub fn new(element: Element) -> Self {
        Self(Rc::new(RefCell::new(element)))
    }

    pub fn id(&self) -> ElementId {
        self.0.borrow().id
    }

    /// Append a child node and return its handle.
    pub fn append(&self, element: Element) -> ElementHandle {
        let child = ElementHandle::new(element);
        self.0.borrow_mut().children.push(child.clone());
        child
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    /// Find the first descendant with the given structural class
    /// (depth-first, excluding this element itself).
    pub fn find(&self, class: &str) -> Option<ElementHandle> {
        let children: Vec<ElementHandle> = self.0.borrow().children.clone();
        for child in children {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.find(class) {
                return Some(found);
            }
        }
        None
    }

    pub fn set_fill(&self, fill: Option<SolidColor>) {
        self.0.borrow_mut().fill = fill;
    }

    pub fn fill(&self) -> Option<SolidColor> {
        self.0.borrow().fill
    }

    pub fn set_stroke_color(&self, color: Option<SolidColor>) {
        self.0.borrow_mut().stroke_color = color;
    }

    pub fn stroke_color(&self) -> Option<SolidColor> {
        self.0.borrow().stroke_color
    }

    pub fn set_stroke_thickness(&self, thickness: Measurement) {
        self.0.borrow_mut().stroke_thickness = Some(thickness);
    }

    pub fn stroke_thickness(&self) -> Option<Measurement> {
        self.0.borrow().stroke_thickness
    }

    pub fn set_opacity(&self, opacity: f64) {
        self.0.borrow_mut().opacity = Some(opacity);
    }

    pub fn opacity(&self) -> Option<f64> {
        self.0.borrow().opacity
    }

    pub fn add_style_class(&self, class: &str) {
        self.0.borrow_mut().style_classes.insert(class.to_string());
    }

    pub fn remove_style_class(&self, class: &str) {
        self.0.borrow_mut().style_classes.remove(class);
    }

    pub fn has_style_class(&self, class: &str) -> bool {
        self.0.borrow().style_classes.contains(class)
    }

    pub fn set_transform(&self, transform: RotateTransform) {
        self.0.borrow_mut().transform = Some(transform);
    }

    pub fn transform(&self) -> Option<RotateTransform> {
        self.0.borrow().transform
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = Some(text.into());
    }

    pub fn text(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    pub fn set_text_color(&self, color: Option<SolidColor>) {
        self.0.borrow_mut().text_color = color;
    }

    pub fn text_color(&self) -> Option<SolidColor> {
        self.0.borrow().text_color
    }

    pub fn set_font_size(&self, size: Measurement) {
        self.0.borrow_mut().font_size = Some(size);
    }

    pub fn font_size(&self) -> Option<Measurement> {
        self.0.borrow().font_size
    }

    pub fn set_left(&self, left: Measurement) {
        self.0.borrow_mut().left = Some(left);
    }

    pub fn left(&self) -> Option<Measurement> {
        self.0.borrow().left
    }

    pub fn set_bottom(&self, bottom: Measurement) {
        self.0.borrow_mut().bottom = Some(bottom);
    }

    pub fn bottom(&self) -> Option<Measurement> {
        self.0.borrow().bottom
    }

    pub fn set_width(&self, width: Measurement) {
        self.0.borrow_mut().width = Some(width);
    }

    pub fn width(&self) -> Option<Measurement> {
        self.0.borrow().width
    }

    pub fn set_height(&self, height: Measurement) {
        self.0.borrow_mut().height = Some(height);
    }

    pub fn height(&self) -> Option<Measurement> {
        self.0.borrow().height
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.0.borrow();
        f.debug_struct("ElementHandle")
            .field("id", &element.id)
            .field("classes", &element.classes)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Resolve a control's template root within its host element; missing roots
/// are fatal.
pub fn require_root(host: &ElementHandle, class: &str) -> Result<ElementHandle, TemplateError> {
    host.find(class).ok_or_else(|| TemplateError::MissingRoot {
        class: class.to_string(),
    })
}

/// Resolve a required sub-element within the template root; missing elements
/// are fatal.
pub fn require(
    scope: &ElementHandle,
    class: &str,
    role: &'static str,
) -> Result<ElementHandle, TemplateError> {
    scope.find(class).ok_or_else(|| TemplateError::MissingElement {
        class: class.to_string(),
        role,
    })
}
