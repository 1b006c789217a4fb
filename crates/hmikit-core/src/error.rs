//! Construction-time errors.

use thiserror::Error;

/// A required template sub-element is missing.
///
/// Raised only while a control resolves its pre-rendered template during
/// construction; it indicates a broken visual template asset and aborts the
/// control's setup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template root '.{class}' not found")]
    MissingRoot { class: String },
    #[error("missing {role} element '.{class}'")]
    MissingElement { class: String, role: &'static str },
}
