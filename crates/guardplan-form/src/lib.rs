//! # guardplan-form
//!
//! Wires a rendered form field to its validation state.
//!
//! A form scope owns one [`FieldContext`] per field and updates it as the user
//! types. Components call [`use_form_field`] with the context they were given
//! and the id of the enclosing form item, and get back a [`FieldView`]: the
//! DOM ids used to link label, description and message, plus accessors that
//! always read the field's current state.
//!
//! ```rust
//! use guardplan_form::{use_form_field, FieldContext, FieldMeta};
//!
//! let field = FieldContext::new("officer");
//! let view = use_form_field(Some(&field), Some("f1")).unwrap();
//! assert_eq!(view.form_item_id.as_deref(), Some("f1-form-item"));
//! assert!(!view.is_dirty());
//!
//! field.set_meta(FieldMeta { dirty: true, touched: false, valid: false });
//! field.set_error_message(Some("Required".into()));
//! assert!(view.is_dirty());
//! assert_eq!(view.error().as_deref(), Some("Required"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Validation flags of a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Value differs from the initial value
    pub dirty: bool,
    /// Field has been blurred at least once
    pub touched: bool,
    pub valid: bool,
}

#[derive(Debug, Default)]
struct FieldState {
    error_message: Option<String>,
    meta: FieldMeta,
}

/// Shared handle to one field's validation state.
///
/// Clones point at the same state; updates through any clone are visible to
/// every [`FieldView`] built from it.
#[derive(Clone, Debug)]
pub struct FieldContext {
    name: Rc<str>,
    state: Rc<RefCell<FieldState>>,
}

impl FieldContext {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: name.into(),
            state: Rc::new(RefCell::new(FieldState::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error_message.clone()
    }

    pub fn meta(&self) -> FieldMeta {
        self.state.borrow().meta
    }

    pub fn set_error_message(&self, message: Option<String>) {
        self.state.borrow_mut().error_message = message;
    }

    pub fn set_meta(&self, meta: FieldMeta) {
        self.state.borrow_mut().meta = meta;
    }
}

/// Returned when a field component is rendered outside a field scope
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("use_form_field must be used within a form field scope")]
pub struct UsageError;

/// What a field component needs to render itself
#[derive(Clone, Debug)]
pub struct FieldView {
    /// Id of the enclosing form item
    pub id: Option<String>,
    pub name: String,
    /// `<id>-form-item`, for the control
    pub form_item_id: Option<String>,
    /// `<id>-form-item-description`, for `aria-describedby`
    pub form_description_id: Option<String>,
    /// `<id>-form-item-message`, for the error message
    pub form_message_id: Option<String>,
    context: FieldContext,
}

impl FieldView {
    /// Current error message
    pub fn error(&self) -> Option<String> {
        self.context.error_message()
    }

    pub fn is_dirty(&self) -> bool {
        self.context.meta().dirty
    }

    pub fn is_touched(&self) -> bool {
        self.context.meta().touched
    }

    pub fn valid(&self) -> bool {
        self.context.meta().valid
    }
}

/// Build the view of a field.
///
/// `field` is the context provided by the enclosing field scope; without one
/// this is a programming error and fails with [`UsageError`]. `item_id` is the
/// enclosing form item's id; the derived ids are `None` when it is absent.
pub fn use_form_field(
    field: Option<&FieldContext>,
    item_id: Option<&str>,
) -> Result<FieldView, UsageError> {
    let field = field.ok_or(UsageError)?;
    let derive = |suffix: &str| item_id.map(|id| format!("{id}-{suffix}"));

    Ok(FieldView {
        id: item_id.map(str::to_string),
        name: field.name().to_string(),
        form_item_id: derive("form-item"),
        form_description_id: derive("form-item-description"),
        form_message_id: derive("form-item-message"),
        context: field.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derives_ids_from_item() {
        let field = FieldContext::new("commander");
        let view = use_form_field(Some(&field), Some("v-3")).unwrap();

        assert_eq!(view.id.as_deref(), Some("v-3"));
        assert_eq!(view.name, "commander");
        assert_eq!(view.form_item_id.as_deref(), Some("v-3-form-item"));
        assert_eq!(
            view.form_description_id.as_deref(),
            Some("v-3-form-item-description")
        );
        assert_eq!(view.form_message_id.as_deref(), Some("v-3-form-item-message"));
    }

    #[test]
    fn missing_item_leaves_ids_empty() {
        let field = FieldContext::new("commander");
        let view = use_form_field(Some(&field), None).unwrap();

        assert_eq!(view.id, None);
        assert_eq!(view.form_item_id, None);
        assert_eq!(view.form_description_id, None);
        assert_eq!(view.form_message_id, None);
    }

    #[test]
    fn outside_field_scope_is_a_usage_error() {
        assert_eq!(use_form_field(None, Some("v-3")).unwrap_err(), UsageError);
        assert_eq!(use_form_field(None, None).unwrap_err(), UsageError);
        assert_eq!(
            UsageError.to_string(),
            "use_form_field must be used within a form field scope"
        );
    }

    #[test]
    fn view_tracks_context_changes() {
        let field = FieldContext::new("officer");
        let view = use_form_field(Some(&field), Some("f")).unwrap();

        assert_eq!(view.error(), None);
        assert!(!view.is_dirty() && !view.is_touched() && !view.valid());

        field.set_meta(FieldMeta {
            dirty: true,
            touched: true,
            valid: true,
        });
        assert!(view.is_dirty() && view.is_touched() && view.valid());

        // Updates through another clone of the handle are seen too
        let scope_handle = field.clone();
        scope_handle.set_error_message(Some("Trop long".into()));
        scope_handle.set_meta(FieldMeta {
            valid: false,
            ..field.meta()
        });
        assert_eq!(view.error().as_deref(), Some("Trop long"));
        assert!(!view.valid());
        assert!(view.is_dirty());
    }

    #[test]
    fn views_share_state() {
        let field = FieldContext::new("officer");
        let a = use_form_field(Some(&field), Some("a")).unwrap();
        let b = use_form_field(Some(&field), Some("b")).unwrap();

        field.set_meta(FieldMeta {
            touched: true,
            ..FieldMeta::default()
        });
        assert!(a.is_touched());
        assert!(b.is_touched());
    }
}
