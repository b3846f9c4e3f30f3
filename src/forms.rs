//! Form-builder collaborator façade
//!
//! The host platform renders the search form; this crate only tells it
//! which controls to emit. [`FilterForm`] records those instructions so
//! the renderer (and the tests) can inspect them, and [`SubmittedData`]
//! carries the parsed form input back into the filters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of control a filter asks the form builder to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
	Checkbox,
	Text,
	Date,
	Select { options: Vec<String> },
}

/// Expected data shape of a form element, registered for later validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
	Bool,
	Int,
	Text,
}

/// One control registered on the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormElement {
	pub kind: ElementKind,
	pub name: String,
	pub label: String,
}

/// Recorded form-building instructions.
///
/// # Examples
///
/// ```
/// use resourcelibrary::forms::{ElementKind, FilterForm, ParamKind};
///
/// let mut form = FilterForm::new();
/// form.add_element(ElementKind::Checkbox, "customfield_f2", "Certified");
/// form.set_type("customfield_f2", ParamKind::Bool);
/// assert_eq!(form.elements().len(), 1);
/// assert_eq!(form.type_of("customfield_f2"), Some(ParamKind::Bool));
/// ```
#[derive(Debug, Default)]
pub struct FilterForm {
	elements: Vec<FormElement>,
	defaults: HashMap<String, serde_json::Value>,
	types: HashMap<String, ParamKind>,
}

impl FilterForm {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one control to the form.
	pub fn add_element(
		&mut self,
		kind: ElementKind,
		name: impl Into<String>,
		label: impl Into<String>,
	) {
		self.elements.push(FormElement {
			kind,
			name: name.into(),
			label: label.into(),
		});
	}

	/// Set the initial value of a control.
	pub fn set_default(&mut self, name: impl Into<String>, value: serde_json::Value) {
		self.defaults.insert(name.into(), value);
	}

	/// Register the expected data shape of a control.
	pub fn set_type(&mut self, name: impl Into<String>, kind: ParamKind) {
		self.types.insert(name.into(), kind);
	}

	pub fn elements(&self) -> &[FormElement] {
		&self.elements
	}

	pub fn element(&self, name: &str) -> Option<&FormElement> {
		self.elements.iter().find(|element| element.name == name)
	}

	pub fn default_of(&self, name: &str) -> Option<&serde_json::Value> {
		self.defaults.get(name)
	}

	pub fn type_of(&self, name: &str) -> Option<ParamKind> {
		self.types.get(name).copied()
	}
}

/// Parsed form input, keyed by form-element name.
///
/// Filters read from it during `check_data` and never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedData(HashMap<String, serde_json::Value>);

impl SubmittedData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one submitted value (builder style, used when assembling input).
	pub fn with(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
		self.0.insert(name.into(), value);
		self
	}

	pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
		self.0.get(name)
	}

	/// The value under `name` coerced to a string, or `None` when the key
	/// is absent or the coercion yields the empty string.
	///
	/// Mirrors the host platform's cast-then-compare-to-`''` idiom: an
	/// unchecked checkbox arrives as an absent key, empty string or
	/// `false`, and all of those mean "not set".
	pub fn non_empty_str(&self, name: &str) -> Option<String> {
		let coerced = coerce_to_string(self.get(name)?);
		if coerced.is_empty() { None } else { Some(coerced) }
	}
}

impl FromIterator<(String, serde_json::Value)> for SubmittedData {
	fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// String coercion with the host platform's semantics: `false` and `null`
/// become the empty string, `true` becomes `"1"`.
fn coerce_to_string(value: &serde_json::Value) -> String {
	match value {
		serde_json::Value::Null => String::new(),
		serde_json::Value::Bool(true) => "1".to_string(),
		serde_json::Value::Bool(false) => String::new(),
		serde_json::Value::Number(n) => n.to_string(),
		serde_json::Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
