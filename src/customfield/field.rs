//! Custom-field definitions
//!
//! A [`FieldDefinition`] describes one custom metadata field attached to a
//! course or course module. Definitions are created and owned by the host
//! platform's custom-field subsystem; this crate only reads them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic type of a custom field.
///
/// The host platform identifies field subtypes by runtime class; here the
/// set is closed, so a filter variant can be matched against a field at
/// construction time instead of at first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	Text,
	Checkbox,
	Date,
	Select,
	Textarea,
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FieldType::Text => "text",
			FieldType::Checkbox => "checkbox",
			FieldType::Date => "date",
			FieldType::Select => "select",
			FieldType::Textarea => "textarea",
		};
		f.write_str(name)
	}
}

/// Descriptor of one custom metadata field.
///
/// # Examples
///
/// ```
/// use resourcelibrary::customfield::{FieldDefinition, FieldType};
/// use serde_json::json;
///
/// let field = FieldDefinition::new("f2", "Certified", FieldType::Checkbox)
/// 	.with_config("checkbydefault", json!(false));
/// assert_eq!(field.shortname(), "f2");
/// assert_eq!(field.field_type(), FieldType::Checkbox);
/// assert!(!field.config_bool("checkbydefault"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
	shortname: String,
	name: String,
	field_type: FieldType,
	#[serde(default)]
	configdata: HashMap<String, serde_json::Value>,
}

impl FieldDefinition {
	/// Create a new field definition with an empty configuration.
	pub fn new(
		shortname: impl Into<String>,
		name: impl Into<String>,
		field_type: FieldType,
	) -> Self {
		Self {
			shortname: shortname.into(),
			name: name.into(),
			field_type,
			configdata: HashMap::new(),
		}
	}

	/// Set one configuration property (builder style).
	pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.configdata.insert(key.into(), value);
		self
	}

	pub fn shortname(&self) -> &str {
		&self.shortname
	}

	/// Display name of the field, used as the filter control label.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_type(&self) -> FieldType {
		self.field_type
	}

	/// Look up a raw configuration property.
	pub fn configdata_property(&self, name: &str) -> Option<&serde_json::Value> {
		self.configdata.get(name)
	}

	/// Configuration property coerced to a boolean.
	///
	/// Missing properties are false. Numbers and the strings `"1"`/`"true"`
	/// follow the host platform's loose truthiness rules.
	pub fn config_bool(&self, name: &str) -> bool {
		self.configdata_property(name).is_some_and(json_truthy)
	}

	/// Configuration property coerced to an integer, if present.
	pub fn config_i64(&self, name: &str) -> Option<i64> {
		match self.configdata_property(name)? {
			serde_json::Value::Number(n) => n.as_i64(),
			serde_json::Value::String(s) => s.parse().ok(),
			_ => None,
		}
	}

	pub fn config_str(&self, name: &str) -> Option<&str> {
		self.configdata_property(name)?.as_str()
	}

	/// Option list of a select field, parsed from the newline-separated
	/// `options` configuration property.
	///
	/// # Examples
	///
	/// ```
	/// use resourcelibrary::customfield::{FieldDefinition, FieldType};
	/// use serde_json::json;
	///
	/// let field = FieldDefinition::new("f4", "Level", FieldType::Select)
	/// 	.with_config("options", json!("a\nb\nc"));
	/// assert_eq!(field.select_options(), vec!["a", "b", "c"]);
	/// ```
	pub fn select_options(&self) -> Vec<String> {
		self.config_str("options")
			.map(|options| {
				options
					.lines()
					.map(str::trim)
					.filter(|line| !line.is_empty())
					.map(str::to_string)
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Loose truthiness matching the host platform's value coercion.
pub(crate) fn json_truthy(value: &serde_json::Value) -> bool {
	match value {
		serde_json::Value::Bool(b) => *b,
		serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		serde_json::Value::String(s) => !s.is_empty() && s != "0" && s != "false",
		_ => false,
	}
}

/// Maps a field to the storage column its values live in.
///
/// The mapping is owned by the data-access layer; filters resolve the
/// column once at construction time and never interpret it.
pub trait ColumnResolver: Send + Sync {
	fn sql_field_name(&self, field: &FieldDefinition) -> String;
}

/// Default column layout for custom-field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomFieldColumns;

impl ColumnResolver for CustomFieldColumns {
	fn sql_field_name(&self, field: &FieldDefinition) -> String {
		format!("customfield_{}_col", field.shortname())
	}
}
