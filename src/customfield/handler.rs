//! Custom-field instance data
//!
//! In the host platform, custom-field values live in their own storage
//! and are managed per component area (courses vs. course modules). The
//! handler here is the crate-side view of that subsystem: it keeps the
//! raw values per instance, formats them for display, and can round-trip
//! one instance's values through a backup blob.

use super::field::{FieldDefinition, FieldType, json_truthy};
use crate::filters::ELEMENT_PREFIX;
use crate::forms::SubmittedData;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Display format for date values, matching the platform's
/// day-date-time string.
const DATE_FORMAT: &str = "%A, %d %B %Y, %I:%M %p";

/// Custom-field values of all instances in one component area.
pub struct CustomFieldHandler {
	fields: Vec<Arc<FieldDefinition>>,
	data: HashMap<i64, HashMap<String, serde_json::Value>>,
}

impl CustomFieldHandler {
	pub fn new(fields: Vec<Arc<FieldDefinition>>) -> Self {
		Self {
			fields,
			data: HashMap::new(),
		}
	}

	pub fn fields(&self) -> &[Arc<FieldDefinition>] {
		&self.fields
	}

	/// Store the custom-field values of one instance from submitted data.
	///
	/// Only keys of the form `customfield_{shortname}` matching a known
	/// field are read; everything else in the submission is ignored.
	pub fn save_instance_data(&mut self, instance_id: i64, submitted: &SubmittedData) {
		let values = self.data.entry(instance_id).or_default();
		for field in &self.fields {
			let element = format!("{ELEMENT_PREFIX}{}", field.shortname());
			if let Some(value) = submitted.get(&element)
				&& !value.is_null()
			{
				values.insert(field.shortname().to_string(), value.clone());
			}
		}
	}

	/// Raw stored value of one field for one instance.
	pub fn instance_value(&self, instance_id: i64, shortname: &str) -> Option<&serde_json::Value> {
		self.data.get(&instance_id)?.get(shortname)
	}

	/// Drop all values of one instance (course or module deletion).
	pub fn delete_instance_data(&mut self, instance_id: i64) {
		self.data.remove(&instance_id);
	}

	/// Number of stored values across all instances.
	pub fn stored_value_count(&self) -> usize {
		self.data.values().map(HashMap::len).sum()
	}

	/// Display values of one instance, keyed by field shortname.
	///
	/// Checkboxes become `Yes`/`No`, select indexes become their option
	/// label, dates become a formatted day-date-time string; text values
	/// pass through. Fields without a stored value are omitted.
	pub fn export_instance_data(&self, instance_id: i64) -> HashMap<String, String> {
		let Some(values) = self.data.get(&instance_id) else {
			return HashMap::new();
		};
		let mut exported = HashMap::new();
		for field in &self.fields {
			if let Some(value) = values.get(field.shortname()) {
				exported.insert(
					field.shortname().to_string(),
					format_display_value(field, value),
				);
			}
		}
		exported
	}

	/// Snapshot one instance's raw values for backup.
	pub fn backup_instance(&self, instance_id: i64) -> serde_json::Value {
		let values = self.data.get(&instance_id).cloned().unwrap_or_default();
		serde_json::Value::Object(values.into_iter().collect())
	}

	/// Restore a backup snapshot into an instance, keeping only values
	/// that still correspond to a known field.
	pub fn restore_instance(&mut self, instance_id: i64, backup: &serde_json::Value) {
		let Some(values) = backup.as_object() else {
			warn!(instance_id, "ignoring malformed custom-field backup");
			return;
		};
		let restored = self.data.entry(instance_id).or_default();
		for field in &self.fields {
			if let Some(value) = values.get(field.shortname()) {
				restored.insert(field.shortname().to_string(), value.clone());
			}
		}
	}
}

fn format_display_value(field: &FieldDefinition, value: &serde_json::Value) -> String {
	match field.field_type() {
		FieldType::Checkbox => {
			if json_truthy(value) {
				"Yes".to_string()
			} else {
				"No".to_string()
			}
		}
		FieldType::Select => {
			let options = field.select_options();
			value
				.as_u64()
				.or_else(|| value.as_str().and_then(|s| s.parse().ok()))
				.and_then(|index| {
					// Stored select values are 1-based option indexes.
					options.get(usize::try_from(index).ok()?.checked_sub(1)?).cloned()
				})
				.unwrap_or_default()
		}
		FieldType::Date => value
			.as_i64()
			.or_else(|| value.as_str().and_then(|s| s.parse().ok()))
			.and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
			.map(|datetime| datetime.format(DATE_FORMAT).to_string())
			.unwrap_or_default(),
		FieldType::Text | FieldType::Textarea => match value {
			serde_json::Value::String(s) => s.clone(),
			other => other.to_string(),
		},
	}
}
