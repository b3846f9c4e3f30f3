//! Custom-field filters
//!
//! One filter per custom field: it emits the matching form control,
//! validates the submitted value, and turns an accepted value into a
//! parametrized SQL predicate fragment. The fragments of all active
//! filters are aggregated into a single query by [`crate::query::FilterSet`];
//! executing that query belongs to the data-access layer, not this crate.

pub mod checkbox;
pub mod date;
pub mod select;
pub mod text;

pub use checkbox::CheckboxFilter;
pub use date::DateFilter;
pub use select::SelectFilter;
pub use text::TextFilter;

use crate::customfield::{ColumnResolver, FieldDefinition, FieldType};
use crate::forms::{FilterForm, SubmittedData};
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix of every filter form element, keeping custom-field controls from
/// colliding with unrelated fields on the same form.
pub const ELEMENT_PREFIX: &str = "customfield_";

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
	/// The field's semantic type does not match the filter variant being
	/// constructed. Fatal: a mismatched filter must never come to exist.
	#[error("field '{shortname}' is of type {actual}, expected {expected}")]
	TypeMismatch {
		shortname: String,
		expected: FieldType,
		actual: FieldType,
	},
	/// The field type has no filter at all (long-text fields).
	#[error("field '{shortname}' of type {field_type} cannot be filtered")]
	NotFilterable {
		shortname: String,
		field_type: FieldType,
	},
}

pub type FilterResult<T> = Result<T, FilterError>;

/// A parametrized condition plus its bound parameters.
///
/// The condition references storage columns by their resolver-provided
/// names and parameters by `:name` placeholders; the parameter names are
/// unique within one aggregated query (see [`ParamContext`]).
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateFragment {
	pub condition: String,
	pub params: HashMap<String, String>,
}

impl PredicateFragment {
	/// Fragment with a single bound parameter.
	pub fn single(condition: String, param: String, value: String) -> Self {
		Self {
			condition,
			params: HashMap::from([(param, value)]),
		}
	}
}

/// Unique-parameter-name generator for one aggregated query.
///
/// Each filter variant draws names from its own counter
/// (`ex_checkbox0`, `ex_checkbox1`, ... next to `ex_text0`, ...), so
/// fragments from any mix of filter instances can be merged into one
/// query without duplicate bound-parameter names. Create one context per
/// query; it is plain data, threaded explicitly instead of living in
/// process-wide state.
///
/// # Examples
///
/// ```
/// use resourcelibrary::filters::ParamContext;
///
/// let mut params = ParamContext::new();
/// assert_eq!(params.next_name("ex_checkbox"), "ex_checkbox0");
/// assert_eq!(params.next_name("ex_checkbox"), "ex_checkbox1");
/// assert_eq!(params.next_name("ex_text"), "ex_text0");
/// ```
#[derive(Debug, Default)]
pub struct ParamContext {
	counters: HashMap<&'static str, usize>,
}

impl ParamContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Next unique parameter name for the given variant prefix.
	pub fn next_name(&mut self, prefix: &'static str) -> String {
		let counter = self.counters.entry(prefix).or_default();
		let name = format!("{prefix}{counter}");
		*counter += 1;
		name
	}
}

/// Validated output of [`FieldFilter::check_data`].
///
/// "Not set" is represented as `Option::None` at the call sites, never as
/// a variant here: absence of input is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterData {
	/// Single submitted value, already coerced to a string.
	Value(String),
	/// Inclusive bounds of a date filter, as epoch seconds.
	DateRange {
		after: Option<i64>,
		before: Option<i64>,
	},
}

impl FilterData {
	pub fn value(value: impl Into<String>) -> Self {
		FilterData::Value(value.into())
	}
}

/// Capability set of a concrete filter variant.
///
/// The data flow is `add_to_form` at form-construction time, then
/// `check_data` over the parsed submission, then `sql_filter` over the
/// accepted value. `sql_filter` returns `None` both for `None` data and
/// for data the variant cannot interpret.
pub trait FieldFilter: Send + Sync {
	/// The externally-owned field this filter was built over.
	fn field(&self) -> &FieldDefinition;

	/// Form-element name, derived from the field shortname
	/// (`customfield_{shortname}`).
	fn element_name(&self) -> &str;

	/// Control label shown to the user.
	fn label(&self) -> &str {
		self.field().name()
	}

	/// Append this filter's controls to the form and register their
	/// expected data shapes. Side effect only.
	fn add_to_form(&self, form: &mut FilterForm);

	/// Extract and validate this filter's value from the submission.
	/// Absent or empty input yields `None`, never an error.
	fn check_data(&self, submitted: &SubmittedData) -> Option<FilterData>;

	/// Turn an accepted value into a predicate fragment, drawing unique
	/// parameter names from `params`. `None` data yields `None`.
	fn sql_filter(
		&self,
		data: Option<&FilterData>,
		params: &mut ParamContext,
	) -> Option<PredicateFragment>;
}

/// Construct the filter variant matching the field's semantic type.
///
/// # Examples
///
/// ```
/// use resourcelibrary::customfield::{CustomFieldColumns, FieldDefinition, FieldType};
/// use resourcelibrary::filters::filter_for_field;
/// use std::sync::Arc;
///
/// let field = Arc::new(FieldDefinition::new("f2", "Certified", FieldType::Checkbox));
/// let filter = filter_for_field(field, &CustomFieldColumns).unwrap();
/// assert_eq!(filter.element_name(), "customfield_f2");
/// ```
pub fn filter_for_field(
	field: Arc<FieldDefinition>,
	columns: &dyn ColumnResolver,
) -> FilterResult<Box<dyn FieldFilter>> {
	match field.field_type() {
		FieldType::Checkbox => Ok(Box::new(CheckboxFilter::new(field, columns)?)),
		FieldType::Text => Ok(Box::new(TextFilter::new(field, columns)?)),
		FieldType::Date => Ok(Box::new(DateFilter::new(field, columns)?)),
		FieldType::Select => Ok(Box::new(SelectFilter::new(field, columns)?)),
		FieldType::Textarea => Err(FilterError::NotFilterable {
			shortname: field.shortname().to_string(),
			field_type: FieldType::Textarea,
		}),
	}
}

pub(crate) fn element_name_for(field: &FieldDefinition) -> String {
	format!("{ELEMENT_PREFIX}{}", field.shortname())
}

/// Construction-time guard shared by the concrete variants.
pub(crate) fn expect_field_type(field: &FieldDefinition, expected: FieldType) -> FilterResult<()> {
	if field.field_type() == expected {
		Ok(())
	} else {
		Err(FilterError::TypeMismatch {
			shortname: field.shortname().to_string(),
			expected,
			actual: field.field_type(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::customfield::CustomFieldColumns;
	use rstest::rstest;

	#[rstest]
	fn test_factory_matches_variant_to_field_type() {
		// Arrange
		let cases = [
			(FieldType::Text, "customfield_f1"),
			(FieldType::Checkbox, "customfield_f2"),
			(FieldType::Date, "customfield_f3"),
			(FieldType::Select, "customfield_f4"),
		];

		for (field_type, expected_name) in cases {
			// Act
			let field = Arc::new(FieldDefinition::new(
				&expected_name[ELEMENT_PREFIX.len()..],
				"Label",
				field_type,
			));
			let filter = filter_for_field(field, &CustomFieldColumns).unwrap();

			// Assert
			assert_eq!(filter.element_name(), expected_name);
			assert_eq!(filter.field().field_type(), field_type);
		}
	}

	#[rstest]
	fn test_factory_rejects_textarea_fields() {
		// Arrange
		let field = Arc::new(FieldDefinition::new("f5", "Notes", FieldType::Textarea));

		// Act
		let result = filter_for_field(field, &CustomFieldColumns);

		// Assert
		assert!(matches!(
			result,
			Err(FilterError::NotFilterable {
				field_type: FieldType::Textarea,
				..
			})
		));
	}

	#[rstest]
	fn test_param_context_counters_are_independent() {
		// Arrange
		let mut params = ParamContext::new();

		// Act & Assert
		assert_eq!(params.next_name("ex_date"), "ex_date0");
		assert_eq!(params.next_name("ex_select"), "ex_select0");
		assert_eq!(params.next_name("ex_date"), "ex_date1");
	}
}
