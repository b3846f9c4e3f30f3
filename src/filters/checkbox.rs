//! Checkbox custom-field filter

use super::{
	FieldFilter, FilterData, FilterResult, ParamContext, PredicateFragment, element_name_for,
	expect_field_type,
};
use crate::customfield::{ColumnResolver, FieldDefinition, FieldType};
use crate::forms::{ElementKind, FilterForm, ParamKind, SubmittedData};
use std::sync::Arc;

/// Filter over a boolean custom field.
///
/// An unchecked checkbox is submitted as an absent key or empty string and
/// is treated as "do not filter on this field"; it never becomes a
/// predicate for explicit false. That conflation is deliberate product
/// behavior, not something to tidy up.
///
/// # Examples
///
/// ```
/// use resourcelibrary::customfield::{CustomFieldColumns, FieldDefinition, FieldType};
/// use resourcelibrary::filters::{CheckboxFilter, FieldFilter, ParamContext};
/// use resourcelibrary::forms::SubmittedData;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let field = Arc::new(FieldDefinition::new("f2", "Certified", FieldType::Checkbox));
/// let filter = CheckboxFilter::new(field, &CustomFieldColumns).unwrap();
///
/// let submitted = SubmittedData::new().with("customfield_f2", json!("1"));
/// let data = filter.check_data(&submitted);
/// let mut params = ParamContext::new();
/// let fragment = filter.sql_filter(data.as_ref(), &mut params).unwrap();
/// assert_eq!(fragment.condition, "customfield_f2_col = :ex_checkbox0");
/// assert_eq!(fragment.params["ex_checkbox0"], "1");
/// ```
#[derive(Debug)]
pub struct CheckboxFilter {
	field: Arc<FieldDefinition>,
	element_name: String,
	column: String,
}

impl CheckboxFilter {
	/// Fails with [`super::FilterError::TypeMismatch`] unless the field is
	/// a checkbox field.
	pub fn new(field: Arc<FieldDefinition>, columns: &dyn ColumnResolver) -> FilterResult<Self> {
		expect_field_type(&field, FieldType::Checkbox)?;
		let element_name = element_name_for(&field);
		let column = columns.sql_field_name(&field);
		Ok(Self {
			field,
			element_name,
			column,
		})
	}
}

impl FieldFilter for CheckboxFilter {
	fn field(&self) -> &FieldDefinition {
		&self.field
	}

	fn element_name(&self) -> &str {
		&self.element_name
	}

	fn add_to_form(&self, form: &mut FilterForm) {
		form.add_element(ElementKind::Checkbox, &self.element_name, self.label());
		form.set_default(
			&self.element_name,
			serde_json::Value::Bool(self.field.config_bool("checkbydefault")),
		);
		form.set_type(&self.element_name, ParamKind::Bool);
	}

	fn check_data(&self, submitted: &SubmittedData) -> Option<FilterData> {
		submitted
			.non_empty_str(&self.element_name)
			.map(FilterData::Value)
	}

	fn sql_filter(
		&self,
		data: Option<&FilterData>,
		params: &mut ParamContext,
	) -> Option<PredicateFragment> {
		let FilterData::Value(value) = data? else {
			return None;
		};
		let name = params.next_name("ex_checkbox");
		Some(PredicateFragment::single(
			format!("{} = :{}", self.column, name),
			name,
			value.clone(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::customfield::CustomFieldColumns;
	use crate::filters::FilterError;
	use rstest::rstest;
	use serde_json::json;

	fn checkbox_field() -> Arc<FieldDefinition> {
		Arc::new(
			FieldDefinition::new("f2", "Certified", FieldType::Checkbox)
				.with_config("checkbydefault", json!(false)),
		)
	}

	#[rstest]
	#[case(FieldType::Text)]
	#[case(FieldType::Date)]
	#[case(FieldType::Select)]
	#[case(FieldType::Textarea)]
	fn test_construction_rejects_non_checkbox_fields(#[case] field_type: FieldType) {
		// Arrange
		let field = Arc::new(FieldDefinition::new("f2", "Certified", field_type));

		// Act
		let result = CheckboxFilter::new(field, &CustomFieldColumns);

		// Assert
		assert!(matches!(
			result,
			Err(FilterError::TypeMismatch {
				expected: FieldType::Checkbox,
				..
			})
		));
	}

	#[rstest]
	fn test_add_to_form_emits_checkbox_with_default() {
		// Arrange
		let field = Arc::new(
			FieldDefinition::new("f2", "Certified", FieldType::Checkbox)
				.with_config("checkbydefault", json!(true)),
		);
		let filter = CheckboxFilter::new(field, &CustomFieldColumns).unwrap();
		let mut form = FilterForm::new();

		// Act
		filter.add_to_form(&mut form);

		// Assert
		let element = form.element("customfield_f2").unwrap();
		assert_eq!(element.kind, ElementKind::Checkbox);
		assert_eq!(element.label, "Certified");
		assert_eq!(form.default_of("customfield_f2"), Some(&json!(true)));
		assert_eq!(form.type_of("customfield_f2"), Some(ParamKind::Bool));
	}

	#[rstest]
	fn test_check_data_absent_key_is_not_set() {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();

		// Act & Assert
		assert_eq!(filter.check_data(&SubmittedData::new()), None);
	}

	#[rstest]
	fn test_check_data_empty_string_is_not_set() {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();
		let submitted = SubmittedData::new().with("customfield_f2", json!(""));

		// Act & Assert
		assert_eq!(filter.check_data(&submitted), None);
	}

	#[rstest]
	#[case(json!("1"), "1")]
	#[case(json!(1), "1")]
	#[case(json!("0"), "0")]
	fn test_check_data_non_empty_value(#[case] value: serde_json::Value, #[case] expected: &str) {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();
		let submitted = SubmittedData::new().with("customfield_f2", value);

		// Act & Assert
		assert_eq!(
			filter.check_data(&submitted),
			Some(FilterData::value(expected))
		);
	}

	#[rstest]
	fn test_sql_filter_not_set_yields_no_predicate() {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();
		let mut params = ParamContext::new();

		// Act & Assert
		assert_eq!(filter.sql_filter(None, &mut params), None);
	}

	#[rstest]
	fn test_sql_filter_binds_value_to_unique_param() {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();
		let mut params = ParamContext::new();
		let data = FilterData::value("1");

		// Act
		let fragment = filter.sql_filter(Some(&data), &mut params).unwrap();

		// Assert
		assert_eq!(fragment.condition, "customfield_f2_col = :ex_checkbox0");
		assert_eq!(fragment.params.len(), 1);
		assert_eq!(fragment.params["ex_checkbox0"], "1");
	}

	#[rstest]
	fn test_sequential_fragments_never_share_param_names() {
		// Arrange
		let filter = CheckboxFilter::new(checkbox_field(), &CustomFieldColumns).unwrap();
		let mut params = ParamContext::new();

		// Act
		let first = filter
			.sql_filter(Some(&FilterData::value("1")), &mut params)
			.unwrap();
		let second = filter
			.sql_filter(Some(&FilterData::value("0")), &mut params)
			.unwrap();

		// Assert
		assert_eq!(first.params["ex_checkbox0"], "1");
		assert_eq!(second.params["ex_checkbox1"], "0");
		assert_ne!(first.condition, second.condition);
	}
}
