//! Single-select custom-field filter

use super::{
	FieldFilter, FilterData, FilterResult, ParamContext, PredicateFragment, element_name_for,
	expect_field_type,
};
use crate::customfield::{ColumnResolver, FieldDefinition, FieldType};
use crate::forms::{ElementKind, FilterForm, ParamKind, SubmittedData};
use std::sync::Arc;

/// Filter over a single-select custom field.
///
/// Values are stored as 1-based indexes into the field's configured option
/// list; a submission that is not a valid index counts as not set.
#[derive(Debug)]
pub struct SelectFilter {
	field: Arc<FieldDefinition>,
	element_name: String,
	column: String,
	options: Vec<String>,
}

impl SelectFilter {
	pub fn new(field: Arc<FieldDefinition>, columns: &dyn ColumnResolver) -> FilterResult<Self> {
		expect_field_type(&field, FieldType::Select)?;
		let element_name = element_name_for(&field);
		let column = columns.sql_field_name(&field);
		let options = field.select_options();
		Ok(Self {
			field,
			element_name,
			column,
			options,
		})
	}

	pub fn options(&self) -> &[String] {
		&self.options
	}
}

impl FieldFilter for SelectFilter {
	fn field(&self) -> &FieldDefinition {
		&self.field
	}

	fn element_name(&self) -> &str {
		&self.element_name
	}

	fn add_to_form(&self, form: &mut FilterForm) {
		form.add_element(
			ElementKind::Select {
				options: self.options.clone(),
			},
			&self.element_name,
			self.label(),
		);
		form.set_type(&self.element_name, ParamKind::Int);
	}

	fn check_data(&self, submitted: &SubmittedData) -> Option<FilterData> {
		let value = submitted.non_empty_str(&self.element_name)?;
		let index: usize = value.parse().ok()?;
		if index == 0 || index > self.options.len() {
			return None;
		}
		Some(FilterData::Value(value))
	}

	fn sql_filter(
		&self,
		data: Option<&FilterData>,
		params: &mut ParamContext,
	) -> Option<PredicateFragment> {
		let FilterData::Value(value) = data? else {
			return None;
		};
		let name = params.next_name("ex_select");
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

	fn select_filter() -> SelectFilter {
		let field = Arc::new(
			FieldDefinition::new("f4", "Level", FieldType::Select)
				.with_config("options", json!("a\nb\nc")),
		);
		SelectFilter::new(field, &CustomFieldColumns).unwrap()
	}

	#[rstest]
	fn test_construction_rejects_non_select_fields() {
		// Arrange
		let field = Arc::new(FieldDefinition::new("f4", "Level", FieldType::Text));

		// Act & Assert
		assert!(matches!(
			SelectFilter::new(field, &CustomFieldColumns),
			Err(FilterError::TypeMismatch {
				expected: FieldType::Select,
				..
			})
		));
	}

	#[rstest]
	fn test_add_to_form_carries_options() {
		// Arrange
		let filter = select_filter();
		let mut form = FilterForm::new();

		// Act
		filter.add_to_form(&mut form);

		// Assert
		let element = form.element("customfield_f4").unwrap();
		assert_eq!(
			element.kind,
			ElementKind::Select {
				options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
			}
		);
		assert_eq!(form.type_of("customfield_f4"), Some(ParamKind::Int));
	}

	#[rstest]
	fn test_check_data_accepts_index_in_range() {
		// Arrange
		let filter = select_filter();
		let submitted = SubmittedData::new().with("customfield_f4", json!(2));

		// Act & Assert
		assert_eq!(filter.check_data(&submitted), Some(FilterData::value("2")));
	}

	#[rstest]
	#[case(json!(""))]
	#[case(json!(0))]
	#[case(json!(4))]
	#[case(json!("b"))]
	fn test_check_data_rejects_invalid_index(#[case] value: serde_json::Value) {
		// Arrange
		let filter = select_filter();
		let submitted = SubmittedData::new().with("customfield_f4", value);

		// Act & Assert
		assert_eq!(filter.check_data(&submitted), None);
	}

	#[rstest]
	fn test_sql_filter_binds_index() {
		// Arrange
		let filter = select_filter();
		let mut params = ParamContext::new();
		let data = FilterData::value("2");

		// Act
		let fragment = filter.sql_filter(Some(&data), &mut params).unwrap();

		// Assert
		assert_eq!(fragment.condition, "customfield_f4_col = :ex_select0");
		assert_eq!(fragment.params["ex_select0"], "2");
	}
}
