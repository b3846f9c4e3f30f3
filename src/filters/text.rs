//! Free-text custom-field filter

use super::{
	FieldFilter, FilterData, FilterResult, ParamContext, PredicateFragment, element_name_for,
	expect_field_type,
};
use crate::customfield::{ColumnResolver, FieldDefinition, FieldType};
use crate::forms::{ElementKind, FilterForm, ParamKind, SubmittedData};
use std::sync::Arc;

/// Substring filter over a short text custom field.
///
/// Whitespace-only input counts as not set; an accepted value matches as
/// an infix via `LIKE` with surrounding wildcards.
#[derive(Debug)]
pub struct TextFilter {
	field: Arc<FieldDefinition>,
	element_name: String,
	column: String,
}

impl TextFilter {
	pub fn new(field: Arc<FieldDefinition>, columns: &dyn ColumnResolver) -> FilterResult<Self> {
		expect_field_type(&field, FieldType::Text)?;
		let element_name = element_name_for(&field);
		let column = columns.sql_field_name(&field);
		Ok(Self {
			field,
			element_name,
			column,
		})
	}
}

impl FieldFilter for TextFilter {
	fn field(&self) -> &FieldDefinition {
		&self.field
	}

	fn element_name(&self) -> &str {
		&self.element_name
	}

	fn add_to_form(&self, form: &mut FilterForm) {
		form.add_element(ElementKind::Text, &self.element_name, self.label());
		form.set_type(&self.element_name, ParamKind::Text);
	}

	fn check_data(&self, submitted: &SubmittedData) -> Option<FilterData> {
		let value = submitted.non_empty_str(&self.element_name)?;
		let trimmed = value.trim();
		if trimmed.is_empty() {
			return None;
		}
		Some(FilterData::value(trimmed))
	}

	fn sql_filter(
		&self,
		data: Option<&FilterData>,
		params: &mut ParamContext,
	) -> Option<PredicateFragment> {
		let FilterData::Value(value) = data? else {
			return None;
		};
		let name = params.next_name("ex_text");
		Some(PredicateFragment::single(
			format!("{} LIKE :{}", self.column, name),
			name,
			format!("%{value}%"),
		))
	}
}
