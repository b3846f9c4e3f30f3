//! Predicate aggregation
//!
//! A [`FilterSet`] holds the filters of one search form and folds their
//! predicate fragments into a single WHERE clause plus merged parameter
//! map. Executing the resulting query is the data-access layer's job;
//! nothing in this crate touches a database.

use crate::customfield::{ColumnResolver, FieldDefinition};
use crate::filters::{FieldFilter, FilterError, FilterResult, ParamContext, filter_for_field};
use crate::forms::{FilterForm, SubmittedData};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// All filters backing one search/browse form.
#[derive(Default)]
pub struct FilterSet {
	filters: Vec<Box<dyn FieldFilter>>,
}

impl FilterSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build the set from a list of field definitions, skipping fields
	/// that have no filter (long-text fields).
	///
	/// # Examples
	///
	/// ```
	/// use resourcelibrary::customfield::{CustomFieldColumns, FieldDefinition, FieldType};
	/// use resourcelibrary::query::FilterSet;
	/// use std::sync::Arc;
	///
	/// let fields = vec![
	/// 	Arc::new(FieldDefinition::new("f1", "Description", FieldType::Text)),
	/// 	Arc::new(FieldDefinition::new("f5", "Notes", FieldType::Textarea)),
	/// ];
	/// let filters = FilterSet::from_fields(&fields, &CustomFieldColumns).unwrap();
	/// assert_eq!(filters.len(), 1);
	/// ```
	pub fn from_fields(
		fields: &[Arc<FieldDefinition>],
		columns: &dyn ColumnResolver,
	) -> FilterResult<Self> {
		let mut set = Self::new();
		for field in fields {
			match filter_for_field(Arc::clone(field), columns) {
				Ok(filter) => set.push(filter),
				Err(FilterError::NotFilterable { shortname, .. }) => {
					debug!(field = %shortname, "field has no filter, skipping");
				}
				Err(error) => return Err(error),
			}
		}
		Ok(set)
	}

	pub fn push(&mut self, filter: Box<dyn FieldFilter>) {
		self.filters.push(filter);
	}

	pub fn filters(&self) -> &[Box<dyn FieldFilter>] {
		&self.filters
	}

	pub fn len(&self) -> usize {
		self.filters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}

	/// Emit every filter's controls into the form.
	pub fn add_to_form(&self, form: &mut FilterForm) {
		for filter in &self.filters {
			filter.add_to_form(form);
		}
	}

	/// Fold the active filters over one submission into a WHERE clause and
	/// its bound parameters.
	///
	/// Conditions are joined with `AND`; parameter maps merge without
	/// collisions because every fragment draws its names from one fresh
	/// [`ParamContext`]. Inactive filters contribute nothing; with no
	/// active filter at all the clause is empty.
	pub fn sql_where(&self, submitted: &SubmittedData) -> (String, HashMap<String, String>) {
		let mut param_names = ParamContext::new();
		let mut conditions = Vec::new();
		let mut params = HashMap::new();
		for filter in &self.filters {
			let data = filter.check_data(submitted);
			if let Some(fragment) = filter.sql_filter(data.as_ref(), &mut param_names) {
				conditions.push(fragment.condition);
				params.extend(fragment.params);
			}
		}
		let clause = conditions.join(" AND ");
		debug!(%clause, params = params.len(), "built custom-field filter clause");
		(clause, params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::customfield::{CustomFieldColumns, FieldType};
	use rstest::rstest;
	use serde_json::json;

	fn library_fields() -> Vec<Arc<FieldDefinition>> {
		vec![
			Arc::new(FieldDefinition::new("f1", "Description", FieldType::Text)),
			Arc::new(
				FieldDefinition::new("f2", "Certified", FieldType::Checkbox)
					.with_config("checkbydefault", json!(false)),
			),
			Arc::new(FieldDefinition::new("f3", "Published", FieldType::Date)),
			Arc::new(
				FieldDefinition::new("f4", "Level", FieldType::Select)
					.with_config("options", json!("a\nb\nc")),
			),
			Arc::new(FieldDefinition::new("f5", "Notes", FieldType::Textarea)),
		]
	}

	#[rstest]
	fn test_from_fields_skips_unfilterable_fields() {
		// Arrange & Act
		let filters = FilterSet::from_fields(&library_fields(), &CustomFieldColumns).unwrap();

		// Assert: textarea f5 is dropped, the other four survive.
		assert_eq!(filters.len(), 4);
	}

	#[rstest]
	fn test_sql_where_empty_submission_yields_empty_clause() {
		// Arrange
		let filters = FilterSet::from_fields(&library_fields(), &CustomFieldColumns).unwrap();

		// Act
		let (clause, params) = filters.sql_where(&SubmittedData::new());

		// Assert
		assert!(clause.is_empty());
		assert!(params.is_empty());
	}

	#[rstest]
	fn test_sql_where_joins_active_filters_with_and() {
		// Arrange
		let filters = FilterSet::from_fields(&library_fields(), &CustomFieldColumns).unwrap();
		let submitted = SubmittedData::new()
			.with("customfield_f1", json!("some text"))
			.with("customfield_f2", json!("1"))
			.with("customfield_f4", json!(2));

		// Act
		let (clause, params) = filters.sql_where(&submitted);

		// Assert
		assert_eq!(
			clause,
			"customfield_f1_col LIKE :ex_text0 AND \
			 customfield_f2_col = :ex_checkbox0 AND \
			 customfield_f4_col = :ex_select0"
		);
		assert_eq!(params.len(), 3);
		assert_eq!(params["ex_text0"], "%some text%");
		assert_eq!(params["ex_checkbox0"], "1");
		assert_eq!(params["ex_select0"], "2");
	}

	#[rstest]
	fn test_sql_where_same_variant_filters_never_collide() {
		// Arrange: two independent checkbox fields on one form.
		let fields = vec![
			Arc::new(FieldDefinition::new("f2", "Certified", FieldType::Checkbox)),
			Arc::new(FieldDefinition::new("f6", "Archived", FieldType::Checkbox)),
		];
		let filters = FilterSet::from_fields(&fields, &CustomFieldColumns).unwrap();
		let submitted = SubmittedData::new()
			.with("customfield_f2", json!("1"))
			.with("customfield_f6", json!("0"));

		// Act
		let (clause, params) = filters.sql_where(&submitted);

		// Assert
		assert_eq!(
			clause,
			"customfield_f2_col = :ex_checkbox0 AND customfield_f6_col = :ex_checkbox1"
		);
		assert_eq!(params["ex_checkbox0"], "1");
		assert_eq!(params["ex_checkbox1"], "0");
	}

	#[rstest]
	fn test_add_to_form_emits_all_controls() {
		// Arrange
		let filters = FilterSet::from_fields(&library_fields(), &CustomFieldColumns).unwrap();
		let mut form = FilterForm::new();

		// Act
		filters.add_to_form(&mut form);

		// Assert: text + checkbox + two date bounds + select.
		assert_eq!(form.elements().len(), 5);
		assert!(form.element("customfield_f2").is_some());
		assert!(form.element("customfield_f3_after").is_some());
	}
}
