//! Date custom-field filter

use super::{
	FieldFilter, FilterData, FilterResult, ParamContext, PredicateFragment, element_name_for,
	expect_field_type,
};
use crate::customfield::{ColumnResolver, FieldDefinition, FieldType};
use crate::forms::{ElementKind, FilterForm, ParamKind, SubmittedData};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Range filter over a date custom field.
///
/// Emits a pair of date controls (`…_after`, `…_before`); values travel as
/// epoch seconds. Either bound may be left empty. Bounds outside the
/// field's configured `startyear`/`endyear` window are dropped as if they
/// had not been submitted.
#[derive(Debug)]
pub struct DateFilter {
	field: Arc<FieldDefinition>,
	element_name: String,
	column: String,
	min_epoch: Option<i64>,
	max_epoch: Option<i64>,
}

impl DateFilter {
	pub fn new(field: Arc<FieldDefinition>, columns: &dyn ColumnResolver) -> FilterResult<Self> {
		expect_field_type(&field, FieldType::Date)?;
		let element_name = element_name_for(&field);
		let column = columns.sql_field_name(&field);
		let min_epoch = field.config_i64("startyear").and_then(year_start_epoch);
		let max_epoch = field.config_i64("endyear").and_then(year_end_epoch);
		Ok(Self {
			field,
			element_name,
			column,
			min_epoch,
			max_epoch,
		})
	}

	fn after_name(&self) -> String {
		format!("{}_after", self.element_name)
	}

	fn before_name(&self) -> String {
		format!("{}_before", self.element_name)
	}

	fn bound_of(&self, submitted: &SubmittedData, element: &str) -> Option<i64> {
		let epoch: i64 = submitted.non_empty_str(element)?.parse().ok()?;
		if self.min_epoch.is_some_and(|min| epoch < min) {
			return None;
		}
		if self.max_epoch.is_some_and(|max| epoch > max) {
			return None;
		}
		Some(epoch)
	}
}

fn year_start_epoch(year: i64) -> Option<i64> {
	let year = i32::try_from(year).ok()?;
	Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?.timestamp())
}

fn year_end_epoch(year: i64) -> Option<i64> {
	let year = i32::try_from(year).ok()?;
	Some(
		Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59)
			.single()?
			.timestamp(),
	)
}

impl FieldFilter for DateFilter {
	fn field(&self) -> &FieldDefinition {
		&self.field
	}

	fn element_name(&self) -> &str {
		&self.element_name
	}

	fn add_to_form(&self, form: &mut FilterForm) {
		form.add_element(
			ElementKind::Date,
			self.after_name(),
			format!("{} (after)", self.label()),
		);
		form.set_type(self.after_name(), ParamKind::Int);
		form.add_element(
			ElementKind::Date,
			self.before_name(),
			format!("{} (before)", self.label()),
		);
		form.set_type(self.before_name(), ParamKind::Int);
	}

	fn check_data(&self, submitted: &SubmittedData) -> Option<FilterData> {
		let after = self.bound_of(submitted, &self.after_name());
		let before = self.bound_of(submitted, &self.before_name());
		if after.is_none() && before.is_none() {
			return None;
		}
		Some(FilterData::DateRange { after, before })
	}

	fn sql_filter(
		&self,
		data: Option<&FilterData>,
		params: &mut ParamContext,
	) -> Option<PredicateFragment> {
		let FilterData::DateRange { after, before } = data? else {
			return None;
		};
		let mut conditions = Vec::new();
		let mut bound_params = HashMap::new();
		if let Some(after) = after {
			let name = params.next_name("ex_date");
			conditions.push(format!("{} >= :{}", self.column, name));
			bound_params.insert(name, after.to_string());
		}
		if let Some(before) = before {
			let name = params.next_name("ex_date");
			conditions.push(format!("{} <= :{}", self.column, name));
			bound_params.insert(name, before.to_string());
		}
		if conditions.is_empty() {
			return None;
		}
		Some(PredicateFragment {
			condition: conditions.join(" AND "),
			params: bound_params,
		})
	}
}
