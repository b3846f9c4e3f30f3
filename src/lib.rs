//! # Resource Library
//!
//! Plugin-side logic for a learning-management platform's resource
//! library: a browsing page over courses and course modules, filterable
//! by custom metadata fields.
//!
//! The crate owns three things:
//!
//! - **Filters** ([`filters`], [`query`]): one filter per custom field,
//!   emitting the right form control and translating a submitted value
//!   into a parametrized SQL predicate fragment. A [`query::FilterSet`]
//!   aggregates the fragments of all active filters into one WHERE
//!   clause with collision-free bound parameters.
//! - **Custom-field data** ([`customfield`]): field definitions, plus an
//!   instance-data handler that formats stored values for display and
//!   round-trips them through backup.
//! - **The page** ([`pages`]): a selector that builds the whole-site or
//!   course-scoped library view and hands it to the renderer.
//!
//! Everything else (form rendering, SQL execution, authentication,
//! routing) stays with the host platform, reached through the traits in
//! [`customfield`] and [`pages`].
//!
//! ## Example
//!
//! ```
//! use resourcelibrary::customfield::{CustomFieldColumns, FieldDefinition, FieldType};
//! use resourcelibrary::forms::SubmittedData;
//! use resourcelibrary::query::FilterSet;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let fields = vec![Arc::new(
//! 	FieldDefinition::new("f2", "Certified", FieldType::Checkbox)
//! 		.with_config("checkbydefault", json!(false)),
//! )];
//! let filters = FilterSet::from_fields(&fields, &CustomFieldColumns).unwrap();
//!
//! let submitted = SubmittedData::new().with("customfield_f2", json!("1"));
//! let (clause, params) = filters.sql_where(&submitted);
//! assert_eq!(clause, "customfield_f2_col = :ex_checkbox0");
//! assert_eq!(params["ex_checkbox0"], "1");
//! ```

pub mod customfield;
pub mod filters;
pub mod forms;
pub mod pages;
pub mod query;

pub use customfield::{
	ColumnResolver, CustomFieldColumns, CustomFieldHandler, FieldDefinition, FieldType,
};
pub use filters::{
	CheckboxFilter, DateFilter, FieldFilter, FilterData, FilterError, ParamContext,
	PredicateFragment, SelectFilter, TextFilter, filter_for_field,
};
pub use forms::{ElementKind, FilterForm, ParamKind, SubmittedData};
pub use pages::{
	Breadcrumb, Course, CourseProvider, PageContext, PageError, Renderer, ResourceLibraryPage,
	ResourceLibraryView, SITE_ID, resource_library_page,
};
pub use query::FilterSet;
