//! Resource library page
//!
//! The one page the plugin exposes: given an optional course id from the
//! request, pick the whole-site or course-scoped library view, resolve
//! the course through the platform's context layer, and hand the chosen
//! view to the renderer. Routing and HTTP belong to the host.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Reserved course id meaning "no specific course; whole-site scope".
pub const SITE_ID: i64 = 1;

/// Path of the resource library page, relative to the platform root.
pub const PAGE_URL: &str = "/resourcelibrary";

const PAGE_TITLE: &str = "Resource library";
const COURSE_LIBRARY_CRUMB: &str = "Course resource library";

/// Whole-site library view model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteLibrary;

/// Library view model scoped to one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseLibrary {
	pub course_id: i64,
}

/// The renderable handed to the renderer, unmodified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ResourceLibraryView {
	Site(SiteLibrary),
	Course(CourseLibrary),
}

/// Course record as resolved by the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
	pub id: i64,
	pub shortname: String,
	pub fullname: String,
}

/// One navigation entry on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
	pub label: String,
	pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
	#[error("course {course_id} does not exist")]
	NotFound { course_id: i64 },
	#[error("access to course {course_id} denied")]
	AccessDenied { course_id: i64 },
	#[error("rendering failed: {0}")]
	Render(String),
}

/// Course resolution and access checks, owned by the platform.
///
/// Failures abort page construction; this crate never masks them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseProvider: Send + Sync {
	async fn require_course(&self, course_id: i64) -> Result<Course, PageError>;
}

/// Produces the final output for a view model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
	async fn render(&self, view: &ResourceLibraryView) -> Result<String, PageError>;
}

/// Collaborators the page needs, passed in explicitly.
pub struct PageContext {
	pub courses: Arc<dyn CourseProvider>,
	pub renderer: Arc<dyn Renderer>,
}

/// Fully assembled page, ready for the host to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceLibraryPage {
	pub title: String,
	pub heading: String,
	pub url: String,
	pub breadcrumbs: Vec<Breadcrumb>,
	pub body: String,
}

/// Build the resource library page for the given course id.
///
/// A missing id means the site sentinel. The sentinel produces the
/// whole-site view with no extra navigation; any other id is resolved
/// through the course provider (propagating not-found/access-denied) and
/// produces the course-scoped view plus one breadcrumb back to the
/// whole-site library.
pub async fn resource_library_page(
	context: &PageContext,
	course_id: Option<i64>,
) -> Result<ResourceLibraryPage, PageError> {
	let course_id = course_id.unwrap_or(SITE_ID);

	let (view, url, breadcrumbs) = if course_id == SITE_ID {
		debug!("site-scoped resource library");
		(
			ResourceLibraryView::Site(SiteLibrary),
			PAGE_URL.to_string(),
			Vec::new(),
		)
	} else {
		let course = context.courses.require_course(course_id).await?;
		debug!(course = %course.shortname, "course-scoped resource library");
		(
			ResourceLibraryView::Course(CourseLibrary { course_id }),
			format!("{PAGE_URL}?courseid={course_id}"),
			// Back-link to the whole-site library: the page URL with all
			// parameters stripped.
			vec![Breadcrumb {
				label: COURSE_LIBRARY_CRUMB.to_string(),
				url: PAGE_URL.to_string(),
			}],
		)
	};

	let body = context.renderer.render(&view).await?;
	Ok(ResourceLibraryPage {
		title: PAGE_TITLE.to_string(),
		heading: PAGE_TITLE.to_string(),
		url,
		breadcrumbs,
		body,
	})
}
