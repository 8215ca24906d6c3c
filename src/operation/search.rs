//! Custom object search: `POST /api/v1/object/{customObjectType}/search`.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::FlowKind,
	operation::{ApiOperation, PageOptions, QueryField, path_segment},
	request::OutboundRequest,
};

/// Parameters of `object` / `search`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
	/// Custom object type, e.g. `QPerson`.
	pub custom_object_type: String,
	/// Criteria sent as the request body.
	#[serde(default)]
	pub search_criteria: SearchCriteria,
	/// Pagination switches.
	#[serde(default)]
	pub options: PageOptions,
}
impl SearchParams {
	/// Search over `custom_object_type` with no criteria.
	pub fn new(custom_object_type: impl Into<String>) -> Self {
		Self { custom_object_type: custom_object_type.into(), ..Default::default() }
	}

	/// Appends one criterion.
	pub fn with_value(mut self, field: QueryField) -> Self {
		self.search_criteria.query_values.push(field);

		self
	}

	/// Replaces the pagination switches.
	pub fn with_options(mut self, options: PageOptions) -> Self {
		self.options = options;

		self
	}
}
impl ApiOperation for SearchParams {
	fn kind(&self) -> FlowKind {
		FlowKind::ObjectSearch
	}

	fn build_request(&self) -> Result<OutboundRequest, ConfigError> {
		let object_type = path_segment("customObjectType", &self.custom_object_type)?;
		let body = serde_json::to_value(&self.search_criteria.query_values)?;
		let request = OutboundRequest::post(format!("/api/v1/object/{object_type}/search"))
			.json()
			.with_body(body);

		Ok(self.options.apply(request))
	}
}

/// Wrapper matching the host's `searchCriteria.queryValues` collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
	/// Criteria in the order the host listed them.
	pub query_values: Vec<QueryField>,
}
