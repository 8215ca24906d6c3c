//! QAction operations: each variant knows how to build its request and shape its response.
//!
//! The set is closed. [`Operation`] dispatches to the per-resource parameter types in
//! [`download`], [`query`], [`search`], and [`build`], which all implement
//! [`ApiOperation`]. Hosts hand parameters over as camelCase JSON tagged with `resource` and
//! `operation`; [`Operation::from_parameters`] decodes them.

pub mod build;
pub mod download;
pub mod query;
pub mod search;

pub use build::*;
pub use download::*;
pub use query::*;
pub use search::*;

// self
use crate::{
	_prelude::*,
	binary::{BinaryData, BinaryPackager},
	error::{ConfigError, TransportError},
	obs::FlowKind,
	request::OutboundRequest,
	transport::HttpResponse,
};

/// Request-building half of an operation.
pub trait ApiOperation {
	/// Flow label used for spans and counters.
	fn kind(&self) -> FlowKind;

	/// Builds the unauthenticated request for these parameters.
	fn build_request(&self) -> Result<OutboundRequest, ConfigError>;
}

/// Every operation the broker can run.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
	/// `document` / `download`.
	Download(DownloadParams),
	/// `document` / `query`.
	Query(QueryParams),
	/// `object` / `search`.
	Search(SearchParams),
	/// `information` / `getBuild`.
	GetBuild(GetBuildParams),
}
impl Operation {
	/// Decodes host parameters such as
	/// `{"resource": "document", "operation": "download", "documentId": "…"}`.
	pub fn from_parameters(value: serde_json::Value) -> Result<Self, ConfigError> {
		let raw: RawParameters = decode(value)?;

		match (raw.resource.as_str(), raw.operation.as_str()) {
			("document", "download") => Ok(Self::Download(decode(raw.params)?)),
			("document", "query") => Ok(Self::Query(decode(raw.params)?)),
			("object", "search") => Ok(Self::Search(decode(raw.params)?)),
			("information", "getBuild") => Ok(Self::GetBuild(GetBuildParams)),
			_ => Err(ConfigError::UnsupportedOperation {
				resource: raw.resource,
				operation: raw.operation,
			}),
		}
	}

	/// Shapes a successful response into output items.
	///
	/// Downloads yield `item_count` records sharing one attachment; JSON operations yield
	/// one record per array element.
	pub async fn transform_response(
		&self,
		response: HttpResponse,
		item_count: usize,
		packager: &dyn BinaryPackager,
	) -> Result<Vec<OutputItem>> {
		match self {
			Self::Download(params) => {
				let result = DownloadResponse::from_response(params.document_id.trim(), response)
					.package(packager)
					.await?;

				Ok(result.into_items(item_count))
			},
			Self::Query(_) | Self::Search(_) | Self::GetBuild(_) =>
				Ok(json_items(&response)?),
		}
	}

	fn as_api(&self) -> &dyn ApiOperation {
		match self {
			Self::Download(params) => params,
			Self::Query(params) => params,
			Self::Search(params) => params,
			Self::GetBuild(params) => params,
		}
	}
}
impl ApiOperation for Operation {
	fn kind(&self) -> FlowKind {
		self.as_api().kind()
	}

	fn build_request(&self) -> Result<OutboundRequest, ConfigError> {
		self.as_api().build_request()
	}
}

/// One record handed back to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
	/// Structured payload.
	pub json: serde_json::Value,
	/// Named binary attachments.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub binary: Option<BTreeMap<String, BinaryData>>,
}
impl OutputItem {
	/// Item carrying only JSON.
	pub fn json(json: serde_json::Value) -> Self {
		Self { json, binary: None }
	}

	/// Item carrying JSON plus one attachment stored under `property`.
	pub fn with_binary(
		json: serde_json::Value,
		property: impl Into<String>,
		binary: BinaryData,
	) -> Self {
		Self { json, binary: Some(BTreeMap::from([(property.into(), binary)])) }
	}
}

/// Pagination switches shared by query and search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageOptions {
	/// Adds `pageSize`/`pageNumber` when set.
	pub enable_pagination: bool,
	/// Items per page; unset or zero means 50.
	pub page_size: Option<u32>,
	/// Zero-based page index; unset means 0.
	pub page_number: Option<u32>,
}
impl PageOptions {
	const DEFAULT_PAGE_SIZE: u32 = 50;

	/// Enabled pagination at the given page.
	pub fn page(page_size: u32, page_number: u32) -> Self {
		Self { enable_pagination: true, page_size: Some(page_size), page_number: Some(page_number) }
	}

	pub(crate) fn apply(&self, request: OutboundRequest) -> OutboundRequest {
		if !self.enable_pagination {
			return request;
		}

		let page_size =
			self.page_size.filter(|size| *size > 0).unwrap_or(Self::DEFAULT_PAGE_SIZE);

		request
			.with_query("pageSize", page_size)
			.with_query("pageNumber", self.page_number.unwrap_or_default())
	}
}

/// One `{name, value, type}` criterion sent to query and search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryField {
	/// Field name, e.g. `DocumentTitle`.
	pub name: String,
	/// Value to match.
	pub value: String,
	/// Match semantics.
	#[serde(rename = "type", default)]
	pub kind: QueryFieldType,
}
impl QueryField {
	/// Creates a criterion with explicit match semantics.
	pub fn new(name: impl Into<String>, value: impl Into<String>, kind: QueryFieldType) -> Self {
		Self { name: name.into(), value: value.into(), kind }
	}
}

/// Match semantics of a [`QueryField`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryFieldType {
	/// Date value.
	Date,
	/// Date range.
	DateRange,
	/// Plain string or number.
	#[default]
	Primitive,
	/// Text search query.
	TextQuery,
	/// List of text search queries.
	TextQueryList,
}

#[derive(Deserialize)]
struct RawParameters {
	resource: String,
	operation: String,
	#[serde(flatten)]
	params: serde_json::Value,
}

fn decode<T>(value: serde_json::Value) -> Result<T, ConfigError>
where
	T: for<'de> Deserialize<'de>,
{
	serde_path_to_error::deserialize(value)
		.map_err(|source| ConfigError::Decode { what: "parameters", source })
}

/// Trims, validates, and returns a value destined for a URL path segment.
pub(crate) fn path_segment<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(ConfigError::MissingField { field });
	}
	if trimmed.contains(['/', '?', '#']) {
		return Err(ConfigError::InvalidParameter { field, value: trimmed.to_owned() });
	}

	Ok(trimmed)
}

/// Splits JSON responses into items: arrays fan out, anything else is one item.
pub(crate) fn json_items(response: &HttpResponse) -> Result<Vec<OutputItem>, TransportError> {
	let body = response.body();

	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(vec![OutputItem::json(serde_json::Value::Object(Default::default()))]);
	}

	let mut de = serde_json::Deserializer::from_slice(body);
	let value: serde_json::Value = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| TransportError::ResponseParse { source, status: response.status().as_u16() })?;

	Ok(match value {
		serde_json::Value::Array(values) => values.into_iter().map(OutputItem::json).collect(),
		other => vec![OutputItem::json(other)],
	})
}
