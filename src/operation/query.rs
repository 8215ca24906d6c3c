//! Document query: `POST /api/v1/document/query`.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::FlowKind,
	operation::{ApiOperation, PageOptions, QueryField},
	request::OutboundRequest,
};

/// Parameters of `document` / `query`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
	/// Comma-separated classification ids.
	pub classification_ids: String,
	/// Comma-separated document type ids.
	pub document_type_ids: String,
	/// Field criteria.
	pub query_fields: QueryFields,
	/// Pagination switches.
	pub options: PageOptions,
}
impl QueryParams {
	/// Request body with blank inputs left out.
	pub fn body(&self) -> QueryBody {
		QueryBody {
			classification_ids: split_ids(&self.classification_ids),
			document_type_ids: split_ids(&self.document_type_ids),
			fields: self.query_fields.fields.clone(),
		}
	}
}
impl ApiOperation for QueryParams {
	fn kind(&self) -> FlowKind {
		FlowKind::DocumentQuery
	}

	fn build_request(&self) -> Result<OutboundRequest, ConfigError> {
		let body = serde_json::to_value(self.body())?;

		Ok(self.options.apply(OutboundRequest::post("/api/v1/document/query").json().with_body(body)))
	}
}

/// Wrapper matching the host's `queryFields.fields` collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFields {
	/// Criteria in the order the host listed them.
	pub fields: Vec<QueryField>,
}

/// Wire body of a document query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
	/// Classification filter.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub classification_ids: Vec<String>,
	/// Document type filter.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub document_type_ids: Vec<String>,
	/// Field criteria.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<QueryField>,
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_ids(raw: &str) -> Vec<String> {
	raw.split(',').map(str::trim).filter(|id| !id.is_empty()).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::operation::QueryFieldType;

	#[test]
	fn ids_are_split_and_trimmed() {
		assert_eq!(split_ids("a, b ,c"), vec!["a", "b", "c"]);
		assert_eq!(split_ids(" , ,"), Vec::<String>::new());
		assert_eq!(split_ids(""), Vec::<String>::new());
	}

	#[test]
	fn blank_inputs_are_omitted_from_the_body() {
		let params = QueryParams { classification_ids: "a, b ,c".into(), ..Default::default() };
		let request = params.build_request().expect("Query request should build.");

		assert_eq!(request.method, http::Method::POST);
		assert_eq!(request.url, "/api/v1/document/query");
		assert_eq!(request.body, Some(serde_json::json!({ "classificationIds": ["a", "b", "c"] })));
		assert_eq!(request.headers[http::header::ACCEPT], "application/json");
		assert!(request.query.is_empty());
	}

	#[test]
	fn host_parameters_become_a_full_body() {
		let params: QueryParams = serde_json::from_value(serde_json::json!({
			"classificationIds": "cls-1",
			"documentTypeIds": "type-1, type-2",
			"queryFields": {
				"fields": [
					{ "name": "DocumentTitle", "value": "Invoice", "type": "TEXT_QUERY" },
					{ "name": "Amount", "value": "12" },
				],
			},
			"options": { "enablePagination": true, "pageSize": 25 },
		}))
		.expect("Query parameters should decode.");

		assert_eq!(params.query_fields.fields[1].kind, QueryFieldType::Primitive);

		let request = params.build_request().expect("Query request should build.");

		assert_eq!(
			request.body,
			Some(serde_json::json!({
				"classificationIds": ["cls-1"],
				"documentTypeIds": ["type-1", "type-2"],
				"fields": [
					{ "name": "DocumentTitle", "value": "Invoice", "type": "TEXT_QUERY" },
					{ "name": "Amount", "value": "12", "type": "PRIMITIVE" },
				],
			}))
		);
		assert_eq!(
			request.query,
			vec![("pageSize".into(), "25".into()), ("pageNumber".into(), "0".into())]
		);
	}
}
