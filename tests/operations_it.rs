mod support;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use qaction_broker::{
	binary::DEFAULT_MIME_TYPE,
	credentials::{CREDENTIAL_NAME, StaticCredentials},
	error::{ConfigError, Error, TransportError},
	operation::{
		BINARY_PROPERTY, DownloadParams, GetBuildParams, Operation, OutputItem, PageOptions,
		QueryField, QueryFieldType, QueryParams, SearchParams,
	},
	request::OutboundRequest,
};
use support::*;

#[tokio::test]
async fn download_fans_out_one_attachment_per_item() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let login = mock_login(&server, "abc123").await;
	let download = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/document/d-1/download")
				.query_param("latestVersion", "true")
				.query_param("prohibitPDFConversion", "false")
				.header("authorization", "Bearer abc123");
			then.status(200)
				.header("content-type", "application/pdf")
				.header("content-disposition", "attachment; filename=\"report.pdf\"")
				.body(b"%PDF-1.7");
		})
		.await;
	let operation = Operation::Download(DownloadParams::new("d-1"));
	let items = broker
		.execute(&credentials, &operation, 2)
		.await
		.expect("Download should succeed.");

	assert_eq!(items.len(), 2);

	for item in &items {
		assert_eq!(
			item.json,
			json!({
				"documentId": "d-1",
				"fileName": "report.pdf",
				"mimeType": "application/pdf",
				"size": 8,
			})
		);

		let binary = &item.binary.as_ref().expect("Download items should carry binary data.")
			[BINARY_PROPERTY];

		assert_eq!(binary.data, b"%PDF-1.7");
		assert_eq!(binary.file_extension.as_deref(), Some("pdf"));
	}

	login.assert_async().await;
	download.assert_async().await;
}

#[tokio::test]
async fn download_without_headers_uses_defaults() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let download = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/document/42/download")
				.query_param("latestVersion", "false")
				.query_param("prohibitPDFConversion", "true");
			then.status(200).body(b"raw-bytes");
		})
		.await;
	let params = DownloadParams::new("42").latest_version(false).prohibit_pdf_conversion(true);
	let result = broker.download(&credentials, &params).await.expect("Download should succeed.");

	assert_eq!(result.file_name, "document_42");
	assert_eq!(result.mime_type, DEFAULT_MIME_TYPE);
	assert_eq!(result.size, 9);

	download.assert_async().await;
}

#[tokio::test]
async fn query_sends_split_ids_and_pagination() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let query = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/document/query")
				.query_param("pageSize", "50")
				.query_param("pageNumber", "0")
				.header("authorization", "Bearer abc123")
				.header("content-type", "application/json")
				.json_body(json!({
					"classificationIds": ["a", "b", "c"],
					"fields": [{ "name": "DocumentTitle", "value": "Invoice", "type": "TEXT_QUERY" }],
				}));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!([{ "id": "doc-1" }, { "id": "doc-2" }]));
		})
		.await;
	let operation = Operation::from_parameters(json!({
		"resource": "document",
		"operation": "query",
		"classificationIds": "a, b ,c",
		"documentTypeIds": " ",
		"queryFields": {
			"fields": [{ "name": "DocumentTitle", "value": "Invoice", "type": "TEXT_QUERY" }],
		},
		"options": { "enablePagination": true },
	}))
	.expect("Query parameters should decode.");
	let items = broker.execute(&credentials, &operation, 1).await.expect("Query should succeed.");

	assert_eq!(items.len(), 2);
	assert_eq!(items[0].json, json!({ "id": "doc-1" }));
	assert!(items[0].binary.is_none());

	query.assert_async().await;
}

#[tokio::test]
async fn search_posts_an_array_body() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let search = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/object/QPerson/search")
				.query_param("pageSize", "5")
				.query_param("pageNumber", "1")
				.json_body(json!([{ "name": "LastName", "value": "Lovelace", "type": "PRIMITIVE" }]));
			then.status(200).json_body(json!({ "total": 1, "items": [] }));
		})
		.await;
	let operation = Operation::Search(
		SearchParams::new("QPerson")
			.with_value(QueryField::new("LastName", "Lovelace", QueryFieldType::Primitive))
			.with_options(PageOptions::page(5, 1)),
	);
	let items = broker.execute(&credentials, &operation, 3).await.expect("Search should succeed.");

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].json["total"], 1);

	search.assert_async().await;
}

#[tokio::test]
async fn build_information_resolves_credentials_from_the_host() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let source = StaticCredentials::single(credentials(&server));
	let login = mock_login(&server, "abc123").await;
	let build = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/information/build")
				.header("accept", "application/json");
			then.status(200).json_body(json!({ "version": "4.2.0" }));
		})
		.await;
	let operation = Operation::GetBuild(GetBuildParams);
	let first =
		broker.execute_with(&source, &operation, 1).await.expect("Build lookup should succeed.");
	let second = broker
		.execute_with(&source, &operation, 1)
		.await
		.expect("Second build lookup should succeed.");

	assert_eq!(first, second);
	assert_eq!(first[0].json, json!({ "version": "4.2.0" }));

	login.assert_calls_async(1).await;
	build.assert_calls_async(2).await;
}

#[tokio::test]
async fn missing_host_credentials_fail_before_any_call() {
	let (broker, store) = build_test_broker();
	let err = broker
		.execute_with(&StaticCredentials::default(), &Operation::GetBuild(GetBuildParams), 1)
		.await
		.expect_err("Missing credentials should fail.");

	assert!(matches!(err, Error::CredentialsMissing { ref name } if name == CREDENTIAL_NAME));
	assert!(store.is_empty());
}

#[tokio::test]
async fn error_statuses_surface_with_their_code() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let _missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/document/gone/download");
			then.status(404).body("document not found");
		})
		.await;
	let err = broker
		.execute(&credentials, &Operation::Download(DownloadParams::new("gone")), 1)
		.await
		.expect_err("A 404 should fail.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Status { status: 404, ref body })
			if body == "document not found"
	));
}

#[tokio::test]
async fn malformed_json_is_reported() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let _build = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/information/build");
			then.status(200).body("<html>maintenance</html>");
		})
		.await;
	let err = broker
		.execute(&credentials, &Operation::GetBuild(GetBuildParams), 1)
		.await
		.expect_err("HTML bodies should not parse as JSON.");

	assert!(matches!(err, Error::Transport(TransportError::ResponseParse { status: 200, .. })));
}

#[tokio::test]
async fn invalid_parameters_fail_before_login() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_test_broker();
	let credentials = credentials(&server);
	let login = mock_login(&server, "abc123").await;
	let err = broker
		.execute(&credentials, &Operation::Search(SearchParams::new("")), 1)
		.await
		.expect_err("Empty object types should fail.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::MissingField { field: "customObjectType" })
	));
	assert!(store.is_empty());

	login.assert_calls_async(0).await;
}

#[tokio::test]
async fn send_preserves_caller_headers_and_same_origin_urls() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let call = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/custom/endpoint")
				.query_param("q", "a b")
				.header("x-trace-id", "trace-1")
				.header("authorization", "Bearer abc123");
			then.status(204);
		})
		.await;
	let request = OutboundRequest::get(server.url("/custom/endpoint"))
		.with_header(
			http::HeaderName::from_static("x-trace-id"),
			http::HeaderValue::from_static("trace-1"),
		)
		.with_header(http::header::AUTHORIZATION, http::HeaderValue::from_static("Bearer old"))
		.with_query("q", "a b");
	let response = broker.send(&credentials, request).await.expect("Send should succeed.");

	assert_eq!(response.status(), 204);

	call.assert_async().await;
}

#[tokio::test]
async fn send_refuses_absolute_urls_on_other_hosts() {
	let server = MockServer::start_async().await;
	let other = MockServer::start_async().await;
	let (broker, store) = build_test_broker();
	let credentials = credentials(&server);
	let login = mock_login(&server, "abc123").await;
	let foreign = other
		.mock_async(|when, then| {
			when.method(GET).path("/collect");
			then.status(200);
		})
		.await;
	let err = broker
		.send(&credentials, OutboundRequest::get(other.url("/collect")))
		.await
		.expect_err("Other hosts must not receive the bearer token.");

	assert!(matches!(err, Error::Config(ConfigError::ForeignUrl { .. })));
	assert!(store.is_empty());

	login.assert_calls_async(0).await;
	foreign.assert_calls_async(0).await;
}

#[tokio::test]
async fn query_with_only_blank_inputs_sends_an_empty_object() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_test_broker();
	let credentials = credentials(&server);
	let _login = mock_login(&server, "abc123").await;
	let query = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/document/query").json_body(json!({}));
			then.status(200);
		})
		.await;
	let items = broker
		.execute(&credentials, &Operation::Query(QueryParams::default()), 1)
		.await
		.expect("Blank queries should succeed.");

	assert_eq!(items, vec![OutputItem::json(json!({}))]);

	query.assert_async().await;
}
