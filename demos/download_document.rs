//! Demonstrates downloading a document twice with the default reqwest transport and the
//! in-memory token store: the second call reuses the cached bearer token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use qaction_broker::{
	auth::ApiCredentials,
	broker::{Broker, LOGIN_PATH},
	credentials::StaticCredentials,
	operation::Operation,
	reqwest::Client,
	store::{MemoryStore, TokenStore},
	transport::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(200).body("demo-token\n");
		})
		.await;
	let download_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/document/demo-doc/download")
				.header("authorization", "Bearer demo-token");
			then.status(200)
				.header("content-type", "text/plain")
				.header("content-disposition", "attachment; filename=\"notes.txt\"")
				.body("hello from qaction");
		})
		.await;
	let credentials = ApiCredentials::from_json(json!({
		"apiUrl": server.url("/"),
		"clientId": "demo-client",
		"apiKey": "demo-key",
	}))?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let broker = <Broker<ReqwestHttpClient>>::with_http_client(store, http_client);
	let source = StaticCredentials::single(credentials);
	let operation = Operation::from_parameters(json!({
		"resource": "document",
		"operation": "download",
		"documentId": "demo-doc",
	}))?;

	for round in 1..=2 {
		let items = broker.execute_with(&source, &operation, 1).await?;

		println!("Round {round}: {}.", items[0].json);
	}

	println!("Logins performed: {}.", broker.login_metrics.logins());

	login_mock.assert_calls_async(1).await;
	download_mock.assert_calls_async(2).await;

	Ok(())
}
