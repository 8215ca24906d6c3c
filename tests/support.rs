// std
use std::sync::Arc;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use qaction_broker::{
	auth::ApiCredentials,
	broker::{LOGIN_PATH, ReqwestBroker},
	reqwest::Client,
	store::{MemoryStore, TokenStore},
	transport::ReqwestHttpClient,
};

pub const CLIENT_ID: &str = "client-it";
pub const API_KEY: &str = "key-it";

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Broker over an in-memory store, returned together with the store for inspection.
pub fn build_test_broker() -> (ReqwestBroker, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let broker = ReqwestBroker::with_http_client(store, test_reqwest_http_client());

	(broker, store_backend)
}

/// Credentials pointing at the mock server root.
pub fn credentials(server: &MockServer) -> ApiCredentials {
	ApiCredentials::builder(CLIENT_ID, API_KEY)
		.api_url(server.url("/"))
		.build()
		.expect("Mock server credentials should be valid.")
}

/// Login endpoint answering with `token` as its raw body.
pub async fn mock_login<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(LOGIN_PATH)
				.header("x-client-id", CLIENT_ID)
				.header("x-api-key", API_KEY);
			then.status(200).header("content-type", "text/plain").body(token);
		})
		.await
}
