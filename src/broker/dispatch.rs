//! Authorized dispatch and end-to-end operation execution.

// self
use crate::{
	_prelude::*,
	auth::ApiCredentials,
	broker::Broker,
	credentials::{CREDENTIAL_NAME, CredentialSource},
	error::TransportError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	operation::{ApiOperation, DownloadParams, DownloadResponse, DownloadResult, Operation, OutputItem},
	request::{self, OutboundRequest},
	transport::{ApiHttpClient, HttpResponse},
};

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Sends `request` with a bearer token for `credentials`.
	///
	/// Relative URLs resolve against the credential's API URL, and absolute URLs on another
	/// origin are refused before any login. Non-success statuses become
	/// [`TransportError::Status`]; a `401` is not retried with a fresh login.
	pub async fn send(
		&self,
		credentials: &ApiCredentials,
		request: OutboundRequest,
	) -> Result<HttpResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "send", &credentials.identity_key());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.send_authorized(credentials, request)).await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Runs `operation` and shapes its response for `item_count` input items.
	pub async fn execute(
		&self,
		credentials: &ApiCredentials,
		operation: &Operation,
		item_count: usize,
	) -> Result<Vec<OutputItem>> {
		let kind = operation.kind();
		let span = FlowSpan::new(kind, "execute", &credentials.identity_key());

		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let request = operation.build_request()?;
				let response = self.send_authorized(credentials, request).await?;

				operation.transform_response(response, item_count, self.packager.as_ref()).await
			})
			.await;

		obs::record_flow_outcome(kind, FlowOutcome::of(&result));

		result
	}

	/// Resolves the host's `qActionApi` credentials from `source`, then runs `operation`.
	pub async fn execute_with(
		&self,
		source: &dyn CredentialSource,
		operation: &Operation,
		item_count: usize,
	) -> Result<Vec<OutputItem>> {
		let credentials = source
			.credentials(CREDENTIAL_NAME)
			.await?
			.ok_or_else(|| Error::CredentialsMissing { name: CREDENTIAL_NAME.into() })?;

		self.execute(&credentials, operation, item_count).await
	}

	/// Downloads one document and packages it through the broker's packager.
	pub async fn download(
		&self,
		credentials: &ApiCredentials,
		params: &DownloadParams,
	) -> Result<DownloadResult> {
		const KIND: FlowKind = FlowKind::DocumentDownload;

		let span = FlowSpan::new(KIND, "download", &credentials.identity_key());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let request = params.build_request()?;
				let response = self.send_authorized(credentials, request).await?;

				DownloadResponse::from_response(params.document_id.trim(), response)
					.package(self.packager.as_ref())
					.await
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn send_authorized(
		&self,
		credentials: &ApiCredentials,
		request: OutboundRequest,
	) -> Result<HttpResponse> {
		let url = request.resolve_url(&credentials.api_url)?;
		let token = self.get_token(credentials).await?;
		let request = request::authorize(request, &token)?.into_http_at(url)?;
		let response = self.http_client.execute(request).await.map_err(TransportError::network)?;
		let status = response.status();

		if !status.is_success() {
			return Err(TransportError::status(status.as_u16(), response.body()).into());
		}

		Ok(response)
	}
}
