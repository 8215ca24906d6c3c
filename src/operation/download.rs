//! Document download: request parameters and the binary response transform.

// std
use std::sync::LazyLock;
// crates.io
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use regex::Regex;
// self
use crate::{
	_prelude::*,
	binary::{BinaryData, BinaryPackager, DEFAULT_MIME_TYPE},
	error::ConfigError,
	obs::FlowKind,
	operation::{ApiOperation, OutputItem, path_segment},
	request::OutboundRequest,
	transport::HttpResponse,
};

/// Output property that carries the downloaded attachment.
pub const BINARY_PROPERTY: &str = "data";

static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"filename([^;=\n]*)=("[^"]*"|'[^']*'|[^;\n]*)"#)
		.expect("Filename pattern must compile.")
});

/// Parameters of `document` / `download`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadParams {
	/// Document to fetch.
	pub document_id: String,
	/// Version and conversion switches.
	#[serde(default)]
	pub options: DownloadOptions,
}
impl DownloadParams {
	/// Latest version, PDF conversion allowed.
	pub fn new(document_id: impl Into<String>) -> Self {
		Self { document_id: document_id.into(), options: DownloadOptions::default() }
	}

	/// Selects the latest version or the originally uploaded one.
	pub fn latest_version(mut self, latest_version: bool) -> Self {
		self.options.latest_version = latest_version;

		self
	}

	/// Asks the server to skip PDF conversion.
	pub fn prohibit_pdf_conversion(mut self, prohibit: bool) -> Self {
		self.options.prohibit_pdf_conversion = prohibit;

		self
	}
}
impl ApiOperation for DownloadParams {
	fn kind(&self) -> FlowKind {
		FlowKind::DocumentDownload
	}

	fn build_request(&self) -> Result<OutboundRequest, ConfigError> {
		let document_id = path_segment("documentId", &self.document_id)?;

		Ok(OutboundRequest::get(format!("/api/v1/document/{document_id}/download"))
			.with_query("latestVersion", self.options.latest_version)
			.with_query("prohibitPDFConversion", self.options.prohibit_pdf_conversion))
	}
}

/// Download switches sent as query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadOptions {
	/// `true` fetches the newest version.
	pub latest_version: bool,
	/// `true` returns the stored file without PDF conversion.
	#[serde(rename = "prohibitPDFConversion")]
	pub prohibit_pdf_conversion: bool,
}
impl Default for DownloadOptions {
	fn default() -> Self {
		Self { latest_version: true, prohibit_pdf_conversion: false }
	}
}

/// Raw download response with its derived file name and MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadResponse {
	/// Originating document.
	pub document_id: String,
	/// Name from `content-disposition`, or `document_{id}`.
	pub file_name: String,
	/// `content-type`, or [`DEFAULT_MIME_TYPE`].
	pub mime_type: String,
	/// Response body.
	pub body: Vec<u8>,
}
impl DownloadResponse {
	/// Derives file name and MIME type from the response headers.
	pub fn from_response(document_id: &str, response: HttpResponse) -> Self {
		let headers = response.headers();
		let file_name = headers
			.get(CONTENT_DISPOSITION)
			.and_then(|value| file_name_from_disposition(&String::from_utf8_lossy(value.as_bytes())))
			.unwrap_or_else(|| format!("document_{document_id}"));
		let mime_type = headers
			.get(CONTENT_TYPE)
			.map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_owned())
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_owned());

		Self { document_id: document_id.to_owned(), file_name, mime_type, body: response.into_body() }
	}

	/// Hands the body to `packager`.
	pub async fn package(self, packager: &dyn BinaryPackager) -> Result<DownloadResult> {
		let size = self.body.len();
		let binary = packager.package(self.body, &self.file_name, &self.mime_type).await?;

		Ok(DownloadResult {
			document_id: self.document_id,
			file_name: self.file_name,
			mime_type: self.mime_type,
			size,
			binary,
		})
	}
}

/// Packaged download, ready to fan out to output items.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadResult {
	/// Originating document.
	pub document_id: String,
	/// Attachment file name.
	pub file_name: String,
	/// Attachment MIME type.
	pub mime_type: String,
	/// Body length in bytes.
	pub size: usize,
	/// Packaged attachment.
	pub binary: BinaryData,
}
impl DownloadResult {
	/// Summary record without the payload.
	pub fn summary(&self) -> serde_json::Value {
		serde_json::json!({
			"documentId": self.document_id,
			"fileName": self.file_name,
			"mimeType": self.mime_type,
			"size": self.size,
		})
	}

	/// One item per input item, each carrying the same attachment under [`BINARY_PROPERTY`].
	pub fn into_items(self, item_count: usize) -> Vec<OutputItem> {
		let summary = self.summary();

		(0..item_count)
			.map(|_| OutputItem::with_binary(summary.clone(), BINARY_PROPERTY, self.binary.clone()))
			.collect()
	}
}

/// Extracts the `filename` parameter of a `content-disposition` value.
///
/// The first match wins. For `filename*` the `charset'language'` prefix is dropped and the
/// rest is kept percent-encoded.
pub fn file_name_from_disposition(disposition: &str) -> Option<String> {
	let captures = FILENAME_PATTERN.captures(disposition)?;
	let mut value = captures.get(2)?.as_str().trim().trim_matches(['"', '\'']);

	if captures.get(1).is_some_and(|suffix| suffix.as_str().trim() == "*") {
		value = value.splitn(3, '\'').nth(2).unwrap_or(value);
	}

	let file_name = value.trim();

	(!file_name.is_empty()).then(|| file_name.to_owned())
}
