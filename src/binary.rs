//! Binary attachments handed back to the host, and the packaging seam that produces them.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// MIME type used when a response does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Boxed future returned by [`BinaryPackager::package`].
pub type PackageFuture<'a> = Pin<Box<dyn Future<Output = Result<BinaryData>> + 'a + Send>>;

/// Host capability that turns a raw payload into a named attachment.
pub trait BinaryPackager
where
	Self: Send + Sync,
{
	/// Packages `data` under `file_name` with the given MIME type.
	fn package<'a>(
		&'a self,
		data: Vec<u8>,
		file_name: &'a str,
		mime_type: &'a str,
	) -> PackageFuture<'a>;
}

/// Named binary attachment; the payload travels as base64 when serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
	/// Raw payload bytes.
	#[serde(serialize_with = "encode_base64", deserialize_with = "decode_base64")]
	pub data: Vec<u8>,
	/// MIME type of the payload.
	pub mime_type: String,
	/// File name presented to downstream consumers.
	pub file_name: String,
	/// Extension derived from the file name, without the dot.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_extension: Option<String>,
	/// Payload length in bytes.
	pub file_size: usize,
}
impl BinaryData {
	/// Wraps `data`, deriving the size and extension.
	pub fn new(data: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
		let file_name = file_name.into();
		let file_extension = file_name
			.rsplit_once('.')
			.map(|(_, ext)| ext)
			.filter(|ext| !ext.is_empty() && !ext.contains('/'))
			.map(str::to_ascii_lowercase);

		Self { file_size: data.len(), data, mime_type: mime_type.into(), file_name, file_extension }
	}
}
impl Debug for BinaryData {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BinaryData")
			.field("mime_type", &self.mime_type)
			.field("file_name", &self.file_name)
			.field("file_extension", &self.file_extension)
			.field("file_size", &self.file_size)
			.finish()
	}
}

/// Packager that keeps payloads inline in the returned [`BinaryData`].
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineBinaryPackager;
impl BinaryPackager for InlineBinaryPackager {
	fn package<'a>(
		&'a self,
		data: Vec<u8>,
		file_name: &'a str,
		mime_type: &'a str,
	) -> PackageFuture<'a> {
		Box::pin(async move { Ok(BinaryData::new(data, file_name, mime_type)) })
	}
}

fn encode_base64<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&STANDARD.encode(data))
}

fn decode_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
	D: Deserializer<'de>,
{
	let encoded = String::deserialize(deserializer)?;

	STANDARD.decode(encoded.as_bytes()).map_err(DeError::custom)
}
