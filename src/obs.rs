//! Optional observability helpers for broker flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `qaction_broker.flow` with the `flow`
//!   (operation), `stage` (call site), and `identity` (credential fingerprint) fields.
//! - Enable `metrics` to increment the `qaction_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and
//!   `qaction_broker_token_lookup_total` for cache hits and misses.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Broker flows observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Token acquisition (cache lookup plus login on miss).
	Login,
	/// Generic authorized request.
	Request,
	/// Document download.
	DocumentDownload,
	/// Document query.
	DocumentQuery,
	/// Custom object search.
	ObjectSearch,
	/// Build information lookup.
	InformationBuild,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Request => "request",
			FlowKind::DocumentDownload => "document_download",
			FlowKind::DocumentQuery => "document_query",
			FlowKind::ObjectSearch => "object_search",
			FlowKind::InformationBuild => "information_build",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Maps a flow result to its terminal outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => FlowOutcome::Success,
			Err(_) => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
