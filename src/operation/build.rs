//! Build information: `GET /api/v1/information/build`.

// self
use crate::{
	_prelude::*, error::ConfigError, obs::FlowKind, operation::ApiOperation,
	request::OutboundRequest,
};

/// Parameters of `information` / `getBuild`; the call takes none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBuildParams;
impl ApiOperation for GetBuildParams {
	fn kind(&self) -> FlowKind {
		FlowKind::InformationBuild
	}

	fn build_request(&self) -> Result<OutboundRequest, ConfigError> {
		Ok(OutboundRequest::get("/api/v1/information/build").json())
	}
}
