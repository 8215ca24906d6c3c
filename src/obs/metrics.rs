// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `qaction_broker_flow_total{flow, outcome}` (when `metrics` is enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"qaction_broker_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `qaction_broker_token_lookup_total{result}` with `hit` or `miss`.
pub fn record_token_lookup(hit: bool) {
	#[cfg(feature = "metrics")]
	{
		let result = if hit { "hit" } else { "miss" };

		metrics::counter!("qaction_broker_token_lookup_total", "result" => result).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = hit;
	}
}
