//! Wire representation of a stage result
//!
//! The platform ingests one JSON object per record. `_id` and `_timestamp`
//! are the platform's reserved fields; everything else is a plain attribute.

use crate::model::StageResult;
use serde_json::{json, Value};

/// Project a stage result to its JSON record.
///
/// Pure and fully deterministic: the same result produces byte-identical
/// output on every call. The timestamp is the date at start of day in UTC
/// with no sub-second precision; the channel is lowercased on the wire only.
pub fn encode(result: &StageResult) -> Value {
    json!({
        "_id": result.id(),
        "_timestamp": format!("{}T00:00:00Z", result.timestamp()),
        "period": result.period().as_str(),
        "channel": result.channel().to_lowercase(),
        "count": result.count(),
    })
}
