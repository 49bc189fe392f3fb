//! Supabase table rows. The service treats them as opaque records: no validation beyond
//! what serde needs to read them back.

mod ad;
mod automation;
mod material;
mod rule;
mod variant;

pub use ad::AdRecord;
pub use automation::{Automation, AutomationStatus};
pub use material::{BrandMaterial, MaterialType};
pub use rule::{ContentRule, ContentRulePatch};
pub use variant::{HeadlineVariant, VariantMetrics};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Row ids are uuids in most tables and bigints in a few; keep both as text.
pub(crate) fn deserialize_id_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for a row id",
        )),
    }
}
