use crate::error::DecodeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A message event as delivered by every Zipwhip message webhook.
///
/// Fields missing from the payload (or sent as `null`) take their zero value.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    /// Number of characters in `body`.
    #[serde(deserialize_with = "null_as_default")]
    pub body_size: i64,
    /// Shown in the end-user portal.
    #[serde(deserialize_with = "null_as_default")]
    pub visible: bool,
    /// The attachment itself is fetched separately.
    #[serde(deserialize_with = "null_as_default")]
    pub has_attachment: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub final_destination: String,
    /// `MO` (mobile originated), `ZO` (Zipwhip originated) or `MT` (mobile terminated).
    /// Passed through as-is.
    #[serde(deserialize_with = "null_as_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub deleted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// 0 or 4 means sent, 1 means prepping. Anything else is left to the upstream to define.
    #[serde(deserialize_with = "null_as_default")]
    pub status_code: i64,
    /// Upstream routing classifier, opaque here.
    #[serde(deserialize_with = "null_as_default")]
    pub message_transport: i64,
    /// Kept unparsed.
    #[serde(deserialize_with = "null_as_default")]
    pub date_created: String,
    #[serde(deserialize_with = "null_as_default")]
    pub read: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub final_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device_id: i64,
}

impl Message {
    /// Decodes a webhook body.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD and a repeated key keeps its last value.
    ///
    /// # Errors
    /// Returns `DecodeError` if the body is not JSON or a field has the wrong type. On a type
    /// mismatch the error still carries every field that did decode.
    pub fn from_json(body: &[u8]) -> Result<Self, DecodeError> {
        let text = String::from_utf8_lossy(body);
        let value: Value = serde_json::from_str(&text).map_err(|e| DecodeError::new(e, Self::default()))?;

        match Self::deserialize(&value) {
            Ok(message) => Ok(message),
            Err(e) => Err(DecodeError::new(e, Self::salvage(value))),
        }
    }

    /// Rebuilds a record from only the entries that decode on their own.
    fn salvage(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };

        let clean: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, field)| {
                let single = Map::from_iter([(key.clone(), field.clone())]);
                Self::deserialize(&Value::Object(single)).is_ok()
            })
            .collect();

        Self::deserialize(&Value::Object(clean)).unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Tab counts line the values up in a monospaced terminal.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Body:\t\t\t\t{}", self.body)?;
        writeln!(f, "BodySize:\t\t\t{}", self.body_size)?;
        writeln!(f, "Visible:\t\t\t{}", self.visible)?;
        writeln!(f, "HasAttachment:\t\t\t{}", self.has_attachment)?;
        writeln!(f, "FinalDestination:\t\t{}", self.final_destination)?;
        writeln!(f, "MessageType:\t\t\t{}", self.message_type)?;
        writeln!(f, "Deleted:\t\t\t{}", self.deleted)?;
        writeln!(f, "Id:\t\t\t\t{}", self.id)?;
        writeln!(f, "StatusCode:\t\t\t{}", self.status_code)?;
        writeln!(f, "MessageTransport:\t\t{}", self.message_transport)?;
        writeln!(f, "DateCreated:\t\t\t{}", self.date_created)?;
        writeln!(f, "Read:\t\t\t\t{}", self.read)?;
        writeln!(f, "FinalSource:\t\t\t{}", self.final_source)?;
        writeln!(f, "DeviceId:\t\t\t{}", self.device_id)
    }
}
