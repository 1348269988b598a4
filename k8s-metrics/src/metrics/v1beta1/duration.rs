//! `window` is a Go duration string on the wire, e.g. `"10.5s"`.

use serde::Deserializer;
use serde::Serializer;
use serde::de;

use super::*;

pub(super) fn serialize<S>(window: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = format!("{}s", window.as_secs_f64());
    serializer.serialize_str(&text)
}

pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let nanos = go_parse_duration::parse_duration(&text)
        .map_err(|err| de::Error::custom(format!("invalid window {text:?}: {err:?}")))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| de::Error::custom(format!("negative window {text:?}")))
}
