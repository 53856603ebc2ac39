//! Datas em epoch MILISSEGUNDOS
//!
//! A API v2 nunca usa ISO-8601: toda data trafega como milissegundos desde
//! a epoch. Na leitura aceitamos número ou string numérica (o ClickUp manda
//! `"date_created": "1700000000000"` em vários payloads); na escrita sempre
//! emitimos número.
//!
//! ```ignore
//! #[serde(with = "timestamp")]
//! pub date: DateTime<Utc>,
//!
//! #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
//! pub due_date: Option<DateTime<Utc>>,
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Millis {
    Number(i64),
    Float(f64),
    Text(String),
}

impl Millis {
    fn into_millis<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Number(ms) => Ok(ms),
            Self::Float(ms) => Ok(ms as i64),
            Self::Text(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid epoch milliseconds: {:?}", raw))),
        }
    }
}

fn from_millis<E: serde::de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| E::custom(format!("epoch milliseconds out of range: {}", ms)))
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(value.timestamp_millis())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = Millis::deserialize(deserializer)?.into_millis::<D::Error>()?;
    from_millis(ms)
}

/// Variante para campos opcionais (`null`, ausente ou string vazia → `None`)
pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_i64(value.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Millis>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Millis::Text(raw)) if raw.trim().is_empty() => Ok(None),
            Some(raw) => {
                let ms = raw.into_millis::<D::Error>()?;
                from_millis(ms).map(Some)
            }
        }
    }
}

/// Converte milissegundos em `DateTime<Utc>` (fora do intervalo → `None`)
pub fn millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
