//! Custom GraphQL scalars.

use {
    async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value},
    chrono::{DateTime, TimeZone, Utc},
};

/// A point in time, exchanged as epoch milliseconds.
///
/// Input accepts an integer (epoch ms) or an RFC 3339 string. Output is
/// always an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(pub DateTime<Utc>);

#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        match &value {
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .map(Date)
                .ok_or_else(|| InputValueError::custom("expected epoch milliseconds")),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Date(dt.with_timezone(&Utc)))
                .map_err(InputValueError::custom),
            _ => Err(InputValueError::expected_type(value)),
        }
    }

    fn is_valid(value: &Value) -> bool {
        matches!(value, Value::Number(_) | Value::String(_))
    }

    fn to_value(&self) -> Value {
        Value::Number(self.0.timestamp_millis().into())
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
