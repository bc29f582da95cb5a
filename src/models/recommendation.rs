use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::error::ValidationError;

/// Categories a recommendation can be filed under.
///
/// Wire and database names are the SCREAMING_SNAKE_CASE variant names;
/// lookups are case-sensitive and fail closed on anything unrecognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "recommendation_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    SimilarProduct,
    RecommendedForYou,
    Upgrade,
    FreqBoughtTogether,
    AddOn,
    Trending,
    TopRated,
    NewArrival,
    #[default]
    Unknown,
}

impl RecommendationType {
    /// Looks up a variant by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SIMILAR_PRODUCT" => Some(Self::SimilarProduct),
            "RECOMMENDED_FOR_YOU" => Some(Self::RecommendedForYou),
            "UPGRADE" => Some(Self::Upgrade),
            "FREQ_BOUGHT_TOGETHER" => Some(Self::FreqBoughtTogether),
            "ADD_ON" => Some(Self::AddOn),
            "TRENDING" => Some(Self::Trending),
            "TOP_RATED" => Some(Self::TopRated),
            "NEW_ARRIVAL" => Some(Self::NewArrival),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// The wire name of this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimilarProduct => "SIMILAR_PRODUCT",
            Self::RecommendedForYou => "RECOMMENDED_FOR_YOU",
            Self::Upgrade => "UPGRADE",
            Self::FreqBoughtTogether => "FREQ_BOUGHT_TOGETHER",
            Self::AddOn => "ADD_ON",
            Self::Trending => "TRENDING",
            Self::TopRated => "TOP_RATED",
            Self::NewArrival => "NEW_ARRIVAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A single product/user recommendation pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recommendation {
    /// Surrogate key assigned by the store on first insert.
    pub id: Option<i32>,
    /// Product this recommendation points at; owned by the products service.
    pub product_id: i32,
    /// Customer the recommendation targets; owned by the customers service.
    pub user_id: i32,
    /// Free-form segment label, e.g. "college student" or "new parent".
    pub user_segment: String,
    pub viewed_in_last7d: bool,
    pub bought_in_last30d: bool,
    /// Most recent date this pairing was judged relevant.
    pub last_relevance_date: NaiveDate,
    #[serde(default)]
    pub recommendation_type: RecommendationType,
}

impl Recommendation {
    /// Builds a recommendation from an untyped JSON payload.
    ///
    /// Every field except `id` must be present. Boolean fields must be real
    /// JSON booleans (not boolean-like strings or numbers), the date must be
    /// a `YYYY-MM-DD` string, and `recommendation_type` must exactly name a
    /// known variant. Any `id` in the payload is ignored.
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = data.as_object().ok_or(ValidationError::BadPayload)?;

        let product_id = require_int(map, "product_id")?;
        let user_id = require_int(map, "user_id")?;
        let user_segment = require_string(map, "user_segment")?;
        let viewed_in_last7d = require_bool(map, "viewed_in_last7d")?;
        let bought_in_last30d = require_bool(map, "bought_in_last30d")?;

        let raw_date = require_string(map, "last_relevance_date")?;
        let last_relevance_date = parse_relevance_date(&raw_date)?;

        let raw_type = require_string(map, "recommendation_type")?;
        let recommendation_type = RecommendationType::from_name(&raw_type)
            .ok_or(ValidationError::UnknownType(raw_type))?;

        Ok(Self {
            id: None,
            product_id,
            user_id,
            user_segment,
            viewed_in_last7d,
            bought_in_last30d,
            last_relevance_date,
            recommendation_type,
        })
    }
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_relevance_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn require<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    map.get(field).ok_or(ValidationError::MissingField(field))
}

fn require_int(map: &Map<String, Value>, field: &'static str) -> Result<i32, ValidationError> {
    let value = require(map, field)?;
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ValidationError::WrongType {
            field,
            expected: "integer",
            found: json_type_name(value),
        })
}

fn require_string(map: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    let value = require(map, field)?;
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(ValidationError::WrongType {
            field,
            expected: "string",
            found: json_type_name(other),
        }),
    }
}

fn require_bool(map: &Map<String, Value>, field: &'static str) -> Result<bool, ValidationError> {
    let value = require(map, field)?;
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(ValidationError::WrongType {
            field,
            expected: "boolean",
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
