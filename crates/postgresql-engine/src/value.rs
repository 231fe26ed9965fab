//! Fixture values to `tokio-postgres` parameters.
//!
//! tokio-postgres checks every parameter against the type the server inferred
//! for it, so values are converted per parameter type. SQL `NULL` is sent as a
//! typed `None`. Types without a dedicated conversion are sent as text.

use crate::error::ParamError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{Kind, ToSql, Type};
use uuid::Uuid;

pub(crate) type Param = Box<dyn ToSql + Sync + Send>;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert a fixture value into a parameter of type `ty`.
pub(crate) fn to_sql_param(value: &JsonValue, ty: &Type) -> Result<Param, ParamError> {
    if let Kind::Array(member) = ty.kind() {
        return array_param(value, ty, member);
    }

    let param: Param = match *ty {
        Type::BOOL => Box::new(as_bool(value, ty)?),
        Type::INT2 => Box::new(as_int::<i16>(value, ty)?),
        Type::INT4 => Box::new(as_int::<i32>(value, ty)?),
        Type::INT8 => Box::new(as_int::<i64>(value, ty)?),
        Type::FLOAT4 => Box::new(as_f32(value, ty)?),
        Type::FLOAT8 => Box::new(as_f64(value, ty)?),
        Type::NUMERIC => Box::new(as_decimal(value, ty)?),
        Type::JSON | Type::JSONB => Box::new(as_json(value, ty)?),
        Type::UUID => Box::new(as_uuid(value, ty)?),
        Type::DATE => Box::new(as_date(value, ty)?),
        Type::TIMESTAMP => Box::new(as_timestamp(value, ty)?),
        Type::TIMESTAMPTZ => Box::new(as_timestamptz(value, ty)?),
        _ => Box::new(as_text(value, ty)?),
    };
    Ok(param)
}

fn array_param(value: &JsonValue, ty: &Type, member: &Type) -> Result<Param, ParamError> {
    match *member {
        Type::BOOL => array_of(value, ty, member, as_bool),
        Type::INT2 => array_of(value, ty, member, as_int::<i16>),
        Type::INT4 => array_of(value, ty, member, as_int::<i32>),
        Type::INT8 => array_of(value, ty, member, as_int::<i64>),
        Type::FLOAT4 => array_of(value, ty, member, as_f32),
        Type::FLOAT8 => array_of(value, ty, member, as_f64),
        Type::NUMERIC => array_of(value, ty, member, as_decimal),
        Type::JSON | Type::JSONB => array_of(value, ty, member, as_json),
        Type::UUID => array_of(value, ty, member, as_uuid),
        Type::DATE => array_of(value, ty, member, as_date),
        Type::TIMESTAMP => array_of(value, ty, member, as_timestamp),
        Type::TIMESTAMPTZ => array_of(value, ty, member, as_timestamptz),
        _ => array_of(value, ty, member, as_text),
    }
}

fn array_of<T, F>(value: &JsonValue, ty: &Type, member: &Type, convert: F) -> Result<Param, ParamError>
where
    T: ToSql + Sync + Send + 'static,
    F: Fn(&JsonValue, &Type) -> Result<Option<T>, ParamError>,
{
    let items = match value {
        JsonValue::Null => return Ok(Box::new(None::<Vec<Option<T>>>)),
        JsonValue::Array(items) => items,
        other => return Err(mismatch(other, ty)),
    };
    let converted = items
        .iter()
        .map(|item| convert(item, member))
        .collect::<Result<Vec<Option<T>>, _>>()?;
    Ok(Box::new(Some(converted)))
}

fn as_bool(value: &JsonValue, ty: &Type) -> Result<Option<bool>, ParamError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Bool(b) => Ok(Some(*b)),
        other => Err(mismatch(other, ty)),
    }
}

fn as_int<T: TryFrom<i64>>(value: &JsonValue, ty: &Type) -> Result<Option<T>, ParamError> {
    let n = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => n.as_i64().ok_or_else(|| ParamError::OutOfRange {
            value: n.to_string(),
            ty: ty.clone(),
        })?,
        JsonValue::String(s) => s.trim().parse::<i64>().map_err(|e| invalid(s, ty, e))?,
        other => return Err(mismatch(other, ty)),
    };
    T::try_from(n).map(Some).map_err(|_| ParamError::OutOfRange {
        value: n.to_string(),
        ty: ty.clone(),
    })
}

fn as_f64(value: &JsonValue, ty: &Type) -> Result<Option<f64>, ParamError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n.as_f64().map(Some).ok_or_else(|| ParamError::OutOfRange {
            value: n.to_string(),
            ty: ty.clone(),
        }),
        JsonValue::String(s) => s.trim().parse::<f64>().map(Some).map_err(|e| invalid(s, ty, e)),
        other => Err(mismatch(other, ty)),
    }
}

fn as_f32(value: &JsonValue, ty: &Type) -> Result<Option<f32>, ParamError> {
    Ok(as_f64(value, ty)?.map(|f| f as f32))
}

fn as_decimal(value: &JsonValue, ty: &Type) -> Result<Option<Decimal>, ParamError> {
    let literal = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        other => return Err(mismatch(other, ty)),
    };
    Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map(Some)
        .map_err(|e| invalid(&literal, ty, e))
}

fn as_json(value: &JsonValue, _ty: &Type) -> Result<Option<JsonValue>, ParamError> {
    Ok((!value.is_null()).then(|| value.clone()))
}

fn as_text(value: &JsonValue, _ty: &Type) -> Result<Option<String>, ParamError> {
    Ok(match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

fn as_uuid(value: &JsonValue, ty: &Type) -> Result<Option<Uuid>, ParamError> {
    parse_text(value, ty, Uuid::parse_str)
}

fn as_date(value: &JsonValue, ty: &Type) -> Result<Option<NaiveDate>, ParamError> {
    parse_text(value, ty, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
}

fn as_timestamp(value: &JsonValue, ty: &Type) -> Result<Option<NaiveDateTime>, ParamError> {
    parse_text(value, ty, |s| {
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .ok_or("expected YYYY-MM-DD HH:MM:SS")
    })
}

fn as_timestamptz(value: &JsonValue, ty: &Type) -> Result<Option<DateTime<Utc>>, ParamError> {
    parse_text(value, ty, |s| {
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z"))
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn parse_text<T, E, F>(value: &JsonValue, ty: &Type, parse: F) -> Result<Option<T>, ParamError>
where
    E: fmt::Display,
    F: Fn(&str) -> Result<T, E>,
{
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => parse(s).map(Some).map_err(|e| invalid(s, ty, e)),
        other => Err(mismatch(other, ty)),
    }
}

fn mismatch(value: &JsonValue, ty: &Type) -> ParamError {
    let found = match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    };
    ParamError::Mismatch {
        found,
        ty: ty.clone(),
    }
}

fn invalid(value: &str, ty: &Type, reason: impl fmt::Display) -> ParamError {
    ParamError::Invalid {
        value: value.to_string(),
        ty: ty.clone(),
        reason: reason.to_string(),
    }
}
