use std::fmt;

use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/tables#TableFieldSchema.FIELDS.type
// Travels as its upper case name. Names not listed here are kept verbatim in `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Type {
    #[default]
    Unknown,
    String,
    Bytes,
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    Bignumeric,
    Boolean,
    Bool,
    Timestamp,
    Date,
    Time,
    Datetime,
    Geography,
    Json,
    Record,
    Struct,
    Other(String),
}

impl Type {
    /// `RECORD` and its standard SQL alias `STRUCT` are the only types with children.
    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record | Type::Struct)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Type::Unknown => "",
            Type::String => "STRING",
            Type::Bytes => "BYTES",
            Type::Integer => "INTEGER",
            Type::Int64 => "INT64",
            Type::Float => "FLOAT",
            Type::Float64 => "FLOAT64",
            Type::Numeric => "NUMERIC",
            Type::Bignumeric => "BIGNUMERIC",
            Type::Boolean => "BOOLEAN",
            Type::Bool => "BOOL",
            Type::Timestamp => "TIMESTAMP",
            Type::Date => "DATE",
            Type::Time => "TIME",
            Type::Datetime => "DATETIME",
            Type::Geography => "GEOGRAPHY",
            Type::Json => "JSON",
            Type::Record => "RECORD",
            Type::Struct => "STRUCT",
            Type::Other(name) => name,
        }
    }
}

impl From<String> for Type {
    fn from(name: String) -> Self {
        match name.as_str() {
            "" => Type::Unknown,
            "STRING" => Type::String,
            "BYTES" => Type::Bytes,
            "INTEGER" => Type::Integer,
            "INT64" => Type::Int64,
            "FLOAT" => Type::Float,
            "FLOAT64" => Type::Float64,
            "NUMERIC" => Type::Numeric,
            "BIGNUMERIC" => Type::Bignumeric,
            "BOOLEAN" => Type::Boolean,
            "BOOL" => Type::Bool,
            "TIMESTAMP" => Type::Timestamp,
            "DATE" => Type::Date,
            "TIME" => Type::Time,
            "DATETIME" => Type::Datetime,
            "GEOGRAPHY" => Type::Geography,
            "JSON" => Type::Json,
            "RECORD" => Type::Record,
            "STRUCT" => Type::Struct,
            _ => Type::Other(name),
        }
    }
}

impl From<&str> for Type {
    fn from(name: &str) -> Self {
        Type::from(name.to_string())
    }
}

impl From<Type> for String {
    fn from(field_type: Type) -> Self {
        match field_type {
            Type::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => f.write_str("UNKNOWN"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Nullable,
    Required,
    Repeated,
}

// https://cloud.google.com/bigquery/docs/reference/rest/v2/tables#TableFieldSchema
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Type,
    #[serde(default)]
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TableFieldSchema>>,
}
