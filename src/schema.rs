use serde::Deserialize;

use crate::error::BigQueryError;
use crate::structs::table_field_schema::{Mode, TableFieldSchema, Type};
use crate::structs::table_schema::TableSchema;

/// A column of a table schema. Record fields carry their own children.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    field_type: Type,
    mode: Mode,
    description: String,
    fields: Vec<Field>,
}

impl Field {
    /// A nullable scalar column.
    pub fn new(name: impl Into<String>, field_type: Type, description: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            field_type,
            mode: Mode::Nullable,
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// A nullable `RECORD` column holding the fields of `schema`.
    pub fn nested(name: impl Into<String>, description: impl Into<String>, schema: &Schema) -> Self {
        Self::record(name, description, Mode::Nullable, schema)
    }

    /// An array of `RECORD` values, each holding the fields of `schema`.
    pub fn repeated(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: &Schema,
    ) -> Self {
        Self::record(name, description, Mode::Repeated, schema)
    }

    fn record(
        name: impl Into<String>,
        description: impl Into<String>,
        mode: Mode,
        schema: &Schema,
    ) -> Self {
        Field {
            name: name.into(),
            field_type: Type::Record,
            mode,
            description: description.into(),
            fields: schema.fields.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &Type {
        &self.field_type
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Children of a record field, empty for scalars.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn to_table_field_schema(&self) -> TableFieldSchema {
        TableFieldSchema {
            name: self.name.clone(),
            field_type: self.field_type.clone(),
            mode: self.mode,
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            fields: (!self.fields.is_empty()).then(|| {
                self.fields
                    .iter()
                    .map(Field::to_table_field_schema)
                    .collect()
            }),
        }
    }

    fn from_table_field_schema(field: TableFieldSchema) -> Self {
        Field {
            name: field.name,
            field_type: field.field_type,
            mode: field.mode,
            description: field.description.unwrap_or_default(),
            fields: field
                .fields
                .unwrap_or_default()
                .into_iter()
                .map(Field::from_table_field_schema)
                .collect(),
        }
    }

    fn validate(&self, parent: Option<&str>) -> Result<(), BigQueryError> {
        let path = match parent {
            Some(parent) => format!("{parent}.{}", self.name),
            None => self.name.clone(),
        };
        if self.name.is_empty() {
            return Err(BigQueryError::InvalidSchema(format!(
                "field with empty name under '{}'",
                parent.unwrap_or("<root>")
            )));
        }
        if self.field_type == Type::Unknown {
            return Err(BigQueryError::InvalidSchema(format!(
                "field '{path}' has no type"
            )));
        }
        if self.field_type.is_record() {
            if self.fields.is_empty() {
                return Err(BigQueryError::InvalidSchema(format!(
                    "record field '{path}' has no children"
                )));
            }
            for child in &self.fields {
                child.validate(Some(&path))?;
            }
        } else if !self.fields.is_empty() {
            return Err(BigQueryError::InvalidSchema(format!(
                "{} field '{path}' cannot have children",
                self.field_type
            )));
        }
        Ok(())
    }
}

/// Ordered list of top level fields. Order becomes column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    pub fn empty() -> Self {
        Schema::default()
    }

    /// Appends a field. Duplicate names are kept as is.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire form of the schema. Only a validated schema is guaranteed to be
    /// accepted by the service; a record without children is sent without a
    /// `fields` key.
    pub fn to_table_schema(&self) -> TableSchema {
        TableSchema {
            fields: self
                .fields
                .iter()
                .map(Field::to_table_field_schema)
                .collect(),
        }
    }

    /// Parses a schema document, either the bare field array printed by
    /// `bq show --schema` or the REST API form
    /// `{"fields": [{"name": "id", "type": "STRING"}]}`.
    pub fn from_json(json: &str) -> Result<Self, BigQueryError> {
        let table_schema = match serde_json::from_str(json)? {
            SchemaDocument::Fields(fields) => TableSchema { fields },
            SchemaDocument::Table(table_schema) => table_schema,
        };
        let schema = Schema::from(table_schema);
        schema.validate()?;
        Ok(schema)
    }

    /// Checks that every field has a name and a type, records have children
    /// and scalars don't. An empty schema is valid.
    pub fn validate(&self) -> Result<(), BigQueryError> {
        self.fields.iter().try_for_each(|field| field.validate(None))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Fields(Vec<TableFieldSchema>),
    Table(TableSchema),
}

impl From<TableSchema> for Schema {
    fn from(table_schema: TableSchema) -> Self {
        Schema::new(
            table_schema
                .fields
                .into_iter()
                .map(Field::from_table_field_schema)
                .collect(),
        )
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Schema::new(iter.into_iter().collect())
    }
}
