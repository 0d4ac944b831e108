//! Typed collection schemas
//!
//! A collection schema is a fixed, ordered set of named, typed fields known
//! at definition time. Field handles double as query-builder entry points:
//! scalar fields build set-membership predicates, vector fields build top-K
//! similarity predicates. Queries constructed this way are checked against
//! the schema's types and dimensions before anything touches the wire.

use crate::error::{ClientError, Result};
use crate::query::{Expr, VectorQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire-level field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int32,
    Int64,
    FloatVector,
}

/// A single field in a collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Vector dimension; only present for vector fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<usize>,
}

/// Anything that can contribute a field definition to a [`Schema`].
pub trait SchemaField {
    fn def(&self) -> FieldDef;
}

/// An ordered list of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, preserving declaration order.
    pub fn field(mut self, f: &dyn SchemaField) -> Self {
        self.fields.push(f.def());
        self
    }

    /// All field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up the dimension of a vector field by name.
    pub fn vector_dim(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.kind == FieldKind::FloatVector)
            .and_then(|f| f.dim)
    }
}

/// A 32-bit integer scalar field.
#[derive(Debug, Clone)]
pub struct Int32Field {
    name: String,
}

impl Int32Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a set-membership predicate: field value must be one of `values`.
    pub fn in_<I: IntoIterator<Item = i32>>(&self, values: I) -> Expr {
        Expr::Term {
            field: self.name.clone(),
            values: values.into_iter().map(Value::from).collect(),
        }
    }
}

impl SchemaField for Int32Field {
    fn def(&self) -> FieldDef {
        FieldDef {
            name: self.name.clone(),
            kind: FieldKind::Int32,
            dim: None,
        }
    }
}

/// A 64-bit integer scalar field.
#[derive(Debug, Clone)]
pub struct Int64Field {
    name: String,
}

impl Int64Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a set-membership predicate: field value must be one of `values`.
    pub fn in_<I: IntoIterator<Item = i64>>(&self, values: I) -> Expr {
        Expr::Term {
            field: self.name.clone(),
            values: values.into_iter().map(Value::from).collect(),
        }
    }
}

impl SchemaField for Int64Field {
    fn def(&self) -> FieldDef {
        FieldDef {
            name: self.name.clone(),
            kind: FieldKind::Int64,
            dim: None,
        }
    }
}

/// A fixed-dimension float-vector field.
#[derive(Debug, Clone)]
pub struct FloatVectorField {
    name: String,
    dim: usize,
}

impl FloatVectorField {
    pub fn new(name: impl Into<String>, dim: usize) -> Self {
        Self {
            name: name.into(),
            dim,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Start a top-K similarity predicate against one or more query vectors.
    ///
    /// Every query vector must match the field's dimension.
    pub fn query(&self, vectors: Vec<Vec<f32>>) -> Result<VectorQuery> {
        for v in &vectors {
            if v.len() != self.dim {
                return Err(ClientError::DimensionMismatch {
                    expected: self.dim,
                    actual: v.len(),
                });
            }
        }
        Ok(VectorQuery::new(self.name.clone(), vectors))
    }
}

impl SchemaField for FloatVectorField {
    fn def(&self) -> FieldDef {
        FieldDef {
            name: self.name.clone(),
            kind: FieldKind::FloatVector,
            dim: Some(self.dim),
        }
    }
}
