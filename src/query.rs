//! Query expression trees
//!
//! A query is a boolean combinator over leaf predicates: set-membership on a
//! scalar field, or a top-K vector similarity search. The tree compiles to
//! the JSON form the service expects; query planning and execution are the
//! server's business.

use crate::index::MetricType;
use serde_json::{json, Map, Value};

/// Default number of neighbors returned when `top_k` is not set.
pub const DEFAULT_TOP_K: usize = 10;

/// A query expression: a boolean node or a leaf predicate.
#[derive(Debug, Clone)]
pub enum Expr {
    Bool(BoolExpr),
    /// Scalar set-membership: field value must be one of `values`.
    Term { field: String, values: Vec<Value> },
    /// Top-K vector similarity search.
    Vector(VectorQuery),
}

/// Boolean combinator over sub-expressions.
#[derive(Debug, Clone, Default)]
pub struct BoolExpr {
    must: Vec<Expr>,
    should: Vec<Expr>,
    must_not: Vec<Expr>,
}

impl Expr {
    /// All sub-expressions must match (AND).
    pub fn must<I: IntoIterator<Item = Expr>>(exprs: I) -> Expr {
        Expr::Bool(BoolExpr {
            must: exprs.into_iter().collect(),
            ..BoolExpr::default()
        })
    }

    /// At least one sub-expression must match (OR).
    pub fn should<I: IntoIterator<Item = Expr>>(exprs: I) -> Expr {
        Expr::Bool(BoolExpr {
            should: exprs.into_iter().collect(),
            ..BoolExpr::default()
        })
    }

    /// No sub-expression may match (NOT).
    pub fn must_not<I: IntoIterator<Item = Expr>>(exprs: I) -> Expr {
        Expr::Bool(BoolExpr {
            must_not: exprs.into_iter().collect(),
            ..BoolExpr::default()
        })
    }

    /// Compile the tree into the service's JSON wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Expr::Bool(b) => {
                let mut obj = Map::new();
                if !b.must.is_empty() {
                    obj.insert("must".to_string(), compile_all(&b.must));
                }
                if !b.should.is_empty() {
                    obj.insert("should".to_string(), compile_all(&b.should));
                }
                if !b.must_not.is_empty() {
                    obj.insert("must_not".to_string(), compile_all(&b.must_not));
                }
                json!({ "bool": obj })
            }
            Expr::Term { field, values } => {
                json!({"term": {"field": field, "values": values}})
            }
            Expr::Vector(q) => q.to_value(),
        }
    }
}

fn compile_all(exprs: &[Expr]) -> Value {
    Value::Array(exprs.iter().map(Expr::to_value).collect())
}

/// A top-K nearest-neighbor predicate on a vector field.
///
/// Built through [`FloatVectorField::query`](crate::schema::FloatVectorField::query)
/// so that query vectors are dimension-checked against the schema.
#[derive(Debug, Clone)]
pub struct VectorQuery {
    field: String,
    vectors: Vec<Vec<f32>>,
    metric: MetricType,
    top_k: usize,
    params: Map<String, Value>,
}

impl VectorQuery {
    pub(crate) fn new(field: String, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            field,
            vectors,
            metric: MetricType::L2,
            top_k: DEFAULT_TOP_K,
            params: Map::new(),
        }
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: MetricType) -> Self {
        self.metric = metric;
        self
    }

    /// Set the number of neighbors to return per query vector.
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Add an algorithm-specific search parameter (e.g. `nprobe` for IVF).
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "vector": {
                "field": self.field,
                "query": self.vectors,
                "metric_type": self.metric.as_str(),
                "topk": self.top_k,
                "params": self.params,
            }
        })
    }
}

impl From<VectorQuery> for Expr {
    fn from(q: VectorQuery) -> Expr {
        Expr::Vector(q)
    }
}
