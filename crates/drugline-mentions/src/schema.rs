//! Table schemas: expected column types and the search column per table

use std::fmt;
use std::sync::LazyLock;

use crate::error::EngineError;
use crate::record::Scalar;

/// Logical table holding the drug registry.
pub const DRUGS: &str = "drugs";
/// Logical table holding clinical-trial records.
pub const CLINICAL_TRIALS: &str = "clinical_trials";
/// Logical table holding PubMed publication records.
pub const PUBMED: &str = "pubmed";

/// Expected scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Integer,
}

/// Why a value could not be converted to a column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The value's type has no conversion to the target type.
    Type { found: &'static str },
    /// The type converts in principle, but this value does not.
    Value { found: &'static str },
}

impl CoercionError {
    pub fn found(&self) -> &'static str {
        match self {
            Self::Type { found } | Self::Value { found } => found,
        }
    }
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }

    /// Whether `value` already is, or converts without loss to, this type.
    pub fn coerces(self, value: &Scalar) -> bool {
        self.convert(value).is_ok()
    }

    /// Convert `value` to this type.
    ///
    /// Strings accept booleans and numbers via their textual form. Integers
    /// accept trimmed base-10 strings and floats with no fractional part.
    /// `Null` converts to nothing.
    pub fn convert(self, value: &Scalar) -> Result<Scalar, CoercionError> {
        let found = value.kind();
        match (self, value) {
            (_, Scalar::Null) => Err(CoercionError::Type { found }),
            (Self::String, Scalar::Str(_)) => Ok(value.clone()),
            (Self::String, other) => Ok(Scalar::Str(other.to_string())),
            (Self::Integer, Scalar::Int(_)) => Ok(value.clone()),
            (Self::Integer, Scalar::Str(s)) => s
                .trim()
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| CoercionError::Value { found }),
            (Self::Integer, Scalar::Float(x)) => {
                // i64::MAX as f64 rounds up to 2^63, hence the strict bound
                if x.is_finite() && x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64
                {
                    Ok(Scalar::Int(*x as i64))
                } else {
                    Err(CoercionError::Value { found })
                }
            }
            (Self::Integer, Scalar::Bool(_)) => Err(CoercionError::Type { found }),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns and search column of one logical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<(String, ScalarType)>,
    search_column: String,
}

impl TableSchema {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (impl Into<String>, ScalarType)>,
        search_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(|(c, t)| (c.into(), t)).collect(),
            search_column: search_column.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn search_column(&self) -> &str {
        &self.search_column
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, ScalarType)> {
        self.columns.iter().map(|(c, t)| (c.as_str(), *t))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_type(&self, column: &str) -> Option<ScalarType> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, t)| *t)
    }
}

/// The set of known logical tables, in inference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

static STANDARD: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    let (text, int) = (ScalarType::String, ScalarType::Integer);

    SchemaRegistry::new(vec![
        TableSchema::new(DRUGS, [("atccode", text), ("drug", text)], "drug"),
        TableSchema::new(
            CLINICAL_TRIALS,
            [
                ("id", text),
                ("scientific_title", text),
                ("date", text),
                ("journal", text),
            ],
            "scientific_title",
        ),
        TableSchema::new(
            PUBMED,
            [
                ("id", int),
                ("title", text),
                ("date", text),
                ("journal", text),
            ],
            "title",
        ),
    ])
});

impl SchemaRegistry {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// drugs, clinical_trials and pubmed.
    pub fn standard() -> &'static SchemaRegistry {
        &STANDARD
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn schema(&self, table: &str) -> Result<&TableSchema, EngineError> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .ok_or_else(|| EngineError::SchemaLookup {
                table: table.to_string(),
            })
    }

    /// Guess the logical table of a source from its file name.
    ///
    /// Returns the first table, in registry order, whose name occurs in
    /// `source_name`. A name containing several table names is attributed to
    /// the first one only.
    pub fn infer_table(&self, source_name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|t| source_name.contains(t.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_search_columns() {
        let registry = SchemaRegistry::standard();
        assert_eq!(registry.schema(DRUGS).unwrap().search_column(), "drug");
        assert_eq!(
            registry.schema(CLINICAL_TRIALS).unwrap().search_column(),
            "scientific_title"
        );
        assert_eq!(registry.schema(PUBMED).unwrap().search_column(), "title");
        assert_eq!(
            registry.schema(PUBMED).unwrap().column_type("id"),
            Some(ScalarType::Integer)
        );
    }

    #[test]
    fn unknown_table_is_a_lookup_error() {
        let err = SchemaRegistry::standard().schema("patents").unwrap_err();
        assert_eq!(
            err,
            EngineError::SchemaLookup {
                table: "patents".into()
            }
        );
    }

    #[test]
    fn infer_table_from_file_name() {
        let registry = SchemaRegistry::standard();
        let name = |s: &str| registry.infer_table(s).map(|t| t.name().to_string());
        assert_eq!(name("drugs.csv").as_deref(), Some("drugs"));
        assert_eq!(name("pubmed.json").as_deref(), Some("pubmed"));
        assert_eq!(name("2024_clinical_trials.csv").as_deref(), Some("clinical_trials"));
        assert_eq!(name("notes.csv"), None);
    }

    #[test]
    fn infer_table_ambiguous_name_takes_registry_order() {
        let registry = SchemaRegistry::standard();
        let table = registry.infer_table("clinical_trials_pubmed.csv").unwrap();
        assert_eq!(table.name(), CLINICAL_TRIALS);
    }

    #[test]
    fn string_type_accepts_any_non_null() {
        let t = ScalarType::String;
        assert_eq!(t.convert(&Scalar::from("abc")), Ok(Scalar::from("abc")));
        assert_eq!(t.convert(&Scalar::Int(12)), Ok(Scalar::from("12")));
        assert_eq!(t.convert(&Scalar::Bool(true)), Ok(Scalar::from("true")));
        assert!(!t.coerces(&Scalar::Null));
    }

    #[test]
    fn integer_type_parses_numeric_strings() {
        let t = ScalarType::Integer;
        assert_eq!(t.convert(&Scalar::from("12")), Ok(Scalar::Int(12)));
        assert_eq!(t.convert(&Scalar::from(" -3 ")), Ok(Scalar::Int(-3)));
        assert_eq!(
            t.convert(&Scalar::from("12.5")),
            Err(CoercionError::Value { found: "string" })
        );
        assert!(!t.coerces(&Scalar::from("")));
    }

    #[test]
    fn integer_type_rejects_lossy_floats_and_bools() {
        let t = ScalarType::Integer;
        assert_eq!(t.convert(&Scalar::Float(4.0)), Ok(Scalar::Int(4)));
        assert!(!t.coerces(&Scalar::Float(4.5)));
        assert!(!t.coerces(&Scalar::Float(f64::NAN)));
        assert_eq!(
            t.convert(&Scalar::Bool(false)),
            Err(CoercionError::Type { found: "boolean" })
        );
        assert_eq!(
            t.convert(&Scalar::Null),
            Err(CoercionError::Type { found: "null" })
        );
    }
}
