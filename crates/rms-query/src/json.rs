//! Predicates over JSON columns.
//!
//! A [`JsonQuery`] targets one column and carries exactly one operation; the
//! last builder call wins. Only MySQL renders SQL, other dialects produce an
//! empty fragment so callers can skip the predicate.

use crate::error::QueryError;
use crate::fragment::{SqlFragment, SqlValue, escape_literal, quote_ident};

const PATH_PREFIX: &str = "$.";

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Mysql,
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum JsonOp {
    Extract { path: String },
    HasKey { keys: Vec<String> },
    Gte { value: i64, keys: Vec<String> },
    Lte { value: i64, keys: Vec<String> },
    NumRange { min: i64, max: i64, keys: Vec<String> },
    KeysContain { values: Vec<String> },
    Contains { values: Vec<String> },
    JointOrContains { values: Vec<String> },
    SubValContains { value: String, key: String },
    Equals { value: SqlValue, keys: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonQuery {
    column: String,
    op: Option<JsonOp>,
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

impl JsonQuery {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: None,
        }
    }

    /// `JSON_EXTRACT(col, path)`.
    #[must_use]
    pub fn extract(mut self, path: impl Into<String>) -> Self {
        self.op = Some(JsonOp::Extract { path: path.into() });
        self
    }

    /// The key path exists.
    #[must_use]
    pub fn has_key(mut self, keys: &[&str]) -> Self {
        self.op = Some(JsonOp::HasKey { keys: owned(keys) });
        self
    }

    #[must_use]
    pub fn gte(mut self, value: i64, keys: &[&str]) -> Self {
        self.op = Some(JsonOp::Gte {
            value,
            keys: owned(keys),
        });
        self
    }

    #[must_use]
    pub fn lte(mut self, value: i64, keys: &[&str]) -> Self {
        self.op = Some(JsonOp::Lte {
            value,
            keys: owned(keys),
        });
        self
    }

    /// The value at the key path lies in `[min, max]`.
    #[must_use]
    pub fn num_range(mut self, min: i64, max: i64, keys: &[&str]) -> Self {
        self.op = Some(JsonOp::NumRange {
            min,
            max,
            keys: owned(keys),
        });
        self
    }

    /// The top-level object has all of `values` as keys.
    #[must_use]
    pub fn keys_contains(mut self, values: &[&str]) -> Self {
        self.op = Some(JsonOp::KeysContain {
            values: owned(values),
        });
        self
    }

    /// The array column contains all of `values`.
    #[must_use]
    pub fn contains(mut self, values: &[&str]) -> Self {
        self.op = Some(JsonOp::Contains {
            values: owned(values),
        });
        self
    }

    /// The array column contains at least one of `values`.
    #[must_use]
    pub fn joint_or_contains(mut self, values: &[&str]) -> Self {
        self.op = Some(JsonOp::JointOrContains {
            values: owned(values),
        });
        self
    }

    /// Some member object has `key` equal to `value`.
    #[must_use]
    pub fn sub_val_contains(mut self, value: &str, key: &str) -> Self {
        self.op = Some(JsonOp::SubValContains {
            value: value.to_string(),
            key: key.to_string(),
        });
        self
    }

    #[must_use]
    pub fn equals(mut self, value: impl Into<SqlValue>, keys: &[&str]) -> Self {
        self.op = Some(JsonOp::Equals {
            value: value.into(),
            keys: owned(keys),
        });
        self
    }

    /// Render the predicate.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingKeys`] when a comparison has no key path.
    pub fn build(&self, dialect: Dialect) -> Result<SqlFragment, QueryError> {
        let mut out = SqlFragment::default();
        if dialect != Dialect::Mysql {
            return Ok(out);
        }
        let Some(op) = &self.op else {
            return Ok(out);
        };
        let column = quote_ident(&self.column);

        match op {
            JsonOp::Extract { path } => {
                out.push_str(&format!("JSON_EXTRACT({column},"));
                out.push_var(path.as_str());
                out.push_str(")");
            }
            JsonOp::HasKey { keys } => {
                if !keys.is_empty() {
                    self.push_extract(&mut out, &column, keys, "has_key")?;
                    out.push_str(" IS NOT NULL");
                }
            }
            JsonOp::Gte { value, keys } => {
                self.push_extract(&mut out, &column, keys, "gte")?;
                out.push_str(&format!(" >={value}"));
            }
            JsonOp::Lte { value, keys } => {
                self.push_extract(&mut out, &column, keys, "lte")?;
                out.push_str(&format!(" <={value}"));
            }
            JsonOp::NumRange { min, max, keys } => {
                self.push_extract(&mut out, &column, keys, "num_range")?;
                out.push_str(&format!("  BETWEEN {min} AND {max}"));
            }
            JsonOp::KeysContain { values } => {
                let array = json_array_literal(values)?;
                out.push_str(&format!("JSON_CONTAINS(JSON_KEYS({column}),'{array}') "));
            }
            JsonOp::Contains { values } => {
                let array = json_array_literal(values)?;
                out.push_str(&format!("JSON_CONTAINS({column},'{array}') "));
            }
            JsonOp::JointOrContains { values } => {
                let mut parts = Vec::with_capacity(values.len());
                for value in values {
                    let array = json_array_literal(std::slice::from_ref(value))?;
                    parts.push(format!("JSON_CONTAINS({column},'{array}') "));
                }
                out.push_str(&parts.join(" OR "));
            }
            JsonOp::SubValContains { value, key } => {
                let key = escape_literal(&serde_json::to_string(key)?);
                let array = json_array_literal(std::slice::from_ref(value))?;
                out.push_str(&format!(
                    "JSON_CONTAINS(JSON_EXTRACT({column},'$.*.{key}'),'{array}') "
                ));
            }
            JsonOp::Equals { value, keys } => {
                if !keys.is_empty() {
                    self.push_extract(&mut out, &column, keys, "equals")?;
                    out.push_str(" = ");
                    match value {
                        SqlValue::Bool(b) => out.push_str(&b.to_string()),
                        other => out.push_var(other.clone()),
                    }
                }
            }
        }
        Ok(out)
    }

    fn push_extract(
        &self,
        out: &mut SqlFragment,
        column: &str,
        keys: &[String],
        operation: &'static str,
    ) -> Result<(), QueryError> {
        let path = key_path(keys).ok_or_else(|| QueryError::MissingKeys {
            column: self.column.clone(),
            operation,
        })?;
        out.push_str(&format!("JSON_EXTRACT({column},"));
        out.push_var(path);
        out.push_str(")");
        Ok(())
    }
}

/// `["a"]` → `$.a`; `["a", "b", "c"]` → `$."a".b.c`.
#[must_use]
pub fn key_path(keys: &[String]) -> Option<String> {
    match keys {
        [] => None,
        [single] => Some(format!("{PATH_PREFIX}{single}")),
        [first, rest @ ..] => {
            let mut path = format!("{PATH_PREFIX}\"{first}\"");
            for key in rest {
                path.push('.');
                path.push_str(key);
            }
            Some(path)
        }
    }
}

fn json_array_literal(values: &[String]) -> Result<String, QueryError> {
    Ok(escape_literal(&serde_json::to_string(values)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mysql(query: &JsonQuery) -> SqlFragment {
        query.build(Dialect::Mysql).expect("query should build")
    }

    #[test]
    fn extract_binds_path() {
        let frag = mysql(&JsonQuery::new("storage_device").extract("$.\"/data\".size"));
        assert_eq!(frag.sql, "JSON_EXTRACT(`storage_device`,?)");
        assert_eq!(frag.args, vec![SqlValue::from("$.\"/data\".size")]);
    }

    #[test]
    fn has_key_with_nested_path() {
        let frag = mysql(&JsonQuery::new("storage_device").has_key(&["/data", "size"]));
        assert_eq!(frag.sql, "JSON_EXTRACT(`storage_device`,?) IS NOT NULL");
        assert_eq!(frag.args, vec![SqlValue::from("$.\"/data\".size")]);
    }

    #[test]
    fn has_key_without_keys_is_empty() {
        let frag = mysql(&JsonQuery::new("storage_device").has_key(&[]));
        assert!(frag.is_empty());
    }

    #[test]
    fn comparisons_inline_bounds() {
        let gte = mysql(&JsonQuery::new("spec").gte(8, &["cpu"]));
        assert_eq!(gte.sql, "JSON_EXTRACT(`spec`,?) >=8");
        assert_eq!(gte.args, vec![SqlValue::from("$.cpu")]);

        let lte = mysql(&JsonQuery::new("spec").lte(64, &["cpu"]));
        assert_eq!(lte.sql, "JSON_EXTRACT(`spec`,?) <=64");

        let range = mysql(&JsonQuery::new("spec").num_range(8, 16, &["cpu"]));
        assert_eq!(range.sql, "JSON_EXTRACT(`spec`,?)  BETWEEN 8 AND 16");
    }

    #[test]
    fn comparison_without_keys_is_an_error() {
        let err = JsonQuery::new("spec")
            .gte(1, &[])
            .build(Dialect::Mysql)
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingKeys { operation: "gte", .. }));
    }

    #[test]
    fn contains_variants_render_literal_arrays() {
        let keys = mysql(&JsonQuery::new("storage_device").keys_contains(&["/data", "/data1"]));
        assert_eq!(
            keys.sql,
            "JSON_CONTAINS(JSON_KEYS(`storage_device`),'[\"/data\",\"/data1\"]') "
        );
        assert!(keys.args.is_empty());

        let contains = mysql(&JsonQuery::new("labels").contains(&["ssd", "hot"]));
        assert_eq!(contains.sql, "JSON_CONTAINS(`labels`,'[\"ssd\",\"hot\"]') ");

        let any = mysql(&JsonQuery::new("labels").joint_or_contains(&["a", "b"]));
        assert_eq!(
            any.sql,
            "JSON_CONTAINS(`labels`,'[\"a\"]')  OR JSON_CONTAINS(`labels`,'[\"b\"]') "
        );
    }

    #[test]
    fn sub_value_contains_uses_wildcard_path() {
        let frag = mysql(&JsonQuery::new("storage_device").sub_val_contains("SSD", "disk_type"));
        assert_eq!(
            frag.sql,
            "JSON_CONTAINS(JSON_EXTRACT(`storage_device`,'$.*.\"disk_type\"'),'[\"SSD\"]') "
        );
    }

    #[test]
    fn equals_inlines_booleans_and_binds_other_values() {
        let flag = mysql(&JsonQuery::new("attrs").equals(true, &["raid"]));
        assert_eq!(flag.sql, "JSON_EXTRACT(`attrs`,?) = true");
        assert_eq!(flag.args, vec![SqlValue::from("$.raid")]);

        let text = mysql(&JsonQuery::new("storage_device").equals("SSD", &["/data", "disk_type"]));
        assert_eq!(text.sql, "JSON_EXTRACT(`storage_device`,?) = ?");
        assert_eq!(
            text.args,
            vec![
                SqlValue::from("$.\"/data\".disk_type"),
                SqlValue::from("SSD")
            ]
        );
    }

    #[test]
    fn values_with_quotes_are_escaped() {
        let frag = mysql(&JsonQuery::new("labels").contains(&["it's"]));
        assert_eq!(frag.sql, "JSON_CONTAINS(`labels`,'[\"it''s\"]') ");
    }

    #[test]
    fn other_dialects_render_nothing() {
        let query = JsonQuery::new("labels").contains(&["a"]);
        assert!(query.build(Dialect::Sqlite).unwrap().is_empty());
        assert!(query.build(Dialect::Postgres).unwrap().is_empty());
    }

    #[test]
    fn last_operation_wins() {
        let frag = mysql(&JsonQuery::new("labels").contains(&["a"]).has_key(&["x"]));
        assert_eq!(frag.sql, "JSON_EXTRACT(`labels`,?) IS NOT NULL");
    }

    #[test]
    fn key_path_forms() {
        assert_eq!(key_path(&[]), None);
        assert_eq!(key_path(&["cpu".into()]).as_deref(), Some("$.cpu"));
        assert_eq!(
            key_path(&["/data".into(), "size".into()]).as_deref(),
            Some("$.\"/data\".size")
        );
    }
}
