//! SQL text plus positional bind arguments.

use serde::{Deserialize, Serialize};

/// A bind argument for a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// A piece of SQL with `?` placeholders and the arguments that fill them, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlFragment {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl SqlFragment {
    #[must_use]
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    pub(crate) fn push_var(&mut self, value: impl Into<SqlValue>) {
        self.sql.push('?');
        self.args.push(value.into());
    }
}

/// Quote an identifier with backticks; `table.column` quotes each part.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("`{}`", part.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape text for use inside a single-quoted MySQL string literal.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_backticked_per_part() {
        assert_eq!(quote_ident("labels"), "`labels`");
        assert_eq!(quote_ident("tb_rp_detail.labels"), "`tb_rp_detail`.`labels`");
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
    }

    #[test]
    fn literals_escape_quotes_and_backslashes() {
        assert_eq!(escape_literal(r#"["it's"]"#), r#"["it''s"]"#);
        assert_eq!(escape_literal(r#"["a\"b"]"#), r#"["a\\"b"]"#);
    }

    #[test]
    fn args_serialize_untagged() {
        let frag = SqlFragment::new("? ?", vec![1_i64.into(), "x".into()]);
        let json = serde_json::to_value(&frag).unwrap();
        assert_eq!(json["args"], serde_json::json!([1, "x"]));
    }
}
