//! SQL statements with named parameters.
//!
//! A `Statement` carries SQL text written with named placeholders (`@name`,
//! `:name` or `$name`) plus a `FieldMap` of values. Before execution the text
//! is rewritten to numbered `?N` placeholders, one index per distinct name,
//! and the values are bound in index order. Values never end up in the SQL
//! text itself.

use std::collections::HashMap;

use crate::error_handling::DatabaseError;

use super::value::{FieldMap, SqlValue};

/// Immutable SQL text plus its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: FieldMap,
}

impl Statement {
    /// Creates a statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: FieldMap::new(),
        }
    }

    /// Creates a statement with the given parameters.
    ///
    /// Keys may carry a leading `@`, `:` or `$`; `@Name` and `Name` bind the
    /// same placeholder.
    pub fn with_params(sql: impl Into<String>, params: FieldMap) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Adds one parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Builds `INSERT INTO {table} (cols) VALUES (@cols)` from a field map.
    ///
    /// The table and column names go into the SQL text as-is and must be
    /// trusted literals; only the values are parameterized.
    pub fn insert_into(table: &str, fields: &FieldMap) -> Result<Self, DatabaseError> {
        if fields.is_empty() {
            return Err(DatabaseError::BindError(format!(
                "no columns to insert into {table}"
            )));
        }
        let columns = fields.keys().map(String::as_str).collect::<Vec<_>>();
        let placeholders = columns
            .iter()
            .map(|c| format!("@{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );
        Ok(Self::with_params(sql, fields.clone()))
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &FieldMap {
        &self.params
    }

    /// Rewrites the SQL to numbered placeholders and orders the values.
    pub(crate) fn bind(&self) -> Result<BoundStatement, DatabaseError> {
        let mut lookup: HashMap<&str, &SqlValue> = HashMap::with_capacity(self.params.len());
        for (key, value) in &self.params {
            let name = strip_sigil(key);
            if lookup.insert(name, value).is_some() {
                return Err(DatabaseError::BindError(format!(
                    "parameter {name} supplied more than once"
                )));
            }
        }

        let mut scanner = PlaceholderScanner::new(&self.sql);
        let mut sql = String::with_capacity(self.sql.len());
        let mut names: Vec<String> = Vec::new();
        let mut values = Vec::new();

        while let Some(piece) = scanner.next_piece()? {
            match piece {
                Piece::Text(text) => sql.push_str(&text),
                Piece::Placeholder(name) => {
                    let index = match names.iter().position(|n| *n == name) {
                        Some(i) => i,
                        None => {
                            let value = lookup.get(name.as_str()).ok_or_else(|| {
                                DatabaseError::BindError(format!(
                                    "no value supplied for parameter @{name}"
                                ))
                            })?;
                            values.push((*value).clone());
                            names.push(name);
                            names.len() - 1
                        }
                    };
                    sql.push_str(&format!("?{}", index + 1));
                }
            }
        }

        Ok(BoundStatement { sql, values })
    }
}

/// SQL rewritten to `?N` placeholders, with values in binding order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl BoundStatement {
    /// Builds the sqlx query with every value bound.
    pub(crate) fn to_query(
        &self,
    ) -> sqlx::query::Query<'_, sqlx::Sqlite, <sqlx::Sqlite as sqlx::Database>::Arguments<'_>> {
        let mut query = sqlx::query(&self.sql);
        for value in &self.values {
            query = match value {
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Decimal(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
                SqlValue::DateTime(v) => query.bind(*v),
                SqlValue::Bool(v) => query.bind(*v),
            };
        }
        query
    }
}

fn strip_sigil(key: &str) -> &str {
    key.strip_prefix(['@', ':', '$']).unwrap_or(key)
}

enum Piece {
    Text(String),
    Placeholder(String),
}

/// Splits SQL into literal text and named placeholders.
///
/// String literals, quoted identifiers and comments are copied through
/// untouched so that an `@` inside them is never taken for a parameter.
struct PlaceholderScanner {
    input: Vec<char>,
    position: usize,
}

impl PlaceholderScanner {
    fn new(sql: &str) -> Self {
        Self {
            input: sql.chars().collect(),
            position: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn next_piece(&mut self) -> Result<Option<Piece>, DatabaseError> {
        let Some(ch) = self.current() else {
            return Ok(None);
        };

        match ch {
            '@' | ':' | '$' if self.peek().is_some_and(is_name_char) => {
                self.position += 1;
                let start = self.position;
                while self.current().is_some_and(is_name_char) {
                    self.position += 1;
                }
                let name = self.input[start..self.position].iter().collect();
                Ok(Some(Piece::Placeholder(name)))
            }
            '?' => Err(DatabaseError::BindError(format!(
                "positional placeholder at offset {} is not supported; use @name",
                self.position
            ))),
            _ => {
                let start = self.position;
                self.skip_text()?;
                let text = self.input[start..self.position].iter().collect();
                Ok(Some(Piece::Text(text)))
            }
        }
    }

    /// Advances past plain text up to the next placeholder candidate.
    fn skip_text(&mut self) -> Result<(), DatabaseError> {
        while let Some(ch) = self.current() {
            match ch {
                '\'' | '"' | '`' => self.skip_quoted(ch)?,
                '[' => self.skip_quoted(']')?,
                '-' if self.peek() == Some('-') => self.skip_line_comment(),
                '/' if self.peek() == Some('*') => self.skip_block_comment(),
                '?' => return Ok(()),
                '@' | ':' | '$' if self.peek().is_some_and(is_name_char) => return Ok(()),
                _ => self.position += 1,
            }
        }
        Ok(())
    }

    /// Skips a quoted run. A doubled closing quote is an escape and is
    /// handled by treating it as close-then-reopen.
    fn skip_quoted(&mut self, close: char) -> Result<(), DatabaseError> {
        let open_at = self.position;
        self.position += 1;
        while let Some(ch) = self.current() {
            self.position += 1;
            if ch == close {
                return Ok(());
            }
        }
        Err(DatabaseError::BindError(format!(
            "unterminated quoted text starting at offset {open_at}"
        )))
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            self.position += 1;
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.position += 2;
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek() == Some('/') {
                self.position += 2;
                return;
            }
            self.position += 1;
        }
    }
}

/// Unicode letters and digits are allowed, matching what SQLite accepts in
/// an unquoted column name.
fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_named_placeholders() {
        let stmt = Statement::new("SELECT * FROM tbl_User WHERE user_id = @UserId AND role = @Role")
            .param("@UserId", 7)
            .param("Role", "admin");
        let bound = stmt.bind().unwrap();
        assert_eq!(
            bound.sql,
            "SELECT * FROM tbl_User WHERE user_id = ?1 AND role = ?2"
        );
        assert_eq!(
            bound.values,
            vec![SqlValue::Int(7), SqlValue::Text("admin".to_string())]
        );
    }

    #[test]
    fn test_repeated_name_binds_once() {
        let stmt = Statement::new("SELECT @a + :a, $b").param("a", 1).param("b", 2);
        let bound = stmt.bind().unwrap();
        assert_eq!(bound.sql, "SELECT ?1 + ?1, ?2");
        assert_eq!(bound.values.len(), 2);
    }

    #[test]
    fn test_skips_literals_and_comments() {
        let sql = "SELECT 'a@b.com', \"col@x\", [odd:name] -- @ignored\n FROM t /* :nope */ WHERE x = @x";
        let stmt = Statement::new(sql).param("x", SqlValue::Null);
        let bound = stmt.bind().unwrap();
        assert!(bound.sql.ends_with("WHERE x = ?1"));
        assert!(bound.sql.contains("'a@b.com'"));
        assert!(bound.sql.contains("-- @ignored"));
        assert_eq!(bound.values, vec![SqlValue::Null]);
    }

    #[test]
    fn test_escaped_quote_in_literal() {
        let stmt = Statement::new("SELECT 'it''s @not' , @yes").param("yes", true);
        let bound = stmt.bind().unwrap();
        assert_eq!(bound.sql, "SELECT 'it''s @not' , ?1");
    }

    #[test]
    fn test_missing_parameter_is_bind_error() {
        let stmt = Statement::new("DELETE FROM t WHERE id = @id");
        match stmt.bind() {
            Err(DatabaseError::BindError(msg)) => assert!(msg.contains("@id")),
            other => panic!("expected BindError, got {other:?}"),
        }
    }

    #[test]
    fn test_positional_placeholder_rejected() {
        let stmt = Statement::new("SELECT * FROM t WHERE id = ?");
        assert!(matches!(stmt.bind(), Err(DatabaseError::BindError(_))));
    }

    #[test]
    fn test_duplicate_key_after_sigil_strip_rejected() {
        let stmt = Statement::new("SELECT @a").param("@a", 1).param("a", 2);
        assert!(matches!(stmt.bind(), Err(DatabaseError::BindError(_))));
    }

    #[test]
    fn test_unused_parameters_are_ignored() {
        let stmt = Statement::new("SELECT 1").param("extra", 5);
        let bound = stmt.bind().unwrap();
        assert_eq!(bound.sql, "SELECT 1");
        assert!(bound.values.is_empty());
    }

    #[test]
    fn test_insert_into_builds_sorted_columns() {
        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), SqlValue::from("Alice"));
        fields.insert("age".to_string(), SqlValue::from(30));
        let stmt = Statement::insert_into("tbl_Guest", &fields).unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO tbl_Guest (age, name) VALUES (@age, @name)"
        );
        let bound = stmt.bind().unwrap();
        assert_eq!(bound.sql, "INSERT INTO tbl_Guest (age, name) VALUES (?1, ?2)");
    }

    #[test]
    fn test_non_ascii_placeholder_names() {
        let fields = FieldMap::from([
            ("prénom".to_string(), SqlValue::from("Zoé")),
            ("âge".to_string(), SqlValue::from(27)),
        ]);
        let stmt = Statement::insert_into("tbl_Voyageur", &fields).unwrap();
        let bound = stmt.bind().unwrap();
        assert_eq!(
            bound.sql,
            "INSERT INTO tbl_Voyageur (prénom, âge) VALUES (?1, ?2)"
        );
        assert_eq!(
            bound.values,
            vec![SqlValue::from("Zoé"), SqlValue::from(27)]
        );
    }

    #[test]
    fn test_insert_into_empty_map_rejected() {
        assert!(matches!(
            Statement::insert_into("tbl_Guest", &FieldMap::new()),
            Err(DatabaseError::BindError(_))
        ));
    }
}
