//! Composition of `SELECT <Class> WHERE ...` lookup expressions.

use std::fmt;

/// Right-hand side of an equality condition.
#[derive(Debug, Clone, PartialEq)]
pub enum OqlValue {
    Int(i64),
    UInt(u64),
    Str(String),
}

impl From<u64> for OqlValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<i64> for OqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for OqlValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for OqlValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl fmt::Display for OqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Str(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if matches!(c, '\'' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(String, OqlValue),
    /// Written out verbatim.
    Raw(String),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(field, value) => write!(f, "{field} = {value}"),
            Self::Raw(expr) => f.write_str(expr),
        }
    }
}

/// `SELECT <class>` with zero or more AND-ed conditions, rendered in the
/// order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct OqlQuery {
    class: String,
    conditions: Vec<Condition>,
}

impl OqlQuery {
    pub fn select(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            conditions: Vec::new(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<OqlValue>) -> Self {
        self.conditions.push(Condition::Eq(field.into(), value.into()));
        self
    }

    /// Append an already-formed condition such as `status = "active"`.
    /// The caller is responsible for its quoting.
    pub fn and_raw(mut self, expression: impl Into<String>) -> Self {
        self.conditions.push(Condition::Raw(expression.into()));
        self
    }

    /// Add the condition only when a value is present.
    pub fn and_eq_opt<V: Into<OqlValue>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.and_eq(field, v),
            None => self,
        }
    }
}

impl fmt::Display for OqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {}", self.class)?;
        for (i, condition) in self.conditions.iter().enumerate() {
            let joiner = if i == 0 { " WHERE " } else { " AND " };
            write!(f, "{joiner}{condition}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_conditions_renders_bare_select() {
        assert_eq!(OqlQuery::select("Organization").to_string(), "SELECT Organization");
    }

    #[test]
    fn strings_are_quoted_and_numbers_are_not() {
        let query = OqlQuery::select("UserRequest")
            .and_eq("operational_status", "open")
            .and_eq("caller_id", 123u64);
        assert_eq!(
            query.to_string(),
            "SELECT UserRequest WHERE operational_status = 'open' AND caller_id = 123"
        );
    }

    #[test]
    fn absent_values_are_skipped() {
        let query = OqlQuery::select("Person")
            .and_eq_opt("org_id", None::<u64>)
            .and_eq_opt("status", Some("active"));
        assert_eq!(query.to_string(), "SELECT Person WHERE status = 'active'");
    }

    #[test]
    fn quotes_in_strings_are_escaped() {
        let query = OqlQuery::select("Organization").and_eq("name", "O'Neil");
        assert_eq!(query.to_string(), r"SELECT Organization WHERE name = 'O\'Neil'");
    }

    #[test]
    fn large_unsigned_ids_keep_their_value() {
        let query = OqlQuery::select("UserRequest").and_eq("caller_id", u64::MAX);
        assert_eq!(
            query.to_string(),
            "SELECT UserRequest WHERE caller_id = 18446744073709551615"
        );
    }

    #[test]
    fn raw_conditions_are_written_verbatim() {
        let query = OqlQuery::select("Organization")
            .and_raw(r#"status = "active""#)
            .and_eq("parent_id", 2u64);
        assert_eq!(query.class(), "Organization");
        assert_eq!(
            query.to_string(),
            r#"SELECT Organization WHERE status = "active" AND parent_id = 2"#
        );
    }
}
