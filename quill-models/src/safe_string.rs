use ammonia::clean;
use diesel::{
    deserialize::{FromSql, Queryable},
    serialize::{self, Output, ToSql},
    sql_types::Text,
};
use std::{
    borrow::Borrow,
    fmt::{self, Display},
    io::Write,
    ops::Deref,
};

/// A string that has been sanitized with ammonia before being stored
/// or displayed, so it can never carry markup of its own.
#[derive(Debug, Clone, PartialEq, Eq, AsExpression, FromSqlRow, Default)]
#[sql_type = "Text"]
pub struct SafeString {
    value: String,
}

impl SafeString {
    pub fn new(value: &str) -> Self {
        SafeString {
            value: clean(value),
        }
    }

    pub fn set(&mut self, value: &str) {
        self.value = clean(value);
    }

    pub fn get(&self) -> &String {
        &self.value
    }
}

impl<DB> Queryable<Text, DB> for SafeString
where
    DB: diesel::backend::Backend,
    String: FromSql<Text, DB>,
{
    type Row = String;

    fn build(value: Self::Row) -> Self {
        SafeString::new(&value)
    }
}

impl<DB> ToSql<Text, DB> for SafeString
where
    DB: diesel::backend::Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<W: Write>(&self, out: &mut Output<W, DB>) -> serialize::Result {
        str::to_sql(&self.value, out)
    }
}

impl Borrow<str> for SafeString {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl Display for SafeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Deref for SafeString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl AsRef<str> for SafeString {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
