#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;

use crate::config::Config;

#[cfg(feature = "postgres")]
pub type Connection = diesel::PgConnection;

#[cfg(not(feature = "postgres"))]
pub type Connection = diesel::SqliteConnection;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    Hash(bcrypt::BcryptError),
    Io(std::io::Error),
    Migration(diesel_migrations::RunMigrationsError),
    NotFound,
    Unauthorized,
    Validation,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            _ => Error::Db(err),
        }
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Hash(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<diesel_migrations::RunMigrationsError> for Error {
    fn from(err: diesel_migrations::RunMigrationsError) -> Self {
        Error::Migration(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds a function to a model, that returns the first
/// matching row for a given list of columns.
///
/// Usage:
///
/// ```rust
/// impl Post {
///     find_by!(posts, find_by_author, author_id as i32);
/// }
///
/// // Get the first post by a given author
/// let post = Post::find_by_author(&conn, author.id);
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// List all rows of a model, matching a list of columns.
macro_rules! list_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by its primary key.
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve the most recently inserted row.
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds an insertion function to a model. The database does not
/// give the inserted row back, so it is re-read after the insert.
macro_rules! insert {
    ($table:ident, $from:ty) => {
        last!($table);
        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table)
                .values(new)
                .execute(conn)?;
            Self::last(conn)
        }
    };
}

lazy_static! {
    pub static ref CONFIG: Config = Config::default();
}

pub mod comments;
pub mod config;
pub mod db_conn;
pub mod follows;
pub mod groups;
pub mod medias;
pub mod migrations;
pub mod posts;
pub mod quill_rocket;
pub mod safe_string;
pub mod schema;
pub mod users;
