use crate::{schema::follows, Connection, Error, Result};
use diesel::{
    self,
    result::{DatabaseErrorKind, Error as DieselError},
    ExpressionMethods, QueryDsl, RunQueryDsl,
};

/// A directed subscription edge between two users.
#[derive(Clone, Queryable, Identifiable)]
pub struct Follow {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);
    get!(follows);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Subscribes `from` to `to`, or returns the existing subscription.
    /// Two racing follows both end up on the same row: the loser of the
    /// race hits the unique index and re-reads the winner's insert.
    pub fn find_or_create(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        if let Ok(follow) = Self::find(conn, from, to) {
            return Ok(follow);
        }
        match Self::insert(
            conn,
            NewFollow {
                follower_id: from,
                following_id: to,
            },
        ) {
            Err(Error::Db(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            ))) => Self::find(conn, from, to),
            other => other,
        }
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}
