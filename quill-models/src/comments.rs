use crate::{posts::Post, safe_string::SafeString, schema::comments, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone)]
pub struct Comment {
    pub id: i32,
    pub text: SafeString,
    pub post_id: i32,
    pub author_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub text: SafeString,
    pub post_id: i32,
    pub author_id: i32,
}

impl Comment {
    insert!(comments, NewComment);
    get!(comments);
    // Deliberately not sorted: readers expect comments in the order
    // they were written, which is the insertion order.
    list_by!(comments, list_by_post, post_id as i32);

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }
}
