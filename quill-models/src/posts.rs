use crate::{
    groups::Group, medias::Media, safe_string::SafeString, schema::posts, users::User, Connection,
    Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone)]
pub struct Post {
    pub id: i32,
    pub text: SafeString,
    pub creation_date: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image_id: Option<i32>,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub text: SafeString,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image_id: Option<i32>,
}

impl Post {
    insert!(posts, NewPost);
    get!(posts);

    /// Saves the editable fields of this post. The author and the
    /// creation date are never written back.
    pub fn update(&self, conn: &Connection) -> Result<Self> {
        diesel::update(self)
            .set((
                posts::text.eq(&self.text),
                posts::group_id.eq(self.group_id),
                posts::image_id.eq(self.image_id),
            ))
            .execute(conn)?;
        Self::get(conn, self.id)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn count_for_group(conn: &Connection, group: &Group) -> Result<i64> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn count_for_author(conn: &Connection, author: &User) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Number of posts written by people `user` follows.
    pub fn count_followed(conn: &Connection, user: &User) -> Result<i64> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn page(conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        posts::table
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn group_page(
        conn: &Connection,
        group: &Group,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn author_page(
        conn: &Connection,
        author: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    /// The page of posts written by people `user` follows, most recent
    /// first. A post published by a followed author shows up here as
    /// soon as it is committed.
    pub fn followed_page(
        conn: &Connection,
        user: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_group(&self, conn: &Connection) -> Result<Option<Group>> {
        self.group_id.map(|id| Group::get(conn, id)).transpose()
    }

    pub fn image_url(&self, conn: &Connection) -> Option<String> {
        self.image_id
            .and_then(|id| Media::get(conn, id).ok())
            .map(|media| media.url())
    }
}
