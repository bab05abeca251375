use crate::{db_conn::DbConn, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub const AUTH_COOKIE: &str = "user_id";

// A password that nobody can log in with, only there so that rejecting
// an unknown username costs a bcrypt verification too.
const DUMMY_PASSWORD_HASH: &str =
    "$2y$10$vkPu8.bYQrlCTDPWCdUDT.HMjBHCRLVrbFbAbPirHCPTJCJWZAJNO";

#[derive(Queryable, Identifiable, Clone, Debug)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: String,
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_name, username as &str);
    find_by!(users, find_by_email, email as &str);

    pub fn name(&self) -> String {
        if !self.display_name.is_empty() {
            self.display_name.clone()
        } else {
            self.username.clone()
        }
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(Error::from)
    }

    pub fn login(conn: &Connection, ident: &str, password: &str) -> Result<User> {
        match User::find_by_email(conn, ident).or_else(|_| User::find_by_name(conn, ident)) {
            Ok(user) => {
                if bcrypt::verify(password, &user.hashed_password).unwrap_or(false) {
                    Ok(user)
                } else {
                    Err(Error::NotFound)
                }
            }
            Err(e) => {
                let _ = bcrypt::verify(password, DUMMY_PASSWORD_HASH);
                Err(e)
            }
        }
    }

    pub fn is_following(&self, conn: &Connection, other_id: i32) -> Result<bool> {
        use crate::schema::follows;
        follows::table
            .filter(follows::follower_id.eq(self.id))
            .filter(follows::following_id.eq(other_id))
            .count()
            .get_result::<i64>(conn)
            .map_err(Error::from)
            .map(|r| r > 0)
    }

    pub fn count_followers(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::follows;
        follows::table
            .filter(follows::following_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn count_followed(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::follows;
        follows::table
            .filter(follows::follower_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }
}

impl NewUser {
    pub fn new_local(
        conn: &Connection,
        username: String,
        display_name: String,
        email: String,
        hashed_password: String,
    ) -> Result<User> {
        User::insert(
            conn,
            NewUser {
                username,
                display_name,
                email,
                hashed_password,
            },
        )
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&conn, id).ok())
            .or_forward(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &crate::Connection) -> Vec<User> {
        vec![
            NewUser::new_local(
                conn,
                "admin".to_owned(),
                "The admin".to_owned(),
                "admin@example.com".to_owned(),
                User::hash_pass("admin_password").unwrap(),
            )
            .unwrap(),
            NewUser::new_local(
                conn,
                "user".to_owned(),
                "Some user".to_owned(),
                "user@example.com".to_owned(),
                User::hash_pass("user_password").unwrap(),
            )
            .unwrap(),
            NewUser::new_local(
                conn,
                "other".to_owned(),
                String::new(),
                "other@example.com".to_owned(),
                User::hash_pass("other_password").unwrap(),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn find_by() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(
                users[0].id,
                User::find_by_name(&conn, "admin").unwrap().id
            );
            assert_eq!(
                users[1].id,
                User::find_by_email(&conn, "user@example.com").unwrap().id
            );
            assert!(User::find_by_name(&conn, "nobody").is_err());
            Ok(())
        });
    }

    #[test]
    fn name() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(users[0].name(), "The admin");
            // falls back to the username when there is no display name
            assert_eq!(users[2].name(), "other");
            Ok(())
        });
    }

    #[test]
    fn login() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(
                users[0].id,
                User::login(&conn, "admin", "admin_password").unwrap().id
            );
            assert_eq!(
                users[0].id,
                User::login(&conn, "admin@example.com", "admin_password")
                    .unwrap()
                    .id
            );
            assert!(User::login(&conn, "admin", "user_password").is_err());
            assert!(User::login(&conn, "nobody", "admin_password").is_err());
            Ok(())
        });
    }
}
