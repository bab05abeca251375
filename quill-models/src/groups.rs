use crate::{safe_string::SafeString, schema::groups, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A topical category posts can be filed under. Groups are reference
/// data, managed with the CLI rather than through the web interface.
#[derive(Queryable, Identifiable, Clone)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: SafeString,
}

#[derive(Insertable)]
#[table_name = "groups"]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: SafeString,
}

impl Group {
    insert!(groups, NewGroup);
    get!(groups);
    find_by!(groups, find_by_slug, slug as &str);

    pub fn list(conn: &Connection) -> Result<Vec<Group>> {
        groups::table
            .order(groups::title.asc())
            .load(conn)
            .map_err(Error::from)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &crate::Connection) -> Vec<Group> {
        vec![
            Group::insert(
                conn,
                NewGroup {
                    title: "Cooking".to_owned(),
                    slug: "cooking".to_owned(),
                    description: SafeString::new("Recipes and kitchen stories"),
                },
            )
            .unwrap(),
            Group::insert(
                conn,
                NewGroup {
                    title: "Travel".to_owned(),
                    slug: "travel".to_owned(),
                    description: SafeString::new(""),
                },
            )
            .unwrap(),
        ]
    }

    #[test]
    fn find_by_slug() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let groups = fill_database(&conn);
            assert_eq!(
                groups[0].id,
                Group::find_by_slug(&conn, "cooking").unwrap().id
            );
            assert!(Group::find_by_slug(&conn, "nowhere").is_err());
            Ok(())
        });
    }

    #[test]
    fn list() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            let titles = Group::list(&conn)
                .unwrap()
                .into_iter()
                .map(|g| g.title)
                .collect::<Vec<_>>();
            assert_eq!(titles, vec!["Cooking".to_owned(), "Travel".to_owned()]);
            Ok(())
        });
    }
}
