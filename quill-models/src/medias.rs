use crate::{schema::medias, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// An uploaded image, stored on disk and referenced by posts.
#[derive(Clone, Identifiable, Queryable)]
pub struct Media {
    pub id: i32,
    pub file_path: String,
    pub owner_id: i32,
}

#[derive(Insertable)]
#[table_name = "medias"]
pub struct NewMedia {
    pub file_path: String,
    pub owner_id: i32,
}

impl Media {
    insert!(medias, NewMedia);
    get!(medias);

    /// The public URL of this file. Media are saved below the static
    /// directory, so their path is also their URL.
    pub fn url(&self) -> String {
        format!("/{}", self.file_path)
    }
}
