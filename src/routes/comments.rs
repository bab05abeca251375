use crate::routes::errors::ErrorPage;
use crate::utils;
use quill_models::{
    comments::{Comment, NewComment},
    posts::Post,
    quill_rocket::QuillRocket,
    safe_string::SafeString,
    users::User,
};
use rocket::{
    request::Form,
    response::{Flash, Redirect},
};

#[derive(FromForm)]
pub struct NewCommentForm {
    pub text: String,
}

#[post("/posts/<id>/comment", data = "<form>")]
pub fn create(
    id: i32,
    form: Form<NewCommentForm>,
    user: User,
    rockets: QuillRocket,
) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    // an empty comment is dropped without being an error
    if !form.text.trim().is_empty() {
        Comment::insert(
            conn,
            NewComment {
                text: SafeString::new(form.text.trim()),
                post_id: post.id,
                author_id: user.id,
            },
        )?;
    }
    Ok(Redirect::to(uri!(super::posts::details: id = post.id)))
}

#[post("/posts/<id>/comment", rank = 2)]
pub fn create_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to comment",
        uri!(super::posts::details: id = id),
    )
}
