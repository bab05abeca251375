use crate::routes::{errors::ErrorPage, Page};
use crate::template_utils::{IntoContext, Rendered};
use quill_models::{groups::Group, posts::Post, quill_rocket::QuillRocket};

#[get("/group/<slug>?<page>")]
pub fn details(
    slug: String,
    page: Option<Page>,
    rockets: QuillRocket,
) -> Result<Rendered, ErrorPage> {
    let conn = &*rockets.conn;
    let group = Group::find_by_slug(conn, &slug)?;
    let total = Page::total(Post::count_for_group(conn, &group)? as i32);
    let page = page.unwrap_or_default().clamp(total);
    let posts = Post::group_page(conn, &group, page.limits())?;
    Ok(render!(groups::details(
        &rockets.to_context(),
        &group,
        &posts,
        *page,
        total
    )))
}
