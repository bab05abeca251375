use crate::routes::{errors::ErrorPage, Page, RespondOrRedirect};
use crate::template_utils::{IntoContext, Rendered};
use crate::utils;
use guid_create::GUID;
use multipart::server::{
    save::{SaveResult, SavedData},
    Multipart,
};
use quill_models::{
    comments::Comment,
    groups::Group,
    medias::{Media, NewMedia},
    posts::{NewPost, Post},
    quill_rocket::QuillRocket,
    safe_string::SafeString,
    users::User,
    Connection, Error, CONFIG,
};
use rocket::{
    http::ContentType,
    response::{Flash, Redirect},
    Data,
};
use std::fs::{self, DirBuilder};
use std::path::Path;

#[get("/?<page>")]
pub fn index(page: Option<Page>, rockets: QuillRocket) -> Result<Rendered, ErrorPage> {
    let conn = &*rockets.conn;
    let total = Page::total(Post::count(conn)? as i32);
    let page = page.unwrap_or_default().clamp(total);
    let posts = Post::page(conn, page.limits())?;
    Ok(render!(posts::index(
        &rockets.to_context(),
        &posts,
        *page,
        total
    )))
}

#[get("/posts/<id>")]
pub fn details(id: i32, rockets: QuillRocket) -> Result<Rendered, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    let author = post.get_author(conn)?;
    let comments = Comment::list_by_post(conn, post.id)?;
    Ok(render!(posts::details(
        &rockets.to_context(),
        &post,
        &author,
        &comments
    )))
}

#[get("/create")]
pub fn new(_user: User, rockets: QuillRocket) -> Result<Rendered, ErrorPage> {
    let groups = Group::list(&rockets.conn)?;
    Ok(render!(posts::form(
        &rockets.to_context(),
        &groups,
        None,
        "",
        None,
        None
    )))
}

#[get("/create", rank = 2)]
pub fn new_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in order to write a post", uri!(new))
}

/// What a post form contains once the multipart body has been read.
pub struct PostForm {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<(String, Vec<u8>)>,
}

fn parse_form(ct: &ContentType, data: Data) -> Result<PostForm, &'static str> {
    if !ct.is_form_data() {
        return Err("Multipart form expected");
    }
    let (_, boundary) = ct
        .params()
        .find(|&(k, _)| k == "boundary")
        .ok_or("No boundary")?;

    match Multipart::with_body(data.open(), boundary).save().temp() {
        SaveResult::Full(entries) => {
            let fields = entries.fields;
            let text = fields
                .get("text")
                .and_then(|v| v.iter().next())
                .and_then(|f| match &f.data {
                    SavedData::Text(t) => Some(t.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            let group_id = fields
                .get("group")
                .and_then(|v| v.iter().next())
                .and_then(|f| match &f.data {
                    SavedData::Text(t) => t.parse().ok(),
                    _ => None,
                });
            let image = fields
                .get("image")
                .and_then(|v| v.iter().next())
                .and_then(|f| {
                    let filename = f.headers.filename.clone()?;
                    let ext = filename
                        .rsplit('.')
                        .next()
                        .map(|ext| ext.to_lowercase())
                        .unwrap_or_else(|| "png".to_owned());
                    let bytes = match &f.data {
                        SavedData::Bytes(b) => b.clone(),
                        SavedData::File(path, _) => fs::read(path).ok()?,
                        _ => return None,
                    };
                    if bytes.is_empty() {
                        None
                    } else {
                        Some((ext, bytes))
                    }
                });
            Ok(PostForm {
                text,
                group_id,
                image,
            })
        }
        SaveResult::Partial(_, _) | SaveResult::Error(_) => Err("Couldn't read the form"),
    }
}

/// Checks the submitted group id against the database, so that a post
/// can never point to a group that does not exist.
fn valid_group(conn: &Connection, group_id: Option<i32>) -> Result<Option<Group>, &'static str> {
    match group_id {
        Some(id) => Group::get(conn, id)
            .map(Some)
            .map_err(|_| "Please select a valid group"),
        None => Ok(None),
    }
}

fn save_image(conn: &Connection, owner: &User, (ext, bytes): (String, Vec<u8>)) -> Result<Media, Error> {
    let dir = Path::new(&CONFIG.media_directory);
    DirBuilder::new().recursive(true).create(dir)?;
    let path = dir.join(format!("{}.{}", GUID::rand(), ext));
    fs::write(&path, bytes)?;
    Media::insert(
        conn,
        NewMedia {
            file_path: path.to_string_lossy().into_owned(),
            owner_id: owner.id,
        },
    )
}

#[post("/create", data = "<data>")]
pub fn create(
    ct: &ContentType,
    data: Data,
    user: User,
    rockets: QuillRocket,
) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let form = match parse_form(ct, data) {
        Ok(form) => form,
        Err(msg) => {
            let groups = Group::list(conn)?;
            return Ok(render!(posts::form(
                &rockets.to_context(),
                &groups,
                None,
                "",
                None,
                Some(msg)
            ))
            .into());
        }
    };

    let group = match valid_group(conn, form.group_id) {
        Ok(group) => group,
        Err(msg) => {
            let groups = Group::list(conn)?;
            return Ok(render!(posts::form(
                &rockets.to_context(),
                &groups,
                None,
                form.text.as_str(),
                form.group_id,
                Some(msg)
            ))
            .into());
        }
    };
    if form.text.trim().is_empty() {
        let groups = Group::list(conn)?;
        return Ok(render!(posts::form(
            &rockets.to_context(),
            &groups,
            None,
            "",
            form.group_id,
            Some("The text of the post can't be empty")
        ))
        .into());
    }

    let image = form.image.map(|img| save_image(conn, &user, img)).transpose()?;
    Post::insert(
        conn,
        NewPost {
            text: SafeString::new(form.text.trim()),
            author_id: user.id,
            group_id: group.map(|g| g.id),
            image_id: image.map(|i| i.id),
        },
    )?;
    Ok(Redirect::to(uri!(
        super::user::details: name = user.username,
        page = _
    ))
    .into())
}

#[post("/create", rank = 2)]
pub fn create_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in order to write a post", uri!(new))
}

#[get("/posts/<id>/edit")]
pub fn edit(
    id: i32,
    user: User,
    rockets: QuillRocket,
) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(uri!(details: id = id)).into());
    }
    let groups = Group::list(conn)?;
    Ok(render!(posts::form(
        &rockets.to_context(),
        &groups,
        Some(&post),
        post.text.get(),
        post.group_id,
        None
    ))
    .into())
}

#[get("/posts/<id>/edit", rank = 2)]
pub fn edit_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to edit a post",
        uri!(edit: id = id),
    )
}

#[post("/posts/<id>/edit", data = "<data>")]
pub fn update(
    id: i32,
    ct: &ContentType,
    data: Data,
    user: User,
    rockets: QuillRocket,
) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let mut post = Post::get(conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(uri!(details: id = id)).into());
    }

    let form = match parse_form(ct, data) {
        Ok(form) => form,
        Err(msg) => {
            let groups = Group::list(conn)?;
            return Ok(render!(posts::form(
                &rockets.to_context(),
                &groups,
                Some(&post),
                post.text.get(),
                post.group_id,
                Some(msg)
            ))
            .into());
        }
    };

    let group = match valid_group(conn, form.group_id) {
        Ok(group) => group,
        Err(msg) => {
            let groups = Group::list(conn)?;
            return Ok(render!(posts::form(
                &rockets.to_context(),
                &groups,
                Some(&post),
                form.text.as_str(),
                form.group_id,
                Some(msg)
            ))
            .into());
        }
    };
    if form.text.trim().is_empty() {
        let groups = Group::list(conn)?;
        return Ok(render!(posts::form(
            &rockets.to_context(),
            &groups,
            Some(&post),
            post.text.get(),
            post.group_id,
            Some("The text of the post can't be empty")
        ))
        .into());
    }

    let image = form.image.map(|img| save_image(conn, &user, img)).transpose()?;
    post.text = SafeString::new(form.text.trim());
    post.group_id = group.map(|g| g.id);
    // a new upload replaces the previous image, no upload keeps it
    if let Some(img) = image {
        post.image_id = Some(img.id);
    }
    post.update(conn)?;
    Ok(Redirect::to(uri!(details: id = id)).into())
}

#[post("/posts/<id>/edit", rank = 2)]
pub fn update_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to edit a post",
        uri!(edit: id = id),
    )
}
