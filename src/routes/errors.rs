use crate::template_utils::{IntoContext, Rendered};
use quill_models::{quill_rocket::QuillRocket, Error};
use rocket::{
    http::Status,
    request::FromRequest,
    response::{self, Responder},
    Request,
};
use tracing::warn;

#[derive(Debug)]
pub struct ErrorPage(Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

impl<'r> Responder<'r> for ErrorPage {
    fn respond_to(self, _req: &Request<'_>) -> response::Result<'r> {
        match self.0 {
            Error::NotFound => Err(Status::NotFound),
            Error::Unauthorized => Err(Status::NotFound),
            other => {
                warn!("server error: {:?}", other);
                Err(Status::InternalServerError)
            }
        }
    }
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Rendered {
    let rockets = QuillRocket::from_request(req).succeeded().unwrap();
    render!(errors::not_found(&rockets.to_context()))
}

#[catch(500)]
pub fn server_error(req: &Request<'_>) -> Rendered {
    let rockets = QuillRocket::from_request(req).succeeded().unwrap();
    render!(errors::server_error(&rockets.to_context()))
}
