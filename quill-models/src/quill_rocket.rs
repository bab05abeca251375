use crate::{db_conn::DbConn, users::User};
use rocket::{
    request::{self, FlashMessage, FromRequest, Request},
    Outcome,
};

/// Common context needed by most routes and templates: a database
/// connection, the current user (if any), and the pending flash message.
pub struct QuillRocket {
    pub conn: DbConn,
    pub user: Option<User>,
    pub flash_msg: Option<(String, String)>,
}

impl<'a, 'r> FromRequest<'a, 'r> for QuillRocket {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<Self, Self::Error> {
        let conn = request.guard::<DbConn>()?;
        let user = request.guard::<User>().succeeded();
        let flash_msg = request.guard::<FlashMessage<'_, '_>>().succeeded();
        Outcome::Success(QuillRocket {
            conn,
            user,
            flash_msg: flash_msg.map(|f| (f.name().into(), f.msg().into())),
        })
    }
}
