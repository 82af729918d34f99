use actix_web::{http::StatusCode, HttpResponse};
use remindme_api_structs::APIErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemindmeError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
    #[error("The reminder is already completed. Error message: `{0}`")]
    ReminderComplete(String),
    #[error("The reminder is being sent right now. Error message: `{0}`")]
    ReminderInProgress(String),
}

impl RemindmeError {
    /// Machine readable code included in the error body
    pub fn code(&self) -> &'static str {
        match *self {
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadClientData(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ReminderComplete(_) => "REMINDER_COMPLETE",
            Self::ReminderInProgress(_) => "REMINDER_IN_PROGRESS",
        }
    }
}

impl actix_web::error::ResponseError for RemindmeError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ReminderComplete(_) => StatusCode::BAD_REQUEST,
            Self::ReminderInProgress(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(APIErrorResponse::new(self.code(), self.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::{body::to_bytes, ResponseError};

    #[actix_web::main]
    #[test]
    async fn renders_json_error_body() {
        let err = RemindmeError::ReminderInProgress("Reminder 3".into());
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(res.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(r#""status":"ERROR""#));
        assert!(body.contains(r#""code":"REMINDER_IN_PROGRESS""#));
    }
}
