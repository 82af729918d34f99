mod attach_job_reference;
mod cancel_reminder;
pub(crate) mod create_reminder;
mod list_reminders;
mod mark_reminder_sent;
pub(crate) mod schedule_reminder;
pub mod send_reminder;

use actix_web::web;
use cancel_reminder::cancel_reminder_controller;
use create_reminder::create_reminder_controller;
use list_reminders::list_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(list_reminders_controller));
    cfg.route(
        "/reminders/create",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/reminders/delete",
        web::post().to(cancel_reminder_controller),
    );
}
