pub mod handlers;

use actix_web::web;

pub use handlers::verify::{health, verify};

/// Routes served by the verification server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify).service(health);
}
