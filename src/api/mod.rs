mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::error::JsonPayloadError;
use actix_web::web::{self, ServiceConfig};
use actix_web::{Error, HttpRequest};
use log::warn;

use crate::error::LedgerError;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(nodes::connect_nodes)
            .service(nodes::list_nodes)
            .service(nodes::resolve_chain),
    );
}

/// Undecodable bodies get the same JSON error shape as every other rejection.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> Error {
    warn!("{} {} - bad body: {}", req.method(), req.path(), err);
    LedgerError::MalformedRequest(err.to_string()).into()
}
