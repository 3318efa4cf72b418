pub mod auth;
pub mod gacha;
pub mod history;
pub mod template;

pub use auth::auth_config;
pub use gacha::gacha_config;
pub use history::history_config;
pub use template::template_config;

use actix_web::{HttpMessage, HttpRequest};

/// 从请求扩展中获取用户ID（中间件在鉴权后注入），访客为 None
pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}
