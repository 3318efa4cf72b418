use crate::handlers::gacha::GUEST_SESSION_HEADER;
use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        // 前端可能部署在任意域名下
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        // 跨域时访客只能通过响应头拿到会话 id
        .expose_headers(vec![GUEST_SESSION_HEADER])
        .max_age(3600)
}
