use super::get_user_id_from_request;
use crate::config::GachaConfig;
use crate::error::AppResult;
use crate::gacha::TemplateDefinition;
use crate::models::*;
use crate::services::{GachaService, TemplateService};
use crate::store::{SessionKey, SessionOwner};
use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Serialize;

/// 访客会话 id：客户端通过请求头或 cookie 带回
pub const GUEST_SESSION_HEADER: &str = "X-Session-Id";
pub const GUEST_SESSION_COOKIE: &str = "gacha_session";

struct ResolvedSession {
    owner: SessionOwner,
    /// 本次请求新发的访客 id
    issued: bool,
    key: SessionKey,
    template: TemplateDefinition,
}

/// 登录用户按用户隔离；访客用带回的 id，没有就发一个新的
fn session_owner(req: &HttpRequest) -> AppResult<(SessionOwner, bool)> {
    if let Some(user_id) = get_user_id_from_request(req) {
        return Ok((SessionOwner::User(user_id), false));
    }

    let carried = req
        .headers()
        .get(GUEST_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| req.cookie(GUEST_SESSION_COOKIE).map(|c| c.value().to_string()));

    match carried {
        Some(raw) => Ok((SessionOwner::parse_guest(&raw)?, false)),
        None => Ok((SessionOwner::new_guest(), true)),
    }
}

async fn resolve(
    templates: &TemplateService,
    req: &HttpRequest,
    template_id: &str,
) -> AppResult<ResolvedSession> {
    let (owner, issued) = session_owner(req)?;
    let key = SessionKey::new(&owner, template_id)?;
    let template = templates.get_template(template_id, owner.user_id()).await?;
    Ok(ResolvedSession {
        owner,
        issued,
        key,
        template,
    })
}

/// 访客响应里总是带上会话 id，新发的同时写 cookie
fn respond<T: Serialize>(session: &ResolvedSession, body: ApiResponse<T>) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    if let SessionOwner::Guest(id) = session.owner {
        let id = id.hyphenated().to_string();
        builder.insert_header((GUEST_SESSION_HEADER, id.clone()));
        if session.issued {
            builder.cookie(
                Cookie::build(GUEST_SESSION_COOKIE, id)
                    .path("/")
                    .http_only(true)
                    .finish(),
            );
        }
    }
    builder.json(body)
}

#[utoipa::path(
    get,
    path = "/gacha/{template_id}",
    tag = "gacha",
    params(
        ("template_id" = String, Path, description = "模板ID"),
        ("lang" = Option<String>, Query, description = "ko | en"),
        ("X-Session-Id" = Option<String>, Header, description = "访客会话ID")
    ),
    responses(
        (status = 200, description = "当前会话", body = SessionResponse),
        (status = 400, description = "模板ID或访客会话ID格式错误"),
        (status = 404, description = "模板不存在")
    )
)]
pub async fn get_session(
    gacha: web::Data<GachaService>,
    templates: web::Data<TemplateService>,
    config: web::Data<GachaConfig>,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let lang = query.resolve(config.default_language);

    match resolve(&templates, &req, &path).await {
        Ok(resolved) => {
            let session = gacha.current(&resolved.key, &resolved.template).await;
            let data = SessionResponse::new(&resolved.template, &session, lang);
            Ok(respond(&resolved, ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/gacha/{template_id}/draw",
    tag = "gacha",
    params(
        ("template_id" = String, Path, description = "模板ID"),
        ("lang" = Option<String>, Query, description = "ko | en"),
        ("X-Session-Id" = Option<String>, Header, description = "访客会话ID")
    ),
    responses(
        (status = 200, description = "抽取结果，抽完时 exhausted 为 true", body = DrawResponse),
        (status = 400, description = "模板ID或访客会话ID格式错误"),
        (status = 404, description = "模板不存在")
    )
)]
/// 抽取一次。登录用户的结果会异步写入历史
pub async fn draw(
    gacha: web::Data<GachaService>,
    templates: web::Data<TemplateService>,
    config: web::Data<GachaConfig>,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let lang = query.resolve(config.default_language);

    let resolved = match resolve(&templates, &req, &path).await {
        Ok(resolved) => resolved,
        Err(e) => return Ok(e.error_response()),
    };

    match gacha
        .draw(&resolved.key, &resolved.template, resolved.owner.user_id())
        .await
    {
        Ok(outcome) => {
            let data = DrawResponse::new(&outcome.result, outcome.remaining, outcome.total, lang);
            Ok(respond(&resolved, ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/gacha/{template_id}/reset",
    tag = "gacha",
    params(
        ("template_id" = String, Path, description = "模板ID"),
        ("lang" = Option<String>, Query, description = "ko | en"),
        ("X-Session-Id" = Option<String>, Header, description = "访客会话ID")
    ),
    responses(
        (status = 200, description = "重置后的会话", body = SessionResponse),
        (status = 400, description = "模板ID或访客会话ID格式错误"),
        (status = 404, description = "模板不存在")
    )
)]
pub async fn reset(
    gacha: web::Data<GachaService>,
    templates: web::Data<TemplateService>,
    config: web::Data<GachaConfig>,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let lang = query.resolve(config.default_language);

    let resolved = match resolve(&templates, &req, &path).await {
        Ok(resolved) => resolved,
        Err(e) => return Ok(e.error_response()),
    };

    match gacha.reset(&resolved.key, &resolved.template).await {
        Ok(session) => {
            let data = SessionResponse::new(&resolved.template, &session, lang);
            Ok(respond(
                &resolved,
                ApiResponse::success_with_message(data, "Session reset"),
            ))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gacha_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gacha")
            .route("/{template_id}", web::get().to(get_session))
            .route("/{template_id}/draw", web::post().to(draw))
            .route("/{template_id}/reset", web::post().to(reset)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middlewares::AuthMiddleware;
    use crate::store::MemorySessionStore;
    use crate::utils::JwtService;
    use actix_web::App;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    const SECRET: &str = "test-secret";

    // 系统模板不查数据库，断开的连接即可
    macro_rules! test_app {
        () => {
            init_service(
                App::new()
                    .wrap(AuthMiddleware::new(JwtService::new(SECRET, 60, 120)))
                    .app_data(web::Data::new(GachaService::new(
                        Arc::new(MemorySessionStore::new()),
                        Duration::ZERO,
                        None,
                    )))
                    .app_data(web::Data::new(TemplateService::new(
                        DatabaseConnection::Disconnected,
                    )))
                    .app_data(web::Data::new(GachaConfig::default()))
                    .service(web::scope("/api/v1").configure(gacha_config)),
            )
            .await
        };
    }

    fn guest_id<B>(resp: &ServiceResponse<B>) -> Option<String> {
        resp.headers()
            .get(GUEST_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[actix_web::test]
    async fn test_first_visit_issues_guest_session() {
        let app = test_app!();

        let req = TestRequest::get()
            .uri("/api/v1/gacha/default?lang=ko")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let id = guest_id(&resp).unwrap();
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == GUEST_SESSION_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), id);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["template_id"], "default");
        assert_eq!(body["data"]["total"], 156);
        assert_eq!(body["data"]["remaining"], 156);
        assert_eq!(body["data"]["tiers"][0]["tier_label"], "전설");

        // 带回 id 时不再发新的 cookie
        let req = TestRequest::get()
            .uri("/api/v1/gacha/default")
            .insert_header((GUEST_SESSION_HEADER, id.clone()))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(guest_id(&resp).as_deref(), Some(id.as_str()));
        assert_eq!(resp.response().cookies().count(), 0);
    }

    #[actix_web::test]
    async fn test_guests_are_isolated() {
        let app = test_app!();
        let a = SessionOwner::new_guest();
        let b = SessionOwner::new_guest();
        let id = |owner: &SessionOwner| match owner {
            SessionOwner::Guest(id) => id.to_string(),
            SessionOwner::User(_) => unreachable!(),
        };

        for _ in 0..3 {
            let req = TestRequest::post()
                .uri("/api/v1/gacha/cyber/draw")
                .insert_header((GUEST_SESSION_HEADER, id(&a)))
                .to_request();
            assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = TestRequest::get()
            .uri("/api/v1/gacha/cyber")
            .insert_header((GUEST_SESSION_HEADER, id(&b)))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["data"]["drawn"], 0);
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 0);

        let req = TestRequest::post()
            .uri("/api/v1/gacha/cyber/reset")
            .insert_header((GUEST_SESSION_HEADER, id(&b)))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);

        // cookie 与请求头等价
        let req = TestRequest::get()
            .uri("/api/v1/gacha/cyber")
            .cookie(Cookie::new(GUEST_SESSION_COOKIE, id(&a)))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["data"]["drawn"], 3);
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_draw_until_exhausted_then_reset() {
        let app = test_app!();
        let guest = SessionOwner::new_guest();
        let SessionOwner::Guest(id) = guest else {
            unreachable!()
        };
        let id = id.to_string();

        for remaining in (0..96).rev() {
            let req = TestRequest::post()
                .uri("/api/v1/gacha/cyber/draw")
                .insert_header((GUEST_SESSION_HEADER, id.clone()))
                .to_request();
            let body: Value = read_body_json(call_service(&app, req).await).await;
            assert_eq!(body["data"]["exhausted"], false);
            assert_eq!(body["data"]["remaining"], remaining);
            assert_eq!(body["data"]["total"], 96);
            assert!(body["data"]["item"]["id"].is_string());
        }

        let req = TestRequest::post()
            .uri("/api/v1/gacha/cyber/draw")
            .insert_header((GUEST_SESSION_HEADER, id.clone()))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["exhausted"], true);
        assert!(body["data"]["item"].is_null());
        assert_eq!(body["data"]["message"], "All items have been drawn!");

        let req = TestRequest::post()
            .uri("/api/v1/gacha/cyber/reset?lang=ko")
            .insert_header((GUEST_SESSION_HEADER, id.clone()))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["message"], "Session reset");
        assert_eq!(body["data"]["remaining"], 96);
        assert_eq!(body["data"]["drawn"], 0);
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 0);
        assert_eq!(body["data"]["tiers"][4]["tier_label"], "일반");
    }

    #[actix_web::test]
    async fn test_user_session_has_no_guest_id() {
        let app = test_app!();
        let token = JwtService::new(SECRET, 60, 120)
            .generate_access_token(9, "bob")
            .unwrap();

        let req = TestRequest::post()
            .uri("/api/v1/gacha/default/draw")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(guest_id(&resp).is_none());
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["data"]["remaining"], 155);

        // 访客看不到用户的进度
        let req = TestRequest::get().uri("/api/v1/gacha/default").to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["data"]["remaining"], 156);
    }

    #[actix_web::test]
    async fn test_bad_requests() {
        let app = test_app!();

        let req = TestRequest::post()
            .uri("/api/v1/gacha/bad%20id/draw")
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = TestRequest::get()
            .uri("/api/v1/gacha/default")
            .insert_header((GUEST_SESSION_HEADER, "../../etc"))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = TestRequest::get().uri("/api/v1/gacha/missing").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
