use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::ResultService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/history",
    tag = "gacha",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("template_id" = Option<String>, Query, description = "只看某个模板")
    ),
    responses(
        (status = 200, description = "抽取历史（新的在前）", body = [GachaResultResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_history(
    service: web::Data<ResultService>,
    query: web::Query<HistoryQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Login required".to_string()).error_response());
    };
    match service.list_history(user_id, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn history_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/history", web::get().to(get_history));
}
