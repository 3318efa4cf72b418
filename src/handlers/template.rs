use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::TemplateService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/templates",
    tag = "template",
    responses(
        (status = 200, description = "模板列表", body = [TemplateResponse])
    )
)]
/// 系统模板 + 自己的模板 + 公开模板
pub async fn list_templates(
    service: web::Data<TemplateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req);
    match service.list_templates(user_id).await {
        Ok(list) => {
            let data: Vec<TemplateResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/templates/{id}",
    tag = "template",
    params(
        ("id" = String, Path, description = "模板ID")
    ),
    responses(
        (status = 200, description = "模板详情", body = TemplateResponse),
        (status = 404, description = "模板不存在")
    )
)]
pub async fn get_template(
    service: web::Data<TemplateService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req);
    match service.get_template(&path, user_id).await {
        Ok(template) => Ok(HttpResponse::Ok().json(ApiResponse::success(TemplateResponse::from(
            template,
        )))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/templates",
    tag = "template",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateTemplateRequest,
    responses(
        (status = 200, description = "创建成功", body = TemplateResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权")
    )
)]
pub async fn create_template(
    service: web::Data<TemplateService>,
    request: web::Json<CreateTemplateRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Login required".to_string()).error_response());
    };
    match service.create_template(user_id, request.into_inner()).await {
        Ok(template) => Ok(HttpResponse::Ok().json(ApiResponse::success(TemplateResponse::from(
            template,
        )))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn template_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/templates")
            .route("", web::get().to(list_templates))
            .route("", web::post().to(create_template))
            .route("/{id}", web::get().to(get_template)),
    );
}
