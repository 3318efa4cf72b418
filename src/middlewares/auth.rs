use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// 不解析令牌
    Public,
    /// 有令牌则校验并注入用户ID，没有则按访客处理
    Optional,
    /// 必须携带有效的访问令牌
    Required,
}

// 路径访问规则
struct PathRules {
    public_exact: Vec<&'static str>,
    public_prefixes: Vec<&'static str>,
    required: Vec<(Option<Method>, &'static str)>,
}

impl PathRules {
    fn new() -> Self {
        Self {
            public_exact: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            // 刷新接口自行校验刷新令牌
            public_prefixes: vec!["/swagger-ui/", "/api-docs/", "/api/v1/auth/"],
            required: vec![
                (None, "/api/v1/history"),
                (Some(Method::POST), "/api/v1/templates"),
            ],
        }
    }

    fn classify(&self, method: &Method, path: &str) -> Access {
        if self.public_exact.contains(&path)
            || self.public_prefixes.iter().any(|p| path.starts_with(p))
        {
            return Access::Public;
        }

        let required = self.required.iter().any(|(m, prefix)| {
            m.as_ref().is_none_or(|m| m == method) && path.starts_with(prefix)
        });
        if required {
            Access::Required
        } else {
            Access::Optional
        }
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            rules: PathRules::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    rules: PathRules,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let access = self.rules.classify(req.method(), req.path());
        if access == Access::Public {
            return Box::pin(self.service.call(req));
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);

        match token {
            Some(token) => match self
                .jwt_service
                .verify_access_token(&token)
                .and_then(|claims| claims.user_id())
            {
                Ok(user_id) => {
                    // 将用户ID添加到请求扩展中
                    req.extensions_mut().insert(user_id);
                    Box::pin(self.service.call(req))
                }
                Err(_) => {
                    let error = AppError::AuthError("Invalid access token".to_string());
                    Box::pin(async move { Err(error.into()) })
                }
            },
            None if access == Access::Optional => Box::pin(self.service.call(req)),
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_and_read_body, init_service, try_call_service};
    use actix_web::{App, HttpRequest, HttpResponse, web};

    #[test]
    fn test_classify_paths() {
        let r = PathRules::new();
        assert_eq!(r.classify(&Method::POST, "/api/v1/auth/login"), Access::Public);
        assert_eq!(r.classify(&Method::POST, "/api/v1/auth/refresh"), Access::Public);
        assert_eq!(r.classify(&Method::GET, "/swagger-ui/"), Access::Public);
        assert_eq!(r.classify(&Method::GET, "/api/v1/history"), Access::Required);
        assert_eq!(r.classify(&Method::POST, "/api/v1/templates"), Access::Required);
        assert_eq!(r.classify(&Method::GET, "/api/v1/templates"), Access::Optional);
        assert_eq!(
            r.classify(&Method::POST, "/api/v1/gacha/default/draw"),
            Access::Optional
        );
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        let id = req.extensions().get::<i64>().copied();
        HttpResponse::Ok().body(format!("{id:?}"))
    }

    #[actix_web::test]
    async fn test_optional_and_required_identity() {
        let jwt = JwtService::new("test-secret", 60, 120);
        let token = jwt.generate_access_token(5, "alice").unwrap();
        let refresh = jwt.generate_refresh_token(5, "alice").unwrap();
        let app = init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt.clone()))
                .route("/api/v1/gacha/default", web::get().to(whoami))
                .route("/api/v1/history", web::get().to(whoami)),
        )
        .await;

        let req = TestRequest::get().uri("/api/v1/gacha/default").to_request();
        assert_eq!(call_and_read_body(&app, req).await, "None");

        let req = TestRequest::get()
            .uri("/api/v1/gacha/default")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(call_and_read_body(&app, req).await, "Some(5)");

        let req = TestRequest::get().uri("/api/v1/history").to_request();
        let err = try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        // 刷新令牌不能当访问令牌用
        let req = TestRequest::get()
            .uri("/api/v1/history")
            .insert_header(("Authorization", format!("Bearer {refresh}")))
            .to_request();
        assert!(try_call_service(&app, req).await.is_err());

        let req = TestRequest::get()
            .uri("/api/v1/gacha/default")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        assert!(try_call_service(&app, req).await.is_err());
    }
}
