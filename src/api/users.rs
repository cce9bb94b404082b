use actix_web::{web, HttpResponse, Responder};

use crate::api::metrics;
use crate::database::MongoDB;
use crate::services::user_service::{self, CreateUserRequest, UpdateUserRequest};
use crate::utils::error::AppError;

/// Maps service errors onto HTTP status codes. Distinct kinds get distinct
/// codes so clients can tell a conflict from a missing user.
fn error_response(error: &AppError) -> HttpResponse {
    metrics::increment_error_count();
    let body = serde_json::json!({
        "success": false,
        "error": error.to_string()
    });
    match error {
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::DuplicateKey(_) => HttpResponse::Conflict().json(body),
        AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
        AppError::DatabaseError(_) | AppError::TransactionFailed(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User and role profile created", body = user_service::UserWithRoleResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Duplicate email or identifier")
    )
)]
pub async fn create_user(
    body: web::Json<CreateUserRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    metrics::increment_request_count();

    match user_service::create_user_with_role(&db, body.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, newest first", body = user_service::ListUsersResponse)
    )
)]
pub async fn list_users(db: web::Data<MongoDB>) -> impl Responder {
    metrics::increment_request_count();

    match user_service::list_users(&db).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "Display identifier, e.g. USR-0001")
    ),
    responses(
        (status = 200, description = "User with its role profile", body = user_service::UserWithRoleResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    metrics::increment_request_count();
    let user_id = path.into_inner();

    match user_service::get_user_with_role(&db, &user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "Display identifier, e.g. USR-0001")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated, shared fields propagated to the profile", body = user_service::UserWithRoleResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Duplicate email")
    )
)]
pub async fn update_user(
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    metrics::increment_request_count();
    let user_id = path.into_inner();

    match user_service::update_user_with_role(&db, &user_id, body.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "Display identifier, e.g. USR-0001")
    ),
    responses(
        (status = 200, description = "User and role profile deleted", body = user_service::DeleteUserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    metrics::increment_request_count();
    let user_id = path.into_inner();

    match user_service::delete_user_with_role(&db, &user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e),
    }
}
