use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic Service API - User Lifecycle",
        version = "1.0.0",
        description = "API documentation for the clinic user lifecycle service.\n\n**Features:**\n- User creation with cascading role profile (patients, doctors, pharmacists, administrators, inventory managers, lab supervisors, lab staff, technicians)\n- Role display identifiers (USR-0001, DOC-0001, T001)\n- Transactional update and delete across user and profile\n- Health monitoring and metrics",
        contact(
            name = "Clinic Service Team",
            email = "support@clinic-service.com"
        )
    ),
    paths(
        // Users
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Users
            crate::models::Role,
            crate::services::user_service::CreateUserRequest,
            crate::services::user_service::UpdateUserRequest,
            crate::services::user_service::UserInfo,
            crate::services::user_service::UserWithRoleResponse,
            crate::services::user_service::ListUsersResponse,
            crate::services::user_service::DeleteUserResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User lifecycle endpoints. Creating a user with a role also creates its profile document; update and delete cascade to the profile in the same transaction."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
