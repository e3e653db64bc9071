use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::driver_dto::{CreateDriverRequest, DriverListQuery, DriverResponse, UpdateDriverRequest};
use crate::models::driver::Driver;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

pub struct DriverController {
    repository: DriverRepository,
    users: UserRepository,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    async fn detail(&self, id: Uuid) -> AppResult<DriverResponse> {
        self.repository
            .find_detail(id, today())
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))
    }

    pub async fn list(&self, query: DriverListQuery) -> AppResult<ApiResponse<Paginated<DriverResponse>>> {
        let (drivers, total) = self.repository.list(&query, today()).await?;
        Ok(ApiResponse::success(Paginated::new(drivers, &query.pagination(), total)))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<DriverResponse>> {
        Ok(ApiResponse::success(self.detail(id).await?))
    }

    /// Solo usuarios con rol Driver, y una ficha por usuario
    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<ApiResponse<DriverResponse>> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| validation_error("user_id", "The selected user does not exist"))?;

        if !user.is_driver() {
            return Err(validation_error("user_id", "The selected user must have the Driver role"));
        }
        if self.repository.exists_for_user(user.id).await? {
            return Err(AppError::Conflict("The user already has a driver profile".to_string()));
        }

        let driver = self.repository.create(&Driver::from(request)).await?;

        tracing::info!("🪪 Ficha de conductor creada para {} ({})", user.email, driver.license_number);

        Ok(ApiResponse::success_with_message(
            self.detail(driver.id).await?,
            "Driver created successfully",
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<ApiResponse<DriverResponse>> {
        let mut driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        request.apply_to(&mut driver);
        self.repository.update(&driver).await?;

        Ok(ApiResponse::success_with_message(self.detail(id).await?, "Driver updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Driver", &id.to_string()));
        }

        tracing::info!("🗑️ Ficha de conductor {} eliminada", id);

        Ok(ApiResponse::<()>::message("Driver deleted successfully"))
    }
}
