use sqlx::PgPool;

use crate::dto::common_dto::ApiResponse;
use crate::dto::vendor_dto::CreateVendorRequest;
use crate::models::vendor::Vendor;
use crate::repositories::vendor_repository::VendorRepository;
use crate::utils::errors::AppResult;

pub struct VendorController {
    repository: VendorRepository,
}

impl VendorController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VendorRepository::new(pool),
        }
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<Vendor>>> {
        Ok(ApiResponse::success(self.repository.list().await?))
    }

    pub async fn create(&self, request: CreateVendorRequest) -> AppResult<ApiResponse<Vendor>> {
        let vendor = self.repository.create(&Vendor::from(request)).await?;

        tracing::info!("🏭 Proveedor creado: {}", vendor.name);

        Ok(ApiResponse::success_with_message(vendor, "Vendor created successfully"))
    }
}
