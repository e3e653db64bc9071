use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::part_dto::{
    AdjustStockRequest, AdjustStockResponse, CreatePartRequest, PartDetailResponse, PartListQuery, PartResponse,
    UpdatePartRequest,
};
use crate::models::part::Part;
use crate::repositories::part_repository::PartRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct PartController {
    repository: PartRepository,
}

impl PartController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PartRepository::new(pool),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Part> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Part", &id.to_string()))
    }

    pub async fn list(&self, query: PartListQuery) -> AppResult<ApiResponse<Paginated<PartResponse>>> {
        let (parts, total) = self.repository.list(&query).await?;
        let parts = parts.into_iter().map(PartResponse::from).collect();
        Ok(ApiResponse::success(Paginated::new(parts, &query.pagination(), total)))
    }

    pub async fn create(&self, request: CreatePartRequest) -> AppResult<ApiResponse<PartResponse>> {
        let part = self.repository.create(request).await?;

        tracing::info!("📦 Repuesto creado: {} - {}", part.part_number, part.name);

        Ok(ApiResponse::success_with_message(part.into(), "Part created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<PartDetailResponse>> {
        let part = self.find(id).await?;
        let work_orders = self.repository.usage(id).await?;

        Ok(ApiResponse::success(PartDetailResponse {
            part: part.into(),
            work_orders,
        }))
    }

    pub async fn update(&self, id: Uuid, request: UpdatePartRequest) -> AppResult<ApiResponse<PartResponse>> {
        let updated = self
            .repository
            .update_with(id, |part| request.apply_to(part).map_err(AppError::from))
            .await?;

        Ok(ApiResponse::success_with_message(updated.into(), "Part updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Part", &id.to_string()));
        }

        tracing::info!("🗑️ Repuesto {} eliminado", id);

        Ok(ApiResponse::<()>::message("Part deleted successfully"))
    }

    /// Ajuste manual; la nota se registra en el log, no se guarda
    pub async fn adjust_stock(&self, id: Uuid, request: AdjustStockRequest) -> AppResult<ApiResponse<AdjustStockResponse>> {
        let (part, movement) = self
            .repository
            .adjust_stock(id, request.adjustment, request.mode)
            .await?;

        tracing::info!(
            "📦 Stock de '{}' ajustado ({:?}): {} -> {}{}",
            part.name,
            request.mode,
            movement.old_stock,
            movement.new_stock,
            request.notes.as_deref().map(|n| format!(" - {}", n)).unwrap_or_default()
        );

        Ok(ApiResponse::success_with_message(
            AdjustStockResponse {
                old_stock: movement.old_stock,
                new_stock: movement.new_stock,
                part: part.into(),
            },
            "Stock adjusted successfully",
        ))
    }

    pub async fn low_stock(&self) -> AppResult<ApiResponse<Vec<PartResponse>>> {
        let parts = self.repository.low_stock().await?;
        Ok(ApiResponse::success(parts.into_iter().map(PartResponse::from).collect()))
    }

    pub async fn categories(&self) -> AppResult<ApiResponse<Vec<String>>> {
        Ok(ApiResponse::success(self.repository.categories().await?))
    }

    pub async fn manufacturers(&self) -> AppResult<ApiResponse<Vec<String>>> {
        Ok(ApiResponse::success(self.repository.manufacturers().await?))
    }
}
