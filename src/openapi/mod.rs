use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maintenance API",
        version = "1.0.0",
        description = r#"
# Maintenance Management API

Back office for a building maintenance team.

## Features

- **Employees**: The technicians that execute service orders
- **Equipment**: Assets identified by a TAG, with category specific fields
- **Inspection Categories**: Kinds of inspection; "Preventiva" drives the dashboard split
- **Checklists**: Item lists copied from a fixed template catalog
- **Service Orders**: Numbered work orders (`NNNNN/YYYY`) with a four state workflow
- **Dashboard**: Status counts, totals and monthly series
- **PDF Export**: Printable service orders with the company header

## Company data

Company endpoints forward the caller's session to the hosted company backend.
Send the session token in the Authorization header:

```
Authorization: Bearer <session-token>
```

## Pagination

List endpoints support pagination with the following query parameters:
- `page`: Page number (default: 1)
- `limit`: Items per page (default: 20, max: 100)
- `search`: Case-insensitive search term
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Employees", description = "Employee registry"),
        (name = "Equipment", description = "Equipment registry and categories"),
        (name = "Inspection Categories", description = "Inspection category registry"),
        (name = "Checklists", description = "Checklists and the template catalog"),
        (name = "Service Orders", description = "Service order workflow and PDF export"),
        (name = "Dashboard", description = "Aggregated indicators"),
        (name = "Company", description = "Company profile and logos of the session user"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::api_status,
        crate::health_check,

        // Employees
        crate::handlers::employees::list_employees,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::delete_employee,

        // Equipment
        crate::handlers::equipment::list_equipment_categories,
        crate::handlers::equipment::get_equipment_category,
        crate::handlers::equipment::list_equipment,
        crate::handlers::equipment::create_equipment,
        crate::handlers::equipment::get_equipment,
        crate::handlers::equipment::update_equipment,
        crate::handlers::equipment::delete_equipment,

        // Inspection categories
        crate::handlers::inspection_categories::list_inspection_categories,
        crate::handlers::inspection_categories::create_inspection_category,
        crate::handlers::inspection_categories::get_inspection_category,
        crate::handlers::inspection_categories::update_inspection_category,
        crate::handlers::inspection_categories::delete_inspection_category,

        // Checklists
        crate::handlers::checklists::list_checklist_templates,
        crate::handlers::checklists::list_checklists,
        crate::handlers::checklists::create_checklist,
        crate::handlers::checklists::get_checklist,
        crate::handlers::checklists::update_checklist,
        crate::handlers::checklists::delete_checklist,

        // Service orders
        crate::handlers::service_orders::list_service_orders,
        crate::handlers::service_orders::next_number,
        crate::handlers::service_orders::checklist_options,
        crate::handlers::service_orders::create_service_order,
        crate::handlers::service_orders::get_service_order,
        crate::handlers::service_orders::update_service_order,
        crate::handlers::service_orders::update_service_order_status,
        crate::handlers::service_orders::delete_service_order,
        crate::handlers::service_orders::service_order_pdf,

        // Dashboard
        crate::handlers::dashboard::get_dashboard,

        // Company
        crate::handlers::company::get_company,
        crate::handlers::company::save_company,
        crate::handlers::company::upload_company_logo,
        crate::handlers::company::remove_company_logo,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::ResponseMeta,

            // Registries
            crate::models::Employee,
            crate::models::EmployeeInput,
            crate::models::Equipment,
            crate::models::EquipmentInput,
            crate::models::EquipmentCategory,
            crate::models::EquipmentDetails,
            crate::models::equipment::EquipmentCategoryView,
            crate::models::InspectionCategory,
            crate::models::InspectionCategoryInput,

            // Checklists
            crate::models::Checklist,
            crate::models::ChecklistInput,
            crate::models::ChecklistItem,
            crate::models::AnswerKind,
            crate::catalog::ChecklistTemplate,

            // Service orders
            crate::models::ServiceOrder,
            crate::models::ServiceOrderInput,
            crate::models::ServiceOrderStatus,
            crate::services::service_orders::ServiceOrderDetail,
            crate::services::service_orders::ChecklistSelection,
            crate::handlers::service_orders::NextNumberResponse,
            crate::handlers::service_orders::StatusUpdate,

            // Dashboard
            crate::services::dashboard::DashboardSummary,
            crate::services::dashboard::StatusCounts,
            crate::services::dashboard::EntityTotals,
            crate::services::dashboard::CategoryCount,
            crate::services::dashboard::MonthlyOrders,

            // Company
            crate::models::Company,
            crate::models::CompanyInput,
            crate::models::CompanyLogo,
            crate::models::CompanyProfile,
            crate::models::LogoPosition,

            // Error types
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerSession)
)]
pub struct ApiDocV1;

/// Registers the bearer scheme used by the company endpoints
struct BearerSession;

impl Modify for BearerSession {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Maintenance API"));
        for path in [
            "/api/v1/employees",
            "/api/v1/equipment/{id}",
            "/api/v1/inspection-categories",
            "/api/v1/checklists",
            "/api/v1/service-orders/{id}/pdf",
            "/api/v1/service-orders/next-number",
            "/api/v1/dashboard",
            "/api/v1/company/logos/{position}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let openapi = ApiDocV1::openapi();
        let components = openapi.components.expect("components");
        assert!(components.security_schemes.contains_key("Bearer"));
    }
}
