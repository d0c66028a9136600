use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use super::JsonBody;
use super::PageResponseData;
use super::QueryParams;
use super::SearchParams;
use crate::domain::demo::models::DemoCommand;
use crate::domain::demo::models::DemoEntry;
use crate::domain::demo::models::DemoEntryId;
use crate::domain::demo::models::DemoText;
use crate::domain::demo::models::ListDemosQuery;
use crate::domain::demo::models::PhoneNumber;
use crate::domain::demo::ports::DemoServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Backs both the public lead form and the admin create endpoint.
pub async fn create_demo(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DemoRequest>,
) -> Result<ApiSuccess<DemoData>, ApiError> {
    state
        .demo_service
        .create_demo(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::CREATED, entry.into()))
}

pub async fn list_demos(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<ApiSuccess<PageResponseData<DemoData>>, ApiError> {
    let query = ListDemosQuery {
        page: params.page_request(),
        search: params.search(),
    };

    state
        .demo_service
        .list_demos(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref entry| entry.into()),
            )
        })
}

pub async fn get_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DemoData>, ApiError> {
    let id = DemoEntryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .demo_service
        .get_demo(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::OK, entry.into()))
}

pub async fn update_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<DemoRequest>,
) -> Result<ApiSuccess<DemoData>, ApiError> {
    let id = DemoEntryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .demo_service
        .update_demo(&id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::OK, entry.into()))
}

pub async fn delete_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = DemoEntryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .demo_service
        .delete_demo(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoRequest {
    name: String,
    brand: String,
    phone: String,
    email: Option<String>,
    preferred_time: String,
    date: String,
}

impl DemoRequest {
    fn try_into_command(self) -> Result<DemoCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let name = fields.check(
            "name",
            DemoText::new("name", self.name, DemoText::NAME_MAX_LENGTH),
        );
        let brand = fields.check(
            "brand",
            DemoText::new("brand", self.brand, DemoText::NAME_MAX_LENGTH),
        );
        let phone = fields.check("phone", PhoneNumber::new(self.phone));
        let email = fields.check(
            "email",
            self.email
                .filter(|e| !e.trim().is_empty())
                .map(EmailAddress::new)
                .transpose(),
        );
        let preferred_time = fields.check(
            "preferred_time",
            DemoText::new(
                "preferred_time",
                self.preferred_time,
                DemoText::TIME_MAX_LENGTH,
            ),
        );
        let scheduled_date = fields.check(
            "date",
            NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d"),
        );

        match (name, brand, phone, email, preferred_time, scheduled_date) {
            (
                Some(name),
                Some(brand),
                Some(phone),
                Some(email),
                Some(preferred_time),
                Some(scheduled_date),
            ) => Ok(DemoCommand {
                name,
                brand,
                phone,
                email,
                preferred_time,
                scheduled_date,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoData {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DemoEntry> for DemoData {
    fn from(entry: &DemoEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.as_str().to_string(),
            brand: entry.brand.as_str().to_string(),
            phone: entry.phone.as_str().to_string(),
            email: entry.email.as_ref().map(|e| e.as_str().to_string()),
            preferred_time: entry.preferred_time.as_str().to_string(),
            date: entry.scheduled_date,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_request_field_map() {
        let request = DemoRequest {
            name: "".to_string(),
            brand: "Acme".to_string(),
            phone: "call me".to_string(),
            email: Some("".to_string()),
            preferred_time: "Morning".to_string(),
            date: "2030-13-01".to_string(),
        };

        match request.try_into_command() {
            Err(ApiError::Validation { fields, .. }) => {
                let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["date", "name", "phone"]);
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
