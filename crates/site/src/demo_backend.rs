//! Seed data for the in-memory backend used by the `memory-backend` build.

use crud_host::MemoryCrudTransport;
use serde_json::json;

/// Builds the offline backend with every collection the admin pages read.
pub fn seeded_backend() -> MemoryCrudTransport {
    MemoryCrudTransport::default()
        .with_collection(
            "/api/case-types",
            vec![
                json!({ "id": 1, "name": { "en": "Civil", "ar": "مدني" }, "color": "#2563eb", "is_active": true, "created_at": "2024-01-08" }),
                json!({ "id": 2, "name": { "en": "Criminal", "ar": "جنائي" }, "color": "#dc2626", "is_active": true, "created_at": "2024-02-14" }),
                json!({ "id": 3, "name": { "en": "Family", "ar": "أحوال شخصية" }, "color": "#16a34a", "is_active": false, "created_at": "2024-03-02" }),
            ],
        )
        .with_collection(
            "/api/clients",
            vec![
                json!({ "id": 1, "name": "Mona Adel", "type": "individual", "email": "mona@example.test", "phone": "+20 100 555 0101", "case_type_id": 3, "case_type": { "name": { "en": "Family", "ar": "أحوال شخصية" } }, "created_by": 1 }),
                json!({ "id": 2, "name": "Nile Logistics", "type": "company", "company_name": "Nile Logistics LLC", "email": "legal@nile.example.test", "case_type_id": 1, "case_type": { "name": { "en": "Civil", "ar": "مدني" } }, "created_by": 2 }),
                json!({ "id": 3, "name": "Karim Fathy", "type": "individual", "email": "karim@example.test", "archived": true, "created_by": 1 }),
            ],
        )
        .with_collection(
            "/api/courts",
            vec![
                json!({ "id": 1, "name": { "en": "Cairo Court of Appeal", "ar": "محكمة استئناف القاهرة" } }),
                json!({ "id": 2, "name": { "en": "Alexandria Court", "ar": "محكمة الإسكندرية" } }),
            ],
        )
        .with_collection(
            "/api/courts/1/chambers",
            vec![
                json!({ "id": 11, "name": "Chamber 1" }),
                json!({ "id": 12, "name": "Chamber 4" }),
            ],
        )
        .with_collection(
            "/api/courts/2/chambers",
            vec![json!({ "id": 21, "name": "Commercial chamber" })],
        )
        .with_collection(
            "/api/hearings",
            vec![
                json!({ "id": 1, "title": "First session", "client_id": 2, "client": { "name": "Nile Logistics" }, "status": "scheduled", "court_id": 1, "chamber_id": 12, "date": "2024-06-03", "time": "09:30", "fee": 1500, "attendees": 3, "created_by": 1 }),
                json!({ "id": 2, "title": "Expert report review", "client_id": 1, "client": { "name": "Mona Adel" }, "status": "postponed", "court_id": 2, "chamber_id": 21, "date": "2024-06-10", "time": "11:00", "fee": 800, "created_by": 2 }),
            ],
        )
        .with_collection(
            "/api/permissions",
            vec![
                json!({ "id": 1, "name": "view-clients" }),
                json!({ "id": 2, "name": "manage-clients" }),
                json!({ "id": 3, "name": "manage-hearings" }),
                json!({ "id": 4, "name": "manage-roles" }),
            ],
        )
        .with_collection(
            "/api/roles",
            vec![
                json!({ "id": 1, "name": "Partner", "permissions": ["manage-clients", "manage-hearings", "manage-roles"] }),
                json!({ "id": 2, "name": "Associate", "permissions": ["view-clients"] }),
            ],
        )
}

#[cfg(test)]
mod tests {
    use crud_host::{fetch_list_with, ListQuery};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn seeded_collections_answer_list_queries() {
        let backend = seeded_backend();
        let query = ListQuery {
            search: "nile".into(),
            ..ListQuery::default()
        };
        let list = block_on(fetch_list_with(&backend, "/api/clients", &query)).expect("clients");
        assert_eq!(list.total, 1);
        assert_eq!(list.data[0]["type"], "company");
        assert_eq!(backend.rows("/api/courts/1/chambers").len(), 2);
    }
}
