//! Page descriptions for the admin screens.

use std::collections::BTreeMap;

use crud_contract::{
    ActionKind, BadgeTone, Capability, CapabilityAction, ColumnDescriptor, ColumnKind,
    DependentLevel, DependentSource, DescriptorError, FieldCondition, FieldDescriptor, FieldKind,
    FieldSet, FieldWidth, FileValidation, FormMode, OptionSource, QuickActionKey, RelationSource,
    SelectOption, TableAction, TextInput, TranslatableValue,
};
use crud_core::{FilterDescriptor, FilterKind, FormLayout, PageConfig, PayloadShape};

/// Custom cell renderer key for role permission counts.
pub const PERMISSION_COUNT_CELL: &str = "permission-count";
/// Custom row action archiving a client.
pub const ARCHIVE_ACTION: &str = "archive";

fn tr(en: &str, ar: &str) -> TranslatableValue {
    TranslatableValue::bilingual(en, ar)
}

fn status_tones() -> BTreeMap<String, BadgeTone> {
    [
        ("scheduled", BadgeTone::Info),
        ("held", BadgeTone::Success),
        ("postponed", BadgeTone::Warning),
        ("cancelled", BadgeTone::Danger),
    ]
    .into_iter()
    .map(|(status, tone)| (status.to_string(), tone))
    .collect()
}

fn hearing_statuses() -> Vec<SelectOption> {
    vec![
        SelectOption::new("scheduled", tr("Scheduled", "مجدولة")),
        SelectOption::new("held", tr("Held", "منعقدة")),
        SelectOption::new("postponed", tr("Postponed", "مؤجلة")),
        SelectOption::new("cancelled", tr("Cancelled", "ملغاة")),
    ]
}

fn image_upload() -> FileValidation {
    FileValidation {
        max_size_bytes: Some(2 * 1024 * 1024),
        allowed_mime_types: vec!["image/*".to_string()],
        allowed_extensions: Vec::new(),
    }
}

fn document_upload() -> FileValidation {
    FileValidation {
        max_size_bytes: Some(10 * 1024 * 1024),
        allowed_mime_types: vec!["application/pdf".to_string(), "image/*".to_string()],
        allowed_extensions: vec!["pdf".to_string(), "docx".to_string()],
    }
}

/// Case types: bilingual name, color, and active flag.
pub fn case_types_page() -> Result<PageConfig, DescriptorError> {
    let fields = FieldSet::new(vec![
        FieldDescriptor::new("name.en", tr("Name (English)", "الاسم (إنجليزي)"), FieldKind::text())
            .required()
            .at(1, 1)
            .width(FieldWidth::Half),
        FieldDescriptor::new("name.ar", tr("Name (Arabic)", "الاسم (عربي)"), FieldKind::text())
            .required()
            .at(1, 2)
            .width(FieldWidth::Half),
        FieldDescriptor::new("color", tr("Color", "اللون"), FieldKind::Color)
            .with_default("#2563eb")
            .at(2, 1),
        FieldDescriptor::new("is_active", tr("Active", "نشط"), FieldKind::Switch)
            .with_default(true)
            .at(2, 2),
    ])?;

    let config = PageConfig::new(
        "case-types",
        "/api/case-types",
        tr("Case types", "أنواع القضايا"),
        tr("case type", "نوع القضية"),
        fields,
    )
    .with_columns(vec![
        ColumnDescriptor::new("name", tr("Name", "الاسم")).sortable(),
        ColumnDescriptor::new("color", tr("Color", "اللون")),
        ColumnDescriptor::new("is_active", tr("Active", "نشط")).kind(ColumnKind::Boolean),
        ColumnDescriptor::new("created_at", tr("Created", "تاريخ الإنشاء"))
            .kind(ColumnKind::Date)
            .sortable(),
    ])
    .with_filters(vec![FilterDescriptor::new(
        "is_active",
        tr("Active", "نشط"),
        FilterKind::Boolean,
    )]);
    Ok(config)
}

/// Clients: individual or company, relation to case types, avatar upload.
pub fn clients_page() -> Result<PageConfig, DescriptorError> {
    let fields = FieldSet::new(vec![
        FieldDescriptor::new("name", tr("Name", "الاسم"), FieldKind::text()).required(),
        FieldDescriptor::new(
            "type",
            tr("Client type", "نوع العميل"),
            FieldKind::Radio {
                options: vec![
                    SelectOption::new("individual", tr("Individual", "فرد")),
                    SelectOption::new("company", tr("Company", "شركة")),
                ],
            },
        )
        .with_default("individual")
        .required(),
        FieldDescriptor::new("company_name", tr("Company name", "اسم الشركة"), FieldKind::text())
            .required()
            .when(FieldCondition::FieldEquals {
                field: "type".to_string(),
                value: "company".to_string(),
            }),
        FieldDescriptor::new(
            "email",
            tr("Email", "البريد الإلكتروني"),
            FieldKind::Text {
                input: TextInput::Email,
            },
        )
        .required(),
        FieldDescriptor::new(
            "phone",
            tr("Phone", "الهاتف"),
            FieldKind::Text {
                input: TextInput::Tel,
            },
        )
        .with_placeholder("+20 100 000 0000"),
        FieldDescriptor::new(
            "case_type_id",
            tr("Preferred case type", "نوع القضية المفضل"),
            FieldKind::relation_select("/api/case-types"),
        ),
        FieldDescriptor::new(
            "avatar",
            tr("Photo", "الصورة"),
            FieldKind::File {
                validation: image_upload(),
                multiple: false,
            },
        )
        .with_help(tr("PNG or JPEG up to 2 MB", "PNG أو JPEG حتى 2 ميجابايت")),
        FieldDescriptor::new("notes", tr("Notes", "ملاحظات"), FieldKind::TextArea { rows: 3 })
            .when(FieldCondition::Modes(vec![FormMode::Edit, FormMode::View])),
    ])?;

    let archive = TableAction::new(
        ActionKind::Custom(ARCHIVE_ACTION.to_string()),
        "check",
        tr("Archive", "أرشفة"),
    )
    .requires(Capability::new(CapabilityAction::Edit, "clients"))
    .when(|row| row.get("archived").and_then(|value| value.as_bool()) != Some(true))
    .labelled_by(|row| {
        let name = row.get("name").and_then(|value| value.as_str()).unwrap_or_default();
        format!("Archive {name}")
    });

    let mut config = PageConfig::new(
        "clients",
        "/api/clients",
        tr("Clients", "العملاء"),
        tr("client", "عميل"),
        fields,
    )
    .with_columns(vec![
        ColumnDescriptor::new("avatar", tr("Photo", "الصورة")).kind(ColumnKind::Image),
        ColumnDescriptor::new("name", tr("Name", "الاسم")).sortable(),
        ColumnDescriptor::new("email", tr("Email", "البريد الإلكتروني"))
            .kind(ColumnKind::Link {
                href: "mailto:{email}".to_string(),
            }),
        ColumnDescriptor::new("type", tr("Type", "النوع")).kind(ColumnKind::Badge {
            tones: [("company".to_string(), BadgeTone::Info)].into_iter().collect(),
        }),
        ColumnDescriptor::new("case_type.name", tr("Case type", "نوع القضية"))
            .sortable()
            .sort_by("case_type_id"),
    ])
    .with_filters(vec![
        FilterDescriptor::new(
            "type",
            tr("Type", "النوع"),
            FilterKind::Select(vec![
                SelectOption::new("individual", tr("Individual", "فرد")),
                SelectOption::new("company", tr("Company", "شركة")),
            ]),
        ),
        FilterDescriptor::new(
            "case_type_id",
            tr("Case type", "نوع القضية"),
            FilterKind::Relation(RelationSource::new("/api/case-types")),
        ),
    ])
    .excluding(&["case_type"])
    .owned_by("created_by")
    .with_quick_action(QuickActionKey::Clients);
    config.actions.push(archive);
    Ok(config)
}

/// Hearings: court and chamber cascade, schedule, fee, and documents.
pub fn hearings_page() -> Result<PageConfig, DescriptorError> {
    let fields = FieldSet::new(vec![
        FieldDescriptor::new("title", tr("Title", "العنوان"), FieldKind::text())
            .required()
            .at(1, 1)
            .width(FieldWidth::Full),
        FieldDescriptor::new(
            "client_id",
            tr("Client", "العميل"),
            FieldKind::Combobox {
                source: OptionSource::Relation(RelationSource::new("/api/clients")),
                allow_custom: false,
            },
        )
        .required()
        .at(2, 1),
        FieldDescriptor::new(
            "status",
            tr("Status", "الحالة"),
            FieldKind::select(hearing_statuses()),
        )
        .with_default("scheduled")
        .at(2, 2),
        FieldDescriptor::new(
            "venue",
            tr("Venue", "المكان"),
            FieldKind::DependentDropdown {
                levels: vec![
                    DependentLevel::new(
                        "court_id",
                        tr("Court", "المحكمة"),
                        DependentSource::Relation(RelationSource::new("/api/courts")),
                    ),
                    DependentLevel::new(
                        "chamber_id",
                        tr("Chamber", "الدائرة"),
                        DependentSource::Endpoint("/api/courts/{court_id}/chambers".to_string()),
                    )
                    .optional(),
                ],
            },
        )
        .at(3, 1),
        FieldDescriptor::new("date", tr("Date", "التاريخ"), FieldKind::Date)
            .required()
            .at(4, 1),
        FieldDescriptor::new("time", tr("Time", "الوقت"), FieldKind::Time).at(4, 2),
        FieldDescriptor::new(
            "fee",
            tr("Fee", "الرسوم"),
            FieldKind::Currency {
                currency: Some("EGP".to_string()),
            },
        )
        .at(5, 1),
        FieldDescriptor::new(
            "attendees",
            tr("Attendees", "الحضور"),
            FieldKind::Number {
                min: Some(0.0),
                max: Some(50.0),
                step: Some(1.0),
            },
        )
        .at(5, 2),
        FieldDescriptor::new(
            "document",
            tr("Document", "المستند"),
            FieldKind::File {
                validation: document_upload(),
                multiple: false,
            },
        )
        .at(6, 1),
    ])?;

    let config = PageConfig::new(
        "hearings",
        "/api/hearings",
        tr("Hearings", "الجلسات"),
        tr("hearing", "جلسة"),
        fields,
    )
    .with_columns(vec![
        ColumnDescriptor::new("title", tr("Title", "العنوان")).sortable(),
        ColumnDescriptor::new("client.name", tr("Client", "العميل")),
        ColumnDescriptor::new("date", tr("Date", "التاريخ"))
            .kind(ColumnKind::Date)
            .sortable(),
        ColumnDescriptor::new("time", tr("Time", "الوقت")),
        ColumnDescriptor::new("status", tr("Status", "الحالة")).kind(ColumnKind::Badge {
            tones: status_tones(),
        }),
        ColumnDescriptor::new("fee", tr("Fee", "الرسوم")).kind(ColumnKind::Currency {
            currency: Some("EGP".to_string()),
        }),
    ])
    .with_filters(vec![
        FilterDescriptor::new("status", tr("Status", "الحالة"), FilterKind::Select(hearing_statuses())),
        FilterDescriptor::new(
            "court_id",
            tr("Court", "المحكمة"),
            FilterKind::Relation(RelationSource::new("/api/courts")),
        ),
        FilterDescriptor::new("date", tr("Date", "التاريخ"), FilterKind::Date),
    ])
    .excluding(&["client"])
    .with_layout(FormLayout::Grid { columns: 2 })
    .owned_by("created_by")
    .with_quick_action(QuickActionKey::Hearings);
    Ok(config)
}

/// Roles: name and a permission multi-select sent as a name list.
pub fn roles_page() -> Result<PageConfig, DescriptorError> {
    let permissions = RelationSource {
        value_key: "name".to_string(),
        ..RelationSource::new("/api/permissions")
    };
    let fields = FieldSet::new(vec![
        FieldDescriptor::new("name", tr("Role name", "اسم الدور"), FieldKind::text()).required(),
        FieldDescriptor::new(
            "permissions",
            tr("Permissions", "الصلاحيات"),
            FieldKind::MultiSelect {
                source: OptionSource::Relation(permissions),
            },
        )
        .required(),
    ])?;

    let config = PageConfig::new(
        "roles",
        "/api/roles",
        tr("Roles", "الأدوار"),
        tr("role", "دور"),
        fields,
    )
    .with_columns(vec![
        ColumnDescriptor::new("name", tr("Name", "الاسم")).sortable(),
        ColumnDescriptor::new("permissions", tr("Permissions", "الصلاحيات"))
            .kind(ColumnKind::Custom(PERMISSION_COUNT_CELL.to_string())),
    ])
    .with_payload_shape(PayloadShape::Roles)
    .with_layout(FormLayout::Flex);
    Ok(config)
}

/// Every admin page, in navigation order.
///
/// # Errors
///
/// Returns the first [`DescriptorError`] raised while validating a page's fields.
pub fn all_pages() -> Result<Vec<PageConfig>, DescriptorError> {
    Ok(vec![case_types_page()?, clients_page()?, hearings_page()?, roles_page()?])
}

#[cfg(test)]
mod tests {
    use crud_contract::PermissionSet;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_page_builds_with_columns() {
        let pages = all_pages().expect("pages");
        let resources: Vec<_> = pages.iter().map(|page| page.resource.as_str()).collect();
        assert_eq!(resources, vec!["case-types", "clients", "hearings", "roles"]);
        assert!(pages.iter().all(|page| !page.columns.is_empty()));
    }

    #[test]
    fn quick_actions_cover_clients_and_hearings() {
        let keys: Vec<_> = all_pages()
            .expect("pages")
            .into_iter()
            .filter_map(|page| page.quick_action)
            .collect();
        assert_eq!(keys, vec![QuickActionKey::Clients, QuickActionKey::Hearings]);
    }

    #[test]
    fn hearing_cascade_levels_are_addressable() {
        let page = hearings_page().expect("hearings");
        let (field, level) = page.fields.dependent_level("chamber_id").expect("chamber level");
        assert_eq!(field.name, "venue");
        assert_eq!(level, 1);
        assert!(page.fields.has_file_fields());
    }

    #[test]
    fn own_scoped_grants_reach_only_the_viewers_hearings() {
        let (permissions, _) = PermissionSet::from_names(["manage-own-hearings"]);
        let page = hearings_page().expect("hearings");
        let mine = serde_json::json!({ "id": 1, "created_by": 1 });
        let theirs = serde_json::json!({ "id": 2, "created_by": 2 });
        let owner_key = page.owner_key.as_deref();
        let visible = |row: &serde_json::Value| {
            let ownership = crud_core::row_ownership(row, owner_key, Some("1"));
            crud_core::visible_actions(&page.actions, row, &permissions, ownership).len()
        };
        assert_eq!(visible(&mine), 3);
        assert_eq!(visible(&theirs), 0);
        assert!(page.can_create(&permissions));
    }

    #[test]
    fn manage_grant_enables_creation() {
        let (permissions, rejected) = PermissionSet::from_names(["manage-clients"]);
        assert!(rejected.is_empty());
        let roles = roles_page().expect("roles");
        assert!(clients_page().expect("clients").can_create(&permissions));
        assert!(!roles.can_create(&permissions));
        assert_eq!(roles.payload_shape, PayloadShape::Roles);
    }
}
