//! Client-side form validation.

use std::{collections::BTreeMap, sync::OnceLock};

use crud_contract::{
    FieldKind, FieldSet, FieldValue, FileUpload, FileValidation, FormData, FormMode, TextInput,
};
use regex::Regex;

/// Field key to message.
pub type FieldErrors = BTreeMap<String, String>;

/// Dependent-dropdown placeholder value that counts as "nothing chosen".
pub const NONE_SENTINEL: &str = "none";

#[derive(Debug, Clone, PartialEq)]
/// Why a field failed validation.
pub enum FieldIssue {
    /// Required value missing.
    Required,
    /// Value is not a number.
    NotANumber,
    /// Number below the field minimum.
    BelowMin {
        /// Lower bound.
        min: f64,
    },
    /// Number above the field maximum.
    AboveMax {
        /// Upper bound.
        max: f64,
    },
    /// Text is not an email address.
    InvalidEmail,
    /// Upload exceeds the size limit.
    TooLarge {
        /// Limit in bytes.
        max_bytes: u64,
    },
    /// Upload MIME type not accepted.
    MimeNotAllowed {
        /// Accepted patterns.
        allowed: Vec<String>,
    },
    /// Upload extension not accepted.
    ExtensionNotAllowed {
        /// Accepted extensions.
        allowed: Vec<String>,
    },
}

fn human_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

impl FieldIssue {
    /// Message shown under the field.
    pub fn message(&self, label: &str, locale: &str) -> String {
        let arabic = locale == "ar";
        match self {
            Self::Required if arabic => format!("حقل {label} مطلوب"),
            Self::Required => format!("{label} is required"),
            Self::NotANumber if arabic => format!("يجب أن يكون {label} رقمًا"),
            Self::NotANumber => format!("{label} must be a number"),
            Self::BelowMin { min } if arabic => format!("يجب ألا يقل {label} عن {min}"),
            Self::BelowMin { min } => format!("{label} must be at least {min}"),
            Self::AboveMax { max } if arabic => format!("يجب ألا يزيد {label} عن {max}"),
            Self::AboveMax { max } => format!("{label} must not exceed {max}"),
            Self::InvalidEmail if arabic => format!("{label} ليس بريدًا إلكترونيًا صالحًا"),
            Self::InvalidEmail => format!("{label} must be a valid email address"),
            Self::TooLarge { max_bytes } if arabic => {
                format!("يجب ألا يتجاوز حجم الملف {}", human_size(*max_bytes))
            }
            Self::TooLarge { max_bytes } => {
                format!("File must not exceed {}", human_size(*max_bytes))
            }
            Self::MimeNotAllowed { allowed } | Self::ExtensionNotAllowed { allowed } if arabic => {
                format!("نوع الملف غير مسموح. المسموح: {}", allowed.join(", "))
            }
            Self::MimeNotAllowed { allowed } | Self::ExtensionNotAllowed { allowed } => {
                format!("File type not allowed. Allowed: {}", allowed.join(", "))
            }
        }
    }
}

/// Returns `true` when `mime` matches `pattern` (`image/*` matches every `image/` subtype).
pub fn mime_matches(pattern: &str, mime: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    let mime = mime.trim().to_ascii_lowercase();
    if pattern == "*/*" || pattern == "*" {
        return true;
    }
    match pattern.strip_suffix("/*") {
        Some(family) => mime
            .split_once('/')
            .is_some_and(|(mime_family, _)| mime_family == family),
        None => pattern == mime,
    }
}

/// Checks one upload against its constraints.
///
/// # Errors
///
/// Returns the first violated constraint: size, then MIME type, then extension.
pub fn check_file(upload: &FileUpload, validation: &FileValidation) -> Result<(), FieldIssue> {
    if let Some(max_bytes) = validation.max_size_bytes {
        if upload.size_bytes > max_bytes {
            return Err(FieldIssue::TooLarge { max_bytes });
        }
    }
    if !validation.allowed_mime_types.is_empty()
        && !validation
            .allowed_mime_types
            .iter()
            .any(|pattern| mime_matches(pattern, &upload.mime_type))
    {
        return Err(FieldIssue::MimeNotAllowed {
            allowed: validation.allowed_mime_types.clone(),
        });
    }
    if !validation.allowed_extensions.is_empty() {
        let allowed = upload.extension().is_some_and(|ext| {
            validation
                .allowed_extensions
                .iter()
                .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        });
        if !allowed {
            return Err(FieldIssue::ExtensionNotAllowed {
                allowed: validation.allowed_extensions.clone(),
            });
        }
    }
    Ok(())
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

/// Checks a present numeric value against its bounds.
///
/// # Errors
///
/// Returns [`FieldIssue::NotANumber`] for unparsable text, otherwise the violated bound.
pub fn check_number(
    value: &FieldValue,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), FieldIssue> {
    let number = match value {
        FieldValue::Number(number) => number.as_f64(),
        FieldValue::Json(serde_json::Value::Number(number)) => number.as_f64(),
        other => other.as_text().trim().parse::<f64>().ok(),
    }
    .ok_or(FieldIssue::NotANumber)?;
    if let Some(min) = min.filter(|min| number < *min) {
        return Err(FieldIssue::BelowMin { min });
    }
    if let Some(max) = max.filter(|max| number > *max) {
        return Err(FieldIssue::AboveMax { max });
    }
    Ok(())
}

/// Returns `true` when `text` looks like `local@domain.tld`.
pub fn is_email(text: &str) -> bool {
    email_pattern().map_or(true, |pattern| pattern.is_match(text.trim()))
}

fn level_missing(value: Option<&FieldValue>) -> bool {
    match value {
        None => true,
        Some(value) => value.is_blank() || value.as_text() == NONE_SENTINEL,
    }
}

/// Validates every visible field of `fields` against `data`.
///
/// Hidden conditional fields are skipped. File fields are never required in edit mode, but a newly
/// chosen upload is still checked against its constraints. Dependent dropdowns report errors under
/// each level's own key.
pub fn validate_form(
    fields: &FieldSet,
    mode: FormMode,
    data: &FormData,
    locale: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in fields.iter() {
        if !field.is_visible(mode, data) {
            continue;
        }
        let label = field.label.resolve(locale);
        match &field.kind {
            FieldKind::DependentDropdown { levels } => {
                for level in levels {
                    if (field.required || level.required) && level_missing(data.get(&level.name)) {
                        errors.insert(
                            level.name.clone(),
                            FieldIssue::Required.message(&level.label.resolve(locale), locale),
                        );
                    }
                }
            }
            kind if kind.is_file() => {
                let value = data.get(&field.name).cloned().unwrap_or_default();
                if field.required && mode != FormMode::Edit && value.is_blank() {
                    errors.insert(field.name.clone(), FieldIssue::Required.message(&label, locale));
                    continue;
                }
                let validation = kind.file_validation();
                if let (FieldValue::File(upload), Some(validation)) = (&value, validation) {
                    if let Err(issue) = check_file(upload, validation) {
                        errors.insert(field.name.clone(), issue.message(&label, locale));
                    }
                }
            }
            kind => {
                let value = data.get(&field.name).filter(|value| !value.is_blank());
                let Some(value) = value else {
                    if field.required {
                        let message = FieldIssue::Required.message(&label, locale);
                        errors.insert(field.name.clone(), message);
                    }
                    continue;
                };
                let checked = match kind {
                    FieldKind::Number { min, max, .. } => check_number(value, *min, *max),
                    FieldKind::Text {
                        input: TextInput::Email,
                    } if !is_email(&value.as_text()) => Err(FieldIssue::InvalidEmail),
                    _ => Ok(()),
                };
                if let Err(issue) = checked {
                    errors.insert(field.name.clone(), issue.message(&label, locale));
                }
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use crud_contract::{
        DependentLevel, DependentSource, FieldDescriptor, FieldCondition, SelectOption,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn upload(name: &str, mime: &str, size_bytes: u64) -> FileUpload {
        FileUpload {
            file_name: name.into(),
            mime_type: mime.into(),
            size_bytes,
            handle: 1,
        }
    }

    fn attachment(required: bool) -> FieldDescriptor {
        let field = FieldDescriptor::new(
            "attachment",
            "Attachment",
            FieldKind::File {
                validation: FileValidation {
                    max_size_bytes: Some(2 * 1024 * 1024),
                    allowed_mime_types: vec!["image/*".into(), "application/pdf".into()],
                    allowed_extensions: Vec::new(),
                },
                multiple: false,
            },
        );
        if required {
            field.required()
        } else {
            field
        }
    }

    #[test]
    fn mime_wildcards_match_whole_family() {
        assert!(mime_matches("image/*", "image/png"));
        assert!(mime_matches("IMAGE/*", "image/svg+xml"));
        assert!(!mime_matches("image/*", "application/pdf"));
        assert!(mime_matches("application/pdf", "application/pdf"));
        assert!(!mime_matches("image/*", ""));
    }

    #[test]
    fn file_checks_report_size_then_type_then_extension() {
        let validation = FileValidation {
            max_size_bytes: Some(1024),
            allowed_mime_types: vec!["image/*".into()],
            allowed_extensions: vec![".png".into()],
        };
        assert_eq!(
            check_file(&upload("a.png", "text/plain", 4096), &validation),
            Err(FieldIssue::TooLarge { max_bytes: 1024 })
        );
        assert!(matches!(
            check_file(&upload("a.png", "text/plain", 10), &validation),
            Err(FieldIssue::MimeNotAllowed { .. })
        ));
        assert!(matches!(
            check_file(&upload("a.jpg", "image/jpeg", 10), &validation),
            Err(FieldIssue::ExtensionNotAllowed { .. })
        ));
        assert_eq!(check_file(&upload("A.PNG", "image/png", 10), &validation), Ok(()));
    }

    #[test]
    fn required_file_is_exempt_in_edit_mode_but_still_checked() {
        let fields = FieldSet::new(vec![attachment(true)]).expect("fields");
        let mut data = FormData::new();
        data.set("attachment", "https://cdn.example.test/old.pdf");
        assert!(validate_form(&fields, FormMode::Edit, &FormData::new(), "en").is_empty());
        assert_eq!(
            validate_form(&fields, FormMode::Create, &FormData::new(), "en")
                .get("attachment")
                .map(String::as_str),
            Some("Attachment is required")
        );

        data.set(
            "attachment",
            FieldValue::File(upload("video.mp4", "video/mp4", 10)),
        );
        let errors = validate_form(&fields, FormMode::Edit, &data, "en");
        assert!(errors["attachment"].starts_with("File type not allowed"));
    }

    #[test]
    fn dependent_levels_report_their_own_keys_and_treat_none_as_missing() {
        let fields = FieldSet::new(vec![FieldDescriptor::new(
            "location",
            "Location",
            FieldKind::DependentDropdown {
                levels: vec![
                    DependentLevel::new(
                        "court_id",
                        "Court",
                        DependentSource::Static(vec![SelectOption::new("1", "Cairo")]),
                    ),
                    DependentLevel::new(
                        "branch_id",
                        "Branch",
                        DependentSource::Endpoint("/api/courts/{parent}/branches".into()),
                    ),
                    DependentLevel::new(
                        "room_id",
                        "Room",
                        DependentSource::Endpoint("/api/branches/{parent}/rooms".into()),
                    )
                    .optional(),
                ],
            },
        )])
        .expect("fields");
        let mut data = FormData::new();
        data.set("court_id", "1");
        data.set("branch_id", NONE_SENTINEL);
        let errors = validate_form(&fields, FormMode::Create, &data, "en");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["branch_id"]);
        assert_eq!(errors["branch_id"], "Branch is required");
    }

    #[test]
    fn falsy_required_values_fail_and_hidden_fields_are_skipped() {
        let hours = FieldKind::Number {
            min: None,
            max: None,
            step: None,
        };
        let fields = FieldSet::new(vec![
            FieldDescriptor::new("hours", "Hours", hours).required(),
            FieldDescriptor::new("rate", "Rate", FieldKind::Currency { currency: None })
                .required()
                .when(FieldCondition::FieldEquals {
                    field: "billing".into(),
                    value: "hourly".into(),
                }),
        ])
        .expect("fields");
        let mut data = FormData::new();
        data.set("hours", 0_i64);
        let errors = validate_form(&fields, FormMode::Create, &data, "en");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["hours"]);
        assert_eq!(errors["hours"], "Hours is required");

        data.set("hours", 6_i64);
        assert!(validate_form(&fields, FormMode::Create, &data, "en").is_empty());
        data.set("billing", "hourly");
        let errors = validate_form(&fields, FormMode::Create, &data, "ar");
        assert_eq!(errors["rate"], "حقل Rate مطلوب");
    }

    #[test]
    fn number_bounds_and_email_format_are_enforced() {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new(
                "attendees",
                "Attendees",
                FieldKind::Number {
                    min: Some(1.0),
                    max: Some(50.0),
                    step: None,
                },
            ),
            FieldDescriptor::new(
                "email",
                "Email",
                FieldKind::Text {
                    input: TextInput::Email,
                },
            ),
        ])
        .expect("fields");
        let mut data = FormData::new();
        assert!(validate_form(&fields, FormMode::Create, &data, "en").is_empty());

        data.set("attendees", "75");
        data.set("email", "mona.example.test");
        let errors = validate_form(&fields, FormMode::Create, &data, "en");
        assert_eq!(errors["attendees"], "Attendees must not exceed 50");
        assert_eq!(errors["email"], "Email must be a valid email address");

        data.set("attendees", "many");
        assert_eq!(
            validate_form(&fields, FormMode::Create, &data, "en")["attendees"],
            "Attendees must be a number"
        );

        data.set("attendees", 12_i64);
        data.set("email", "mona@example.test");
        assert!(validate_form(&fields, FormMode::Create, &data, "en").is_empty());
        assert_eq!(
            check_number(&FieldValue::text("0.5"), Some(1.0), None),
            Err(FieldIssue::BelowMin { min: 1.0 })
        );
    }
}
