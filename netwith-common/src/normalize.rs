//! Profile normalization
//!
//! Storage accumulated several encodings for the profile list fields:
//! proper JSON arrays, double-encoded arrays whose single element is a
//! comma-joined string, raw comma-joined strings, and plain free text.
//! The functions here accept all of them and produce the canonical
//! shape. Normalization is total: malformed data degrades to a
//! best-effort value and a warning, never an error.

use crate::profile::{ExperienceEntry, LookingFor, Profile, RawProfileRecord, PLACEHOLDER_IMAGE};
use serde_json::Value;
use tracing::warn;

/// Normalize one stored record into the canonical profile shape.
///
/// Missing or blank scalar fields are replaced by their documented
/// placeholders. The card headline (`title`/`company`) is lifted from
/// the first experience entry when one exists.
pub fn normalize_record(raw: &RawProfileRecord) -> Profile {
    let skills = string_list("skills", raw.skills.as_ref());
    let interests = string_list("interests", raw.interests.as_ref());
    let experience = experience_list(raw.experience.as_ref());

    let first = experience.first();
    let title = first
        .map(|e| e.title.clone())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Professional".to_string());
    let company = first
        .map(|e| e.company.clone())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "Company".to_string());

    Profile {
        id: raw.id,
        name: filled(raw.name.as_deref(), "Anonymous"),
        email: raw.email.clone(),
        bio: filled(raw.bio.as_deref(), "No bio provided"),
        skills,
        interests,
        experience,
        education: filled(raw.education.as_deref(), "Not specified"),
        profile_image: filled(raw.profile_image_url.as_deref(), PLACEHOLDER_IMAGE),
        looking_for: raw.looking_for.as_deref().and_then(LookingFor::from_str),
        title,
        company,
    }
}

/// Coerce a stored skills/interests value into a list of strings.
///
/// Fallback order:
/// 1. Nothing stored: empty list.
/// 2. JSON array: used as-is, except a single-element array whose only
///    element is a comma-joined string is split back apart (repairs the
///    double-encoding bug in old profile edits).
/// 3. String: parsed as JSON and re-run through rule 2 on success.
///    On parse failure the string is split on commas, or wrapped whole
///    as a one-element list when it contains none.
pub fn string_list(field: &str, raw: Option<&Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => strings_from_array(field, items),
        Some(Value::String(text)) => strings_from_text(field, text),
        Some(other) => {
            warn!("Unexpected {} encoding {:?}, treating as empty", field, other);
            Vec::new()
        }
    }
}

/// Coerce a stored experience value into structured entries.
///
/// Follows the same fallback chain as [`string_list`]; any plain-string
/// elements that survive it are wrapped via
/// [`ExperienceEntry::from_free_text`].
pub fn experience_list(raw: Option<&Value>) -> Vec<ExperienceEntry> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => entries_from_array(items),
        Some(Value::String(text)) => entries_from_text(text),
        Some(other) => {
            warn!("Unexpected experience encoding {:?}, treating as empty", other);
            Vec::new()
        }
    }
}

/// Replace a missing or blank value with its placeholder.
fn filled(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => placeholder.to_string(),
    }
}

fn strings_from_array(field: &str, items: &[Value]) -> Vec<String> {
    if let [Value::String(only)] = items {
        if only.contains(',') {
            warn!("Repaired comma-joined {} list: {:?}", field, only);
            return split_comma_list(only);
        }
    }

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                warn!("Dropped non-string {} element: {:?}", field, other);
                None
            }
        })
        .collect()
}

fn strings_from_text(field: &str, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => strings_from_array(field, &items),
        Ok(other) => {
            // Valid JSON but not a list, e.g. a double-quoted scalar
            warn!("Stored {} is JSON but not a list: {:?}", field, other);
            Vec::new()
        }
        Err(_) => {
            if text.contains(',') {
                split_comma_list(text)
            } else {
                vec![text.to_string()]
            }
        }
    }
}

fn entries_from_array(items: &[Value]) -> Vec<ExperienceEntry> {
    // Same double-encoding repair as the plain string lists
    if let [Value::String(only)] = items {
        if only.contains(',') {
            warn!("Repaired comma-joined experience list: {:?}", only);
            return split_comma_list(only)
                .into_iter()
                .map(ExperienceEntry::from_free_text)
                .collect();
        }
    }

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(ExperienceEntry::from_free_text(s.clone())),
            Value::Object(_) => Some(entry_from_object(item)),
            other => {
                warn!("Dropped malformed experience element: {:?}", other);
                None
            }
        })
        .collect()
}

/// Build an entry from a stored JSON object.
///
/// Structured entries may predate required fields; missing ones get the
/// same placeholders as free-text entries. Unknown keys (the old writers
/// stored a numeric `id`) are ignored.
fn entry_from_object(value: &Value) -> ExperienceEntry {
    let text = |key: &str, fallback: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    };

    ExperienceEntry {
        title: text("title", ""),
        company: text("company", "Not specified"),
        period: text("period", "Current"),
        description: text("description", ""),
    }
}

fn entries_from_text(text: &str) -> Vec<ExperienceEntry> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => entries_from_array(&items),
        // A double-encoded free-text line parses to a bare string
        Ok(Value::String(inner)) => vec![ExperienceEntry::from_free_text(inner)],
        Ok(other) => {
            warn!("Stored experience is JSON but not a list: {:?}", other);
            Vec::new()
        }
        Err(_) => {
            if text.contains(',') {
                split_comma_list(text)
                    .into_iter()
                    .map(ExperienceEntry::from_free_text)
                    .collect()
            } else {
                vec![ExperienceEntry::from_free_text(text)]
            }
        }
    }
}

/// Split a comma-joined list, trimming parts and dropping empty ones.
fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn raw_record() -> RawProfileRecord {
        RawProfileRecord {
            id: Uuid::from_bytes([7; 16]),
            email: "test@example.com".to_string(),
            name: None,
            bio: None,
            skills: None,
            interests: None,
            experience: None,
            education: None,
            profile_image_url: None,
            looking_for: None,
        }
    }

    #[test]
    fn test_string_list_json_array_passes_through() {
        let value = json!(["React", "Node.js", "Go"]);
        assert_eq!(
            string_list("skills", Some(&value)),
            vec!["React", "Node.js", "Go"]
        );
    }

    #[test]
    fn test_string_list_repairs_double_encoded_array() {
        // A profile edit stringified a comma-joined line, then signup
        // re-encoded it: the stored value is "[\"React, Node.js, Python\"]"
        let value = json!("[\"React, Node.js, Python\"]");
        assert_eq!(
            string_list("skills", Some(&value)),
            vec!["React", "Node.js", "Python"]
        );
    }

    #[test]
    fn test_string_list_repairs_single_element_array() {
        let value = json!(["React, Go"]);
        assert_eq!(string_list("skills", Some(&value)), vec!["React", "Go"]);
    }

    #[test]
    fn test_string_list_single_element_without_comma_kept() {
        let value = json!(["React"]);
        assert_eq!(string_list("skills", Some(&value)), vec!["React"]);
    }

    #[test]
    fn test_string_list_raw_comma_string() {
        let value = json!("AI, Web3,  Fintech");
        assert_eq!(
            string_list("interests", Some(&value)),
            vec!["AI", "Web3", "Fintech"]
        );
    }

    #[test]
    fn test_string_list_plain_string_wrapped() {
        let value = json!("Blockchain");
        assert_eq!(string_list("interests", Some(&value)), vec!["Blockchain"]);
    }

    #[test]
    fn test_string_list_missing_is_empty() {
        assert!(string_list("skills", None).is_empty());
        assert!(string_list("skills", Some(&Value::Null)).is_empty());
        assert!(string_list("skills", Some(&json!(""))).is_empty());
        assert!(string_list("skills", Some(&json!("   "))).is_empty());
    }

    #[test]
    fn test_string_list_json_scalar_is_empty() {
        // "\"React\"" parses to a bare JSON string, not a list
        assert!(string_list("skills", Some(&json!("\"React\""))).is_empty());
        assert!(string_list("skills", Some(&json!("42"))).is_empty());
    }

    #[test]
    fn test_string_list_coerces_scalars_and_drops_composites() {
        let value = json!(["React", 7, true, {"nested": 1}, ["inner"]]);
        assert_eq!(
            string_list("skills", Some(&value)),
            vec!["React", "7", "true"]
        );
    }

    #[test]
    fn test_string_list_drops_empty_segments() {
        let value = json!("React, , Go,");
        assert_eq!(string_list("skills", Some(&value)), vec!["React", "Go"]);
    }

    #[test]
    fn test_experience_structured_objects() {
        let value = json!([
            {
                "id": 1,
                "title": "Senior Engineer",
                "company": "TechCorp",
                "period": "2020-2023",
                "description": "Led the platform team"
            },
            {"title": "Founder"}
        ]);
        let entries = experience_list(Some(&value));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Senior Engineer");
        assert_eq!(entries[0].company, "TechCorp");
        assert_eq!(entries[0].period, "2020-2023");
        assert_eq!(entries[0].description, "Led the platform team");
        // Missing fields on structured entries fall back to placeholders
        assert_eq!(entries[1].title, "Founder");
        assert_eq!(entries[1].company, "Not specified");
        assert_eq!(entries[1].period, "Current");
        assert_eq!(entries[1].description, "");
    }

    #[test]
    fn test_experience_json_string_of_objects() {
        let value = json!(
            "[{\"id\":1,\"title\":\"Product Manager\",\"company\":\"InnovateCo\",\"period\":\"Current\",\"description\":\"\"}]"
        );
        let entries = experience_list(Some(&value));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Product Manager");
        assert_eq!(entries[0].company, "InnovateCo");
    }

    #[test]
    fn test_experience_free_text_wrapped() {
        let value = json!("Software Engineer at Google");
        let entries = experience_list(Some(&value));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Software Engineer at Google");
        assert_eq!(entries[0].company, "Not specified");
        assert_eq!(entries[0].period, "Current");
    }

    #[test]
    fn test_experience_string_array_wraps_each() {
        let value = json!(["Engineer at X", "TA at MIT"]);
        let entries = experience_list(Some(&value));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Engineer at X");
        assert_eq!(entries[1].title, "TA at MIT");
    }

    #[test]
    fn test_experience_double_encoded_comma_string() {
        let value = json!("[\"Engineer at X, TA at MIT\"]");
        let entries = experience_list(Some(&value));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Engineer at X");
        assert_eq!(entries[1].title, "TA at MIT");
    }

    #[test]
    fn test_experience_missing_is_empty() {
        assert!(experience_list(None).is_empty());
        assert!(experience_list(Some(&Value::Null)).is_empty());
        assert!(experience_list(Some(&json!(""))).is_empty());
    }

    #[test]
    fn test_experience_garbage_is_empty() {
        assert!(experience_list(Some(&json!(true))).is_empty());
        assert!(experience_list(Some(&json!({"title": "x"}))).is_empty());
    }

    #[test]
    fn test_normalize_record_fills_placeholders() {
        let profile = normalize_record(&raw_record());
        assert_eq!(profile.name, "Anonymous");
        assert_eq!(profile.email, "test@example.com");
        assert_eq!(profile.bio, "No bio provided");
        assert_eq!(profile.education, "Not specified");
        assert_eq!(profile.profile_image, "/api/placeholder/200/200");
        assert_eq!(profile.title, "Professional");
        assert_eq!(profile.company, "Company");
        assert_eq!(profile.looking_for, None);
        assert!(profile.skills.is_empty());
        assert!(profile.interests.is_empty());
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn test_normalize_record_lifts_headline_from_first_experience() {
        let mut raw = raw_record();
        raw.experience = Some(json!([
            {"title": "Staff Engineer", "company": "Acme", "period": "2021-", "description": ""},
            {"title": "Intern", "company": "Other", "period": "2019", "description": ""}
        ]));
        let profile = normalize_record(&raw);
        assert_eq!(profile.title, "Staff Engineer");
        assert_eq!(profile.company, "Acme");
    }

    #[test]
    fn test_normalize_record_keeps_provided_fields() {
        let mut raw = raw_record();
        raw.name = Some("Sarah Johnson".to_string());
        raw.bio = Some("Building things".to_string());
        raw.education = Some("MIT".to_string());
        raw.profile_image_url = Some("https://cdn.example.com/sarah.jpg".to_string());
        raw.looking_for = Some("mentor".to_string());
        raw.skills = Some(json!("[\"React\", \"TypeScript\"]"));

        let profile = normalize_record(&raw);
        assert_eq!(profile.name, "Sarah Johnson");
        assert_eq!(profile.bio, "Building things");
        assert_eq!(profile.education, "MIT");
        assert_eq!(profile.profile_image, "https://cdn.example.com/sarah.jpg");
        assert_eq!(profile.looking_for, Some(LookingFor::Mentor));
        assert_eq!(profile.skills, vec!["React", "TypeScript"]);
    }

    #[test]
    fn test_normalize_record_blank_fields_get_placeholders() {
        let mut raw = raw_record();
        raw.name = Some("".to_string());
        raw.bio = Some("   ".to_string());
        let profile = normalize_record(&raw);
        assert_eq!(profile.name, "Anonymous");
        assert_eq!(profile.bio, "No bio provided");
    }

    #[test]
    fn test_normalize_record_unknown_looking_for_is_unset() {
        let mut raw = raw_record();
        raw.looking_for = Some("soulmate".to_string());
        assert_eq!(normalize_record(&raw).looking_for, None);
    }
}
