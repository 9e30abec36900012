//! Building a query object from one primary and any number of secondary bundles.

use super::manifest::Manifest;
use crate::arbitration::QueryObject;
use crate::prompt::PromptTemplate;

/// Strip characters that could open markup or template syntax
pub fn sanitize_addendum(addendum: &str) -> String {
    addendum
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}

impl QueryObject {
    /// Single-bundle query: the primary manifest plus an optional addendum
    pub fn from_manifest(manifest: &Manifest, addendum: Option<&str>) -> Self {
        let prompt = apply_addendum(manifest, manifest.prompt.clone(), addendum);
        QueryObject::new(
            prompt,
            manifest.models.clone(),
            Some(manifest.iterations),
            manifest.outcomes.clone(),
        )
        .with_attachments(manifest.attachments.clone())
    }
}

/// Merge a primary manifest with secondary evidence bundles.
///
/// The primary supplies prompt template, panel, iteration count and
/// outcomes. Each secondary appends its text under
/// [`PromptTemplate::secondary_evidence`] and its attachments after the
/// primary's. With no secondaries this equals [`QueryObject::from_manifest`].
pub fn combine_query(
    primary: &Manifest,
    secondaries: &[Manifest],
    addendum: Option<&str>,
) -> QueryObject {
    let mut prompt = primary.prompt.clone();
    let mut attachments = primary.attachments.clone();

    for (i, secondary) in secondaries.iter().enumerate() {
        prompt.push_str(&PromptTemplate::secondary_evidence(
            i + 1,
            secondary.name.as_deref(),
            &secondary.prompt,
        ));
        attachments.extend(secondary.attachments.iter().cloned());
    }

    let prompt = apply_addendum(primary, prompt, addendum);
    QueryObject::new(
        prompt,
        primary.models.clone(),
        Some(primary.iterations),
        primary.outcomes.clone(),
    )
    .with_attachments(attachments)
}

/// Interpolate the addendum when the primary manifest declares a placeholder.
///
/// The placeholder is replaced in place; if the prompt does not contain it
/// the addendum is appended instead.
fn apply_addendum(primary: &Manifest, prompt: String, addendum: Option<&str>) -> String {
    let Some(placeholder) = primary.addendum_placeholder.as_deref() else {
        return prompt;
    };
    let addendum = addendum.map(sanitize_addendum).unwrap_or_default();

    if !placeholder.is_empty() && prompt.contains(placeholder) {
        prompt.replace(placeholder, &addendum)
    } else if addendum.is_empty() {
        prompt
    } else {
        format!("{}{}", prompt, PromptTemplate::addendum(&addendum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitration::{Attachment, PanelEntry};

    fn primary() -> Manifest {
        Manifest::new("Did the contractor finish on time? {{ADDENDUM}}")
            .with_models(vec![
                PanelEntry::new("openai", "gpt-4o", 0.6),
                PanelEntry::new("anthropic", "claude-sonnet-4", 0.4).with_count(2),
            ])
            .with_iterations(2)
            .with_outcomes(vec!["On time".into(), "Late".into()])
            .with_attachments(vec![Attachment::new("contract.png", "image/png", "AAA")])
            .with_addendum_placeholder("{{ADDENDUM}}")
    }

    #[test]
    fn test_single_bundle_matches_legacy_path() {
        let primary = primary();
        for addendum in [None, Some("Delivery receipt dated May 2")] {
            assert_eq!(
                combine_query(&primary, &[], addendum),
                QueryObject::from_manifest(&primary, addendum)
            );
        }
    }

    #[test]
    fn test_secondary_evidence_is_merged() {
        let secondary = Manifest::new("Invoice shows delivery on May 9.")
            .with_name("invoice")
            .with_models(vec![PanelEntry::new("ignored", "ignored", 1.0)])
            .with_attachments(vec![Attachment::new("invoice.jpg", "image/jpeg", "BBB")]);

        let query = combine_query(&primary(), &[secondary], None);

        assert!(query.prompt.contains("Invoice shows delivery on May 9."));
        assert!(query.prompt.contains("invoice"));
        assert_eq!(query.models.len(), 2);
        assert_eq!(query.models[0].provider, "openai");
        assert_eq!(query.iterations, 2);
        let names: Vec<_> = query.attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["contract.png", "invoice.jpg"]);
    }

    #[test]
    fn test_addendum_is_sanitized_and_interpolated() {
        let query = combine_query(&primary(), &[], Some("<b>late</b> {x}"));
        assert_eq!(
            query.prompt,
            "Did the contractor finish on time? blate/b x"
        );
    }

    #[test]
    fn test_addendum_ignored_without_placeholder() {
        let mut manifest = primary();
        manifest.addendum_placeholder = None;
        let query = combine_query(&manifest, &[], Some("extra"));
        assert!(!query.prompt.contains("extra"));
    }

    #[test]
    fn test_addendum_appended_when_placeholder_missing_from_prompt() {
        let manifest = Manifest::new("Plain question.").with_addendum_placeholder("[ADD]");
        let query = combine_query(&manifest, &[], Some("note"));
        assert!(query.prompt.starts_with("Plain question."));
        assert!(query.prompt.ends_with("note"));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_addendum("  <script>{}</script> "), "script/script");
    }
}
