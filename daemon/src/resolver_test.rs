use super::*;
use crate::config::ModelsConfig;

fn code(value: &str) -> LanguageCode {
    LanguageCode::parse(value).unwrap()
}

fn default_resolver() -> LanguageResolver {
    LanguageResolver::new("/models", &ModelsConfig::default().languages).unwrap()
}

#[test]
fn test_every_mapped_code_resolves_to_its_model() {
    let config = ModelsConfig::default();
    let resolver = default_resolver();

    for (language, name) in &config.languages {
        let model = resolver.resolve(&code(language)).unwrap();
        assert_eq!(model.name(), name);
        assert_eq!(model.language().as_str(), language);
        assert_eq!(model.path(), Path::new("/models").join(name));
    }
    assert_eq!(resolver.len(), config.languages.len());
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver = default_resolver();
    let first = resolver.resolve(&code("fr")).unwrap();
    let second = resolver.resolve(&code("fr")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), "vosk-model-small-fr-0.22");
}

#[test]
fn test_unmapped_code_fails_with_unsupported_language() {
    let resolver = default_resolver();

    for unknown in ["xx", "EN", "en-US", "english", "e"] {
        match resolver.resolve(&code(unknown)) {
            Err(PipelineError::UnsupportedLanguage { code }) => assert_eq!(code, unknown),
            other => panic!("expected UnsupportedLanguage for {unknown}, got {other:?}"),
        }
    }
}

#[test]
fn test_languages_are_sorted() {
    let resolver = default_resolver();
    let codes: Vec<&str> = resolver.languages().map(LanguageCode::as_str).collect();
    assert_eq!(codes, ["ar", "de", "en", "es", "fr", "pt", "ru", "tl", "uk"]);
}

#[test]
fn test_empty_code_in_table_is_rejected() {
    let result = LanguageResolver::new("/models", [("", "vosk-model")]);
    assert!(matches!(
        result,
        Err(PipelineError::InvalidLanguageCode { .. })
    ));
}

#[test]
fn test_empty_table_resolves_nothing() {
    let resolver = LanguageResolver::new("/models", Vec::<(String, String)>::new()).unwrap();
    assert!(resolver.is_empty());
    assert!(resolver.resolve(&code("en")).is_err());
}
