use super::*;

fn tables(codes: &[&str]) -> BTreeMap<String, TranslationTable> {
    codes
        .iter()
        .map(|c| (c.to_string(), TranslationTable::default()))
        .collect()
}

#[test]
fn no_translations_is_reported() {
    let sel = select_locale(&tables(&[]), &["en_US.UTF-8"]);
    assert_eq!(sel, LocaleSelection::NoTranslations);
}

#[test]
fn posix_style_preference_matches_language_prefix() {
    let sel = select_locale(&tables(&["de", "en", "es"]), &["es_ES.UTF-8"]);
    assert_eq!(sel, LocaleSelection::Resolved("es".to_string()));
    assert_eq!(sel.resolved(), Some("es"));
}

#[test]
fn preferences_are_tried_in_priority_order() {
    let sel = select_locale(&tables(&["de", "fr"]), &["it-IT", "fr-CA", "de"]);
    assert_eq!(sel, LocaleSelection::Resolved("fr".to_string()));
}

#[test]
fn longest_matching_code_wins() {
    let sel = select_locale(&tables(&["zh", "zh-Hans"]), &["zh-Hans-CN"]);
    assert_eq!(sel, LocaleSelection::Resolved("zh-Hans".to_string()));
}

#[test]
fn prefix_must_end_on_subtag_boundary() {
    let sel = select_locale(&tables(&["en"]), &["eng"]);
    assert_eq!(sel, LocaleSelection::NeedsChoice(vec!["en".to_string()]));
}

#[test]
fn unmatched_preferences_defer_to_caller() {
    let sel = select_locale(&tables(&["ja", "ko"]), &["pt_BR"]);
    assert_eq!(
        sel,
        LocaleSelection::NeedsChoice(vec!["ja".to_string(), "ko".to_string()])
    );
    assert_eq!(sel.resolved(), None);
}

#[test]
fn tag_normalization_strips_encoding_and_modifier() {
    assert_eq!(normalize_tag("en_US.UTF-8@euro").as_deref(), Some("en-us"));
    assert_eq!(normalize_tag(".UTF-8"), None);
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: BTreeMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn environment_preferences_keep_priority_order() {
    let prefs = preferred_locales_from(env(&[
        ("LANG", "de_DE.UTF-8"),
        ("LANGUAGE", "fr_CA:fr:en"),
        ("LC_MESSAGES", "es_ES"),
    ]));
    assert_eq!(prefs, ["fr_CA", "fr", "en", "es_ES", "de_DE.UTF-8"]);
}

#[test]
fn environment_preferences_skip_c_locales_and_duplicates() {
    let prefs = preferred_locales_from(env(&[
        ("LANGUAGE", "C:en_GB::POSIX"),
        ("LC_ALL", "C.UTF-8"),
        ("LC_MESSAGES", "en_GB"),
        ("LANG", "POSIX"),
    ]));
    assert_eq!(prefs, ["en_GB"]);

    assert!(preferred_locales_from(env(&[])).is_empty());
}
