use super::*;

#[test]
fn defaults_match_the_canonical_pass() {
    let cfg = RenderConfig::default();
    assert_eq!((cfg.width, cfg.height, cfg.margin), (320.0, 420.0, 12.0));
    assert_eq!(cfg.header_height, 32.0);
    assert_eq!(cfg.row_gap, 6.0);
    assert_eq!(cfg.background_blur_radius, 30.0);
    assert_eq!(cfg.barcode_height_budget, 140);
    assert_eq!(cfg.tall_barcode_box, 177);
    assert_eq!(cfg.fonts.label, FontSpec::new(9.0, 600.0));
    assert_eq!(cfg.fonts.biggest_value.size_px, 24.0);
    assert_eq!(cfg.colors.background, Rgb8::WHITE);
    assert_eq!(cfg.row_advance, RowAdvance::Summed);
    assert_eq!(cfg.content_width(), 296.0);
    cfg.validate().unwrap();
}

#[test]
fn profiles_per_style() {
    let cfg = RenderConfig::default();
    assert_eq!(
        cfg.profile(StyleKind::BoardingPass).primary,
        PrimaryLayout::OriginDestination
    );
    assert_eq!(
        cfg.profile(StyleKind::BoardingPass).secondary,
        SecondaryLayout::AuxiliaryThenSecondary
    );
    assert_eq!(
        cfg.profile(StyleKind::Coupon).primary,
        PrimaryLayout::StripAndLead {
            strip_max_height: 144.0
        }
    );
    assert_eq!(
        cfg.profile(StyleKind::StoreCard).primary,
        PrimaryLayout::StripAndLead {
            strip_max_height: 144.0
        }
    );
    assert_eq!(
        cfg.profile(StyleKind::EventTicket).primary,
        PrimaryLayout::StripAndLead {
            strip_max_height: 98.0
        }
    );
    assert_eq!(
        cfg.profile(StyleKind::EventTicket).primary_value_font,
        FontRole::BigValue
    );
    assert_eq!(cfg.profile(StyleKind::Generic).primary, PrimaryLayout::Lead);
    assert_eq!(
        cfg.profile(StyleKind::Generic).secondary,
        SecondaryLayout::Combined
    );
}

#[test]
fn partial_json_overrides_keep_defaults() {
    let cfg = RenderConfig::from_json_str(
        r#"{
            "margin": 8,
            "row_advance": "last_row_times_count",
            "fonts": {"label": {"size_px": 10}},
            "profiles": {"generic": {"primary": {"kind": "lead"}, "primary_value_font": "biggest_value", "secondary": "auxiliary_then_secondary"}}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.margin, 8.0);
    assert_eq!(cfg.width, 320.0);
    assert_eq!(cfg.row_advance, RowAdvance::LastRowTimesCount);
    assert_eq!(cfg.fonts.label, FontSpec::regular(10.0));
    assert_eq!(cfg.fonts.value, FontSpec::regular(11.0));
    assert_eq!(
        cfg.profile(StyleKind::Generic).secondary,
        SecondaryLayout::AuxiliaryThenSecondary
    );
    assert_eq!(
        cfg.profile(StyleKind::Coupon).primary,
        PrimaryLayout::StripAndLead {
            strip_max_height: 144.0
        }
    );
}

#[test]
fn invalid_config_is_a_config_error() {
    let err = RenderConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, PassError::Config(_)));
    assert!(err.to_string().starts_with("config error:"));

    let err = RenderConfig::from_json_str(r#"{"width": 0}"#).unwrap_err();
    assert!(matches!(err, PassError::Config(_)));

    let err = RenderConfig::from_json_str(r#"{"margin": 200}"#).unwrap_err();
    assert!(matches!(err, PassError::Config(_)));

    let err = RenderConfig::from_json_str(r#"{"fonts": {"value": {"size_px": -1}}}"#).unwrap_err();
    assert!(matches!(err, PassError::Config(_)));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = RenderConfig::from_path("target/definitely/missing/config.json").unwrap_err();
    assert!(matches!(err, PassError::Config(_)));
}
