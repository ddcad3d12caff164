use std::{collections::BTreeMap, sync::Arc};

use serde_json::json;

use super::*;
use crate::{
    archive::decode::PassArchive,
    archive::images::DecodedImage,
    layout::fields::RowAdvance,
    layout::text::{MonospaceMeasurer, TextExtent},
    render::barcode::NominalBarcodeEncoder,
};

/// Every character is 10px wide and every line 10px tall.
struct Grid;

impl TextMeasurer for Grid {
    fn measure(&mut self, text: &str, _font: &FontSpec, wrap: Option<f64>) -> TextExtent {
        let chars = text.chars().count();
        if chars == 0 {
            return TextExtent::default();
        }
        let per_line = wrap
            .map(|w| ((w / 10.0).floor() as usize).max(1))
            .unwrap_or(chars);
        TextExtent {
            width: (chars.min(per_line) * 10) as f64,
            height: (chars.div_ceil(per_line) * 10) as f64,
        }
    }
}

fn archive(style_key: &str, extra: serde_json::Value, images: &[(&str, u32, u32)]) -> PassArchive {
    let mut root = json!({
        "formatVersion": 1,
        "passTypeIdentifier": "pass.com.example.test",
        "serialNumber": "SN-001",
        "teamIdentifier": "TEAM123",
        "organizationName": "Example Org",
        "description": "Example pass",
    });
    root[style_key] = json!({});
    if let serde_json::Value::Object(extra) = extra {
        for (k, v) in extra {
            if k == "style" {
                root[style_key] = v;
            } else {
                root[k.as_str()] = v;
            }
        }
    }
    let images = images
        .iter()
        .map(|&(name, w, h)| {
            let image = DecodedImage {
                width: w,
                height: h,
                rgba8_premul: Arc::new(vec![0; (w * h * 4) as usize]),
            };
            (name.to_string(), image)
        })
        .collect::<BTreeMap<_, _>>();
    PassArchive::from_parts(root, BTreeMap::new(), images)
}

fn field(key: &str, label: &str, value: &str) -> serde_json::Value {
    json!({"key": key, "label": label, "value": value})
}

fn render_pass(a: &PassArchive, cfg: &RenderConfig) -> RenderedPass {
    let pass = Pass::new(a, None).unwrap();
    render(PassSource::Wallet(&pass), &mut Grid, &NominalBarcodeEncoder, cfg)
}

fn text_rect(r: &RenderedPass, text: &str) -> Option<Rect> {
    r.commands.iter().find_map(|c| match c {
        DrawCommand::Text { text: t, rect, .. } if t == text => Some(*rect),
        _ => None,
    })
}

#[test]
fn boarding_pass_draws_origin_and_destination() {
    let a = archive(
        "boardingPass",
        json!({"style": {
            "transitType": "PKTransitTypeAir",
            "primaryFields": [field("from", "From", "SFO"), field("to", "To", "JFK")],
            "secondaryFields": [field("p", "Name", "Ann")]
        }}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());
    assert!(r.skipped.is_empty());
    assert_eq!(r.style, Some(StyleKind::BoardingPass));

    // Header advance is 32 + 3 * 12.
    assert_eq!(text_rect(&r, "From"), Some(Rect::new(12.0, 68.0, 52.0, 78.0)));
    assert_eq!(text_rect(&r, "SFO"), Some(Rect::new(12.0, 78.0, 52.0, 88.0)));
    assert_eq!(text_rect(&r, "JFK"), Some(Rect::new(12.0, 78.0, 308.0, 88.0)));

    let dest_align = r.commands.iter().find_map(|c| match c {
        DrawCommand::Text { text, align, .. } if text == "JFK" => Some(*align),
        _ => None,
    });
    assert_eq!(dest_align, Some(TextAlign::Right));

    // Primary advance is 20 + 2 * 12; the auxiliary block is empty and adds a margin.
    assert_eq!(text_rect(&r, "Name"), Some(Rect::new(12.0, 124.0, 52.0, 134.0)));
}

#[test]
fn boarding_pass_with_one_primary_field_skips_the_section() {
    let a = archive(
        "boardingPass",
        json!({"style": {
            "primaryFields": [field("from", "From", "SFO")],
            "auxiliaryFields": [field("g", "Gate", "B12")]
        }}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());
    assert_eq!(r.skipped.len(), 1);
    assert!(r.skipped[0].starts_with("primary fields: layout error:"));
    assert!(text_rect(&r, "SFO").is_none());
    assert!(text_rect(&r, "From").is_none());
    // Rendering continues right after the header.
    assert_eq!(text_rect(&r, "Gate"), Some(Rect::new(12.0, 68.0, 52.0, 78.0)));
}

#[test]
fn background_fill_uses_descriptor_color() {
    let a = archive(
        "generic",
        json!({"backgroundColor": "rgb(10, 20, 30)", "labelColor": "rgb(200,0,0)",
               "style": {"secondaryFields": [field("a", "Lbl", "v")]}}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());
    assert_eq!(
        r.commands[0],
        DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 320.0, 420.0),
            color: Rgb8::new(10, 20, 30)
        }
    );
    let colors: Vec<_> = r
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
        .collect();
    assert_eq!(colors, vec![("Lbl", Rgb8::new(200, 0, 0)), ("v", Rgb8::BLACK)]);
}

#[test]
fn event_ticket_blurs_background_without_strip() {
    let a = archive("eventTicket", json!({}), &[("background.png", 10, 10)]);
    let r = render_pass(&a, &RenderConfig::default());
    assert_eq!(
        r.commands[0],
        DrawCommand::Image {
            name: "background.png".to_string(),
            rect: Rect::new(-30.0, -30.0, 350.0, 450.0),
            clip: None,
            blur_radius: Some(30.0),
        }
    );
}

#[test]
fn event_ticket_with_strip_fills_and_ignores_background() {
    let a = archive(
        "eventTicket",
        json!({}),
        &[("background.png", 10, 10), ("strip.png", 2, 1)],
    );
    let r = render_pass(&a, &RenderConfig::default());
    assert!(matches!(r.commands[0], DrawCommand::FillRect { .. }));
    // A background image suppresses the strip.
    assert_eq!(r.images().collect::<Vec<_>>(), Vec::<&str>::new());
}

#[test]
fn coupon_strip_is_clipped_and_drives_the_advance() {
    let a = archive(
        "coupon",
        json!({"style": {
            "primaryFields": [field("off", "Offer", "20%")],
            "secondaryFields": [field("s", "Ends", "Fri")]
        }}),
        &[("strip.png", 2, 1)],
    );
    let r = render_pass(&a, &RenderConfig::default());

    let strip = r
        .commands
        .iter()
        .find(|c| c.image_name() == Some("strip.png"))
        .unwrap();
    assert_eq!(
        *strip,
        DrawCommand::Image {
            name: "strip.png".to_string(),
            rect: Rect::new(0.0, 56.0, 320.0, 216.0),
            clip: Some(Rect::new(0.0, 56.0, 320.0, 200.0)),
            blur_radius: None,
        }
    );
    assert_eq!(text_rect(&r, "Offer"), Some(Rect::new(12.0, 68.0, 62.0, 78.0)));
    assert_eq!(text_rect(&r, "Ends"), Some(Rect::new(12.0, 212.0, 52.0, 222.0)));
}

#[test]
fn event_ticket_strip_clips_at_its_own_height() {
    let a = archive("eventTicket", json!({}), &[("strip.png", 2, 1)]);
    let r = render_pass(&a, &RenderConfig::default());
    let clip = r.commands.iter().find_map(|c| match c {
        DrawCommand::Image { clip, .. } => *clip,
        _ => None,
    });
    assert_eq!(clip, Some(Rect::new(0.0, 56.0, 320.0, 154.0)));
}

#[test]
fn missing_primary_fields_add_no_advance() {
    for style in ["generic", "storeCard"] {
        let a = archive(
            style,
            json!({"style": {"auxiliaryFields": [field("a", "Aux", "1")]}}),
            &[],
        );
        let r = render_pass(&a, &RenderConfig::default());
        assert_eq!(text_rect(&r, "Aux"), Some(Rect::new(12.0, 68.0, 42.0, 78.0)), "{style}");
    }
}

#[test]
fn generic_combines_secondary_then_auxiliary() {
    let a = archive(
        "generic",
        json!({"style": {
            "primaryFields": [field("m", "Member", "Gold")],
            "secondaryFields": [field("s", "Sec", "1")],
            "auxiliaryFields": [field("a", "Aux", "2")]
        }}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());
    // Lead advance: 20 + 2 * 12.
    let sec = text_rect(&r, "Sec").unwrap();
    let aux = text_rect(&r, "Aux").unwrap();
    assert_eq!(sec.y0, 112.0);
    assert_eq!(aux.y0, 112.0);
    assert!(sec.x0 < aux.x0);
    assert_eq!(aux.x1, 308.0);
}

#[test]
fn header_fields_pack_right_to_left() {
    let a = archive(
        "storeCard",
        json!({"logoText": "Shop", "style": {"headerFields": [
            field("pts", "Pts", "1234"),
            field("lvl", "Lvl", "Gold"),
        ]}}),
        &[("logo.png", 64, 32)],
    );
    let r = render_pass(&a, &RenderConfig::default());

    let logo = r.commands.iter().find(|c| c.image_name() == Some("logo.png"));
    assert_eq!(logo.unwrap().rect(), Rect::new(12.0, 12.0, 76.0, 44.0));
    assert_eq!(text_rect(&r, "Shop"), Some(Rect::new(88.0, 23.0, 128.0, 33.0)));

    assert_eq!(text_rect(&r, "Pts"), Some(Rect::new(0.0, 12.0, 308.0, 22.0)));
    // 308 - (40 + 12)
    assert_eq!(text_rect(&r, "Lvl"), Some(Rect::new(0.0, 12.0, 256.0, 22.0)));
}

#[test]
fn header_fields_without_room_are_skipped() {
    let wide = "W".repeat(28);
    let a = archive(
        "storeCard",
        json!({"style": {
            "headerFields": [
                field("a", "A", &wide),
                field("b", "B", &wide),
                field("c", "C", "late"),
            ],
            "primaryFields": [field("bal", "Balance", "10")],
        }}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());

    // 308 - (280 + 12) leaves 16, the second field takes it and overruns.
    assert_eq!(
        r.skipped,
        ["header field 'c': layout error: no horizontal room left in the header"]
    );
    assert!(text_rect(&r, "late").is_none());
    assert_eq!(r.texts().filter(|t| *t == wide).count(), 2);
    assert!(text_rect(&r, "10").is_some());
    assert!(text_rect(&r, "Balance").is_some());
}

#[test]
fn barcode_region_for_first_candidate() {
    let a = archive(
        "coupon",
        json!({"barcodes": [
            {"format": "PKBarcodeFormatQR", "message": "123", "messageEncoding": "iso-8859-1"}
        ]}),
        &[],
    );
    let r = render_pass(&a, &RenderConfig::default());
    let region = r.barcode.unwrap();
    // 140 / 29 == 4 modules per unit.
    assert_eq!(region.rect, Rect::new(102.0, 292.0, 218.0, 408.0));
    assert_eq!(region.message, "123");

    let plain = archive("coupon", json!({}), &[]);
    assert!(render_pass(&plain, &RenderConfig::default()).barcode.is_none());
}

#[test]
fn row_advance_policy_moves_the_next_block() {
    let a = archive(
        "boardingPass",
        json!({"style": {
            "auxiliaryFields": [field("a", "L", &"x".repeat(30)), field("b", "L", "y")],
            "secondaryFields": [field("s", "Sec", "1")]
        }}),
        &[],
    );
    // Aux rows are 30 and 20 tall; the primary section is skipped.
    let summed = render_pass(&a, &RenderConfig::default());
    assert_eq!(text_rect(&summed, "Sec").unwrap().y0, 68.0 + 30.0 + 6.0 + 20.0 + 12.0);

    let legacy = render_pass(
        &a,
        &RenderConfig {
            row_advance: RowAdvance::LastRowTimesCount,
            ..RenderConfig::default()
        },
    );
    assert_eq!(text_rect(&legacy, "Sec").unwrap().y0, 68.0 + 20.0 * 2.0 + 12.0);
}

#[test]
fn render_is_deterministic() {
    let a = archive(
        "eventTicket",
        json!({"style": {
            "headerFields": [field("d", "Date", "Oct 18")],
            "primaryFields": [field("e", "Event", "Concert")],
            "secondaryFields": [field("s", "Seat", "A1"), field("r", "Row", "3")]
        }}),
        &[("strip.png", 640, 196), ("logo.png", 50, 50)],
    );
    let cfg = RenderConfig::default();
    let pass = Pass::new(&a, None).unwrap();
    let mut m = MonospaceMeasurer::default();
    let one = render(PassSource::Wallet(&pass), &mut m, &NominalBarcodeEncoder, &cfg);
    let two = render(PassSource::from(&pass), &mut m, &NominalBarcodeEncoder, &cfg);
    assert_eq!(one, two);
    assert_eq!(
        serde_json::to_string(&one).unwrap(),
        serde_json::to_string(&two).unwrap()
    );
}

#[test]
fn flat_pass_uses_accent_band_and_black_text() {
    let icon_image = DecodedImage {
        width: 16,
        height: 16,
        rgba8_premul: Arc::new(vec![0; 16 * 16 * 4]),
    };
    let flat = FlatPass::new([Field::new("n", Some("Name"), "Ann")])
        .with_accent_color(Rgb8::new(0, 120, 200))
        .with_icon(ImageRef {
            name: "icon.png",
            image: &icon_image,
        });
    let r = render(
        PassSource::Flat(&flat),
        &mut Grid,
        &NominalBarcodeEncoder,
        &RenderConfig::default(),
    );

    assert_eq!(r.style, None);
    assert_eq!(
        r.commands[0],
        DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 320.0, 420.0),
            color: Rgb8::WHITE
        }
    );
    assert_eq!(
        r.commands[1],
        DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 320.0, 56.0),
            color: Rgb8::new(0, 120, 200)
        }
    );
    assert_eq!(r.commands[2].rect(), Rect::new(12.0, 12.0, 44.0, 44.0));
    assert_eq!(text_rect(&r, "Name"), Some(Rect::new(12.0, 68.0, 52.0, 78.0)));
    assert!(r.commands.iter().all(|c| match c {
        DrawCommand::Text { color, .. } => *color == Rgb8::BLACK,
        _ => true,
    }));
    assert!(r.barcode.is_none());
}
