use super::*;
use crate::project::dsl::scene;
use crate::project::properties::PropertyKey;
use kurbo::Point;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn defaults_produce_identity_pipeline_in_order() {
    let s = scene("a", "a.png").with_description("A quiet harbor. Boats drift.");
    let frame = composite(&s, &CompositeProperties::default());

    let kinds: Vec<&str> = frame
        .ops
        .iter()
        .map(|op| match op {
            CompositeOp::Source { .. } => "source",
            CompositeOp::Opacity { .. } => "opacity",
            CompositeOp::Transform { .. } => "transform",
            CompositeOp::Blend { .. } => "blend",
            CompositeOp::Crop { .. } => "crop",
        })
        .collect();
    assert_eq!(kinds, ["source", "opacity", "transform", "blend", "crop"]);

    assert_eq!(frame.source(), Some(&SourceRef::Image("a.png".to_string())));
    assert_eq!(frame.alpha(), 1.0);
    assert_eq!(frame.transform().unwrap().to_affine(), Affine::IDENTITY);
    assert_eq!(frame.blend(), BlendMode::Normal);
    assert!(frame.crop().is_none());
    assert_eq!(frame.caption.as_deref(), Some("A quiet harbor"));
}

#[test]
fn garbage_blend_mode_renders_as_normal() {
    let s = scene("a", "a.png");
    let mut props = CompositeProperties::default();
    props.apply(PropertyKey::BlendMode, &"Garbage".into());
    let frame = composite(&s, &props);
    assert_eq!(frame.blend(), BlendMode::Normal);
}

#[test]
fn known_blend_modes_pass_through() {
    let s = scene("a", "a.png");
    for mode in BlendMode::ALL {
        let mut props = CompositeProperties::default();
        props.apply(PropertyKey::BlendMode, &mode.into());
        assert_eq!(composite(&s, &props).blend(), mode);
    }
}

#[test]
fn opacity_becomes_alpha_multiplier() {
    let s = scene("a", "a.png");
    let mut props = CompositeProperties::default();
    props.apply(PropertyKey::Opacity, &25.0.into());
    assert_eq!(composite(&s, &props).alpha(), 0.25);
}

#[test]
fn transform_applies_scale_then_rotate_then_translate() {
    let s = scene("a", "a.png");
    let mut props = CompositeProperties::default();
    props.apply(PropertyKey::Scale, &200.0.into());
    props.apply(PropertyKey::Rotation, &90.0.into());
    props.apply(PropertyKey::PositionX, &10.0.into());
    props.apply(PropertyKey::PositionY, &5.0.into());

    let t = composite(&s, &props).transform().unwrap();
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.rotation_deg, 90.0);

    // (1, 0) -> scale (2, 0) -> rotate 90deg (0, 2) -> translate (10, 7).
    let p = t.to_affine() * Point::new(1.0, 0.0);
    assert!(approx(p.x, 10.0), "{p:?}");
    assert!(approx(p.y, 7.0), "{p:?}");
}

#[test]
fn malformed_properties_are_sanitized_before_compositing() {
    let s = scene("a", "a.png");
    let props = CompositeProperties {
        opacity: f64::NAN,
        scale: 5000.0,
        rotation: f64::INFINITY,
        crop_top: -20.0,
        ..CompositeProperties::default()
    };
    let frame = composite(&s, &props);
    assert_eq!(frame.alpha(), 1.0);
    let t = frame.transform().unwrap();
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.rotation_deg, 0.0);
    assert_eq!(frame.crop().top, 0.0);
}

#[test]
fn pending_source_omits_only_the_source_layer() {
    let s = scene("a", "a.png");
    let frame = composite_with_source(&s, &CompositeProperties::default(), SourceStatus::Pending);
    assert!(frame.source().is_none());
    assert_eq!(frame.ops.len(), 4);
    assert_eq!(frame.blend(), BlendMode::Normal);
}

#[test]
fn video_source_is_preferred_and_missing_urls_emit_no_source() {
    let video = scene("v", "poster.png").with_video("clip.mp4");
    let frame = composite(&video, &CompositeProperties::default());
    assert_eq!(frame.source(), Some(&SourceRef::Video("clip.mp4".to_string())));

    let blank = scene("b", "");
    assert!(
        composite(&blank, &CompositeProperties::default())
            .source()
            .is_none()
    );
}

#[test]
fn crop_is_relative_to_the_frame_box() {
    let inset = CropInset {
        top: 10.0,
        right: 25.0,
        bottom: 0.0,
        left: 25.0,
    };
    let r = inset.clip_rect(Size::new(200.0, 100.0));
    assert_eq!(r, Rect::new(50.0, 10.0, 150.0, 100.0));

    let collapsed = CropInset {
        left: 70.0,
        right: 70.0,
        ..CropInset::default()
    };
    let r = collapsed.clip_rect(Size::new(100.0, 100.0));
    assert_eq!(r.width(), 0.0);
    assert_eq!(r.x0, 70.0);
}

#[test]
fn caption_is_text_before_first_period() {
    assert_eq!(
        caption_for("Sunrise over hills. Then rain."),
        Some("Sunrise over hills".to_string())
    );
    assert_eq!(caption_for("  No period here  "), Some("No period here".to_string()));
    assert_eq!(caption_for(""), None);
    assert_eq!(caption_for(". leading period"), None);
}

#[test]
fn frame_json_is_tagged_by_op() {
    let s = scene("a", "a.png");
    let frame = composite(&s, &CompositeProperties::default());
    let v = serde_json::to_value(&frame).unwrap();
    assert_eq!(v["sceneId"], "a");
    assert_eq!(v["ops"][0]["op"], "source");
    assert_eq!(v["ops"][0]["source"]["kind"], "image");
    assert_eq!(v["ops"][3]["mode"], "Normal");
    let back: CompositeFrame = serde_json::from_value(v).unwrap();
    assert_eq!(back, frame);
}
