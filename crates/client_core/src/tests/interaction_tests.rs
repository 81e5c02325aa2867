use super::*;

use crate::geometry::ScreenRect;

/// One screen pixel per semantic pixel, surface at the origin, 256x512 panel.
fn unscaled() -> CoordinateMapping {
    CoordinateMapping::for_composite(768, 512, ScreenRect::new(0.0, 0.0, 768.0, 512.0))
}

fn gesture(
    translator: &mut InteractionTranslator,
    mapping: &CoordinateMapping,
    from: (f32, f32),
    to: (f32, f32),
) -> Option<Prompt> {
    translator.pointer_down(
        InteractionMode::Interactive,
        Some(mapping),
        ScreenPoint::new(from.0, from.1),
    );
    translator.pointer_up(
        InteractionMode::Interactive,
        Some(mapping),
        ScreenPoint::new(to.0, to.1),
        PromptLabel::Foreground,
    )
}

#[test]
fn short_gesture_is_point_at_press_position() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    let prompt = gesture(&mut translator, &mapping, (40.4, 50.6), (46.0, 57.0));

    assert_eq!(
        prompt,
        Some(Prompt::Point {
            x: 40,
            y: 51,
            label: PromptLabel::Foreground
        })
    );
    assert!(!translator.is_active());
}

#[test]
fn near_threshold_gestures_never_become_boxes() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    for (dx, dy) in [(9.99_f32, 0.0_f32), (0.0, 9.9), (7.0, 7.0), (-6.0, -7.9)] {
        let prompt = gesture(&mut translator, &mapping, (100.0, 100.0), (100.0 + dx, 100.0 + dy));
        assert!(
            matches!(prompt, Some(Prompt::Point { x: 100, y: 100, .. })),
            "offset ({dx}, {dy}) produced {prompt:?}"
        );
    }
}

#[test]
fn long_gesture_is_normalized_box() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    let prompt = gesture(&mut translator, &mapping, (80.0, 80.0), (20.0, 40.0));

    assert_eq!(
        prompt,
        Some(Prompt::Box {
            x1: 20,
            y1: 40,
            x2: 80,
            y2: 80,
            label: PromptLabel::Foreground
        })
    );
}

#[test]
fn exactly_threshold_distance_is_a_box() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    let prompt = gesture(&mut translator, &mapping, (10.0, 10.0), (20.0, 10.0));

    assert!(matches!(prompt, Some(Prompt::Box { x1: 10, x2: 20, .. })));
}

#[test]
fn threshold_applies_in_semantic_space() {
    // Half-size display: 6 screen pixels span 12 semantic pixels.
    let mapping =
        CoordinateMapping::for_composite(768, 512, ScreenRect::new(0.0, 0.0, 384.0, 256.0));
    let mut translator = InteractionTranslator::new();

    let prompt = gesture(&mut translator, &mapping, (10.0, 10.0), (16.0, 10.0));

    assert_eq!(
        prompt,
        Some(Prompt::Box {
            x1: 20,
            y1: 20,
            x2: 32,
            y2: 20,
            label: PromptLabel::Foreground
        })
    );
}

#[test]
fn uses_selected_label() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();
    translator.pointer_down(
        InteractionMode::Interactive,
        Some(&mapping),
        ScreenPoint::new(5.0, 5.0),
    );
    let prompt = translator.pointer_up(
        InteractionMode::Interactive,
        Some(&mapping),
        ScreenPoint::new(5.0, 5.0),
        PromptLabel::Background,
    );
    assert_eq!(prompt.map(|p| p.label()), Some(PromptLabel::Background));
}

#[test]
fn release_without_press_is_noop() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    let prompt = translator.pointer_up(
        InteractionMode::Interactive,
        Some(&mapping),
        ScreenPoint::new(5.0, 5.0),
        PromptLabel::Foreground,
    );

    assert_eq!(prompt, None);
}

#[test]
fn pointer_events_ignored_outside_interactive_mode() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    translator.pointer_down(InteractionMode::Text, Some(&mapping), ScreenPoint::new(5.0, 5.0));

    assert!(!translator.is_active());
}

#[test]
fn mode_switch_mid_gesture_discards_it() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();
    translator.pointer_down(
        InteractionMode::Interactive,
        Some(&mapping),
        ScreenPoint::new(5.0, 5.0),
    );

    let prompt = translator.pointer_up(
        InteractionMode::Text,
        Some(&mapping),
        ScreenPoint::new(90.0, 90.0),
        PromptLabel::Foreground,
    );

    assert_eq!(prompt, None);
    assert!(!translator.is_active());
}

#[test]
fn press_before_first_frame_is_ignored() {
    let mut translator = InteractionTranslator::new();
    translator.pointer_down(InteractionMode::Interactive, None, ScreenPoint::new(5.0, 5.0));
    assert!(!translator.is_active());
}

#[test]
fn release_outside_surface_is_clamped_to_panel() {
    let mapping = unscaled();
    let mut translator = InteractionTranslator::new();

    let prompt = gesture(&mut translator, &mapping, (250.0, 500.0), (420.0, 700.0));

    assert_eq!(
        prompt,
        Some(Prompt::Box {
            x1: 250,
            y1: 500,
            x2: 256,
            y2: 512,
            label: PromptLabel::Foreground
        })
    );
}
