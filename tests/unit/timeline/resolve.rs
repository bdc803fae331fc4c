use super::*;
use crate::project::dsl::scene;

fn equal_split() -> Vec<Scene> {
    vec![scene("a", "a.png"), scene("b", "b.png"), scene("c", "c.png")]
}

#[test]
fn equal_split_boundaries_are_inclusive_low() {
    let scenes = equal_split();
    assert_eq!(resolve_active_scene(&scenes, 30.0, 0.0), Some("a"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 9.999), Some("a"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 10.0), Some("b"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 15.0), Some("b"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 29.999), Some("c"));
}

#[test]
fn end_of_timeline_resolves_to_none() {
    let scenes = equal_split();
    assert_eq!(resolve_active_scene(&scenes, 30.0, 30.0), None);
}

#[test]
fn empty_scene_list_resolves_to_none() {
    assert_eq!(resolve_active_scene(&[], 30.0, 0.0), None);
}

#[test]
fn every_instant_before_the_end_resolves_to_a_member() {
    let scenes = equal_split();
    let mut t = 0.0;
    while t < 30.0 {
        let id = resolve_active_scene(&scenes, 30.0, t).unwrap();
        assert!(scenes.iter().any(|s| s.id == id));
        t += 0.37;
    }
}

#[test]
fn explicit_durations_override_equal_split() {
    let scenes = vec![
        scene("a", "a.png").with_duration(2.0),
        scene("b", "b.png"),
        scene("c", "c.png").with_duration(20.0),
    ];
    // b falls back to 30 / 3 = 10s.
    assert_eq!(resolve_active_scene(&scenes, 30.0, 1.5), Some("a"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 2.0), Some("b"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 11.9), Some("b"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 12.0), Some("c"));
    // Layout past the project duration is still resolvable.
    assert_eq!(resolve_active_scene(&scenes, 30.0, 31.0), Some("c"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 32.0), None);
}

#[test]
fn negative_time_resolves_to_none() {
    assert_eq!(resolve_active_scene(&equal_split(), 30.0, -0.1), None);
}

#[test]
fn reordering_moves_windows() {
    let mut scenes = equal_split();
    scenes.swap(0, 2);
    assert_eq!(resolve_active_scene(&scenes, 30.0, 0.0), Some("c"));
    assert_eq!(resolve_active_scene(&scenes, 30.0, 25.0), Some("a"));
}

#[test]
fn windows_agree_with_resolution() {
    let scenes = vec![
        scene("a", "a.png").with_duration(4.0),
        scene("b", "b.png"),
        scene("c", "c.png"),
    ];
    let windows = scene_windows(&scenes, 30.0);
    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0].1, TimeRange { start: 0.0, end: 4.0 });
    assert_eq!(windows[1].1, TimeRange { start: 4.0, end: 14.0 });
    for (id, w) in windows {
        assert_eq!(resolve_active_scene(&scenes, 30.0, w.start), Some(id));
    }
}

#[test]
fn effective_duration_falls_back_to_share() {
    let s = scene("a", "a.png");
    assert_eq!(effective_duration(&s, 30.0, 3), 10.0);
    assert_eq!(effective_duration(&s.with_duration(7.0), 30.0, 3), 7.0);
}

fn n_scenes(n: usize) -> Vec<Scene> {
    (0..n)
        .map(|i| scene(format!("s{i}"), format!("{i}.png")))
        .collect()
}

#[test]
fn equal_split_reaches_the_end_for_any_scene_count() {
    for n in [1, 2, 3, 6, 7, 9, 10, 11, 13] {
        let scenes = n_scenes(n);
        let last = scenes[n - 1].id.as_str();
        for duration in [1.0, 7.3, 10.0, 30.0, 123.456] {
            let just_before = f64::next_down(duration);
            assert_eq!(
                resolve_active_scene(&scenes, duration, just_before),
                Some(last),
                "n={n} duration={duration}"
            );
            assert_eq!(resolve_active_scene(&scenes, duration, duration), None);

            let windows = scene_windows(&scenes, duration);
            assert_eq!(windows[n - 1].1.end, duration, "n={n} duration={duration}");
            for pair in windows.windows(2) {
                assert_eq!(pair[0].1.end, pair[1].1.start);
            }
        }
    }
}
