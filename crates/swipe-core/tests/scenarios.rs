//! Table-driven end-to-end scenarios (spec.md §8), run against the default
//! QWERTY fixture the spec describes: keyUnit=60, keyHeight=50, spacing=6,
//! row 0 = qwertyuiop, row 1 = asdfghjkl, row 2 = zxcvbnm.

use rstest::{fixture, rstest};
use swipe_core::layout::Layout;
use swipe_core::lexicon::Lexicon;
use swipe_core::mapper::map_path_to_sequence;
use swipe_types::Point;

#[fixture]
fn qwerty() -> Layout {
    Layout::from_json_str(
        r#"{
            "keyUnit": 60, "keyHeight": 50, "keySpacing": 6,
            "rows": [
                {"y": 0, "offset": 0, "keys": [
                    {"code": "q"}, {"code": "w"}, {"code": "e"}, {"code": "r"},
                    {"code": "t"}, {"code": "y"}, {"code": "u"}, {"code": "i"},
                    {"code": "o"}, {"code": "p"}
                ]},
                {"y": 1, "offset": 0.5, "keys": [
                    {"code": "a"}, {"code": "s"}, {"code": "d"}, {"code": "f"},
                    {"code": "g"}, {"code": "h"}, {"code": "j"}, {"code": "k"}, {"code": "l"}
                ]},
                {"y": 2, "offset": 1.5, "keys": [
                    {"code": "z"}, {"code": "x"}, {"code": "c"}, {"code": "v"},
                    {"code": "b"}, {"code": "n"}, {"code": "m"}
                ]}
            ]
        }"#,
    )
    .unwrap()
}

#[fixture]
fn dictionary() -> Lexicon {
    Lexicon::from_text("the\nhello\nhelp\nworld\n", None)
}

fn centroid(layout: &Layout, id: char) -> Point {
    layout.key(&id.to_string()).unwrap().centroid
}

#[rstest]
fn single_point_path_maps_to_one_key_but_yields_no_candidates(qwerty: Layout, dictionary: Lexicon) {
    let path = vec![Point::new(60.0, 25.0)];
    let seq = map_path_to_sequence(&path, &qwerty);
    assert_eq!(seq, vec!['q']);

    let candidates = swipe_core::candidates::generate_candidates(&seq, &dictionary, &qwerty, |_| 0.0);
    assert!(candidates.is_empty());
}

#[rstest]
fn clustered_samples_inside_one_keys_bounds_collapse_by_dwell(qwerty: Layout) {
    let path = vec![Point::new(60.0, 25.0), Point::new(61.0, 26.0), Point::new(62.0, 27.0), Point::new(63.0, 28.0)];
    assert_eq!(map_path_to_sequence(&path, &qwerty), vec!['q']);
}

#[rstest]
fn straight_swipe_along_the_top_row_emits_each_key_once(qwerty: Layout) {
    let letters = ['q', 'w', 'e', 'r', 't', 'y'];
    let path: Vec<Point> = letters.iter().map(|&c| centroid(&qwerty, c)).collect();
    assert_eq!(map_path_to_sequence(&path, &qwerty), letters.to_vec());
}

#[rstest]
fn exact_word_swipe_ranks_it_first_with_zero_edit_distance(qwerty: Layout, dictionary: Lexicon) {
    let letters = ['t', 'h', 'e'];
    let mut path: Vec<Point> = Vec::new();
    for &c in &letters {
        path.push(centroid(&qwerty, c));
        path.push(centroid(&qwerty, c)); // a couple of dwell samples per intended key
    }
    let seq = map_path_to_sequence(&path, &qwerty);
    assert_eq!(seq, vec!['t', 'h', 'e']);

    let candidates = swipe_core::candidates::generate_candidates(&seq, &dictionary, &qwerty, |_| 0.0);
    assert_eq!(candidates[0].word, "the");
    assert_eq!(candidates[0].edit_distance, 0);
}

#[rstest]
fn bounce_through_a_neighbor_for_a_single_sample_is_removed(qwerty: Layout) {
    let q = centroid(&qwerty, 'q');
    let w = centroid(&qwerty, 'w');
    let path = vec![q, q, w, q, q];
    assert_eq!(map_path_to_sequence(&path, &qwerty), vec!['q']);
}

#[rstest]
fn off_keyboard_samples_are_dropped_as_if_absent(qwerty: Layout) {
    let q = centroid(&qwerty, 'q');
    let w = centroid(&qwerty, 'w');

    let noisy = vec![q, q, Point::new(10_000.0, 10_000.0), w, w, w];
    let clean = vec![q, q, w, w, w];

    assert_eq!(map_path_to_sequence(&noisy, &qwerty), map_path_to_sequence(&clean, &qwerty));
}

#[rstest]
fn learning_boost_raises_a_committed_words_rank_without_disturbing_others(qwerty: Layout) {
    let lexicon = Lexicon::from_text("help\nhelm\nhelp2\n", None);
    let seq: Vec<char> = "hekp".chars().collect();

    let baseline = swipe_core::candidates::generate_candidates(&seq, &lexicon, &qwerty, |_| 0.0);
    let store = swipe_core::user_data::UserDataStore::empty();
    for _ in 0..5 {
        store.record_commit("help", Some("i"));
    }
    let boosted = swipe_core::candidates::generate_candidates(&seq, &lexicon, &qwerty, |w| {
        store.learning_boost(w, Some("i"))
    });

    let base_help = baseline.iter().find(|c| c.word == "help").unwrap().score;
    let boost_help = boosted.iter().find(|c| c.word == "help").unwrap().score;
    assert!(boost_help > base_help);

    // "helm"'s relative order vs. other unboosted candidates is unaffected.
    let base_helm = baseline.iter().position(|c| c.word == "helm");
    let boosted_without_help: Vec<&str> =
        boosted.iter().filter(|c| c.word != "help").map(|c| c.word.as_str()).collect();
    let baseline_without_help: Vec<&str> =
        baseline.iter().filter(|c| c.word != "help").map(|c| c.word.as_str()).collect();
    assert_eq!(boosted_without_help, baseline_without_help);
    let _ = base_helm;
}
