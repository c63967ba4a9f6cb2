//! Properties that must hold for every built tree and every view over it
use ai_session_viewer::content::{ExtractMode, extract};
use ai_session_viewer::models::MessageKind;
use ai_session_viewer::view::filter_by_level;
use ai_session_viewer::{ConversationTree, Record, Role, ViewLevel, build_tree};
use chrono::DateTime;
use serde_json::json;

/// Small deterministic generator so the shapes vary without a dependency
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn random_records(seed: u64, count: usize) -> Vec<Record> {
    let mut rng = Lcg(seed);
    let roles = [Role::User, Role::Assistant, Role::System, Role::Tool];

    (0..count)
        .map(|i| {
            let role = roles[rng.below(4) as usize];
            let ts = DateTime::from_timestamp(1_700_000_000 + rng.below(10_000) as i64, 0).unwrap();
            let mut record = Record::new(format!("r{}", i), role, format!("text {}", i), ts);

            record = match rng.below(6) {
                // root
                0 => record,
                // dangling
                1 => record.with_parent("missing"),
                // any id, including forward references, self and cycles
                _ => record.with_parent(format!("r{}", rng.below(count as u64))),
            };
            if role == Role::Assistant && rng.below(3) == 0 {
                record = record.with_kind(MessageKind::Thinking);
            }
            if rng.below(4) == 0 {
                record = record.with_thread(format!("t{}", rng.below(3)));
            }
            record
        })
        .collect()
}

fn subtree_total(tree: &ConversationTree) -> usize {
    tree.root_ids().iter().map(|&root| tree.subtree_size(root)).sum()
}

#[test]
fn test_subtree_sizes_cover_every_record() {
    for seed in 0..50 {
        let records = random_records(seed, 60);
        let tree = build_tree(records);

        assert_eq!(tree.total_count(), 60, "seed {}", seed);
        assert_eq!(subtree_total(&tree), 60, "seed {}", seed);
        assert_eq!(tree.depth_first().len(), 60, "seed {}", seed);
    }
}

#[test]
fn test_depths_match_parent_links() {
    for seed in 0..20 {
        let tree = build_tree(random_records(seed, 40));
        for node in tree.nodes() {
            match node.parent() {
                Some(parent) => assert_eq!(node.depth(), tree.node(parent).depth() + 1),
                None => assert_eq!(node.depth(), 0),
            }
        }
    }
}

#[test]
fn test_view_levels_are_monotonic() {
    for seed in 0..50 {
        let tree = build_tree(random_records(seed, 80));
        let full = filter_by_level(&tree, ViewLevel::Full).len();
        let clean = filter_by_level(&tree, ViewLevel::CleanFlow).len();
        let qa = filter_by_level(&tree, ViewLevel::QaPairs).len();

        assert!(qa <= clean, "seed {}: {} > {}", seed, qa, clean);
        assert!(clean <= full, "seed {}: {} > {}", seed, clean, full);
        assert_eq!(full, tree.total_count());
    }
}

#[test]
fn test_filtering_leaves_tree_untouched() {
    let tree = build_tree(random_records(7, 30));
    let before: Vec<(String, usize)> =
        tree.nodes().iter().map(|n| (n.record_id().to_string(), n.depth())).collect();

    for level in ViewLevel::ALL {
        let _ = filter_by_level(&tree, level);
    }

    let after: Vec<(String, usize)> =
        tree.nodes().iter().map(|n| (n.record_id().to_string(), n.depth())).collect();
    assert_eq!(before, after);
}

#[test]
fn test_qa_pairing_example() {
    let t = |s| DateTime::from_timestamp(s, 0).unwrap();
    let tree = build_tree(vec![
        Record::new("Q1", Role::User, "Q1", t(1)),
        Record::new("think", Role::Assistant, "considering", t(2))
            .with_parent("Q1")
            .with_kind(MessageKind::Thinking),
        Record::new("A1", Role::Assistant, "A1", t(3)).with_parent("think"),
        Record::new("Q2", Role::User, "Q2", t(4)).with_parent("A1"),
    ]);

    let view = filter_by_level(&tree, ViewLevel::QaPairs);
    let pairs: Vec<(String, Option<String>)> = view
        .qa_pairs()
        .unwrap()
        .iter()
        .map(|pair| {
            let record = pair.to_records(&tree);
            (record.question.id, record.answer.map(|a| a.id))
        })
        .collect();

    assert_eq!(pairs, vec![("Q1".to_string(), Some("A1".to_string())), ("Q2".to_string(), None)]);
}

#[test]
fn test_extract_is_pure() {
    let samples = [
        json!("plain\\ntext"),
        json!({"content": [{"type": "text", "text": "a"}, {"type": "image"}]}),
        json!({"content": "nested"}),
        json!({"text": "assistant"}),
        json!({"unexpected": [1, 2, 3]}),
        json!(42),
    ];

    for sample in &samples {
        for mode in [ExtractMode::Extracted, ExtractMode::Raw] {
            let first = extract(sample, Role::Assistant, mode);
            let second = extract(sample, Role::Assistant, mode);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_unrecognized_content_still_renders() {
    let t = DateTime::from_timestamp(0, 0).unwrap();
    let tree = build_tree(vec![Record::new("x", Role::User, json!({"unexpected": true}), t)]);

    let text = tree.nodes()[0].extracted_full_text();
    assert!(text.contains("unexpected"));
}
