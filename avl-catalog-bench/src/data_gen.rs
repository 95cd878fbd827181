//! Data generators for benchmarks

use avl_catalog::tree::AvlTree;
use avl_catalog::Entry;
use fake::faker::filesystem::en::FileName;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

const LABELS: [&str; 8] = ["Cat", "Dog", "Horse", "Human", "Car", "Bike", "Flower", "Fruit"];

/// Generate `count` entries with unique keys in random order
pub fn generate_entries(count: usize) -> Vec<Entry> {
    let mut rng = rand::thread_rng();
    let mut entries: Vec<Entry> = (0..count)
        .map(|i| {
            let name: String = FileName().fake();
            let label = LABELS[rng.gen_range(0..LABELS.len())];
            let size: u64 = rng.gen_range(1..5_000_000);
            Entry::new(format!("{:07}_{}", i, name), label, size)
        })
        .collect();
    entries.shuffle(&mut rng);
    entries
}

/// Generate entries whose keys arrive in ascending order, the worst case
/// for an unbalanced tree
pub fn generate_sorted_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| Entry::new(format!("frame_{:07}.png", i), "Human", (i as u64 + 1) * 1024))
        .collect()
}

/// Build a tree from the given entries
pub fn build_tree(entries: &[Entry]) -> AvlTree {
    let mut tree = AvlTree::new();
    for entry in entries {
        if let Err(e) = tree.insert_entry(entry.clone()) {
            log::warn!("Skipping {}: {}", entry.key(), e);
        }
    }
    tree
}
