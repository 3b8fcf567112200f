
use std::collections::HashMap;

// --- Count amino-acid occurrences of a sequence into an abundance map --- //
pub fn parse_aa_composition(sequence: &str) -> HashMap<char, f32> {
    let mut aa_count_by_char: HashMap<char, i32> = HashMap::new();

    for aa in sequence.chars().filter(|c| !c.is_whitespace()) {
        let counter = aa_count_by_char.entry(aa).or_insert(0);
        *counter += 1;
    }

    aa_count_by_char.into_iter().map(|e| (e.0, e.1 as f32)).collect()
}
