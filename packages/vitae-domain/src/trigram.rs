use std::collections::HashSet;

/// Normalized trigram-overlap similarity in [0, 1], pg_trgm style: the input is
/// lowercased, split on non-alphanumeric characters, and each word is padded
/// with two leading and one trailing space before trigram extraction. The score
/// is |shared| / |union| over the two trigram sets.
pub fn similarity(a: &str, b: &str) -> f32 {
	let left = trigrams(a);
	let right = trigrams(b);

	if left.is_empty() || right.is_empty() {
		return 0.0;
	}

	let shared = left.intersection(&right).count();
	let union = left.union(&right).count();

	if union == 0 { 0.0 } else { shared as f32 / union as f32 }
}

fn trigrams(text: &str) -> HashSet<[char; 3]> {
	let mut out = HashSet::new();

	for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
		if word.is_empty() {
			continue;
		}

		let mut padded: Vec<char> = Vec::with_capacity(word.chars().count() + 3);

		padded.push(' ');
		padded.push(' ');
		padded.extend(word.chars());
		padded.push(' ');

		for window in padded.windows(3) {
			out.insert([window[0], window[1], window[2]]);
		}
	}

	out
}
