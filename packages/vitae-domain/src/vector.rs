/// Norm floor below which cosine similarity degrades to 0.0 instead of
/// dividing by a near-zero magnitude.
pub const EPSILON: f32 = 1e-10;

/// Cosine similarity between two equal-length vectors. Mismatched lengths and
/// degenerate (near-zero norm) vectors score 0.0 rather than failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b.iter()) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	let norm_a = norm_a.sqrt();
	let norm_b = norm_b.sqrt();

	if norm_a < EPSILON || norm_b < EPSILON {
		return 0.0;
	}

	dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parallel_vectors_score_one() {
		let score = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);

		assert!((score - 1.0).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_vectors_score_zero() {
		let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);

		assert!(score.abs() < 1e-6);
	}

	#[test]
	fn zero_norm_scores_zero_instead_of_failing() {
		assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
		assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
	}

	#[test]
	fn mismatched_lengths_score_zero() {
		assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
	}
}
