//! Word punch-out: replaces randomly chosen words with numbered sentinel tokens so the model
//! fills them in.

use rand::seq::index;
use rand::Rng;

/// Sentinel for the `n`-th masked position.
pub fn sentinel(n: usize) -> String {
    format!("<extra_id_{}>", n)
}

/// Replaces `count` distinct word positions of `text` with sentinels numbered in position order.
/// Words are whitespace-separated and rejoined with single spaces when anything is masked.
pub fn punch_out_words<R: Rng + ?Sized>(text: &str, count: usize, rng: &mut R) -> String {
    if count == 0 {
        return text.to_string();
    }
    let mut words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return text.to_string();
    }

    let amount = count.min(words.len());
    let mut positions = index::sample(rng, words.len(), amount).into_vec();
    positions.sort_unstable();

    let sentinels: Vec<String> = (0..positions.len()).map(sentinel).collect();
    for (n, pos) in positions.into_iter().enumerate() {
        words[pos] = &sentinels[n];
    }
    words.join(" ")
}

/// [`punch_out_words`] with the thread-local generator.
pub fn punch_out_random(text: &str, count: usize) -> String {
    punch_out_words(text, count, &mut rand::rng())
}
