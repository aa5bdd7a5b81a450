//! Suffix array construction
//!
//! Builds the suffix array of the flattened corpus buffer with SA-IS
//! (suffix array induced sorting, Nong/Zhang/Chan 2009): O(N) time and
//! space, which keeps index builds linear even for corpora of tens of
//! millions of bytes.
//!
//! A virtual sentinel (strictly smaller than every byte) is appended
//! internally, so a suffix that is a strict prefix of another sorts first.
//! The sentinel's own slot is stripped from the result: the returned array
//! is a permutation of `[0, N)`.

use super::types::SuffixEntry;

const EMPTY: usize = usize::MAX;

/// Build the suffix array of `text`: a permutation of `[0, N)` such that
/// `text[sa[i]..]` is lexicographically non-decreasing in `i`.
///
/// # Panics
///
/// Panics if `text` exceeds `u32::MAX` bytes; callers bound the corpus
/// size before construction.
pub fn suffix_array(text: &[u8]) -> Vec<SuffixEntry> {
    assert!(
        text.len() <= u32::MAX as usize,
        "corpus too large for u32 suffix entries"
    );

    if text.is_empty() {
        return Vec::new();
    }

    // Shift bytes to 1..=256 so symbol 0 is free for the sentinel.
    let mut s: Vec<u32> = Vec::with_capacity(text.len() + 1);
    s.extend(text.iter().map(|&b| b as u32 + 1));
    s.push(0);

    let sa = sais(&s, 257);

    // sa[0] is always the sentinel position; drop it.
    sa.into_iter()
        .skip(1)
        .map(|p| p as SuffixEntry)
        .collect()
}

/// Recursive SA-IS over an integer alphabet. `s` must end with a unique,
/// strictly smallest symbol (the sentinel).
fn sais(s: &[u32], alphabet: usize) -> Vec<usize> {
    let n = s.len();
    if n == 1 {
        return vec![0];
    }
    if n == 2 {
        // [x, sentinel] with sentinel < x.
        return vec![1, 0];
    }

    let stype = classify(s);
    let counts = symbol_counts(s, alphabet);
    let mut sa = vec![EMPTY; n];

    // LMS positions in text order; text order is good enough for the
    // first, approximate induction pass.
    let lms_text: Vec<usize> = (1..n).filter(|&i| is_lms(&stype, i)).collect();

    place_lms(s, &mut sa, &counts, &lms_text);
    induce(s, &mut sa, &counts, &stype);

    // After induction the LMS suffixes appear in sorted order. Name their
    // substrings; equal neighbours share a name.
    let lms_induced: Vec<usize> = sa
        .iter()
        .copied()
        .filter(|&p| p != EMPTY && is_lms(&stype, p))
        .collect();

    let mut name_of = vec![0u32; n];
    let mut next_name = 0u32;
    let mut prev: Option<usize> = None;
    for &p in &lms_induced {
        if let Some(q) = prev {
            if !lms_substrings_equal(s, &stype, q, p) {
                next_name += 1;
            }
        }
        name_of[p] = next_name;
        prev = Some(p);
    }

    let reduced: Vec<u32> = lms_text.iter().map(|&p| name_of[p]).collect();
    let name_count = next_name as usize + 1;

    // Sort the reduced problem: recurse only while names collide.
    let reduced_sa: Vec<usize> = if name_count < reduced.len() {
        sais(&reduced, name_count)
    } else {
        let mut direct = vec![0usize; reduced.len()];
        for (i, &name) in reduced.iter().enumerate() {
            direct[name as usize] = i;
        }
        direct
    };

    // Final pass with the LMS suffixes in their true order.
    let lms_sorted: Vec<usize> = reduced_sa.iter().map(|&i| lms_text[i]).collect();
    place_lms(s, &mut sa, &counts, &lms_sorted);
    induce(s, &mut sa, &counts, &stype);

    sa
}

/// S/L classification; position `n - 1` (the sentinel) is S-type.
fn classify(s: &[u32]) -> Vec<bool> {
    let n = s.len();
    let mut stype = vec![false; n];
    stype[n - 1] = true;
    for i in (0..n - 1).rev() {
        stype[i] = s[i] < s[i + 1] || (s[i] == s[i + 1] && stype[i + 1]);
    }
    stype
}

#[inline]
fn is_lms(stype: &[bool], i: usize) -> bool {
    i > 0 && stype[i] && !stype[i - 1]
}

fn symbol_counts(s: &[u32], alphabet: usize) -> Vec<usize> {
    let mut counts = vec![0usize; alphabet];
    for &c in s {
        counts[c as usize] += 1;
    }
    counts
}

/// First free slot at the front of each symbol's bucket.
fn bucket_heads(counts: &[usize]) -> Vec<usize> {
    let mut heads = vec![0usize; counts.len()];
    let mut sum = 0;
    for (c, &count) in counts.iter().enumerate() {
        heads[c] = sum;
        sum += count;
    }
    heads
}

/// Last slot of each symbol's bucket (inclusive).
fn bucket_tails(counts: &[usize]) -> Vec<usize> {
    let mut tails = vec![0usize; counts.len()];
    let mut sum = 0;
    for (c, &count) in counts.iter().enumerate() {
        sum += count;
        tails[c] = sum.wrapping_sub(1);
    }
    tails
}

/// Scatter LMS suffixes into their bucket tails, smallest-last so earlier
/// entries of `lms` end up at lower slots within a bucket.
fn place_lms(s: &[u32], sa: &mut [usize], counts: &[usize], lms: &[usize]) {
    sa.fill(EMPTY);
    let mut tails = bucket_tails(counts);
    for &p in lms.iter().rev() {
        let c = s[p] as usize;
        sa[tails[c]] = p;
        tails[c] = tails[c].wrapping_sub(1);
    }
}

/// Induce L-type suffixes left-to-right, then S-type right-to-left.
fn induce(s: &[u32], sa: &mut [usize], counts: &[usize], stype: &[bool]) {
    let n = s.len();

    let mut heads = bucket_heads(counts);
    for i in 0..n {
        let j = sa[i];
        if j == EMPTY || j == 0 {
            continue;
        }
        let p = j - 1;
        if !stype[p] {
            let c = s[p] as usize;
            sa[heads[c]] = p;
            heads[c] += 1;
        }
    }

    let mut tails = bucket_tails(counts);
    for i in (0..n).rev() {
        let j = sa[i];
        if j == EMPTY || j == 0 {
            continue;
        }
        let p = j - 1;
        if stype[p] {
            let c = s[p] as usize;
            sa[tails[c]] = p;
            tails[c] = tails[c].wrapping_sub(1);
        }
    }
}

/// Compare the LMS substrings starting at `a` and `b` (each runs up to and
/// including the next LMS position).
fn lms_substrings_equal(s: &[u32], stype: &[bool], a: usize, b: usize) -> bool {
    let n = s.len();
    let mut k = 0;
    loop {
        let ca = if a + k < n { s[a + k] } else { u32::MAX };
        let cb = if b + k < n { s[b + k] } else { u32::MAX };
        if ca != cb {
            return false;
        }
        if k > 0 && is_lms(stype, a + k) && is_lms(stype, b + k) {
            return true;
        }
        if a + k >= n || b + k >= n {
            return false;
        }
        k += 1;
    }
}
