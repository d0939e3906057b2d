//! Introsort over `usize` index arrays, with an overload that co-permutes
//! an associated `f64` array (used for CSR row sorting and small-k
//! candidate ranking in pricing). Quicksort with median-of-three pivot,
//! a depth bound of `2*floor(log2(n))` before falling back to heapsort,
//! and insertion sort below 16 elements. Not stable.

const INSERTION_THRESHOLD: usize = 16;

/// Sort `indices` ascending in place.
pub fn sort_indices(indices: &mut [usize]) {
    let mut values: Option<&mut [f64]> = None;
    introsort(indices, &mut values, depth_limit(indices.len()));
}

/// Sort `indices` ascending in place, co-permuting `values` the same way.
pub fn sort_indices_with_values(indices: &mut [usize], values: &mut [f64]) {
    debug_assert_eq!(indices.len(), values.len());
    let mut values = Some(values);
    introsort(indices, &mut values, depth_limit(indices.len()));
}

fn depth_limit(n: usize) -> u32 {
    if n < 2 {
        0
    } else {
        2 * (usize::BITS - 1 - n.leading_zeros())
    }
}

fn introsort(idx: &mut [usize], vals: &mut Option<&mut [f64]>, depth: u32) {
    let n = idx.len();
    if n <= 1 {
        return;
    }
    if n < INSERTION_THRESHOLD {
        insertion_sort(idx, vals);
        return;
    }
    if depth == 0 {
        heapsort(idx, vals);
        return;
    }

    let pivot = median_of_three(idx, vals);
    let mid = partition(idx, vals, pivot);
    let (left, right) = idx.split_at_mut(mid);
    match vals {
        Some(v) => {
            let (vl, vr) = v.split_at_mut(mid);
            let mut left_vals = Some(vl);
            let mut right_vals = Some(vr);
            introsort(left, &mut left_vals, depth - 1);
            introsort(right, &mut right_vals, depth - 1);
        }
        None => {
            let mut none = None;
            introsort(left, &mut none, depth - 1);
            introsort(right, &mut none, depth - 1);
        }
    }
}

fn swap(idx: &mut [usize], vals: &mut Option<&mut [f64]>, a: usize, b: usize) {
    idx.swap(a, b);
    if let Some(v) = vals {
        v.swap(a, b);
    }
}

fn median_of_three(idx: &[usize], _vals: &Option<&mut [f64]>) -> usize {
    let n = idx.len();
    let (a, b, c) = (idx[0], idx[n / 2], idx[n - 1]);
    if (a <= b && b <= c) || (c <= b && b <= a) {
        b
    } else if (b <= a && a <= c) || (c <= a && a <= b) {
        a
    } else {
        c
    }
}

/// Hoare partition by pivot value; returns a split point `mid` (always
/// `0 < mid < n`) such that `idx[..mid]` holds values `<= pivot` and
/// `idx[mid..]` holds values `>= pivot`.
fn partition(idx: &mut [usize], vals: &mut Option<&mut [f64]>, pivot: usize) -> usize {
    let n = idx.len() as isize;
    let mut i: isize = -1;
    let mut j: isize = n;
    loop {
        loop {
            i += 1;
            if idx[i as usize] >= pivot {
                break;
            }
        }
        loop {
            j -= 1;
            if idx[j as usize] <= pivot {
                break;
            }
        }
        if i >= j {
            return (j + 1).clamp(1, n - 1) as usize;
        }
        swap(idx, vals, i as usize, j as usize);
    }
}

fn insertion_sort(idx: &mut [usize], vals: &mut Option<&mut [f64]>) {
    let n = idx.len();
    for i in 1..n {
        let mut j = i;
        while j > 0 && idx[j - 1] > idx[j] {
            swap(idx, vals, j - 1, j);
            j -= 1;
        }
    }
}

fn heapsort(idx: &mut [usize], vals: &mut Option<&mut [f64]>) {
    let n = idx.len();
    for start in (0..n / 2).rev() {
        sift_down(idx, vals, start, n);
    }
    for end in (1..n).rev() {
        swap(idx, vals, 0, end);
        sift_down(idx, vals, 0, end);
    }
}

fn sift_down(idx: &mut [usize], vals: &mut Option<&mut [f64]>, start: usize, end: usize) {
    let mut root = start;
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && idx[child] < idx[child + 1] {
            child += 1;
        }
        if idx[root] >= idx[child] {
            break;
        }
        swap(idx, vals, root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_small_slice_via_insertion_path() {
        let mut v = vec![5, 3, 1, 4, 2];
        sort_indices(&mut v);
        assert_eq!(v, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sorts_large_slice_via_quicksort_path() {
        let mut v: Vec<usize> = (0..2000).rev().collect();
        sort_indices(&mut v);
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn co_permutes_values_with_indices() {
        let mut idx = vec![3usize, 1, 2];
        let mut vals = vec![30.0, 10.0, 20.0];
        sort_indices_with_values(&mut idx, &mut vals);
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(vals, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn adversarial_sizes_trigger_heapsort_fallback() {
        // many duplicates at varying sizes, including ones close to a
        // power of two to exercise depth-limit edge cases.
        for n in [16usize, 17, 31, 32, 33, 1000] {
            let mut v: Vec<usize> = (0..n).map(|i| (i * 37) % n).collect();
            sort_indices(&mut v);
            assert!(v.windows(2).all(|w| w[0] <= w[1]), "n={n} not sorted: {v:?}");
        }
    }
}
