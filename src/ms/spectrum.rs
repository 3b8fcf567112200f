
use anyhow::*;
use serde::{Deserialize, Serialize};

/// Sorted, binary-searchable index over the (m/z, intensity) peak pairs of
/// one spectrum. Peaks are stored in ascending m/z order; the original
/// input order is not preserved.
#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct SpectrumIndex {
    mz_list: Vec<f64>,
    intensity_list: Vec<f32>,
}

impl SpectrumIndex {
    pub fn new(mz_list: Vec<f64>, intensity_list: Vec<f32>) -> Result<SpectrumIndex> {
        if mz_list.len() != intensity_list.len() {
            bail!(
                "mz and intensity lists have different lengths ({} vs {})",
                mz_list.len(),
                intensity_list.len()
            )
        }
        if mz_list.iter().any(|mz| !mz.is_finite()) {
            bail!("m/z values must be finite numbers")
        }

        let mut order: Vec<usize> = (0..mz_list.len()).collect();
        order.sort_by(|&a, &b| {
            mz_list[a].partial_cmp(&mz_list[b]).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(SpectrumIndex {
            mz_list: order.iter().map(|&i| mz_list[i]).collect(),
            intensity_list: order.iter().map(|&i| intensity_list[i]).collect(),
        })
    }

    pub fn peak_count(&self) -> usize {
        self.mz_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz_list.is_empty()
    }

    pub fn mz(&self, peak_idx: usize) -> f64 {
        self.mz_list[peak_idx]
    }

    pub fn intensity(&self, peak_idx: usize) -> f32 {
        self.intensity_list[peak_idx]
    }

    pub fn mz_list(&self) -> &[f64] {
        &self.mz_list
    }

    pub fn intensity_list(&self) -> &[f32] {
        &self.intensity_list
    }

    pub fn max_mz(&self) -> f64 {
        self.mz_list.last().copied().unwrap_or(0.0)
    }

    /// Indices of every peak whose m/z lies within +/- tol_da of target_mz.
    pub fn matching_peak_indices(&self, target_mz: f64, tol_da: f64) -> std::ops::Range<usize> {
        let lo = self.mz_list.partition_point(|&mz| mz < target_mz - tol_da);
        let hi = self.mz_list.partition_point(|&mz| mz <= target_mz + tol_da);
        lo..hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peaks_are_sorted_on_construction() {
        let index = SpectrumIndex::new(vec![300.0, 100.0, 200.0], vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(index.mz_list(), &[100.0, 200.0, 300.0]);
        assert_eq!(index.intensity_list(), &[1.0, 2.0, 3.0]);
        assert_eq!(index.max_mz(), 300.0);
    }

    #[test]
    fn window_query_returns_all_peaks_in_tolerance() {
        let index = SpectrumIndex::new(
            vec![100.0, 100.01, 100.05, 200.0],
            vec![1.0, 2.0, 3.0, 4.0],
        ).unwrap();

        let hits: Vec<usize> = index.matching_peak_indices(100.0, 0.02).collect();
        assert_eq!(hits, vec![0, 1]);

        assert!(index.matching_peak_indices(150.0, 0.02).is_empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(SpectrumIndex::new(vec![100.0], vec![]).is_err());
    }
}
