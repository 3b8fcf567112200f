
use std::collections::{BTreeMap, HashMap};

use anyhow::*;
use bigdecimal::BigDecimal;
use itertools::Itertools;
use num_bigint::BigInt;

use crate::chemistry::model::{
    Modification, ModificationMatch, ModificationTable, Peptide, SequenceMatchingRule,
};
use crate::chemistry::table::AminoAcidTable;
use crate::ms::spectrum::SpectrumIndex;
use crate::msms::annotator::annotate_peptide;
use crate::msms::model::{
    get_ion_series_direction, FragmentIonSeries, FragmentIonSeriesDirection, IonKind, IonMatch,
};
use crate::msms::params::SpecificAnnotationParameters;
use crate::stats::binomial::{cumulative_tail_probability, minus_ten_log10, MathContext};

/// Score given to every site when the number of possible sites equals the
/// number of modification occurrences.
pub const SCORE_CERTAIN: f64 = 100.0;

const DEPTH_COUNT: usize = 10;
const DEPTH_WEIGHTS: [f64; DEPTH_COUNT] = [0.5, 0.75, 1.0, 1.0, 1.0, 1.0, 0.75, 0.5, 0.25, 0.25];
// canonical bin width of the intensity-depth spectrum reduction
const BIN_WIDTH_TOLERANCE_FACTOR: f64 = 20.0;

/// Binomial-statistics PTM-site localization. One engine can score any
/// number of peptide-spectrum pairings; each call is independent.
#[derive(Clone, Copy, Debug)]
pub struct AScoreEngine<'a> {
    aa_table: &'a AminoAcidTable,
    mod_table: &'a ModificationTable,
    ctx: MathContext,
}

impl<'a> AScoreEngine<'a> {
    pub fn new(
        aa_table: &'a AminoAcidTable,
        mod_table: &'a ModificationTable,
        ctx: MathContext,
    ) -> AScoreEngine<'a> {
        AScoreEngine {
            aa_table: aa_table,
            mod_table: mod_table,
            ctx: ctx,
        }
    }

    /// A-score per candidate site for a set of chemically
    /// indistinguishable modifications (same mass delta) carried by the
    /// peptide. Higher = more confidently localized; 0 means the site is
    /// indistinguishable from an alternative; only the best and
    /// second-best sites are reported unless every site is certain.
    pub fn estimate(
        &self,
        peptide: &Peptide,
        modifications: &[Modification],
        index: &SpectrumIndex,
        params: &SpecificAnnotationParameters,
        account_neutral_losses: bool,
        rule: SequenceMatchingRule,
    ) -> Result<HashMap<i32, f64>> {
        if modifications.is_empty() {
            bail!(
                "no modification given for site localization on peptide '{}'",
                peptide.sequence()
            )
        }

        let reference_mass = modifications[0].mono_mass;
        for modification in &modifications[1..] {
            if (modification.mono_mass - reference_mass).abs() > 1e-9 {
                bail!(
                    "modifications '{}' ({}) and '{}' ({}) have different masses and cannot be localized together",
                    modifications[0].name, reference_mass, modification.name, modification.mono_mass
                )
            }
        }

        let mod_names: Vec<&str> = modifications.iter().map(|m| m.name.as_str()).collect();
        let occurrence_count = peptide
            .modifications()
            .iter()
            .filter(|m| mod_names.contains(&m.mod_name.as_str()))
            .count();
        if occurrence_count == 0 {
            bail!(
                "modification '{}' does not occur on peptide '{}'",
                modifications[0].name, peptide.sequence()
            )
        }

        // candidate sites, deduplicated across the indistinguishable set
        let mut site_mod: HashMap<i32, &Modification> = HashMap::new();
        for modification in modifications {
            for site in peptide.potential_modification_sites(modification, rule) {
                site_mod.entry(site).or_insert(modification);
            }
        }
        let possible_sites: Vec<i32> = site_mod.keys().copied().sorted().collect();

        if possible_sites.len() < occurrence_count {
            bail!(
                "peptide '{}' carries {} occurrence(s) of '{}' but only {} possible site(s)",
                peptide.sequence(), occurrence_count, modifications[0].name, possible_sites.len()
            )
        }

        if possible_sites.len() == occurrence_count {
            log::debug!(
                "A-score: every site of '{}' is determined, no spectrum matching needed",
                peptide.sequence()
            );
            return Ok(possible_sites.into_iter().map(|site| (site, SCORE_CERTAIN)).collect());
        }

        // scoring runs on intensity-depth-filtered sub-spectra with the
        // modification placed singly at each candidate site
        let scoring_params = if account_neutral_losses {
            params.clone()
        } else {
            params.without_neutral_losses()
        };
        let tol_da = params.tolerance_in_daltons(index.max_mz());
        let depth_spectra = reduce_spectrum(index, BIN_WIDTH_TOLERANCE_FACTOR * tol_da)?;

        let no_mod_peptide = peptide.without_modifications(&mod_names);

        let mut position_scores: HashMap<i32, [f64; DEPTH_COUNT]> = HashMap::new();
        for &site in &possible_sites {
            let site_peptide = self.site_peptide(&no_mod_peptide, site, &site_mod)?;
            let mut scores = [0.0; DEPTH_COUNT];

            for depth_idx in 0..DEPTH_COUNT {
                let annotation = annotate_peptide(
                    &site_peptide,
                    &[],
                    &depth_spectra[depth_idx],
                    &scoring_params,
                    self.aa_table,
                    self.mod_table,
                )?;
                let n_total = annotation.theoretical_ions.len() as u64;
                let n_matched = count_distinct_fragment_matches(&annotation.matches) as u64;
                let prob = cumulative_tail_probability(n_total, n_matched, &depth_probability(depth_idx), self.ctx);
                scores[depth_idx] = minus_ten_log10(&prob);
            }

            position_scores.insert(site, scores);
        }

        // peptide-level score per site; (score, site) pairs are sorted
        // directly, sites break exact score ties deterministically
        let mut aggregated: Vec<(f64, i32)> = position_scores
            .iter()
            .map(|(&site, scores)| {
                let weighted = scores.iter().zip(DEPTH_WEIGHTS.iter()).map(|(s, w)| s * w).sum::<f64>();
                (weighted, site)
            })
            .collect();
        aggregated.sort_by(|a, b| {
            b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1))
        });

        let best_score = aggregated[0].0;
        let tied_best: Vec<i32> = aggregated
            .iter()
            .take_while(|(score, _)| *score == best_score)
            .map(|(_, site)| *site)
            .collect();

        if tied_best.len() == 1 {
            let best_site = tied_best[0];
            let second_site = aggregated.get(1).map(|(_, site)| *site).ok_or_else(|| {
                anyhow!(
                    "no secondary site found for '{}' on peptide '{}'",
                    modifications[0].name, peptide.sequence()
                )
            })?;

            let depth_idx = best_discriminating_depth(&position_scores, best_site, second_site);
            log::debug!(
                "A-score: comparing sites {} and {} of '{}' at peak depth {}",
                best_site, second_site, peptide.sequence(), depth_idx + 1
            );

            let (s_best, s_second) = self.pairwise_scores(
                &no_mod_peptide, &site_mod, best_site, second_site,
                depth_idx, &depth_spectra, &scoring_params,
            )?;
            Ok(resolve_pair(best_site, s_best, second_site, s_second))
        } else {
            // several sites tie for best: keep the pair that is hardest
            // to distinguish (lowest confidence difference)
            log::debug!(
                "A-score: {} sites tie for best on '{}'",
                tied_best.len(), peptide.sequence()
            );

            let mut kept: Option<(f64, HashMap<i32, f64>)> = None;
            for (&site_a, &site_b) in tied_best.iter().tuple_combinations() {
                let depth_idx = best_discriminating_depth(&position_scores, site_a, site_b);
                let (s_a, s_b) = self.pairwise_scores(
                    &no_mod_peptide, &site_mod, site_a, site_b,
                    depth_idx, &depth_spectra, &scoring_params,
                )?;
                let confidence_diff = (s_a - s_b).abs();

                let replace = match &kept {
                    None => true,
                    Some((min_diff, _)) => confidence_diff < *min_diff,
                };
                if replace {
                    kept = Some((confidence_diff, resolve_pair(site_a, s_a, site_b, s_b)));
                }
            }

            kept.map(|(_, result)| result).ok_or_else(|| {
                anyhow!(
                    "no secondary site found for '{}' on peptide '{}'",
                    modifications[0].name, peptide.sequence()
                )
            })
        }
    }

    fn site_peptide(
        &self,
        no_mod_peptide: &Peptide,
        site: i32,
        site_mod: &HashMap<i32, &Modification>,
    ) -> Result<Peptide> {
        let modification = site_mod
            .get(&site)
            .ok_or_else(|| anyhow!("no modification candidate for site {}", site))?;
        no_mod_peptide.with_added_modification(ModificationMatch::new(&modification.name, site))
    }

    /// Binomial test for two competing sites restricted to the
    /// site-determining ions: cleavages separating the two candidates at
    /// the given peak depth.
    fn pairwise_scores(
        &self,
        no_mod_peptide: &Peptide,
        site_mod: &HashMap<i32, &Modification>,
        site_a: i32,
        site_b: i32,
        depth_idx: usize,
        depth_spectra: &[SpectrumIndex],
        params: &SpecificAnnotationParameters,
    ) -> Result<(f64, f64)> {
        let seq_len = no_mod_peptide.length() as i32;
        let low = site_a.min(site_b);
        let high = site_a.max(site_b);
        // cleavage c separates the sites iff low <= c <= high-1, clamped
        // to the valid cleavage range
        let c_lo = low.max(1);
        let c_hi = (high - 1).min(seq_len - 1);

        let p = depth_probability(depth_idx);
        let mut scores = [0.0f64; 2];

        for (slot, site) in [site_a, site_b].into_iter().enumerate() {
            let site_peptide = self.site_peptide(no_mod_peptide, site, site_mod)?;
            let annotation = annotate_peptide(
                &site_peptide, &[], &depth_spectra[depth_idx], params, self.aa_table, self.mod_table,
            )?;

            let determining = |series: FragmentIonSeries, number: i32| {
                let cleavage = match get_ion_series_direction(series) {
                    FragmentIonSeriesDirection::FORWARD => number,
                    _ => seq_len - number,
                };
                cleavage >= c_lo && cleavage <= c_hi
            };

            let n_total = annotation
                .theoretical_ions
                .iter()
                .filter(|ion| determining(ion.series, ion.number))
                .count() as u64;
            let n_matched = annotation
                .matches
                .iter()
                .filter_map(|m| match &m.ion {
                    IonKind::Fragment { series, number, neutral_loss }
                        if determining(*series, *number) =>
                    {
                        Some((*series, *number, *neutral_loss, m.charge))
                    }
                    _ => None,
                })
                .unique()
                .count() as u64;

            let prob = cumulative_tail_probability(n_total, n_matched, &p, self.ctx);
            scores[slot] = minus_ten_log10(&prob);
        }

        Ok((scores[0], scores[1]))
    }
}

/// The binomial success probability of peak depth k+1 is (k+1) percent.
fn depth_probability(depth_idx: usize) -> BigDecimal {
    BigDecimal::new(BigInt::from(depth_idx as u64 + 1), 2)
}

/// Matched theoretical ions, ignoring duplicate peaks assigned to the
/// same ion.
fn count_distinct_fragment_matches(matches: &[IonMatch]) -> usize {
    matches
        .iter()
        .filter_map(|m| match &m.ion {
            IonKind::Fragment { series, number, neutral_loss } => {
                Some((*series, *number, *neutral_loss, m.charge))
            }
            IonKind::Reporter { .. } => None,
        })
        .unique()
        .count()
}

fn best_discriminating_depth(
    position_scores: &HashMap<i32, [f64; DEPTH_COUNT]>,
    site_a: i32,
    site_b: i32,
) -> usize {
    let scores_a = &position_scores[&site_a];
    let scores_b = &position_scores[&site_b];

    let mut best_idx = 0;
    let mut best_diff = -1.0f64;
    for idx in 0..DEPTH_COUNT {
        let diff = (scores_a[idx] - scores_b[idx]).abs();
        if diff > best_diff {
            best_diff = diff;
            best_idx = idx;
        }
    }
    best_idx
}

fn resolve_pair(site_a: i32, score_a: f64, site_b: i32, score_b: f64) -> HashMap<i32, f64> {
    let mut result = HashMap::new();
    if score_a > score_b {
        result.insert(site_a, score_a - score_b);
        result.insert(site_b, 0.0);
    } else if score_b > score_a {
        result.insert(site_b, score_b - score_a);
        result.insert(site_a, 0.0);
    } else {
        result.insert(site_a, 0.0);
        result.insert(site_b, 0.0);
    }
    result
}

/// Intensity-depth spectrum reduction: the m/z range is partitioned into
/// bins of the given width; the depth-k sub-spectrum keeps the k+1 most
/// intense peaks of every bin, for k = 0..9.
fn reduce_spectrum(index: &SpectrumIndex, bin_width: f64) -> Result<Vec<SpectrumIndex>> {
    if bin_width <= 0.0 {
        bail!("spectrum reduction bin width must be strictly positive, got {}", bin_width)
    }

    let mut peaks_by_bin: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for peak_idx in 0..index.peak_count() {
        let bin = (index.mz(peak_idx) / bin_width).floor() as i64;
        peaks_by_bin.entry(bin).or_default().push(peak_idx);
    }
    for ranked in peaks_by_bin.values_mut() {
        ranked.sort_by(|&a, &b| {
            index.intensity(b).partial_cmp(&index.intensity(a)).unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    (0..DEPTH_COUNT)
        .map(|depth_idx| {
            let mut mz_list = Vec::new();
            let mut intensity_list = Vec::new();
            for ranked in peaks_by_bin.values() {
                for &peak_idx in ranked.iter().take(depth_idx + 1) {
                    mz_list.push(index.mz(peak_idx));
                    intensity_list.push(index.intensity(peak_idx));
                }
            }
            SpectrumIndex::new(mz_list, intensity_list)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::model::PtmLocation;
    use crate::chemistry::table::STANDARD_AMINO_ACID_TABLE;
    use crate::ms::utils::MassTolUnit;
    use crate::msms::annotator::FragmentAnnotator;
    use crate::msms::fragmentation::SeriesPair;
    use crate::msms::neutral_loss::NeutralLossesMap;
    use crate::msms::params::SeriesSelection;
    use FragmentIonSeries::{b, y};

    fn phospho() -> Modification {
        Modification::new("Phospho-S", Some("p"), 79.96633052075, PtmLocation::ANYWHERE, Some('S')).unwrap()
    }

    fn mod_table() -> ModificationTable {
        ModificationTable::new(vec![phospho()]).unwrap()
    }

    fn by_params() -> SpecificAnnotationParameters {
        SpecificAnnotationParameters::new(
            2, vec![b, y], vec![1], NeutralLossesMap::new(), 0.02, MassTolUnit::Da,
        ).unwrap()
    }

    fn engine(table: &ModificationTable) -> AScoreEngine<'_> {
        AScoreEngine::new(&STANDARD_AMINO_ACID_TABLE, table, MathContext::default())
    }

    #[test]
    fn certain_sites_score_100_without_spectrum_matching() {
        let table = mod_table();
        let peptide = Peptide::new("SASA", vec![
            ModificationMatch::new("Phospho-S", 1),
            ModificationMatch::new("Phospho-S", 3),
        ]).unwrap();
        // empty spectrum: matching would yield nothing, scores come from
        // the certain-site short-circuit alone
        let index = SpectrumIndex::new(vec![], vec![]).unwrap();

        let scores = engine(&table)
            .estimate(&peptide, &[phospho()], &index, &by_params(), false, SequenceMatchingRule::CHAR_IDENTICAL)
            .unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[&1], SCORE_CERTAIN);
        assert_eq!(scores[&3], SCORE_CERTAIN);
    }

    #[test]
    fn indistinguishable_sites_all_score_zero() {
        let table = mod_table();
        let peptide = Peptide::new("SASAS", vec![ModificationMatch::new("Phospho-S", 1)]).unwrap();
        // no peak distinguishes any site
        let index = SpectrumIndex::new(vec![], vec![]).unwrap();

        let scores = engine(&table)
            .estimate(&peptide, &[phospho()], &index, &by_params(), false, SequenceMatchingRule::CHAR_IDENTICAL)
            .unwrap();

        assert_eq!(scores.len(), 2);
        for score in scores.values() {
            assert_eq!(*score, 0.0);
        }
    }

    #[test]
    fn discriminating_peaks_pick_the_right_site() {
        let table = mod_table();
        // S at positions 2 and 6, one phospho carried at position 2
        let peptide = Peptide::new("ASAAASAA", vec![ModificationMatch::new("Phospho-S", 2)]).unwrap();

        // spectrum = the b3 and b4 ions of the site-2 phospho-form; both
        // carry the +80 shift, so the site-6 form matches nothing
        let selection = SeriesSelection {
            pair: SeriesPair { forward: b, complementary: y },
            compute_forward: true,
            compute_complementary: true,
        };
        let annotator = FragmentAnnotator::new(
            &peptide, &[], selection, &STANDARD_AMINO_ACID_TABLE, &table,
        ).unwrap();
        let b3 = annotator.forward_mz_ladder()[2];
        let b4 = annotator.forward_mz_ladder()[3];
        let index = SpectrumIndex::new(vec![b3, b4], vec![100.0, 90.0]).unwrap();

        let scores = engine(&table)
            .estimate(&peptide, &[phospho()], &index, &by_params(), false, SequenceMatchingRule::CHAR_IDENTICAL)
            .unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores[&2] > 0.0, "supported site should win: {:?}", scores);
        assert_eq!(scores[&6], 0.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let table = mod_table();
        let index = SpectrumIndex::new(vec![], vec![]).unwrap();
        let eng = engine(&table);
        let rule = SequenceMatchingRule::CHAR_IDENTICAL;

        // no modification given
        let peptide = Peptide::new("SASA", vec![ModificationMatch::new("Phospho-S", 1)]).unwrap();
        assert!(eng.estimate(&peptide, &[], &index, &by_params(), false, rule).is_err());

        // modification not carried by the peptide
        let bare = Peptide::new("SASA", vec![]).unwrap();
        assert!(eng.estimate(&bare, &[phospho()], &index, &by_params(), false, rule).is_err());

        // more occurrences than possible sites
        let overloaded = Peptide::new("SAAA", vec![
            ModificationMatch::new("Phospho-S", 1),
            ModificationMatch::new("Phospho-S", 2),
        ]).unwrap();
        assert!(eng.estimate(&overloaded, &[phospho()], &index, &by_params(), false, rule).is_err());

        // mixed-mass modification sets cannot be localized together
        let heavy = Modification::new("Heavy", None, 42.0, PtmLocation::ANYWHERE, Some('S')).unwrap();
        let both = ModificationTable::new(vec![phospho(), heavy.clone()]).unwrap();
        let eng2 = AScoreEngine::new(&STANDARD_AMINO_ACID_TABLE, &both, MathContext::default());
        assert!(eng2.estimate(&peptide, &[phospho(), heavy], &index, &by_params(), false, rule).is_err());
    }

    #[test]
    fn spectrum_reduction_keeps_top_peaks_per_bin() {
        // bin width 10: peaks 100.0/101.0/102.0 share a bin, 150.0 is alone
        let index = SpectrumIndex::new(
            vec![100.0, 101.0, 102.0, 150.0],
            vec![5.0, 50.0, 20.0, 7.0],
        ).unwrap();

        let reduced = reduce_spectrum(&index, 10.0).unwrap();
        assert_eq!(reduced.len(), DEPTH_COUNT);

        // depth 1: only the most intense peak of each bin
        assert_eq!(reduced[0].mz_list(), &[101.0, 150.0]);
        // depth 2: second-ranked peak joins
        assert_eq!(reduced[1].mz_list(), &[101.0, 102.0, 150.0]);
        // depth 10: everything
        assert_eq!(reduced[9].peak_count(), 4);
    }
}
