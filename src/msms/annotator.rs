
use anyhow::*;

use crate::chemistry::constants::PROTON_MASS;
use crate::chemistry::model::{ModificationTable, Peptide};
use crate::chemistry::table::AminoAcidTable;
use crate::ms::spectrum::SpectrumIndex;
use crate::msms::fragmentation::{forward_ion_mz_offset, pair_mz_total};
use crate::msms::model::{FragmentIonSeries, IonKind, IonMatch, NeutralLoss, ReporterIon};
use crate::msms::params::{SeriesSelection, SpecificAnnotationParameters};

/// One theoretical fragment ion candidate produced from the charge-1
/// ladders (before peak lookup).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TheoreticalIon {
    pub series: FragmentIonSeries,
    pub number: i32,
    pub neutral_loss: Option<NeutralLoss>,
    pub charge: i8,
    pub mz: f64,
}

/// Precomputed charge-1 forward and complementary ion ladders of one
/// modified peptide for one series pair, matched on demand against a
/// SpectrumIndex.
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentAnnotator {
    sequence_length: usize,
    selection: SeriesSelection,
    // index i = cleavage after residue i+1 (ion number i+1 forward,
    // length-i-1 complementary)
    forward_mz: Vec<f64>,
    complementary_mz: Vec<f64>,
}

impl FragmentAnnotator {
    /// `fixed_modifications` is residue-indexed, parallel to the sequence
    /// (empty slice = no fixed modifications). Variable modifications are
    /// taken from the peptide's own matches; their sites map to ladder
    /// buckets as site 0 -> residue 0, sites 1..=len -> site-1,
    /// site len+1 -> residue len-1.
    pub fn new(
        peptide: &Peptide,
        fixed_modifications: &[Option<String>],
        selection: SeriesSelection,
        aa_table: &AminoAcidTable,
        mod_table: &ModificationTable,
    ) -> Result<FragmentAnnotator> {
        let sequence: Vec<char> = peptide.sequence().chars().collect();
        let seq_len = sequence.len();

        if !fixed_modifications.is_empty() && fixed_modifications.len() != seq_len {
            bail!(
                "fixed modification array length {} does not match peptide '{}' length {}",
                fixed_modifications.len(), peptide.sequence(), seq_len
            )
        }

        // Accumulate modification masses per residue bucket
        let mut residue_mod_masses = vec![0.0f64; seq_len];
        let mut fixed_mass_sum = 0.0f64;

        for (idx, mod_name_opt) in fixed_modifications.iter().enumerate() {
            if let Some(mod_name) = mod_name_opt {
                let mod_mass = mod_table.require(mod_name)?.mono_mass;
                residue_mod_masses[idx] += mod_mass;
                fixed_mass_sum += mod_mass;
            }
        }

        for mod_match in peptide.modifications() {
            let bucket = if mod_match.site <= 0 {
                0
            } else if mod_match.site as usize >= seq_len + 1 {
                seq_len - 1
            } else {
                (mod_match.site - 1) as usize
            };
            residue_mod_masses[bucket] += mod_table.require(&mod_match.mod_name)?.mono_mass;
        }

        // Forward ladder: running residue+modification sum plus the
        // series-specific charge-1 offset
        let fwd_offset = forward_ion_mz_offset(selection.pair.forward)?;

        let mut forward_mz = Vec::with_capacity(seq_len.saturating_sub(1));
        let mut fwd_running = 0.0f64;
        for i in 0..seq_len.saturating_sub(1) {
            let aa = aa_table.aa_by_code1.get(&sequence[i]).ok_or_else(
                || anyhow!("can't find amino acid '{}' in the provided table", sequence[i])
            )?;
            fwd_running += aa.mono_mass + residue_mod_masses[i];
            forward_mz.push(fwd_running + fwd_offset);
        }

        // Complementary ladder: pair total minus the forward ion at the
        // same cleavage
        let peptide_mass = peptide.mono_mass(aa_table, mod_table)? + fixed_mass_sum;
        let pair_total = pair_mz_total(selection.pair, peptide_mass);
        let complementary_mz = forward_mz.iter().map(|mz| pair_total - mz).collect();

        Ok(FragmentAnnotator {
            sequence_length: seq_len,
            selection: selection,
            forward_mz: forward_mz,
            complementary_mz: complementary_mz,
        })
    }

    pub fn forward_mz_ladder(&self) -> &[f64] {
        &self.forward_mz
    }

    pub fn complementary_mz_ladder(&self) -> &[f64] {
        &self.complementary_mz
    }

    /// All theoretical ion candidates for the selected ladders: base ions,
    /// their applicable neutral-loss variants, charge 1 plus the selected
    /// higher charge states.
    pub fn theoretical_ions(&self, params: &SpecificAnnotationParameters) -> Vec<TheoreticalIon> {
        let mut ions = Vec::new();

        for i in 0..self.forward_mz.len() {
            if self.selection.compute_forward {
                let number = (i + 1) as i32;
                self.push_candidates(
                    self.selection.pair.forward,
                    number,
                    self.forward_mz[i],
                    true,
                    params,
                    &mut ions,
                );
            }
            if self.selection.compute_complementary {
                let number = (self.sequence_length - i - 1) as i32;
                self.push_candidates(
                    self.selection.pair.complementary,
                    number,
                    self.complementary_mz[i],
                    false,
                    params,
                    &mut ions,
                );
            }
        }

        ions
    }

    /// Matches every theoretical ion against the index. Several peaks in
    /// tolerance of one theoretical m/z all yield a match; duplicates are
    /// intentionally kept.
    pub fn annotate(&self, index: &SpectrumIndex, params: &SpecificAnnotationParameters) -> Vec<IonMatch> {
        let mut matches = Vec::new();

        for ion in self.theoretical_ions(params) {
            let tol_da = params.tolerance_in_daltons(ion.mz);
            for peak_idx in index.matching_peak_indices(ion.mz, tol_da) {
                matches.push(IonMatch {
                    peak_mz: index.mz(peak_idx),
                    peak_intensity: index.intensity(peak_idx),
                    theo_mz: ion.mz,
                    charge: ion.charge,
                    ion: IonKind::Fragment {
                        series: ion.series,
                        number: ion.number,
                        neutral_loss: ion.neutral_loss,
                    },
                });
            }
        }

        matches
    }

    fn push_candidates(
        &self,
        series: FragmentIonSeries,
        number: i32,
        base_mz: f64,
        is_forward: bool,
        params: &SpecificAnnotationParameters,
        out: &mut Vec<TheoreticalIon>,
    ) {
        let mut variants: Vec<(Option<NeutralLoss>, f64)> = vec![(None, base_mz)];

        for loss in params.neutral_losses().losses() {
            let start = if is_forward {
                params.neutral_losses().get_forward_start(loss).unwrap_or(0)
            } else {
                params.neutral_losses().get_rewind_start(loss)
            };
            // boundary 0 or below means the loss never applies here
            if start >= 1 && number >= start {
                variants.push((Some(loss), base_mz - loss.mono_mass()));
            }
        }

        for (neutral_loss, mz1) in variants {
            out.push(TheoreticalIon {
                series: series,
                number: number,
                neutral_loss: neutral_loss,
                charge: 1,
                mz: mz1,
            });

            for charge in params.higher_charges() {
                let z = charge as f64;
                out.push(TheoreticalIon {
                    series: series,
                    number: number,
                    neutral_loss: neutral_loss,
                    charge: charge,
                    mz: (mz1 + (z - 1.0) * PROTON_MASS) / z,
                });
            }
        }
    }
}

/// Matches a fixed set of reporter ions (m/z = neutral mass + 1 proton)
/// against a SpectrumIndex, charge fixed at 1.
#[derive(Clone, PartialEq, Debug)]
pub struct ReporterIonAnnotator {
    reporter_mzs: Vec<(ReporterIon, f64)>,
}

impl ReporterIonAnnotator {
    pub fn new(reporter_ions: &[ReporterIon]) -> ReporterIonAnnotator {
        ReporterIonAnnotator {
            reporter_mzs: reporter_ions
                .iter()
                .map(|ion| (ion.clone(), ion.mono_mass + PROTON_MASS))
                .collect(),
        }
    }

    pub fn get_ion_matches(&self, index: &SpectrumIndex, params: &SpecificAnnotationParameters) -> Vec<IonMatch> {
        let mut matches = Vec::new();

        for (reporter, mz) in &self.reporter_mzs {
            let tol_da = params.tolerance_in_daltons(*mz);
            for peak_idx in index.matching_peak_indices(*mz, tol_da) {
                matches.push(IonMatch {
                    peak_mz: index.mz(peak_idx),
                    peak_intensity: index.intensity(peak_idx),
                    theo_mz: *mz,
                    charge: 1,
                    ion: IonKind::Reporter {
                        label: reporter.label.clone(),
                    },
                });
            }
        }

        matches
    }
}

/// Fragment-ion annotation of one peptide against one spectrum: matches
/// plus the full theoretical candidate list (needed by localization
/// scoring to know how many ions were annotatable).
#[derive(Clone, PartialEq, Debug)]
pub struct PeptideAnnotation {
    pub matches: Vec<IonMatch>,
    pub theoretical_ions: Vec<TheoreticalIon>,
}

/// Annotates a peptide over every selected series pair of the parameters.
pub fn annotate_peptide(
    peptide: &Peptide,
    fixed_modifications: &[Option<String>],
    index: &SpectrumIndex,
    params: &SpecificAnnotationParameters,
    aa_table: &AminoAcidTable,
    mod_table: &ModificationTable,
) -> Result<PeptideAnnotation> {
    let mut matches = Vec::new();
    let mut theoretical_ions = Vec::new();

    for selection in params.series_selections()? {
        let annotator = FragmentAnnotator::new(peptide, fixed_modifications, selection, aa_table, mod_table)?;
        matches.extend(annotator.annotate(index, params));
        theoretical_ions.extend(annotator.theoretical_ions(params));
    }

    log::trace!(
        "annotated '{}': {} matches over {} theoretical ions",
        peptide.sequence(), matches.len(), theoretical_ions.len()
    );

    Ok(PeptideAnnotation {
        matches: matches,
        theoretical_ions: theoretical_ions,
    })
}
