
use anyhow::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::ms::utils::{calc_mz_tol_in_daltons, MassTolUnit};
use crate::msms::fragmentation::{series_pair, SeriesPair};
use crate::msms::model::{FragmentIonSeries, FragmentIonSeriesDirection, get_ion_series_direction, IsobaricTag, NeutralLoss, ReporterIon};
use crate::msms::neutral_loss::NeutralLossesMap;

/// One series pair with flags telling which of its two ladders were
/// actually selected.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SeriesSelection {
    pub pair: SeriesPair,
    pub compute_forward: bool,
    pub compute_complementary: bool,
}

/// Global annotation settings, valid across a whole identification run.
/// A SpecificAnnotationParameters is derived from these for each
/// peptide-spectrum pairing.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnnotationParameters {
    pub ion_series: Vec<FragmentIonSeries>,
    pub default_neutral_losses: Vec<NeutralLoss>,
    pub fragment_tolerance: f64,
    pub tolerance_unit: MassTolUnit,
    pub isobaric_tag: Option<IsobaricTag>,
}

impl AnnotationParameters {
    pub fn new(
        ion_series: Vec<FragmentIonSeries>,
        default_neutral_losses: Vec<NeutralLoss>,
        fragment_tolerance: f64,
        tolerance_unit: MassTolUnit,
        isobaric_tag: Option<IsobaricTag>,
    ) -> Result<AnnotationParameters> {
        if ion_series.is_empty() { bail!("no ion series selected") }
        if fragment_tolerance <= 0.0 { bail!("fragment_tolerance must be a strictly positive number") }

        Ok(AnnotationParameters {
            ion_series: ion_series,
            default_neutral_losses: default_neutral_losses,
            fragment_tolerance: fragment_tolerance,
            tolerance_unit: tolerance_unit,
            isobaric_tag: isobaric_tag,
        })
    }

    /// Specializes the global settings for one precursor: sequence
    /// independent default losses, fragment charges 1..precursor_charge-1.
    pub fn specific(&self, precursor_charge: i8) -> Result<SpecificAnnotationParameters> {
        let mut losses = NeutralLossesMap::new();
        for loss in &self.default_neutral_losses {
            losses.add_neutral_loss(*loss, 1, 1);
        }

        let fragment_charges: Vec<i8> = (1..precursor_charge).collect();

        let reporter_ions = self
            .isobaric_tag
            .as_ref()
            .map(|tag| tag.reporter_ions())
            .unwrap_or_default();

        SpecificAnnotationParameters::new(
            precursor_charge,
            self.ion_series.clone(),
            fragment_charges,
            losses,
            self.fragment_tolerance,
            self.tolerance_unit,
        )
        .map(|params| params.with_reporter_ions(reporter_ions))
    }
}

/// Annotation settings for one peptide-spectrum pairing: which ion series,
/// which fragment charge states, which neutral losses and what tolerance.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SpecificAnnotationParameters {
    precursor_charge: i8,
    ion_series: Vec<FragmentIonSeries>,
    fragment_charges: Vec<i8>,
    neutral_losses: NeutralLossesMap,
    fragment_tolerance: f64,
    tolerance_unit: MassTolUnit,
    reporter_ions: Vec<ReporterIon>,
}

impl SpecificAnnotationParameters {
    pub fn new(
        precursor_charge: i8,
        ion_series: Vec<FragmentIonSeries>,
        fragment_charges: Vec<i8>,
        neutral_losses: NeutralLossesMap,
        fragment_tolerance: f64,
        tolerance_unit: MassTolUnit,
    ) -> Result<SpecificAnnotationParameters> {
        if precursor_charge < 1 {
            bail!("precursor charge must be >= 1, got {}", precursor_charge)
        }
        if ion_series.is_empty() { bail!("no ion series selected") }
        if fragment_tolerance <= 0.0 { bail!("fragment_tolerance must be a strictly positive number") }

        // selected fragment charges must lie in [1, precursor_charge)
        for &charge in &fragment_charges {
            if charge < 1 || charge >= precursor_charge {
                bail!(
                    "fragment charge {} outside the allowed range [1, {})",
                    charge, precursor_charge
                )
            }
        }

        let fragment_charges: Vec<i8> = fragment_charges.into_iter().sorted().dedup().collect();

        Ok(SpecificAnnotationParameters {
            precursor_charge: precursor_charge,
            ion_series: ion_series,
            fragment_charges: fragment_charges,
            neutral_losses: neutral_losses,
            fragment_tolerance: fragment_tolerance,
            tolerance_unit: tolerance_unit,
            reporter_ions: Vec::new(),
        })
    }

    pub fn with_reporter_ions(mut self, reporter_ions: Vec<ReporterIon>) -> SpecificAnnotationParameters {
        self.reporter_ions = reporter_ions;
        self
    }

    pub fn precursor_charge(&self) -> i8 {
        self.precursor_charge
    }

    pub fn ion_series(&self) -> &[FragmentIonSeries] {
        &self.ion_series
    }

    pub fn fragment_charges(&self) -> &[i8] {
        &self.fragment_charges
    }

    /// Selected fragment charges above 1; charge 1 is always matched.
    pub fn higher_charges(&self) -> impl Iterator<Item = i8> + '_ {
        self.fragment_charges.iter().copied().filter(|&c| c >= 2)
    }

    pub fn neutral_losses(&self) -> &NeutralLossesMap {
        &self.neutral_losses
    }

    pub fn reporter_ions(&self) -> &[ReporterIon] {
        &self.reporter_ions
    }

    pub fn fragment_tolerance(&self) -> f64 {
        self.fragment_tolerance
    }

    pub fn tolerance_unit(&self) -> MassTolUnit {
        self.tolerance_unit
    }

    pub fn tolerance_in_daltons(&self, reference_mz: f64) -> f64 {
        calc_mz_tol_in_daltons(reference_mz, self.fragment_tolerance, self.tolerance_unit)
    }

    pub fn without_neutral_losses(&self) -> SpecificAnnotationParameters {
        let mut params = self.clone();
        params.neutral_losses = NeutralLossesMap::new();
        params
    }

    /// Groups the selected series into forward/complementary pairs with
    /// flags for the ladders actually selected, in first-seen order.
    pub fn series_selections(&self) -> Result<Vec<SeriesSelection>> {
        let mut selections: Vec<SeriesSelection> = Vec::new();

        for &series in &self.ion_series {
            let pair = series_pair(series)?;
            let is_forward = get_ion_series_direction(series) == FragmentIonSeriesDirection::FORWARD;

            match selections.iter_mut().find(|s| s.pair == pair) {
                Some(selection) => {
                    if is_forward {
                        selection.compute_forward = true;
                    } else {
                        selection.compute_complementary = true;
                    }
                }
                None => selections.push(SeriesSelection {
                    pair: pair,
                    compute_forward: is_forward,
                    compute_complementary: !is_forward,
                }),
            }
        }

        Ok(selections)
    }
}
