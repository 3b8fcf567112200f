
use anyhow::*;

use crate::chemistry::constants::*;
use crate::msms::model::{get_ion_series_direction, FragmentIonSeries, FragmentIonSeriesDirection};

/// A forward/complementary ion series pair sharing the same backbone
/// cleavages: b/y, c/z or a/x.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SeriesPair {
    pub forward: FragmentIonSeries,
    pub complementary: FragmentIonSeries,
}

/// Resolves the pair a given series belongs to. Series without a
/// sequential direction (satellite d/v/w, immonium) are a configuration
/// error.
pub fn series_pair(ion_type: FragmentIonSeries) -> Result<SeriesPair> {
    use FragmentIonSeries::*;

    match ion_type {
        a | x => Ok(SeriesPair { forward: a, complementary: x }),
        b | y => Ok(SeriesPair { forward: b, complementary: y }),
        c | z => Ok(SeriesPair { forward: c, complementary: z }),
        _ => bail!("unsupported ion series '{}'", ion_type),
    }
}

/// Charge-1 m/z offset added to the running sum of residue masses to get
/// the forward ion of each cleavage (b = sum + proton; a and c shift by
/// the CO / NH3 group they lose or gain).
pub fn forward_ion_mz_offset(ion_type: FragmentIonSeries) -> Result<f64> {
    use FragmentIonSeries::*;

    match get_ion_series_direction(ion_type) {
        FragmentIonSeriesDirection::FORWARD => {}
        _ => bail!("ion series '{}' is not a forward series", ion_type),
    }

    match ion_type {
        a => Ok(PROTON_MASS - CO_MONO_MASS),
        b => Ok(PROTON_MASS),
        c => Ok(PROTON_MASS + NH3_MONO_MASS),
        _ => bail!("unsupported ion series '{}'", ion_type),
    }
}

/// Charge-1 m/z sum of a forward ion and its complementary partner at the
/// same cleavage. The NH3 shifts of c and z cancel out, so b/y and c/z
/// share the peptide-mass + 2 protons total; the a/x pair sits two
/// hydrogens lower (x = y + CO - H2 while a = b - CO).
pub fn pair_mz_total(pair: SeriesPair, peptide_mono_mass: f64) -> f64 {
    let base = peptide_mono_mass + 2.0 * PROTON_MASS;

    match pair.forward {
        FragmentIonSeries::a => base - H2_MONO_MASS,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FragmentIonSeries::*;

    #[test]
    fn pairs_resolve_from_either_member() {
        assert_eq!(series_pair(b).unwrap(), series_pair(y).unwrap());
        assert_eq!(series_pair(c).unwrap().complementary, z);
        assert_eq!(series_pair(x).unwrap().forward, a);
    }

    #[test]
    fn satellite_and_immonium_series_are_rejected() {
        for series in [d, v, w, immonium] {
            assert!(series_pair(series).is_err());
        }
    }

    #[test]
    fn forward_offsets_differ_by_the_expected_groups() {
        let b_offset = forward_ion_mz_offset(b).unwrap();
        assert!((forward_ion_mz_offset(a).unwrap() - (b_offset - CO_MONO_MASS)).abs() < 1e-12);
        assert!((forward_ion_mz_offset(c).unwrap() - (b_offset + NH3_MONO_MASS)).abs() < 1e-12);
        assert!(forward_ion_mz_offset(y).is_err());
    }
}
