
use anyhow::*;
use std::collections::HashMap;

use crate::chemistry::composition::parse_aa_composition;
use crate::chemistry::constants::{WATER_AVERAGE_MASS, WATER_MONO_MASS};
use crate::chemistry::model::{ModificationTable, Peptide};
use crate::chemistry::table::AminoAcidTable;

pub fn calc_aa_seq_mass(aa_seq: &str, aa_table: &AminoAcidTable, mono_mass: bool) -> Result<f64> {

    let aa_comp = parse_aa_composition(aa_seq);

    let get_aa_mass = |aa_code1: char| -> Result<f64> {
        let aa = aa_table.aa_by_code1.get(&aa_code1).ok_or_else(
            || anyhow!("can't find amino acid '{}' in the provided table", aa_code1)
        )?;
        let m = if mono_mass { aa.mono_mass } else { aa.average_mass };
        Ok(m)
    };

    let seq_mass = _calc_mass(aa_comp, get_aa_mass)?;

    if mono_mass {
        Ok(seq_mass + WATER_MONO_MASS)
    } else {
        Ok(seq_mass + WATER_AVERAGE_MASS)
    }
}

/// Monoisotopic peptide mass: residue masses + water + modification deltas.
pub fn calc_peptide_mono_mass(
    peptide: &Peptide,
    aa_table: &AminoAcidTable,
    mod_table: &ModificationTable,
) -> Result<f64> {
    let mut mass = calc_aa_seq_mass(peptide.sequence(), aa_table, true)?;

    for mod_match in peptide.modifications() {
        let mod_def = mod_table.require(&mod_match.mod_name)?;
        mass += mod_def.mono_mass;
    }

    Ok(mass)
}

fn _calc_mass<T, F>(abundance_map: HashMap<T, f32>, get_entity_mass: F) -> Result<f64> where F: Fn(T) -> Result<f64> {

    let mut mass: f64 = 0.0;
    for (entity, entity_ab) in abundance_map {
        let entity_mass = get_entity_mass(entity)?;
        mass += entity_ab as f64 * entity_mass;
    }

    Ok(mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::table::STANDARD_AMINO_ACID_TABLE;

    #[test]
    fn unmodified_sequence_mass() {
        // G + A + water
        let mass = calc_aa_seq_mass("GA", &STANDARD_AMINO_ACID_TABLE, true).unwrap();
        assert!((mass - (57.02146374 + 71.03711381 + 18.010565)).abs() < 1e-6);
    }

    #[test]
    fn unknown_residue_is_an_error() {
        assert!(calc_aa_seq_mass("A@", &STANDARD_AMINO_ACID_TABLE, true).is_err());
    }
}
