
use crate::chemistry::model::AminoAcidResidue;

use anyhow::*;
use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Clone, Default, PartialEq, Debug)]
pub struct AminoAcidTable {
    pub amino_acids: Vec<AminoAcidResidue>,
    pub aa_by_code1: HashMap<char, AminoAcidResidue>
}

impl AminoAcidTable {
    pub fn new(
        amino_acids: Vec<AminoAcidResidue>,
    ) -> Result<AminoAcidTable> {

        if amino_acids.is_empty() { bail!("amino_acids is empty") }

        let n_aas = amino_acids.len();
        let mut aa_by_code1 = HashMap::with_capacity(n_aas);
        for amino_acid in amino_acids.to_owned() {
            aa_by_code1.insert(amino_acid.code1, amino_acid);
        }

        if aa_by_code1.len() != n_aas {
            bail!("amino_acids contains duplicated entries")
        }

        Ok(AminoAcidTable {
            amino_acids: amino_acids,
            aa_by_code1: aa_by_code1,
        })
    }
}

// Sources :
// - http://en.wikipedia.org/wiki/Proteinogenic_amino_acid
// - https://proteomicsresource.washington.edu/tools/masses.php
// - http://www.matrixscience.com/help/aa_help.html
lazy_static! {
    pub static ref STANDARD_AMINO_ACID_TABLE: AminoAcidTable = AminoAcidTable::new(
        vec![
            AminoAcidResidue::new('A', "Ala", "Alanine", 71.03711381, 71.0779).unwrap(),
            AminoAcidResidue::new('R', "Arg", "Arginine", 156.1011111, 156.18568).unwrap(),
            AminoAcidResidue::new('N', "Asn", "Asparagine", 114.0429275, 114.10264).unwrap(),
            AminoAcidResidue::new('D', "Asp", "Aspartic acid", 115.0269431, 115.0874).unwrap(),
            AminoAcidResidue::new('C', "Cys", "Cysteine", 103.0091845, 103.1429).unwrap(),
            AminoAcidResidue::new('E', "Glu", "Glutamic acid", 129.0425931, 129.11398).unwrap(),
            AminoAcidResidue::new('Q', "Gln", "Glutamine", 128.0585775, 128.12922).unwrap(),
            AminoAcidResidue::new('G', "Gly", "Glycine", 57.02146374, 57.05132).unwrap(),
            AminoAcidResidue::new('H', "His", "Histidine", 137.0589119, 137.13928).unwrap(),
            AminoAcidResidue::new('I', "Ile", "Isoleucine", 113.084064, 113.15764).unwrap(),
            AminoAcidResidue::new('L', "Leu", "Leucine", 113.084064, 113.15764).unwrap(),
            AminoAcidResidue::new('K', "Lys", "Lysine", 128.0949631, 128.17228).unwrap(),
            AminoAcidResidue::new('M', "Met", "Methionine", 131.0404846, 131.19606).unwrap(),
            AminoAcidResidue::new('F', "Phe", "Phenylalanine", 147.0684139, 147.17386).unwrap(),
            AminoAcidResidue::new('P', "Pro", "Proline", 97.05276388, 97.11518).unwrap(),
            AminoAcidResidue::new('U', "Sec", "Selenocysteine", 150.9536353, 150.0379).unwrap(),
            AminoAcidResidue::new('S', "Ser", "Serine", 87.03202844, 87.0773).unwrap(),
            AminoAcidResidue::new('T', "Thr", "Threonine", 101.0476785, 101.10388).unwrap(),
            AminoAcidResidue::new('W', "Trp", "Tryptophan", 186.079313, 186.2099).unwrap(),
            AminoAcidResidue::new('Y', "Tyr", "Tyrosine", 163.0633286, 163.17326).unwrap(),
            AminoAcidResidue::new('V', "Val", "Valine", 99.06841395, 99.13106).unwrap(),
        ]
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_indexes_by_code1() {
        let lysine = STANDARD_AMINO_ACID_TABLE.aa_by_code1.get(&'K').unwrap();
        assert_eq!(lysine.code3, "Lys");
        assert!((lysine.mono_mass - 128.0949631).abs() < 1e-9);
    }

    #[test]
    fn duplicated_entries_are_rejected() {
        let res = AminoAcidTable::new(vec![
            AminoAcidResidue::new('A', "Ala", "Alanine", 71.03711381, 71.0779).unwrap(),
            AminoAcidResidue::new('A', "Ala", "Alanine", 71.03711381, 71.0779).unwrap(),
        ]);
        assert!(res.is_err());
    }
}
