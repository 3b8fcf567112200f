#![allow(non_camel_case_types)]

use anyhow::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::chemistry::mass_calc::calc_peptide_mono_mass;
use crate::chemistry::table::AminoAcidTable;

#[derive(Clone, Default, PartialEq, Debug)]
pub struct AminoAcidResidue {
    pub code1: char,
    pub code3: String,
    pub name: String,
    pub mono_mass: f64,
    pub average_mass: f64,
}

impl AminoAcidResidue {
    pub fn new(
        code1: char,
        code3: &str,
        name: &str,
        mono_mass: f64,
        average_mass: f64,
    ) -> Result<AminoAcidResidue> {
        if code3.len() < 3 { bail!("code3 must contain three characters") }
        if name.is_empty() { bail!("name is empty") }
        if mono_mass <= 0.0 { bail!("mono_mass must be a strictly positive number") }
        if average_mass <= 0.0 { bail!("average_mass must be a strictly positive number") }

        Ok(AminoAcidResidue {
            code1: code1,
            code3: code3.to_string(),
            name: name.to_string(),
            mono_mass: mono_mass,
            average_mass: average_mass,
        })
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum PtmLocation {
    ANYWHERE,
    ANY_N_TERM,
    ANY_C_TERM,
}

impl PtmLocation {
    pub fn new(location: &str) -> Option<PtmLocation> {
        match location {
            "Anywhere"   => Some(PtmLocation::ANYWHERE),
            "Any N-term" => Some(PtmLocation::ANY_N_TERM),
            "Any C-term" => Some(PtmLocation::ANY_C_TERM),
            _            => None
        }
    }
}

impl std::fmt::Display for PtmLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PtmLocation::*;

        match self {
            ANYWHERE   => write!(f, "Anywhere"),
            ANY_N_TERM => write!(f, "Any N-term"),
            ANY_C_TERM => write!(f, "Any C-term"),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Modification {
    pub name: String,
    pub short_name: Option<String>,
    pub mono_mass: f64,
    pub location: PtmLocation,
    // single-letter code of the targeted residue; None means any residue
    pub residue_constraint: Option<char>,
}

impl Modification {
    pub fn new(
        name: &str,
        short_name: Option<&str>,
        mono_mass: f64,
        location: PtmLocation,
        residue_constraint: Option<char>,
    ) -> Result<Modification> {
        if name.is_empty() { bail!("name is empty") }

        Ok(Modification {
            name: name.to_string(),
            short_name: short_name.map(|s| s.to_string()),
            mono_mass: mono_mass,
            location: location,
            residue_constraint: residue_constraint,
        })
    }
}

#[derive(Clone, Default, PartialEq, Debug)]
pub struct ModificationTable {
    pub modifications: Vec<Modification>,
    pub mod_by_name: HashMap<String, Modification>,
}

impl ModificationTable {
    pub fn new(modifications: Vec<Modification>) -> Result<ModificationTable> {
        let n_mods = modifications.len();
        let mut mod_by_name = HashMap::with_capacity(n_mods);
        for modification in modifications.to_owned() {
            mod_by_name.insert(modification.name.to_owned(), modification);
        }

        if mod_by_name.len() != n_mods {
            bail!("modifications contains duplicated entries")
        }

        Ok(ModificationTable {
            modifications: modifications,
            mod_by_name: mod_by_name,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Modification> {
        self.mod_by_name.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Modification> {
        self.mod_by_name.get(name).ok_or_else(
            || anyhow!("can't find modification '{}' in the provided table", name)
        )
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum SequenceMatchingRule {
    CHAR_IDENTICAL,
    INDISTINGUISHABLE_AA,
}

impl SequenceMatchingRule {
    pub fn residues_match(&self, target: char, residue: char) -> bool {
        if target == residue {
            return true;
        }

        match self {
            SequenceMatchingRule::CHAR_IDENTICAL => false,
            SequenceMatchingRule::INDISTINGUISHABLE_AA => matches!(
                (target, residue),
                ('I', 'L') | ('L', 'I')
                    | ('J', 'I') | ('J', 'L') | ('I', 'J') | ('L', 'J')
                    | ('B', 'N') | ('B', 'D') | ('N', 'B') | ('D', 'B')
                    | ('Z', 'Q') | ('Z', 'E') | ('Q', 'Z') | ('E', 'Z')
                    | ('X', _) | (_, 'X')
            ),
        }
    }
}

/// One modification occurrence on a peptide. Sites are 1-indexed residue
/// positions; site 0 is the N-terminus and site length+1 the C-terminus.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ModificationMatch {
    pub mod_name: String,
    pub site: i32,
}

impl ModificationMatch {
    pub fn new(mod_name: &str, site: i32) -> ModificationMatch {
        ModificationMatch {
            mod_name: mod_name.to_string(),
            site: site,
        }
    }
}

#[derive(Default, Debug)]
pub struct Peptide {
    sequence: String,
    modifications: Vec<ModificationMatch>,
    mono_mass_cache: OnceLock<f64>,
}

impl Peptide {
    pub fn new(sequence: &str, modifications: Vec<ModificationMatch>) -> Result<Peptide> {
        if sequence.is_empty() { bail!("sequence is empty") }

        let seq_len = sequence.chars().count() as i32;
        for m in &modifications {
            if m.site < 0 || m.site > seq_len + 1 {
                bail!(
                    "modification '{}' site {} is out of bounds for peptide '{}'",
                    m.mod_name, m.site, sequence
                )
            }
        }

        Ok(Peptide {
            sequence: sequence.to_string(),
            modifications: modifications,
            mono_mass_cache: OnceLock::new(),
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn length(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn modifications(&self) -> &[ModificationMatch] {
        &self.modifications
    }

    /// Monoisotopic mass including modification deltas, computed on first
    /// access and cached henceforth.
    pub fn mono_mass(&self, aa_table: &AminoAcidTable, mod_table: &ModificationTable) -> Result<f64> {
        if let Some(mass) = self.mono_mass_cache.get() {
            return Ok(*mass);
        }

        let mass = calc_peptide_mono_mass(self, aa_table, mod_table)?;
        let _ = self.mono_mass_cache.set(mass);

        Ok(mass)
    }

    /// All sites where the given modification could be placed on this
    /// peptide, using the same indexing convention as ModificationMatch.
    pub fn potential_modification_sites(
        &self,
        modification: &Modification,
        rule: SequenceMatchingRule,
    ) -> Vec<i32> {
        let seq_len = self.length() as i32;

        match modification.location {
            PtmLocation::ANY_N_TERM => vec![0],
            PtmLocation::ANY_C_TERM => vec![seq_len + 1],
            PtmLocation::ANYWHERE => match modification.residue_constraint {
                None => (1..=seq_len).collect(),
                Some(target) => self
                    .sequence
                    .chars()
                    .enumerate()
                    .filter(|(_, residue)| rule.residues_match(target, *residue))
                    .map(|(idx, _)| idx as i32 + 1)
                    .collect(),
            },
        }
    }

    /// Copy of this peptide with every occurrence of the named
    /// modifications removed. The mass cache is not carried over.
    pub fn without_modifications(&self, mod_names: &[&str]) -> Peptide {
        let kept = self
            .modifications
            .iter()
            .filter(|m| !mod_names.contains(&m.mod_name.as_str()))
            .cloned()
            .collect();

        Peptide {
            sequence: self.sequence.clone(),
            modifications: kept,
            mono_mass_cache: OnceLock::new(),
        }
    }

    pub fn with_added_modification(&self, modification: ModificationMatch) -> Result<Peptide> {
        let mut mods = self.modifications.clone();
        mods.push(modification);
        Peptide::new(&self.sequence, mods)
    }
}

// Manual Clone so that an already-computed mass is carried into the clone
// without the two peptides sharing the cell.
impl Clone for Peptide {
    fn clone(&self) -> Peptide {
        let cache = OnceLock::new();
        if let Some(mass) = self.mono_mass_cache.get() {
            let _ = cache.set(*mass);
        }

        Peptide {
            sequence: self.sequence.clone(),
            modifications: self.modifications.clone(),
            mono_mass_cache: cache,
        }
    }
}

impl PartialEq for Peptide {
    fn eq(&self, other: &Peptide) -> bool {
        self.sequence == other.sequence && self.modifications == other.modifications
    }
}
