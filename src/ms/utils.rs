
use serde::{Deserialize, Serialize};

use crate::chemistry::constants::PROTON_MASS;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum MassTolUnit {
    Da,
    mmu,
    ppm
}

impl MassTolUnit {
    pub fn new(unit: &str) -> Option<MassTolUnit> {
        match unit {
            "Da"  => Some(MassTolUnit::Da),
            "mmu" => Some(MassTolUnit::mmu),
            "ppm" => Some(MassTolUnit::ppm),
            _     => None
        }
    }
}

impl std::fmt::Display for MassTolUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Absolute tolerance window half-width in Daltons. A ppm tolerance needs
/// the reference m/z it is relative to.
pub fn calc_mz_tol_in_daltons(mz: f64, mz_tol: f64, tol_unit: MassTolUnit) -> f64 {
    match tol_unit {
        MassTolUnit::Da => mz_tol,
        MassTolUnit::mmu => mz_tol / 1000.0,
        MassTolUnit::ppm => mz_tol * mz / 1000000.0
    }
}

pub fn mz_to_mass( mz: f64, charge: i32 ) -> f64 {
    let z = charge as f64;
    mz * z.abs() - z * PROTON_MASS
}
pub fn mass_to_mz( mass: f64, charge: i32 ) -> f64 {
    let z = charge as f64;
    (mass + z * PROTON_MASS) / z.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_units_convert_to_daltons() {
        assert_eq!(calc_mz_tol_in_daltons(500.0, 0.02, MassTolUnit::Da), 0.02);
        assert_eq!(calc_mz_tol_in_daltons(500.0, 20.0, MassTolUnit::mmu), 0.02);
        assert!((calc_mz_tol_in_daltons(500.0, 10.0, MassTolUnit::ppm) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn mass_mz_round_trip() {
        let mass = 1131.53728015;
        for charge in 1..4 {
            let mz = mass_to_mz(mass, charge);
            assert!((mz_to_mass(mz, charge) - mass).abs() < 1e-9);
        }
    }
}
