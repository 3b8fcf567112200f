
pub const ELECTRON_MASS: f64 = 0.00054857990946; // Source: NIST 2010 CODATA
pub const PROTON_MASS: f64 = 1.007276466812; // Source: NIST 2010 CODATA

pub const H_MONO_MASS: f64 = 1.00782503207;
pub const H2_MONO_MASS: f64 = 2.01565006414;

pub const CO_MONO_MASS: f64 = 27.99491461956;
pub const CO2_MONO_MASS: f64 = 43.98982923912;
pub const NH3_MONO_MASS: f64 = 17.02654910101;

pub const WATER_MONO_MASS: f64 = 18.010565;
pub const WATER_AVERAGE_MASS: f64 = 18.01525697318;

// Neutral-loss molecules
pub const H3PO4_MONO_MASS: f64 = 97.97689520445; // phosphoric acid, lost from phospho-S/T
pub const HPO3_MONO_MASS: f64 = 79.96633052075; // metaphosphoric acid, lost from phospho-Y
pub const CH4OS_MONO_MASS: f64 = 63.99828574784; // methanesulfenic acid, lost from oxidized M
