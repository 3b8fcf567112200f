
use serde::{Deserialize, Serialize};

use crate::chemistry::constants::*;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum FragmentIonSeries {
    a,
    b,
    c,
    d,
    v,
    w,
    x,
    y,
    z,
    immonium,
}

impl std::fmt::Display for FragmentIonSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum FragmentIonSeriesDirection {
    FORWARD,
    REVERSE,
    NONE,
}

//adv using match: if a new fragment ion series is added, it warns you about it.
pub fn get_ion_series_direction(ion_type: FragmentIonSeries) -> FragmentIonSeriesDirection {

    use FragmentIonSeries::*;
    use FragmentIonSeriesDirection::*;

    match ion_type {
        a => FORWARD,
        b => FORWARD,
        c => FORWARD,
        d => NONE, // satellite series, no sequential direction
        v => NONE,
        w => NONE,
        x => REVERSE,
        y => REVERSE,
        z => REVERSE,
        immonium => NONE,
    }
}

pub fn is_ion_forward(ion_type: FragmentIonSeries) -> Option<bool> {
    use FragmentIonSeriesDirection::*;

    match get_ion_series_direction(ion_type) {
        FORWARD => Some(true),
        REVERSE => Some(false),
        NONE => None
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum NeutralLoss {
    CH4OS,
    H2O,
    H3PO4,
    HPO3,
    NH3,
}

impl NeutralLoss {
    pub fn new(name: &str) -> Option<NeutralLoss> {
        match name {
            "CH4OS" => Some(NeutralLoss::CH4OS),
            "H2O"   => Some(NeutralLoss::H2O),
            "H3PO4" => Some(NeutralLoss::H3PO4),
            "HPO3"  => Some(NeutralLoss::HPO3),
            "NH3"   => Some(NeutralLoss::NH3),
            _       => None
        }
    }

    pub fn mono_mass(&self) -> f64 {
        match self {
            NeutralLoss::CH4OS => CH4OS_MONO_MASS,
            NeutralLoss::H2O => WATER_MONO_MASS,
            NeutralLoss::H3PO4 => H3PO4_MONO_MASS,
            NeutralLoss::HPO3 => HPO3_MONO_MASS,
            NeutralLoss::NH3 => NH3_MONO_MASS,
        }
    }
}

impl std::fmt::Display for NeutralLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum IonKind {
    Fragment {
        series: FragmentIonSeries,
        number: i32,
        neutral_loss: Option<NeutralLoss>,
    },
    Reporter {
        label: String,
    },
}

impl IonKind {
    pub fn label(&self) -> String {
        match self {
            IonKind::Fragment { series, number, neutral_loss } => match neutral_loss {
                Some(loss) => format!("{}{}-{}", series, number, loss),
                None => format!("{}{}", series, number),
            },
            IonKind::Reporter { label } => label.clone(),
        }
    }
}

/// One experimental peak assigned to one theoretical ion. Produced by the
/// annotators, never mutated.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct IonMatch {
    pub peak_mz: f64,
    pub peak_intensity: f32,
    pub theo_mz: f64,
    pub charge: i8,
    pub ion: IonKind,
}

impl IonMatch {
    pub fn mz_error(&self) -> f64 {
        self.peak_mz - self.theo_mz
    }
}

/// A label-chemistry reporter ion. The stored mass is the neutral species;
/// annotators add one proton.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ReporterIon {
    pub label: String,
    pub mono_mass: f64,
}

impl ReporterIon {
    pub fn new(label: &str, mono_mass: f64) -> ReporterIon {
        ReporterIon {
            label: label.to_string(),
            mono_mass: mono_mass,
        }
    }
}

// Reporter ion m/z values (1+) of the common isobaric labeling kits.
// Sources:
// - https://proteomicsresource.washington.edu/protocols06/tmt.php
// - Thermo TMT/TMTpro and Sciex iTRAQ product documentation
const TMT6_PLEX_MZ: [(&str, f64); 6] = [
    ("TMT126", 126.127726),
    ("TMT127", 127.124761),
    ("TMT128", 128.134436),
    ("TMT129", 129.131471),
    ("TMT130", 130.141145),
    ("TMT131", 131.138180),
];

const TMT11_PLEX_MZ: [(&str, f64); 11] = [
    ("TMT126", 126.127726),
    ("TMT127N", 127.124761),
    ("TMT127C", 127.131081),
    ("TMT128N", 128.128116),
    ("TMT128C", 128.134436),
    ("TMT129N", 129.131471),
    ("TMT129C", 129.137790),
    ("TMT130N", 130.134825),
    ("TMT130C", 130.141145),
    ("TMT131N", 131.138180),
    ("TMT131C", 131.144500),
];

const TMT18_PLEX_MZ: [(&str, f64); 18] = [
    ("TMT126", 126.127726),
    ("TMT127N", 127.124761),
    ("TMT127C", 127.131081),
    ("TMT128N", 128.128116),
    ("TMT128C", 128.134436),
    ("TMT129N", 129.131471),
    ("TMT129C", 129.137790),
    ("TMT130N", 130.134825),
    ("TMT130C", 130.141145),
    ("TMT131N", 131.138180),
    ("TMT131C", 131.144500),
    ("TMT132N", 132.141535),
    ("TMT132C", 132.147855),
    ("TMT133N", 133.144890),
    ("TMT133C", 133.151210),
    ("TMT134N", 134.148245),
    ("TMT134C", 134.154565),
    ("TMT135N", 135.151710),
];

const ITRAQ4_PLEX_MZ: [(&str, f64); 4] = [
    ("iTRAQ114", 114.110680),
    ("iTRAQ115", 115.107715),
    ("iTRAQ116", 116.111069),
    ("iTRAQ117", 117.114424),
];

const ITRAQ8_PLEX_MZ: [(&str, f64); 8] = [
    ("iTRAQ113", 113.107325),
    ("iTRAQ114", 114.110680),
    ("iTRAQ115", 115.107715),
    ("iTRAQ116", 116.111069),
    ("iTRAQ117", 117.114424),
    ("iTRAQ118", 118.111459),
    ("iTRAQ119", 119.114813),
    ("iTRAQ121", 121.121523),
];

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum IsobaricTag {
    Tmt6,
    Tmt10,
    Tmt11,
    Tmt16,
    Tmt18,
    Itraq4,
    Itraq8,
    User(Vec<ReporterIon>),
}

impl IsobaricTag {
    /// Neutral reporter ions of the kit (observed 1+ m/z minus one proton).
    pub fn reporter_ions(&self) -> Vec<ReporterIon> {
        let from_mz = |table: &[(&str, f64)]| {
            table
                .iter()
                .map(|(label, mz)| ReporterIon::new(label, mz - PROTON_MASS))
                .collect()
        };

        match self {
            IsobaricTag::Tmt6 => from_mz(&TMT6_PLEX_MZ),
            IsobaricTag::Tmt10 => from_mz(&TMT11_PLEX_MZ[0..10]),
            IsobaricTag::Tmt11 => from_mz(&TMT11_PLEX_MZ),
            IsobaricTag::Tmt16 => from_mz(&TMT18_PLEX_MZ[0..16]),
            IsobaricTag::Tmt18 => from_mz(&TMT18_PLEX_MZ),
            IsobaricTag::Itraq4 => from_mz(&ITRAQ4_PLEX_MZ),
            IsobaricTag::Itraq8 => from_mz(&ITRAQ8_PLEX_MZ),
            IsobaricTag::User(reporter_ions) => reporter_ions.clone(),
        }
    }
}
